use serde_json::Value;

use nestmatch_shared::protocol::review::*;

use crate::dispatcher::Dispatcher;
use crate::error::ApiResult;

/// 评价
pub struct Reviews<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Reviews<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn create(&self, item: &str, ranking: u32, blurb: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&CreateReview {
                item: item.to_string(),
                ranking,
                blurb: blurb.to_string(),
            })
            .await
    }

    pub async fn delete(&self, review: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&DeleteReview {
                review: review.to_string(),
            })
            .await
    }

    pub async fn edit_ranking(&self, review: &str, ranking: u32) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditRanking {
                review: review.to_string(),
                ranking,
            })
            .await
    }

    pub async fn edit_blurb(&self, review: &str, blurb: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditBlurb {
                review: review.to_string(),
                blurb: blurb.to_string(),
            })
            .await
    }

    pub async fn by_item(&self, item: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&GetByItem {
                item: item.to_string(),
            })
            .await
    }

    pub async fn from_user(&self, user: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&GetFromUser {
                user: user.to_string(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{dispatcher, last_body, signed_in, url};
    use crate::error::ApiError;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_review() {
        let (client, dispatcher) = signed_in("tok");
        client.mock_response(&url("/Reviewing/create"), 200, json!({ "review": "r1" }));

        let res = dispatcher.reviews().create("l1", 4, "Great light").await.unwrap();

        assert_eq!(res["review"], "r1");
        assert_eq!(
            last_body(&client),
            json!({ "item": "l1", "ranking": 4, "blurb": "Great light", "session": "tok" })
        );
    }

    #[tokio::test]
    async fn test_queries_hit_underscore_operations() {
        let (client, dispatcher) = signed_in("tok");
        client.mock_response(&url("/Reviewing/_getReviewByItem"), 200, json!([]));
        client.mock_response(&url("/Reviewing/_getReviewFromUser"), 200, json!([]));

        let reviews = dispatcher.reviews();
        reviews.by_item("l1").await.unwrap();
        reviews.from_user("u1").await.unwrap();

        let urls: Vec<_> = client.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![url("/Reviewing/_getReviewByItem"), url("/Reviewing/_getReviewFromUser")]
        );
    }

    #[tokio::test]
    async fn test_edit_ranking_surfaces_server_message() {
        let (client, dispatcher) = signed_in("tok");
        client.mock_response(
            &url("/Reviewing/editRanking"),
            400,
            json!({ "error": "Ranking must be between 1 and 5" }),
        );

        let err = dispatcher.reviews().edit_ranking("r1", 9).await.unwrap_err();

        assert_eq!(err, ApiError::Server("Ranking must be between 1 and 5".into()));
        assert_eq!(
            last_body(&client),
            json!({ "review": "r1", "ranking": 9, "session": "tok" })
        );
    }

    #[tokio::test]
    async fn test_delete_passes_status_error_through() {
        let (client, dispatcher) = signed_in("tok");
        client.mock_response(&url("/Reviewing/deleteReview"), 500, json!({}));

        let err = dispatcher.reviews().delete("r1").await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_without_token_session_is_null() {
        let (client, dispatcher) = dispatcher();
        client.mock_response(&url("/Reviewing/editBlurb"), 200, json!({}));

        dispatcher.reviews().edit_blurb("r1", "Quiet street").await.unwrap();

        assert_eq!(
            last_body(&client),
            json!({ "review": "r1", "blurb": "Quiet street", "session": null })
        );
        let request = client.requests().pop().unwrap();
        assert_eq!(request.header("Authorization"), None);
    }
}
