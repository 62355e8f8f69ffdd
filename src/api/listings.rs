//! 房源
//!
//! 所有方法都需要会话；日期使用 [`NaiveDate`]，序列化为 `YYYY-MM-DD`。

use chrono::NaiveDate;
use serde_json::Value;

use nestmatch_shared::protocol::listing::*;
use nestmatch_shared::{Amenity, Photo};

use crate::dispatcher::Dispatcher;
use crate::error::ApiResult;

/// 创建房源所需的字段
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub amenities: Vec<Amenity>,
    pub photos: Vec<Photo>,
    pub address: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 每周价格
    pub price: f64,
    pub listing_type: String,
    pub description: String,
}

pub struct Listings<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Listings<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn create(&self, listing: NewListing) -> ApiResult<Value> {
        self.dispatcher
            .call(&CreateListing {
                title: listing.title,
                amenities: listing.amenities,
                photos: listing.photos,
                address: listing.address,
                start_date: listing.start_date,
                end_date: listing.end_date,
                price: listing.price,
                listing_type: listing.listing_type,
                description: listing.description,
            })
            .await
    }

    pub async fn delete(&self, listing_id: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&DeleteListing {
                listing_id: listing_id.to_string(),
            })
            .await
    }

    pub async fn get_by_id(&self, listing_id: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&GetListingById {
                listing_id: listing_id.to_string(),
            })
            .await
    }

    pub async fn get_all(&self) -> ApiResult<Value> {
        self.dispatcher.call(&GetAllListings {}).await
    }

    pub async fn edit_title(&self, listing_id: &str, new_title: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditTitle {
                listing_id: listing_id.to_string(),
                new_title: new_title.to_string(),
            })
            .await
    }

    pub async fn edit_address(&self, listing_id: &str, new_address: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditAddress {
                listing_id: listing_id.to_string(),
                new_address: new_address.to_string(),
            })
            .await
    }

    pub async fn edit_start_date(
        &self,
        listing_id: &str,
        new_start_date: NaiveDate,
    ) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditStartDate {
                listing_id: listing_id.to_string(),
                new_start_date,
            })
            .await
    }

    pub async fn edit_end_date(
        &self,
        listing_id: &str,
        new_end_date: NaiveDate,
    ) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditEndDate {
                listing_id: listing_id.to_string(),
                new_end_date,
            })
            .await
    }

    pub async fn edit_price(&self, listing_id: &str, new_price: f64) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditPrice {
                listing_id: listing_id.to_string(),
                new_price,
            })
            .await
    }

    pub async fn edit_type(&self, listing_id: &str, new_type: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditType {
                listing_id: listing_id.to_string(),
                new_type: new_type.to_string(),
            })
            .await
    }

    pub async fn edit_description(
        &self,
        listing_id: &str,
        new_description: &str,
    ) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditDescription {
                listing_id: listing_id.to_string(),
                new_description: new_description.to_string(),
            })
            .await
    }

    /// 把已上传图片的 URL 附加到房源
    pub async fn add_photo(&self, listing_id: &str, url: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&AddPhoto {
                listing_id: listing_id.trim().to_string(),
                photo: Photo::from_url(url),
            })
            .await
    }

    pub async fn delete_photo(&self, listing_id: &str, photo_id: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&DeletePhoto {
                listing_id: listing_id.to_string(),
                photo_id: photo_id.to_string(),
            })
            .await
    }

    pub async fn add_amenity(
        &self,
        listing_id: &str,
        title: &str,
        distance: f64,
    ) -> ApiResult<Value> {
        self.dispatcher
            .call(&AddAmenity {
                listing_id: listing_id.to_string(),
                title: title.to_string(),
                distance,
            })
            .await
    }

    pub async fn delete_amenity(&self, listing_id: &str, amenity_id: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&DeleteAmenity {
                listing_id: listing_id.to_string(),
                amenity_id: amenity_id.to_string(),
            })
            .await
    }

    pub async fn send_interest(&self, listing_id: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&SendInterest {
                listing_id: listing_id.to_string(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{last_body, signed_in, url};
    use crate::error::ApiError;
    use serde_json::json;

    fn sample() -> NewListing {
        NewListing {
            title: "Sunny room".into(),
            amenities: vec![Amenity {
                title: "Gym".into(),
                distance: 0.5,
            }],
            photos: Vec::new(),
            address: "1 Main St".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
            price: 350.0,
            listing_type: "Sublet".into(),
            description: "Near campus".into(),
        }
    }

    #[tokio::test]
    async fn test_create_sends_iso_dates_and_type_field() {
        let (client, dispatcher) = signed_in("tok");
        client.mock_response(&url("/Listing/create"), 200, json!({ "listing": "l1" }));

        let res = dispatcher.listings().create(sample()).await.unwrap();

        assert_eq!(res["listing"], "l1");
        let body = last_body(&client);
        assert_eq!(body["startDate"], "2025-06-01");
        assert_eq!(body["endDate"], "2025-08-31");
        assert_eq!(body["type"], "Sublet");
        assert_eq!(body["amenities"][0]["distance"], 0.5);
        assert_eq!(body["session"], "tok");
    }

    #[tokio::test]
    async fn test_add_photo_shapes_photo_record() {
        let (client, dispatcher) = signed_in("tok");
        client.mock_response(&url("/Listing/addPhoto"), 200, json!({}));

        dispatcher
            .listings()
            .add_photo("  l1 ", "https://cdn.test/v1/abc.png")
            .await
            .unwrap();

        let body = last_body(&client);
        assert_eq!(body["listingId"], "l1");
        assert_eq!(body["photo"]["url"], "https://cdn.test/v1/abc.png");
        assert_eq!(body["photo"]["thumbUrl"], "https://cdn.test/v1/abc.png");
        assert_eq!(body["photo"]["storageKey"], "abc.png");
        assert_eq!(body["photo"]["contentType"], "image/png");
        assert_eq!(body["photo"]["alt"], "Housing listing photo");
    }

    #[tokio::test]
    async fn test_send_interest_path() {
        let (client, dispatcher) = signed_in("tok");
        client.mock_response(&url("/Listing/interest"), 200, json!({ "ok": true }));

        dispatcher.listings().send_interest("l7").await.unwrap();

        let req = client.requests().pop().unwrap();
        assert_eq!(req.url, url("/Listing/interest"));
        assert_eq!(req.header("Authorization"), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn test_get_all_propagates_server_error() {
        let (client, dispatcher) = signed_in("tok");
        client.mock_response(
            &url("/Listing/getAllListings"),
            401,
            json!({ "error": "Invalid session" }),
        );

        let err = dispatcher.listings().get_all().await.unwrap_err();
        assert_eq!(err, ApiError::Server("Invalid session".into()));
    }

    #[tokio::test]
    async fn test_edit_price_and_dates() {
        let (client, dispatcher) = signed_in("tok");
        client.mock_response(&url("/Listing/editPrice"), 200, json!({}));
        client.mock_response(&url("/Listing/editEndDate"), 200, json!({}));

        let listings = dispatcher.listings();
        listings.edit_price("l1", 410.5).await.unwrap();
        assert_eq!(last_body(&client)["newPrice"], 410.5);

        listings
            .edit_end_date("l1", NaiveDate::from_ymd_opt(2025, 9, 15).unwrap())
            .await
            .unwrap();
        assert_eq!(last_body(&client)["newEndDate"], "2025-09-15");
    }
}
