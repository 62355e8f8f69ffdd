use serde_json::Value;

use nestmatch_shared::protocol::account::{
    Authenticate, ChangePassword, CreateSession, DeleteAccount, Logout, Register, SessionCreated,
};

use crate::dispatcher::Dispatcher;
use crate::error::ApiResult;

/// 账户与会话
pub struct Accounts<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Accounts<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn register(&self, request: &Register) -> ApiResult<Value> {
        self.dispatcher.call(request).await
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&Authenticate {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
    }

    pub async fn create_session(&self, user: &str) -> ApiResult<SessionCreated> {
        self.dispatcher
            .call(&CreateSession {
                user: user.to_string(),
            })
            .await
    }

    pub async fn logout(&self) -> ApiResult<Value> {
        self.dispatcher.call(&Logout {}).await
    }

    /// 修改密码，用户名取自当前会话
    pub async fn change_password(&self, current: &str, new: &str) -> ApiResult<Value> {
        let username = self.dispatcher.session().user().and_then(|u| u.username);
        self.dispatcher
            .call(&ChangePassword {
                username,
                current_pass: current.to_string(),
                new_pass: new.to_string(),
            })
            .await
    }

    /// 删除账户，身份字段取自当前会话
    pub async fn delete_account(&self, password: &str) -> ApiResult<Value> {
        let user = self.dispatcher.session().user().unwrap_or_default();
        self.dispatcher
            .call(&DeleteAccount {
                password: password.to_string(),
                username: user.username,
                user: user.id,
                email_address: user.email_address,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{dispatcher, last_body, signed_in, url};
    use crate::error::ApiError;
    use nestmatch_shared::UserProfile;
    use serde_json::json;

    #[tokio::test]
    async fn test_authenticate_is_public() {
        let (client, dispatcher) = dispatcher();
        client.mock_response(&url("/PasswordAuth/authenticate"), 200, json!({ "user": "u1" }));

        let res = dispatcher.accounts().authenticate("alice", "secret").await.unwrap();

        assert_eq!(res, json!({ "user": "u1" }));
        assert_eq!(
            last_body(&client),
            json!({ "username": "alice", "password": "secret" })
        );
    }

    #[tokio::test]
    async fn test_register_sends_camel_case_fields() {
        let (client, dispatcher) = dispatcher();
        client.mock_response(&url("/createAccount"), 200, json!({ "user": "u9" }));

        let request = Register {
            username: "bob".into(),
            password: "pw".into(),
            age: 21,
            gender: "male".into(),
            affiliation: "MIT".into(),
            email_address: "bob@mit.edu".into(),
        };
        dispatcher.accounts().register(&request).await.unwrap();

        let body = last_body(&client);
        assert_eq!(body["emailAddress"], "bob@mit.edu");
        assert_eq!(body["age"], 21);
        assert!(body.get("session").is_none());
    }

    #[tokio::test]
    async fn test_logout_carries_session() {
        let (client, dispatcher) = signed_in("tok");
        client.mock_response(&url("/Sessioning/delete"), 200, json!({}));

        dispatcher.accounts().logout().await.unwrap();

        assert_eq!(last_body(&client), json!({ "session": "tok" }));
    }

    #[tokio::test]
    async fn test_change_password_uses_session_username() {
        let (client, dispatcher) = signed_in("tok");
        dispatcher.session().set_user(UserProfile {
            username: Some("alice".into()),
            ..Default::default()
        });
        client.mock_response(&url("/PasswordAuth/changePassword"), 200, json!({}));

        dispatcher.accounts().change_password("old", "new").await.unwrap();

        assert_eq!(
            last_body(&client),
            json!({
                "username": "alice",
                "currentPass": "old",
                "newPass": "new",
                "session": "tok"
            })
        );
    }

    #[tokio::test]
    async fn test_delete_account_surfaces_wrong_password() {
        let (client, dispatcher) = signed_in("tok");
        dispatcher.session().set_user(UserProfile {
            id: Some("u1".into()),
            username: Some("alice".into()),
            email_address: Some("a@x.edu".into()),
            ..Default::default()
        });
        client.mock_response(
            &url("/PasswordAuth/deleteAccount"),
            200,
            json!({ "error": "Incorrect password" }),
        );

        let err = dispatcher.accounts().delete_account("bad").await.unwrap_err();

        assert_eq!(err, ApiError::Server("Incorrect password".into()));
        let body = last_body(&client);
        assert_eq!(body["user"], "u1");
        assert_eq!(body["emailAddress"], "a@x.edu");
        assert_eq!(body["password"], "bad");
    }

    #[tokio::test]
    async fn test_create_session_decodes_token() {
        let (client, dispatcher) = dispatcher();
        client.mock_response(&url("/Sessioning/create"), 200, json!({ "session": "s-1" }));

        let created = dispatcher.accounts().create_session("u1").await.unwrap();

        assert_eq!(created.session, "s-1");
        assert_eq!(last_body(&client), json!({ "user": "u1" }));
    }
}
