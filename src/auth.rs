//! 认证流程
//!
//! 登录、注册、注销与删除账户会同时调用后端并改写会话状态，
//! 这里把这些步骤串起来，界面层只需要处理最终结果。

use serde_json::Value;

use nestmatch_shared::UserProfile;
use nestmatch_shared::protocol::account::Register;

use crate::dispatcher::Dispatcher;
use crate::error::{ApiError, ApiResult};

/// 借用分发器的认证流程
pub struct AuthFlow<'a> {
    dispatcher: &'a Dispatcher,
}

impl Dispatcher {
    pub fn auth(&self) -> AuthFlow<'_> {
        AuthFlow { dispatcher: self }
    }
}

impl<'a> AuthFlow<'a> {
    /// 登录并建立会话
    ///
    /// 认证响应若直接携带 token (`session` 或 `token`) 则使用之，
    /// 否则用其中的 `user` 创建会话。随后尽力补全用户资料，失败只记录日志。
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<UserProfile> {
        let accounts = self.dispatcher.accounts();
        let auth = accounts.authenticate(username, password).await?;
        let user_id = string_field(&auth, "user");

        let token = match string_field(&auth, "session").or_else(|| string_field(&auth, "token")) {
            Some(token) => token,
            None => {
                let id = user_id.as_deref().ok_or_else(|| {
                    ApiError::Decode(
                        "authenticate response has neither a session nor a user".into(),
                    )
                })?;
                accounts.create_session(id).await?.session
            }
        };

        let profile = UserProfile {
            id: user_id,
            username: Some(username.to_string()),
            ..Default::default()
        };
        self.establish(token, profile).await
    }

    /// 注册新账户并登录
    pub async fn register(&self, registration: &Register) -> ApiResult<UserProfile> {
        let created = self.dispatcher.accounts().register(registration).await?;

        let token = string_field(&created, "session").or_else(|| string_field(&created, "token"));
        let Some(token) = token else {
            log_info!("[Auth] Account created for {}, signing in", registration.username);
            let mut profile = self.login(&registration.username, &registration.password).await?;
            profile.merge(registered_profile(registration, None));
            self.dispatcher.session().set_user(profile.clone());
            return Ok(profile);
        };

        let profile = registered_profile(registration, string_field(&created, "user"));
        self.establish(token, profile).await
    }

    /// 注销
    ///
    /// 无论后端是否成功，本地会话都会被清空；返回后端调用的结果。
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self.dispatcher.accounts().logout().await;
        if let Err(e) = &result {
            log_warn!("[Auth] Remote logout failed, clearing local session anyway: {}", e);
        }
        self.dispatcher.session().clear();
        log_info!("[Auth] Signed out");
        result.map(|_| ())
    }

    /// 删除账户，成功后清空本地会话
    pub async fn delete_account(&self, password: &str) -> ApiResult<()> {
        self.dispatcher.accounts().delete_account(password).await?;
        self.dispatcher.session().clear();
        log_info!("[Auth] Account deleted");
        Ok(())
    }

    async fn establish(&self, token: String, mut profile: UserProfile) -> ApiResult<UserProfile> {
        let session = self.dispatcher.session();
        session.set_token(token);
        session.set_user(profile.clone());

        match self.dispatcher.user_info().get().await {
            Ok(info) => match profile_from(info) {
                Some(info) => {
                    profile.merge(info);
                    session.set_user(profile.clone());
                }
                None => log_warn!("[Auth] User info response had no usable profile"),
            },
            Err(e) => log_warn!("[Auth] Could not load user info: {}", e),
        }

        log_info!(
            "[Auth] Signed in as {}",
            profile.username.as_deref().unwrap_or("<unknown>")
        );
        Ok(profile)
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn registered_profile(registration: &Register, id: Option<String>) -> UserProfile {
    UserProfile {
        id,
        username: Some(registration.username.clone()),
        email_address: Some(registration.email_address.clone()),
        age: Some(registration.age),
        gender: Some(registration.gender.clone()),
        affiliation: Some(registration.affiliation.clone()),
    }
}

/// 资料可能直接返回，也可能包在 `userInfo` 中或作为数组的第一项
fn profile_from(value: Value) -> Option<UserProfile> {
    let inner = match value {
        Value::Array(items) => items.into_iter().next()?,
        Value::Object(mut map) => match map.remove("userInfo") {
            Some(info) => info,
            None => Value::Object(map),
        },
        _ => return None,
    };
    let info = match inner {
        Value::Array(items) => items.into_iter().next()?,
        other => other,
    };
    serde_json::from_value(info).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{dispatcher, signed_in, url};
    use serde_json::json;

    fn registration() -> Register {
        Register {
            username: "bob".into(),
            password: "pw".into(),
            age: 20,
            gender: "male".into(),
            affiliation: "BU".into(),
            email_address: "bob@bu.edu".into(),
        }
    }

    #[tokio::test]
    async fn test_login_then_calls_carry_bearer_token() {
        let (client, dispatcher) = dispatcher();
        client.mock_response(&url("/PasswordAuth/authenticate"), 200, json!({ "user": "u1" }));
        client.mock_response(&url("/Sessioning/create"), 200, json!({ "session": "tok-1" }));
        client.mock_response(&url("/UserInfo/_getUserInfo"), 200, json!({ "age": 21 }));
        client.mock_response(&url("/Listing/getAllListings"), 200, json!([]));

        let profile = dispatcher.auth().login("alice", "secret").await.unwrap();

        assert_eq!(profile.id.as_deref(), Some("u1"));
        assert_eq!(profile.username.as_deref(), Some("alice"));
        assert_eq!(profile.age, Some(21));
        assert_eq!(dispatcher.session().token().as_deref(), Some("tok-1"));

        dispatcher.listings().get_all().await.unwrap();
        let last = client.requests().pop().unwrap();
        assert_eq!(last.header("Authorization"), Some("Bearer tok-1"));
        assert_eq!(last.json_body().unwrap()["session"], "tok-1");
    }

    #[tokio::test]
    async fn test_login_uses_token_from_authenticate_response() {
        let (client, dispatcher) = dispatcher();
        client.mock_response(
            &url("/PasswordAuth/authenticate"),
            200,
            json!({ "user": "u1", "session": "direct" }),
        );

        dispatcher.auth().login("alice", "secret").await.unwrap();

        assert_eq!(dispatcher.session().token().as_deref(), Some("direct"));
        let urls: Vec<_> = client.requests().into_iter().map(|r| r.url).collect();
        assert!(!urls.contains(&url("/Sessioning/create")));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_empty() {
        let (client, dispatcher) = dispatcher();
        client.mock_response(
            &url("/PasswordAuth/authenticate"),
            200,
            json!({ "error": "Invalid username or password" }),
        );

        let err = dispatcher.auth().login("alice", "wrong").await.unwrap_err();

        assert_eq!(err.server_message(), Some("Invalid username or password"));
        assert!(!dispatcher.session().is_authenticated());
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn test_user_info_failure_does_not_fail_login() {
        let (client, dispatcher) = dispatcher();
        client.mock_response(&url("/PasswordAuth/authenticate"), 200, json!({ "token": "t" }));
        client.mock_response(&url("/UserInfo/_getUserInfo"), 500, json!({}));

        let profile = dispatcher.auth().login("alice", "secret").await.unwrap();

        assert_eq!(profile.username.as_deref(), Some("alice"));
        assert!(dispatcher.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_register_falls_back_to_login() {
        let (client, dispatcher) = dispatcher();
        client.mock_response(&url("/createAccount"), 200, json!({ "user": "u9" }));
        client.mock_response(&url("/PasswordAuth/authenticate"), 200, json!({ "user": "u9" }));
        client.mock_response(&url("/Sessioning/create"), 200, json!({ "session": "s9" }));

        let profile = dispatcher.auth().register(&registration()).await.unwrap();

        assert_eq!(dispatcher.session().token().as_deref(), Some("s9"));
        assert_eq!(profile.id.as_deref(), Some("u9"));
        assert_eq!(profile.affiliation.as_deref(), Some("BU"));
        assert_eq!(dispatcher.session().user(), Some(profile));
    }

    #[tokio::test]
    async fn test_register_with_session_in_response() {
        let (client, dispatcher) = dispatcher();
        client.mock_response(&url("/createAccount"), 200, json!({ "user": "u9", "session": "s9" }));

        let profile = dispatcher.auth().register(&registration()).await.unwrap();

        assert_eq!(dispatcher.session().token().as_deref(), Some("s9"));
        assert_eq!(profile.email_address.as_deref(), Some("bob@bu.edu"));
        let urls: Vec<_> = client.requests().into_iter().map(|r| r.url).collect();
        assert!(!urls.contains(&url("/PasswordAuth/authenticate")));
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_on_failure() {
        let (client, dispatcher) = signed_in("tok");
        client.mock_response(&url("/Sessioning/delete"), 503, json!({}));

        let result = dispatcher.auth().logout().await;

        assert!(matches!(result, Err(ApiError::Status { status: 503, .. })));
        assert!(!dispatcher.session().is_authenticated());
        assert!(dispatcher.session().user().is_none());
    }

    #[tokio::test]
    async fn test_delete_account_keeps_session_on_failure() {
        let (client, dispatcher) = signed_in("tok");
        client.queue_response(
            &url("/PasswordAuth/deleteAccount"),
            200,
            json!({ "error": "Incorrect password" }),
        );
        client.queue_response(&url("/PasswordAuth/deleteAccount"), 200, json!({}));

        assert!(dispatcher.auth().delete_account("bad").await.is_err());
        assert!(dispatcher.session().is_authenticated());

        dispatcher.auth().delete_account("good").await.unwrap();
        assert!(!dispatcher.session().is_authenticated());
    }

    #[test]
    fn test_profile_shapes() {
        let direct = profile_from(json!({ "username": "a" })).unwrap();
        assert_eq!(direct.username.as_deref(), Some("a"));

        let wrapped = profile_from(json!({ "userInfo": { "age": 30 } })).unwrap();
        assert_eq!(wrapped.age, Some(30));

        let listed = profile_from(json!([{ "gender": "f" }])).unwrap();
        assert_eq!(listed.gender.as_deref(), Some("f"));

        assert!(profile_from(json!("nope")).is_none());
    }
}
