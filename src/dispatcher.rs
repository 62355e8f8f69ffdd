//! 请求分发器
//!
//! 负责一次认证后端调用的完整过程：构建请求信封、附加 Bearer 凭证、
//! 在时限内发出单次 POST（不重试），并把结果归一化为 [`ApiResult`]。

use std::sync::Arc;
use std::time::Duration;

use futures::future::{Either, select};
use serde_json::{Map, Value};

use nestmatch_shared::protocol::ApiRequest;
use nestmatch_shared::{
    CONTENT_TYPE_JSON, ERROR_FIELD, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, SESSION_FIELD,
};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse, Timer};
use crate::session::SessionState;

/// 单次调用的请求信封，处理完即丢弃
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    /// 后端操作标识，如 `/Listing/create`
    pub operation: String,
    /// JSON 对象形式的参数
    pub payload: Value,
    pub timeout: Duration,
}

impl RequestEnvelope {
    pub fn new(operation: impl Into<String>, payload: Value, timeout: Duration) -> Self {
        Self {
            operation: operation.into(),
            payload,
            timeout,
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    base_url: String,
    default_timeout: Duration,
    session: SessionState,
    client: Arc<dyn HttpClient>,
    timer: Arc<dyn Timer>,
}

impl Dispatcher {
    pub fn new(
        config: &ClientConfig,
        session: SessionState,
        client: Arc<dyn HttpClient>,
        timer: Arc<dyn Timer>,
    ) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            default_timeout: config.request_timeout,
            session,
            client,
            timer,
        }
    }

    /// 分发器读取的会话上下文
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    fn url(&self, operation: &str) -> String {
        if operation.starts_with('/') {
            format!("{}{}", self.base_url, operation)
        } else {
            format!("{}/{}", self.base_url, operation)
        }
    }

    /// 由强类型请求构建信封
    ///
    /// 需要会话的操作会在 payload 中加入 `session` 字段（无 token 时为 null）。
    pub fn envelope<R: ApiRequest>(
        &self,
        request: &R,
        timeout: Duration,
    ) -> ApiResult<RequestEnvelope> {
        let mut payload = match serde_json::to_value(request) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(other) => {
                return Err(ApiError::InvalidRequest(format!(
                    "payload for {} must be a JSON object, got {}",
                    R::PATH,
                    other
                )));
            }
            Err(e) => return Err(ApiError::InvalidRequest(e.to_string())),
        };

        if R::AUTHENTICATED {
            let token = self.session.token().map(Value::String).unwrap_or(Value::Null);
            payload.insert(SESSION_FIELD.to_string(), token);
        }

        Ok(RequestEnvelope::new(R::PATH, Value::Object(payload), timeout))
    }

    /// 以默认时限调用一个后端操作
    pub async fn call<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        self.call_with_timeout(request, self.default_timeout).await
    }

    pub async fn call_with_timeout<R: ApiRequest>(
        &self,
        request: &R,
        timeout: Duration,
    ) -> ApiResult<R::Response> {
        let envelope = self.envelope(request, timeout)?;
        let value = self.dispatch(envelope).await?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::Decode(format!("{} response: {}", R::PATH, e)))
    }

    /// 发出请求并归一化结果，成功时原样返回响应体
    pub async fn dispatch(&self, envelope: RequestEnvelope) -> ApiResult<Value> {
        let operation = envelope.operation.trim();
        if operation.is_empty() || operation == "/" {
            return Err(ApiError::InvalidRequest("operation must not be empty".into()));
        }

        let url = self.url(operation);
        let mut request = HttpRequest::post(&url)
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .with_json(&envelope.payload);

        // 只读取调用时刻的 token 快照
        if let Some(token) = self.session.token() {
            request = request.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        let send = self.client.send(request);
        let deadline = self.timer.sleep(envelope.timeout);

        let response = match select(send, deadline).await {
            Either::Left((Ok(response), _)) => response,
            Either::Left((Err(e), _)) => {
                log_error!("[Dispatcher] {} failed: {}", operation, e);
                return Err(ApiError::Transport(e));
            }
            Either::Right(((), _)) => {
                log_error!(
                    "[Dispatcher] {} timed out after {} ms",
                    operation,
                    envelope.timeout.as_millis()
                );
                return Err(ApiError::Timeout {
                    after: envelope.timeout,
                });
            }
        };

        normalize(operation, response)
    }
}

/// 把 HTTP 响应归一化为结果
///
/// 带非空 `error` 字段的 JSON 对象无论状态码都视为后端拒绝。
fn normalize(operation: &str, response: HttpResponse) -> ApiResult<Value> {
    let parsed = if response.body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(&response.body)
    };

    if let Ok(Value::Object(map)) = &parsed {
        match map.get(ERROR_FIELD) {
            None | Some(Value::Null) => {}
            Some(Value::String(message)) => {
                log_warn!("[Dispatcher] {} rejected: {}", operation, message);
                return Err(ApiError::Server(message.clone()));
            }
            Some(other) => {
                log_warn!("[Dispatcher] {} rejected: {}", operation, other);
                return Err(ApiError::Server(other.to_string()));
            }
        }
    }

    if !response.ok() {
        log_error!("[Dispatcher] {} returned HTTP {}", operation, response.status);
        return Err(ApiError::Status {
            status: response.status,
            body: response.body,
        });
    }

    log_info!("[Dispatcher] {} -> {}", operation, response.status);
    parsed.map_err(|e| ApiError::Decode(format!("{} response: {}", operation, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{MockHttpClient, TokioTimer};
    use nestmatch_shared::protocol::{account, listing, review};
    use serde_json::json;

    const BASE: &str = "http://api.test/api";

    fn setup() -> (Arc<MockHttpClient>, SessionState, Dispatcher) {
        let client = Arc::new(MockHttpClient::new());
        let session = SessionState::in_memory();
        let config = ClientConfig::default().with_api_base_url(format!("{}/", BASE));
        let dispatcher =
            Dispatcher::new(&config, session.clone(), client.clone(), Arc::new(TokioTimer));
        (client, session, dispatcher)
    }

    fn url(op: &str) -> String {
        format!("{}{}", BASE, op)
    }

    #[tokio::test]
    async fn test_bearer_header_present_with_token() {
        let (client, session, dispatcher) = setup();
        session.set_token("tok-9");
        client.mock_response(&url("/Listing/getAllListings"), 200, json!([]));

        dispatcher.call(&listing::GetAllListings {}).await.unwrap();

        let reqs = client.requests();
        assert_eq!(reqs[0].header("Authorization"), Some("Bearer tok-9"));
        assert_eq!(reqs[0].header("Content-Type"), Some("application/json"));
        assert_eq!(reqs[0].json_body().unwrap()["session"], "tok-9");
    }

    #[tokio::test]
    async fn test_no_bearer_header_without_token() {
        let (client, _session, dispatcher) = setup();
        client.mock_response(&url("/Listing/getAllListings"), 200, json!([]));

        dispatcher.call(&listing::GetAllListings {}).await.unwrap();

        let reqs = client.requests();
        assert_eq!(reqs[0].header("Authorization"), None);
        assert_eq!(reqs[0].json_body().unwrap()["session"], Value::Null);
    }

    #[tokio::test]
    async fn test_public_operation_has_no_session_field() {
        let (client, session, dispatcher) = setup();
        session.set_token("tok");
        client.mock_response(&url("/PasswordAuth/authenticate"), 200, json!({ "user": "u1" }));

        let req = account::Authenticate {
            username: "alice".into(),
            password: "secret".into(),
        };
        dispatcher.call(&req).await.unwrap();

        let body = client.requests()[0].json_body().unwrap();
        assert_eq!(body, json!({ "username": "alice", "password": "secret" }));
    }

    #[tokio::test]
    async fn test_success_body_returned_verbatim() {
        let (client, _session, dispatcher) = setup();
        let payload = json!({ "listing": { "id": "l1", "extra": [1, 2, 3] } });
        client.mock_response(&url("/Listing/getListingById"), 200, payload.clone());

        let value = dispatcher
            .call(&listing::GetListingById { listing_id: "l1".into() })
            .await
            .unwrap();
        assert_eq!(value, payload);
    }

    #[tokio::test]
    async fn test_server_error_message_surfaces() {
        let (client, _session, dispatcher) = setup();
        client.mock_response(
            &url("/Listing/delete"),
            400,
            json!({ "error": "Listing not found" }),
        );

        let err = dispatcher
            .call(&listing::DeleteListing { listing_id: "x".into() })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Server("Listing not found".into()));
    }

    #[tokio::test]
    async fn test_error_field_in_ok_response_is_rejection() {
        let (client, _session, dispatcher) = setup();
        client.mock_response(
            &url("/PasswordAuth/changePassword"),
            200,
            json!({ "error": "Incorrect password" }),
        );

        let err = dispatcher
            .call(&account::ChangePassword {
                username: None,
                current_pass: "a".into(),
                new_pass: "b".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Incorrect password"));
    }

    #[tokio::test]
    async fn test_status_error_without_message() {
        let (client, _session, dispatcher) = setup();
        client.queue_raw(&url("/Listing/getAllListings"), 502, "Bad Gateway");

        let err = dispatcher.call(&listing::GetAllListings {}).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 502,
                body: "Bad Gateway".into()
            }
        );
    }

    #[tokio::test]
    async fn test_transport_error_unchanged() {
        let (client, _session, dispatcher) = setup();
        client.queue_failure(&url("/Listing/getAllListings"), "connection refused");

        let err = dispatcher.call(&listing::GetAllListings {}).await.unwrap_err();
        match err {
            ApiError::Transport(e) => assert_eq!(e.0, "connection refused"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_wins_over_slow_response() {
        let (client, _session, dispatcher) = setup();
        client.queue_delayed(
            &url("/Listing/getAllListings"),
            Duration::from_secs(60),
            200,
            json!([]),
        );

        let err = dispatcher
            .call_with_timeout(&listing::GetAllListings {}, Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(
            err,
            ApiError::Timeout {
                after: Duration::from_millis(500)
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_calls_are_independent() {
        use tokio::time::Instant;

        let (client, session, dispatcher) = setup();
        session.set_token("tok");
        client.queue_delayed(
            &url("/Listing/getAllListings"),
            Duration::from_secs(20),
            200,
            json!(["slow"]),
        );
        client.queue_delayed(
            &url("/Reviewing/_getReviewByItem"),
            Duration::from_secs(1),
            200,
            json!(["fast"]),
        );

        let start = Instant::now();
        let slow_call = async {
            let result = dispatcher.call(&listing::GetAllListings {}).await;
            (result, start.elapsed())
        };
        let fast_call = async {
            let request = review::GetByItem {
                item: "l1".into(),
            };
            let result = dispatcher.call(&request).await;
            (result, start.elapsed())
        };
        let ((slow, slow_elapsed), (fast, fast_elapsed)) = tokio::join!(slow_call, fast_call);

        assert_eq!(fast.unwrap(), json!(["fast"]));
        assert_eq!(slow.unwrap(), json!(["slow"]));
        // 慢请求不阻塞快请求
        assert!(fast_elapsed < Duration::from_secs(2));
        assert!(slow_elapsed >= Duration::from_secs(20));
        assert_eq!(client.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_timeout_is_thirty_seconds() {
        let (client, _session, dispatcher) = setup();
        assert_eq!(dispatcher.default_timeout(), Duration::from_secs(30));
        client.queue_delayed(
            &url("/Listing/getAllListings"),
            Duration::from_secs(29),
            200,
            json!(["ok"]),
        );

        let value = dispatcher.call(&listing::GetAllListings {}).await.unwrap();
        assert_eq!(value, json!(["ok"]));
    }

    #[tokio::test]
    async fn test_empty_operation_makes_no_call() {
        let (client, _session, dispatcher) = setup();
        let envelope = RequestEnvelope::new("", json!({}), Duration::from_secs(1));

        let err = dispatcher.dispatch(envelope).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_operation_without_leading_slash() {
        let (client, _session, dispatcher) = setup();
        client.mock_response(&url("/Custom/op"), 200, json!({ "done": true }));

        let envelope = RequestEnvelope::new("Custom/op", json!({ "a": 1 }), Duration::from_secs(1));
        let value = dispatcher.dispatch(envelope).await.unwrap();
        assert_eq!(value["done"], true);
        assert_eq!(client.requests()[0].url, url("/Custom/op"));
    }

    #[tokio::test]
    async fn test_empty_success_body_is_null() {
        let (client, _session, dispatcher) = setup();
        client.queue_raw(&url("/Listing/interest"), 200, "");

        let value = dispatcher
            .call(&listing::SendInterest { listing_id: "l1".into() })
            .await
            .unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_typed_response_is_decoded() {
        let (client, _session, dispatcher) = setup();
        client.mock_response(&url("/Sessioning/create"), 200, json!({ "session": "s-1" }));

        let created = dispatcher
            .call(&account::CreateSession { user: "u1".into() })
            .await
            .unwrap();
        assert_eq!(created.session, "s-1");

        client.queue_response(&url("/Sessioning/create"), 200, json!({ "nope": 1 }));
        let err = dispatcher
            .call(&account::CreateSession { user: "u1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
