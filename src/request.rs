use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::TransportError;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 方法枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// multipart 表单中的一个字段
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Arc<[u8]>,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// 已序列化的 JSON 文本
    Json(String),
    /// multipart/form-data，边界由具体客户端生成
    Multipart(Vec<FormPart>),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn post(url: &str) -> Self {
        Self::new(url, HttpMethod::Post)
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json(mut self, body: &serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body.to_string()));
        self
    }

    pub fn with_multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }

    /// 按名称查找请求头（大小写不敏感）
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// 请求体中的 JSON（非 JSON 请求体返回 None）
    pub fn json_body(&self) -> Option<serde_json::Value> {
        match &self.body {
            Some(RequestBody::Json(text)) => serde_json::from_str(text).ok(),
            _ => None,
        }
    }

    /// multipart 请求中的文本字段
    pub fn form_text(&self, name: &str) -> Option<&str> {
        match &self.body {
            Some(RequestBody::Multipart(parts)) => parts.iter().find_map(|p| match p {
                FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// HTTP 客户端特性 (Trait)
///
/// (?Send) 是因为浏览器环境下 fetch 的 Future 不是 Send 的；
/// 客户端句柄本身要求 Send + Sync，以便放入响应式上下文。
#[async_trait::async_trait(?Send)]
pub trait HttpClient: Send + Sync {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// 定时器特性，用于给请求设定时限
#[async_trait::async_trait(?Send)]
pub trait Timer: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

// =========================================================
// 实现层: Tokio 定时器
// =========================================================

#[cfg(any(test, feature = "native"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(any(test, feature = "native"))]
#[async_trait::async_trait(?Send)]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// =========================================================
// 实现层: Reqwest 客户端 (Native)
// =========================================================

#[cfg(feature = "native")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(feature = "native")]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(feature = "native")]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in &req.headers {
            builder = builder.header(k, v);
        }

        builder = match req.body {
            Some(RequestBody::Json(text)) => builder.body(text),
            Some(RequestBody::Multipart(parts)) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    form = match part {
                        FormPart::Text { name, value } => form.text(name, value),
                        FormPart::File {
                            name,
                            file_name,
                            content_type,
                            bytes,
                        } => {
                            let file = reqwest::multipart::Part::bytes(bytes.to_vec())
                                .file_name(file_name)
                                .mime_str(&content_type)
                                .map_err(|e| TransportError::new(format!("Reqwest Error: {}", e)))?;
                            form.part(name, file)
                        }
                    };
                }
                builder.multipart(form)
            }
            None => builder,
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::new(format!("Reqwest Error: {}", e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::new(format!("Reqwest Body Error: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
#[derive(Debug, Clone)]
enum MockReply {
    Respond(u16, String),
    Delay(Duration, u16, String),
    Fail(String),
}

#[cfg(test)]
#[derive(Default)]
pub struct MockHttpClient {
    // URL -> (Status, Response Body)，每次请求都返回
    responses: Mutex<HashMap<String, (u16, String)>>,
    // URL -> 依次消费的应答，优先于 responses
    queued: Mutex<HashMap<String, VecDeque<MockReply>>>,
    // 记录发出的请求
    requests: Mutex<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string()));
    }

    fn enqueue(&self, url: &str, reply: MockReply) {
        self.queued
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn queue_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.enqueue(url, MockReply::Respond(status, body.to_string()));
    }

    pub fn queue_raw(&self, url: &str, status: u16, body: &str) {
        self.enqueue(url, MockReply::Respond(status, body.to_string()));
    }

    pub fn queue_delayed(&self, url: &str, delay: Duration, status: u16, body: serde_json::Value) {
        self.enqueue(url, MockReply::Delay(delay, status, body.to_string()));
    }

    pub fn queue_failure(&self, url: &str, message: &str) {
        self.enqueue(url, MockReply::Fail(message.to_string()));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = req.url.clone();
        self.requests.lock().unwrap().push(req);

        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&url)
            .and_then(|q| q.pop_front());
        let reply = match queued {
            Some(reply) => reply,
            None => match self.responses.lock().unwrap().get(&url) {
                Some((status, body)) => MockReply::Respond(*status, body.clone()),
                None => MockReply::Respond(404, "Not Found".to_string()),
            },
        };

        match reply {
            MockReply::Respond(status, body) => Ok(HttpResponse { status, body }),
            MockReply::Delay(delay, status, body) => {
                tokio::time::sleep(delay).await;
                Ok(HttpResponse { status, body })
            }
            MockReply::Fail(message) => Err(TransportError::new(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = HttpRequest::post("http://x").with_header("Authorization", "Bearer t");
        assert_eq!(req.header("authorization"), Some("Bearer t"));
        assert_eq!(req.header("X-Missing"), None);
    }

    #[test]
    fn test_form_text_reads_multipart_fields() {
        let req = HttpRequest::post("http://x").with_multipart(vec![
            FormPart::File {
                name: "file".into(),
                file_name: "a.png".into(),
                content_type: "image/png".into(),
                bytes: Arc::from(vec![1u8, 2, 3]),
            },
            FormPart::Text {
                name: "upload_preset".into(),
                value: "p1".into(),
            },
        ]);
        assert_eq!(req.form_text("upload_preset"), Some("p1"));
        assert_eq!(req.form_text("file"), None);
        assert!(req.json_body().is_none());
    }

    #[test]
    fn test_response_ok_range() {
        assert!(HttpResponse { status: 204, body: String::new() }.ok());
        assert!(!HttpResponse { status: 302, body: String::new() }.ok());
    }

    #[tokio::test]
    async fn test_mock_client_prefers_queued_replies() {
        let client = MockHttpClient::new();
        client.mock_response("http://x", 200, json!({ "sticky": true }));
        client.queue_response("http://x", 500, json!({ "error": "first" }));

        let first = client.send(HttpRequest::post("http://x")).await.unwrap();
        let second = client.send(HttpRequest::post("http://x")).await.unwrap();
        let missing = client.send(HttpRequest::post("http://y")).await.unwrap();

        assert_eq!(first.status, 500);
        assert_eq!(second.status, 200);
        assert_eq!(missing.status, 404);
        assert_eq!(client.request_count(), 3);
    }
}
