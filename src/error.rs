use std::fmt;
use std::time::Duration;

use crate::upload::UploadAttempt;

// =========================================================
// 传输层错误
// =========================================================

/// HTTP 客户端实现返回的底层错误（DNS、连接被拒、请求中止等）
///
/// 只携带诊断信息，保持原样向上传递。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

// =========================================================
// 请求分发错误
// =========================================================

/// 后端调用的错误分类
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 请求在发出之前就不合法（空操作名、payload 无法序列化为对象）
    InvalidRequest(String),
    /// 超过时限仍未完成
    Timeout { after: Duration },
    /// 后端返回了结构化的 `error` 字段，原样透传
    Server(String),
    /// 非 2xx 且没有 `error` 字段
    Status { status: u16, body: String },
    /// 连接层失败
    Transport(TransportError),
    /// 2xx 响应无法解析为期望的类型
    Decode(String),
}

impl ApiError {
    /// 是否为超时错误（UI 可据此提示重试）
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    /// 后端报告的错误消息
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server(msg) => Some(msg),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::Timeout { .. } => write!(f, "Request timed out"),
            ApiError::Server(msg) => f.write_str(msg),
            ApiError::Status { status, .. } => {
                write!(f, "Request failed with status code {}", status)
            }
            ApiError::Transport(e) => write!(f, "Network error: {}", e),
            ApiError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::Transport(e)
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// 图片上传错误
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum UploadError {
    /// 没有提供文件内容
    Empty,
    /// MIME 类型不是 image/*
    NotAnImage { content_type: String },
    /// 超过大小上限
    TooLarge { size: u64, limit: u64 },
    /// 图片数据无法解码或重新编码
    Unreadable(String),
    /// 本地处理需要编码器，但没有配置
    NoLocalEncoder,
    /// 所有远程上传方式都失败
    Exhausted { attempts: Vec<UploadAttempt> },
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Empty => write!(f, "No image file provided"),
            UploadError::NotAnImage { content_type } => {
                write!(f, "File must be an image (got \"{}\")", content_type)
            }
            UploadError::TooLarge { limit, .. } => {
                write!(f, "Image must be smaller than {}MB", limit / (1024 * 1024))
            }
            UploadError::Unreadable(msg) => write!(f, "Failed to process image: {}", msg),
            UploadError::NoLocalEncoder => {
                write!(f, "Local image processing is not available in this environment")
            }
            UploadError::Exhausted { attempts } => write!(
                f,
                "All image upload options failed after {} attempts; check that an unsigned upload preset is configured on the image host",
                attempts.len()
            ),
        }
    }
}

impl std::error::Error for UploadError {}
