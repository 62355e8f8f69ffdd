use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 认证请求在 payload 中携带 token 的字段名
pub const SESSION_FIELD: &str = "session";
/// 后端在响应中报告错误的字段名
pub const ERROR_FIELD: &str = "error";

/// 持久化会话使用的存储键
pub const STORAGE_SESSION_KEY: &str = "session";
/// 旧版裸会话 ID 的存储键（已弃用）
pub const STORAGE_LEGACY_SESSION_ID_KEY: &str = "sessionId";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户资料
///
/// 后端返回的形状并不稳定，所有字段都是可选的，调用方需自行处理缺失值。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, alias = "user", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
}

impl UserProfile {
    /// 用 `other` 中存在的字段覆盖当前资料
    pub fn merge(&mut self, other: UserProfile) {
        if other.id.is_some() {
            self.id = other.id;
        }
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.email_address.is_some() {
            self.email_address = other.email_address;
        }
        if other.age.is_some() {
            self.age = other.age;
        }
        if other.gender.is_some() {
            self.gender = other.gender;
        }
        if other.affiliation.is_some() {
            self.affiliation = other.affiliation;
        }
    }
}

/// 房源周边设施
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub title: String,
    /// 距离（英里）
    pub distance: f64,
}

pub const PHOTO_ALT_TEXT: &str = "Housing listing photo";
pub const PHOTO_PLACEHOLDER_WIDTH: u32 = 1200;
pub const PHOTO_PLACEHOLDER_HEIGHT: u32 = 800;
pub const PHOTO_PLACEHOLDER_BYTES: u64 = 500_000;
/// 本地 data URL 照片的存储键
pub const LOCAL_STORAGE_KEY: &str = "local";

/// 房源照片元数据
///
/// 由上传后的 URL 推导而来，尺寸与字节数是占位值（图床不回传这些信息）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub url: String,
    pub thumb_url: String,
    pub storage_key: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
    pub content_type: String,
    pub bytes: u64,
}

impl Photo {
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let (storage_key, content_type): (String, String) = match url.strip_prefix("data:") {
            // 本地降级生成的 data URL 没有存储路径，类型取自前缀
            Some(rest) => {
                let mime = rest.split([';', ',']).next().unwrap_or_default();
                let mime = if mime.is_empty() { "image/jpeg" } else { mime };
                (LOCAL_STORAGE_KEY.to_string(), mime.to_string())
            }
            None => {
                let key = match url.rsplit('/').next() {
                    Some(segment) if !segment.is_empty() => segment.to_string(),
                    _ => "unknown".to_string(),
                };
                let mime = if url.contains(".png") {
                    "image/png"
                } else {
                    "image/jpeg"
                };
                (key, mime.to_string())
            }
        };

        Self {
            thumb_url: url.clone(),
            url,
            storage_key,
            alt: PHOTO_ALT_TEXT.to_string(),
            width: PHOTO_PLACEHOLDER_WIDTH,
            height: PHOTO_PLACEHOLDER_HEIGHT,
            content_type,
            bytes: PHOTO_PLACEHOLDER_BYTES,
        }
    }
}
