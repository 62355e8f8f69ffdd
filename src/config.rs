//! 客户端配置
//!
//! 解析顺序：运行时环境变量（仅原生目标）-> 编译期环境变量（浏览器构建）-> 默认值。

use std::time::Duration;

// =========================================================
// 默认值
// =========================================================

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_IMAGE_CLOUD: &str = "demo";

/// 默认按顺序尝试的上传预设（unsigned 在前）
pub const DEFAULT_UPLOAD_PRESETS: &[&str] = &[
    "nestmatch_unsigned",
    "nestmatch",
    "ml_default",
    "unsigned_preset",
    "default_preset",
];

pub const ENV_API_BASE_URL: &str = "NESTMATCH_API_BASE_URL";
pub const ENV_IMAGE_CLOUD: &str = "NESTMATCH_IMAGE_CLOUD";
pub const ENV_UPLOAD_PRESETS: &str = "NESTMATCH_UPLOAD_PRESETS";

/// 读取配置项：运行时变量优先，其次是编译期注入的值
fn resolve(name: &str, compiled: Option<&'static str>) -> Option<String> {
    runtime_var(name).or_else(|| {
        compiled
            .map(str::to_string)
            .filter(|v| !v.trim().is_empty())
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// 浏览器中没有进程环境
#[cfg(target_arch = "wasm32")]
fn runtime_var(_name: &str) -> Option<String> {
    None
}

// =========================================================
// 配置结构
// =========================================================

/// 第三方图床配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHostConfig {
    /// 完整的上传地址
    pub upload_url: String,
    /// 依次尝试的上传预设
    pub presets: Vec<String>,
}

impl ImageHostConfig {
    pub fn for_cloud(cloud_name: &str) -> Self {
        Self {
            upload_url: format!(
                "https://api.cloudinary.com/v1_1/{}/image/upload",
                cloud_name
            ),
            presets: DEFAULT_UPLOAD_PRESETS.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn with_presets<I, S>(mut self, presets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.presets = presets.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self::for_cloud(DEFAULT_IMAGE_CLOUD)
    }
}

/// 客户端运行时配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub image_host: ImageHostConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            image_host: ImageHostConfig::default(),
        }
    }
}

impl ClientConfig {
    /// 从环境读取配置，缺失的项使用默认值
    pub fn from_env() -> Self {
        let api_base_url = resolve(ENV_API_BASE_URL, option_env!("NESTMATCH_API_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let cloud = resolve(ENV_IMAGE_CLOUD, option_env!("NESTMATCH_IMAGE_CLOUD"))
            .unwrap_or_else(|| DEFAULT_IMAGE_CLOUD.to_string());
        let mut image_host = ImageHostConfig::for_cloud(&cloud);

        if let Some(list) = resolve(ENV_UPLOAD_PRESETS, option_env!("NESTMATCH_UPLOAD_PRESETS")) {
            let presets: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if !presets.is_empty() {
                image_host.presets = presets;
            }
        }

        Self {
            api_base_url,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            image_host,
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_image_host(mut self, image_host: ImageHostConfig) -> Self {
        self.image_host = image_host;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.image_host.presets.len(), DEFAULT_UPLOAD_PRESETS.len());
        assert!(config.image_host.upload_url.ends_with("/demo/image/upload"));
    }

    #[test]
    fn test_builders_override_values() {
        let config = ClientConfig::default()
            .with_api_base_url("https://api.example.com")
            .with_request_timeout(Duration::from_secs(5))
            .with_image_host(ImageHostConfig::for_cloud("acme").with_presets(["a", "b"]));
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.image_host.presets, vec!["a", "b"]);
        assert_eq!(
            config.image_host.upload_url,
            "https://api.cloudinary.com/v1_1/acme/image/upload"
        );
    }

    #[test]
    fn test_blank_values_are_ignored() {
        assert_eq!(resolve("NESTMATCH_TEST_UNSET_VARIABLE", Some("  ")), None);
        assert_eq!(
            resolve("NESTMATCH_TEST_UNSET_VARIABLE", Some("x")).as_deref(),
            Some("x")
        );
    }
}
