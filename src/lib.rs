//! nestmatch 客户端核心
//!
//! 与运行环境无关的客户端逻辑，浏览器前端与原生工具共用：
//! - `session`: 会话状态（token 与用户资料），持久化到注入的存储
//! - `dispatcher`: 认证请求分发，统一超时与错误归一化
//! - `api`: 按后端资源分组的调用门面
//! - `auth`: 登录/注册/注销等会改写会话的流程
//! - `navigation`: 路由表与导航守卫（纯函数）
//! - `upload`: 图片上传降级链与本地图片处理
//!
//! 具体的 HTTP、定时器与本地图片编码实现通过 `request` 中的 trait 注入。

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => ($crate::__console::log_1(&::std::format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => (::std::println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => ($crate::__console::warn_1(&::std::format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => (::std::eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => ($crate::__console::error_1(&::std::format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => (::std::eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[doc(hidden)]
pub use web_sys::console as __console;

pub mod api;
pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod navigation;
pub mod request;
pub mod session;
pub mod upload;

pub use auth::AuthFlow;
pub use config::{ClientConfig, ImageHostConfig};
pub use dispatcher::{Dispatcher, RequestEnvelope};
pub use error::{ApiError, ApiResult, TransportError, UploadError};
pub use navigation::{AppRoute, Decision};
pub use session::{Session, SessionState, SessionStorage};
pub use upload::{
    ImageFile, ImageInfo, ImageUploader, LocalImageEncoder, PresetReport, ResizeOptions,
    UploadOptions,
};

pub use nestmatch_shared as shared;
