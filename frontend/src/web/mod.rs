//! 浏览器适配层
//!
//! 用 `web_sys` 实现核心库注入的各个接口：HTTP、定时器、持久化存储与本地图片编码，
//! 另外包含基于 History API 的路由服务。

mod canvas;
mod http;
pub mod router;
mod storage;
mod timer;

pub use canvas::{CanvasEncoder, read_file};
pub use http::FetchHttpClient;
pub use storage::LocalStorage;
pub use timer::GlooTimer;
