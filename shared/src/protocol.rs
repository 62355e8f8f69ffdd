//! 后端协议定义
//!
//! 每个后端操作对应一个强类型请求结构体，通过 [`ApiRequest`] 声明其路径、
//! 是否需要会话以及响应类型。所有操作都是 `POST <base><PATH>`，请求体为 JSON。

use serde::{Serialize, de::DeserializeOwned};

/// A trait that defines the request-response relationship and metadata for a backend operation.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The operation path, appended to the API base address.
    const PATH: &'static str;
    /// Whether the payload carries the current session token.
    const AUTHENTICATED: bool = true;
}

/// 声明一个请求结构体并实现 [`ApiRequest`]，响应为原样的 JSON。
///
/// 以 `public` 开头的操作不携带会话字段。
macro_rules! api_request {
    (
        $(#[$meta:meta])*
        public $name:ident => $path:literal {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        api_request!(@define false; $(#[$meta])* $name => $path { $( $(#[$fmeta])* $field : $ty ),* });
    };
    (
        $(#[$meta:meta])*
        $name:ident => $path:literal {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        api_request!(@define true; $(#[$meta])* $name => $path { $( $(#[$fmeta])* $field : $ty ),* });
    };
    (
        @define $auth:literal;
        $(#[$meta:meta])*
        $name:ident => $path:literal {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $( $(#[$fmeta])* pub $field : $ty ),*
        }

        impl $crate::protocol::ApiRequest for $name {
            type Response = serde_json::Value;
            const PATH: &'static str = $path;
            const AUTHENTICATED: bool = $auth;
        }
    };
}

pub mod account;
pub mod listing;
pub mod review;
pub mod roommate;
pub mod saved;
pub mod user_info;
