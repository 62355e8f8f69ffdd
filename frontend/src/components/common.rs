//! 页面共用的小组件与 JSON 读取工具
//!
//! 后端返回的记录形状不固定，页面只按需读取字段，缺失时显示占位。

use leptos::prelude::*;
use leptos::task::spawn_local;
use nestmatch::{AppRoute, log_warn};
use serde_json::Value;

use crate::auth::{logout, use_auth};
use crate::web::router::Link;

/// 把列表响应展开为记录数组
///
/// 支持裸数组，或只包含一个数组字段的对象（如 `{ "listings": [...] }`）。
pub fn records(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => map
            .values()
            .find_map(|v| v.as_array().cloned())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// 读取字段并转为展示文本
pub fn text(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

/// 记录 ID，兼容 `_id` 与 `id`
pub fn record_id(record: &Value) -> Option<String> {
    record
        .get("_id")
        .or_else(|| record.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// 通知内容与是否出错
pub type Notice = Option<(String, bool)>;

/// 页面顶部的提示条
#[component]
pub fn NoticeBar(notice: ReadSignal<Notice>) -> impl IntoView {
    move || {
        notice.get().map(|(message, is_err)| {
            let class = if is_err {
                "alert alert-error shadow"
            } else {
                "alert alert-success shadow"
            };
            view! {
                <div role="alert" class=class>
                    <span>{message}</span>
                </div>
            }
        })
    }
}

/// 受保护页面的导航栏
#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let username = move || {
        auth.user()
            .and_then(|u| u.username)
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        spawn_local(async move {
            // 远程失败时本地会话也已清空，路由服务会自动跳回登录页
            if let Err(e) = logout(auth).await {
                log_warn!("[Auth] Remote logout failed, local session cleared: {}", e);
            }
        });
    };

    view! {
        <div class="navbar bg-base-100 shadow-sm">
            <div class="flex-1 gap-2">
                <Link to=AppRoute::Home class="btn btn-ghost text-xl">"NestMatch"</Link>
                <Link to=AppRoute::FindRoommates class="btn btn-ghost btn-sm">"Find Roommates"</Link>
                <Link to=AppRoute::Favorites class="btn btn-ghost btn-sm">"Favorites"</Link>
                <Link to=AppRoute::MyPostings class="btn btn-ghost btn-sm">"My Postings"</Link>
            </div>
            <div class="flex-none gap-2">
                <Link to=AppRoute::Profile class="btn btn-ghost btn-sm">{username}</Link>
                <button class="btn btn-outline btn-sm" on:click=on_logout>"Log out"</button>
            </div>
        </div>
    }
}

/// 受保护页面的外框
#[component]
pub fn Page(
    #[prop(into)] title: String,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <Navbar />
            <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-6">
                <h1 class="text-3xl font-bold">{title}</h1>
                {children()}
            </div>
        </div>
    }
}
