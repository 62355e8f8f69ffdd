//! NestMatch 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web`: 浏览器适配（fetch、localStorage、定时器、canvas）与路由服务
//! - `auth`: 认证上下文，持有分发器与会话快照
//! - `components`: UI 组件层
//!
//! 路由表、守卫、请求分发与会话状态都来自 `nestmatch` 核心库。

mod auth;
mod components {
    pub mod common;
    pub mod favorites;
    pub mod home;
    pub mod login;
    pub mod my_postings;
    pub mod profile;
    pub mod register;
    pub mod roommates;
}
mod web;

use std::sync::Arc;

use crate::auth::AuthContext;
use crate::components::favorites::FavoritesPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::my_postings::MyPostingsPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::roommates::FindRoommatesPage;

use leptos::prelude::*;
use nestmatch::request::HttpClient;
use nestmatch::{AppRoute, ClientConfig, Dispatcher, ImageUploader, SessionState};

use web::router::{Link, Router, RouterOutlet};
use web::{CanvasEncoder, FetchHttpClient, GlooTimer, LocalStorage};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::FindRoommates => view! { <FindRoommatesPage /> }.into_any(),
        AppRoute::Favorites => view! { <FavoritesPage /> }.into_any(),
        AppRoute::MyPostings => view! { <MyPostingsPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                    <Link to=AppRoute::Home class="btn btn-primary mt-6">"Back to listings"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = ClientConfig::from_env();

    // 1. 从 LocalStorage 恢复会话，必须早于路由服务的第一次守卫判定
    let session = SessionState::hydrate(Arc::new(LocalStorage));

    // 2. 组装分发器与图片上传器
    let client: Arc<dyn HttpClient> = Arc::new(FetchHttpClient);
    let dispatcher = Dispatcher::new(&config, session, client.clone(), Arc::new(GlooTimer));
    let uploader =
        ImageUploader::new(&config.image_host, client).with_local_encoder(Arc::new(CanvasEncoder));

    // 3. 创建认证上下文
    let auth_ctx = AuthContext::new(dispatcher, uploader);
    provide_context(auth_ctx);

    // 4. 会话快照信号，用于注入路由服务
    let session = auth_ctx.session_signal();

    view! {
        <Router session=session>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
