//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 放行还是重定向由核心库的守卫函数决定，这里只负责把判定结果落实到地址栏与视图。

use leptos::prelude::*;
use nestmatch::log_info;
use nestmatch::navigation::{self, AppRoute, Decision};
use nestmatch::Session;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| navigation::ROOT_PATH.to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 把守卫判定写入地址栏，返回最终展示的路由
///
/// 放行时保留用户请求的地址，重定向时改写为目标地址。
fn apply(path: &str, decision: Decision, use_push: bool) -> AppRoute {
    let shown = match decision {
        Decision::Allow(_) => path,
        Decision::Redirect(target) => {
            log_info!("[Router] {} is not accessible, redirecting to {}", path, target);
            target.to_path()
        }
    };
    if use_push {
        push_history_state(shown);
    } else {
        replace_history_state(shown);
    }
    decision.route()
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 会话快照由外部注入，路由服务不直接依赖认证模块。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话快照（注入的信号）
    session: Signal<Session>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// 会话必须已经从存储恢复，否则刷新受保护页面时会被误重定向。
    fn new(session: Signal<Session>) -> Self {
        let path = current_path();
        let decision = session.with_untracked(|s| navigation::resolve(&path, s));
        let initial_route = apply(&path, decision, false);
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        let decision = self
            .session
            .with_untracked(|s| navigation::resolve(path, s));
        let route = apply(path, decision, true);
        self.set_route.set(route);
    }

    /// 导航到指定路由
    pub fn navigate_to(&self, route: AppRoute) {
        self.navigate(route.to_path());
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let session = self.session;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            // popstate 时也执行守卫逻辑
            let decision = session.with_untracked(|s| navigation::resolve(&path, s));
            let route = match decision {
                Decision::Allow(route) => route,
                Decision::Redirect(_) => apply(&path, decision, false),
            };
            set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session = self.session;

        Effect::new(move |_| {
            let is_auth = session.with(|s| s.is_authenticated());
            let route = current_route.get_untracked();

            let redirect = if is_auth {
                // 刚登录或注册，离开认证页面
                matches!(route, AppRoute::Login | AppRoute::Register)
                    .then(AppRoute::auth_success_redirect)
            } else {
                // 会话被清空，离开受保护页面
                route.requires_auth().then(AppRoute::auth_failure_redirect)
            };

            if let Some(redirect) = redirect {
                log_info!("[Router] Auth state changed, redirecting to {}", redirect);
                push_history_state(redirect.to_path());
                set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<Session>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话快照信号
    session: Signal<Session>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时经由路由服务导航
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
