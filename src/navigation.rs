//! 路由定义与导航守卫 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM。守卫是一个纯函数：
//! 输入目标路由与当前会话快照，输出放行或重定向。

use std::fmt::Display;

use crate::session::Session;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    Register,
    /// 登录页面 (默认路由)
    #[default]
    Login,
    Home,
    FindRoommates,
    Favorites,
    MyPostings,
    Profile,
    /// 页面未找到
    NotFound,
}

/// 路由描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub route: AppRoute,
    pub requires_auth: bool,
}

/// 静态路由表，除注册与登录外全部需要认证
pub static ROUTES: [RouteDescriptor; 7] = [
    RouteDescriptor {
        path: "/register",
        name: "Register",
        route: AppRoute::Register,
        requires_auth: false,
    },
    RouteDescriptor {
        path: "/login",
        name: "Login",
        route: AppRoute::Login,
        requires_auth: false,
    },
    RouteDescriptor {
        path: "/home",
        name: "Home",
        route: AppRoute::Home,
        requires_auth: true,
    },
    RouteDescriptor {
        path: "/find-roommates",
        name: "FindRoommates",
        route: AppRoute::FindRoommates,
        requires_auth: true,
    },
    RouteDescriptor {
        path: "/favorites",
        name: "Favorites",
        route: AppRoute::Favorites,
        requires_auth: true,
    },
    RouteDescriptor {
        path: "/my-postings",
        name: "MyPostings",
        route: AppRoute::MyPostings,
        requires_auth: true,
    },
    RouteDescriptor {
        path: "/profile",
        name: "Profile",
        route: AppRoute::Profile,
        requires_auth: true,
    },
];

/// 根路径，总是重定向到登录页
pub const ROOT_PATH: &str = "/";
pub const NOT_FOUND_PATH: &str = "/404";

impl AppRoute {
    /// 路由表中的描述，`NotFound` 不在表中
    pub fn descriptor(&self) -> Option<&'static RouteDescriptor> {
        ROUTES.iter().find(|d| d.route == *self)
    }

    /// 将 URL path 解析为路由枚举
    ///
    /// 忽略查询串、片段与末尾的 `/`。根路径解析为登录页。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Self::Login;
        }
        ROUTES
            .iter()
            .find(|d| d.path == trimmed)
            .map(|d| d.route)
            .unwrap_or(Self::NotFound)
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        self.descriptor().map(|d| d.path).unwrap_or(NOT_FOUND_PATH)
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().map(|d| d.name).unwrap_or("NotFound")
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        self.descriptor().is_some_and(|d| d.requires_auth)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 登录或注册成功后的落地页
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 放行，进入目标路由
    Allow(AppRoute),
    /// 中止原导航，改为进入给定路由
    Redirect(AppRoute),
}

impl Decision {
    /// 最终会展示的路由
    pub fn route(&self) -> AppRoute {
        match self {
            Decision::Allow(route) | Decision::Redirect(route) => *route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Decision::Redirect(_))
    }
}

/// 导航守卫：目标需要认证而会话没有 token 时重定向到登录页
pub fn guard(target: AppRoute, session: &Session) -> Decision {
    if target.requires_auth() && !session.is_authenticated() {
        Decision::Redirect(AppRoute::auth_failure_redirect())
    } else {
        Decision::Allow(target)
    }
}

/// 解析 URL path 并执行守卫；根路径总是重定向到登录页
pub fn resolve(path: &str, session: &Session) -> Decision {
    let bare = path.split(['?', '#']).next().unwrap_or_default();
    if bare.trim_end_matches('/').is_empty() {
        return Decision::Redirect(AppRoute::Login);
    }
    guard(AppRoute::from_path(path), session)
}
