//! 认证模块
//!
//! 持有分发器与图片上传器，并维护一份会话快照信号。
//! 会话本身由核心库的 `SessionState` 管理；每次认证流程结束后刷新快照，
//! 路由服务通过注入的快照信号感知登录状态的变化。

use leptos::prelude::*;
use nestmatch::{ApiResult, Dispatcher, ImageUploader, Session};
use nestmatch_shared::UserProfile;
use nestmatch_shared::protocol::account::Register;

/// 认证上下文
///
/// 只包含 arena 句柄，可以随意复制到闭包与异步任务中。
#[derive(Clone, Copy)]
pub struct AuthContext {
    dispatcher: StoredValue<Dispatcher>,
    uploader: StoredValue<ImageUploader>,
    session: RwSignal<Session>,
}

impl AuthContext {
    /// 创建新的认证上下文
    ///
    /// 分发器中的会话应已从存储恢复。
    pub fn new(dispatcher: Dispatcher, uploader: ImageUploader) -> Self {
        let session = RwSignal::new(dispatcher.session().snapshot());
        Self {
            dispatcher: StoredValue::new(dispatcher),
            uploader: StoredValue::new(uploader),
            session,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.get_value()
    }

    pub fn uploader(&self) -> ImageUploader {
        self.uploader.get_value()
    }

    /// 会话快照信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Session> {
        self.session.into()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.session.with(|s| s.user.clone())
    }

    /// 当前用户 ID
    pub fn user_id(&self) -> Option<String> {
        self.session.with(|s| s.user.as_ref().and_then(|u| u.id.clone()))
    }

    /// 从会话状态重新读取快照
    pub fn refresh(&self) {
        let snapshot = self.dispatcher.with_value(|d| d.session().snapshot());
        self.session.set(snapshot);
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 登录
///
/// 导航由路由服务监听会话变化自动处理。
pub async fn login(ctx: AuthContext, username: String, password: String) -> ApiResult<UserProfile> {
    let dispatcher = ctx.dispatcher();
    let result = dispatcher.auth().login(&username, &password).await;
    ctx.refresh();
    result
}

/// 注册并登录
pub async fn register(ctx: AuthContext, registration: Register) -> ApiResult<UserProfile> {
    let dispatcher = ctx.dispatcher();
    let result = dispatcher.auth().register(&registration).await;
    ctx.refresh();
    result
}

/// 注销，本地会话总会被清空
pub async fn logout(ctx: AuthContext) -> ApiResult<()> {
    let dispatcher = ctx.dispatcher();
    let result = dispatcher.auth().logout().await;
    ctx.refresh();
    result
}

/// 删除账户
pub async fn delete_account(ctx: AuthContext, password: String) -> ApiResult<()> {
    let dispatcher = ctx.dispatcher();
    let result = dispatcher.auth().delete_account(&password).await;
    ctx.refresh();
    result
}
