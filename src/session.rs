//! 会话状态
//!
//! `SessionState` 是 token 与用户资料的唯一数据源。它是一个显式传递的上下文句柄：
//! 克隆出的所有句柄共享同一份状态，任何修改对所有持有者立即可见，
//! 并同步写入注入的持久化存储（浏览器中为 localStorage），刷新页面后仍然有效。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use nestmatch_shared::{STORAGE_LEGACY_SESSION_ID_KEY, STORAGE_SESSION_KEY, UserProfile};

/// 会话快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl Session {
    /// token 是否存在是"已认证"的唯一依据
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

// =========================================================
// 持久化存储抽象
// =========================================================

/// 键值存储，接口与浏览器 localStorage 一致
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    /// 写入成功返回 true
    fn set(&self, key: &str, value: &str) -> bool;
    /// 删除成功返回 true
    fn delete(&self, key: &str) -> bool;
}

/// 内存存储，用于测试与原生环境
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        match self.items.lock() {
            Ok(mut items) => {
                items.insert(key.to_string(), value.to_string());
                true
            }
            Err(_) => false,
        }
    }

    fn delete(&self, key: &str) -> bool {
        match self.items.lock() {
            Ok(mut items) => {
                items.remove(key);
                true
            }
            Err(_) => false,
        }
    }
}

// =========================================================
// 会话状态
// =========================================================

/// 会话上下文句柄
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<RwLock<Session>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionState {
    /// 从持久化存储恢复会话
    ///
    /// 必须在第一次导航守卫求值之前调用，否则受保护页面会被误重定向。
    /// 存储内容损坏时以空会话启动。
    pub fn hydrate(storage: Arc<dyn SessionStorage>) -> Self {
        let session = match storage.get(STORAGE_SESSION_KEY) {
            Some(raw) => serde_json::from_str::<Session>(&raw).unwrap_or_else(|e| {
                log_warn!("[Session] Discarding unreadable stored session: {}", e);
                Session::default()
            }),
            None => Session::default(),
        };

        Self {
            inner: Arc::new(RwLock::new(session)),
            storage,
        }
    }

    /// 仅存在于内存中的空会话
    pub fn in_memory() -> Self {
        Self::hydrate(Arc::new(MemoryStorage::new()))
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// 修改会话并写回存储
    fn mutate(&self, f: impl FnOnce(&mut Session)) {
        let mut session = self.write();
        f(&mut session);
        self.persist(&session);
    }

    fn persist(&self, session: &Session) {
        let stored = match serde_json::to_string(session) {
            Ok(json) => self.storage.set(STORAGE_SESSION_KEY, &json),
            Err(e) => {
                log_error!("[Session] Failed to serialize session: {}", e);
                false
            }
        };
        if !stored {
            log_warn!("[Session] Session could not be persisted; it will not survive a reload");
        }
    }

    /// 当前会话的拷贝
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.mutate(|s| s.token = Some(token));
    }

    pub fn clear_token(&self) {
        self.mutate(|s| s.token = None);
    }

    pub fn set_user(&self, user: UserProfile) {
        self.mutate(|s| s.user = Some(user));
    }

    pub fn clear_user(&self) {
        self.mutate(|s| s.user = None);
    }

    /// 注销/删除账户时使用：清空 token、用户资料以及旧版会话 ID
    pub fn clear(&self) {
        self.mutate(|s| *s = Session::default());
        self.storage.delete(STORAGE_LEGACY_SESSION_ID_KEY);
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.read();
        f.debug_struct("SessionState")
            .field("authenticated", &session.is_authenticated())
            .field("user", &session.user)
            .finish()
    }
}

// =========================================================
// 旧版会话 ID
// =========================================================

/// 旧版以裸字符串保存会话 ID 的辅助函数，已被 [`SessionState`] 取代
pub mod legacy {
    use super::SessionStorage;
    use nestmatch_shared::STORAGE_LEGACY_SESSION_ID_KEY;

    #[deprecated(note = "session tokens live in SessionState")]
    pub fn set_session_id(storage: &dyn SessionStorage, session_id: &str) -> bool {
        storage.set(STORAGE_LEGACY_SESSION_ID_KEY, session_id)
    }

    #[deprecated(note = "session tokens live in SessionState")]
    pub fn get_session_id(storage: &dyn SessionStorage) -> Option<String> {
        storage.get(STORAGE_LEGACY_SESSION_ID_KEY)
    }

    #[deprecated(note = "session tokens live in SessionState")]
    pub fn remove_session_id(storage: &dyn SessionStorage) -> bool {
        storage.delete(STORAGE_LEGACY_SESSION_ID_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserProfile {
        UserProfile {
            id: Some("u1".into()),
            username: Some("alice".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_empty() {
        let state = SessionState::in_memory();
        assert_eq!(state.snapshot(), Session::default());
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_mutations_are_visible_to_all_clones() {
        let state = SessionState::in_memory();
        let other = state.clone();

        state.set_token("tok-1");
        assert_eq!(other.token().as_deref(), Some("tok-1"));
        assert!(other.is_authenticated());

        other.set_user(alice());
        assert_eq!(state.user(), Some(alice()));
    }

    #[test]
    fn test_clear_token_after_any_sequence() {
        let state = SessionState::in_memory();
        state.set_token("a");
        state.set_token("b");
        state.clear_token();
        assert!(state.token().is_none());
        state.clear_token();
        assert!(state.token().is_none());
    }

    #[test]
    fn test_token_and_user_are_independent() {
        let state = SessionState::in_memory();
        state.set_token("t");
        state.set_user(alice());
        state.clear_user();
        assert!(state.is_authenticated());
        assert!(state.user().is_none());
    }

    #[test]
    fn test_survives_reload() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemoryStorage::new());
        let state = SessionState::hydrate(storage.clone());
        state.set_token("persisted");
        state.set_user(alice());

        let reloaded = SessionState::hydrate(storage);
        assert_eq!(reloaded.token().as_deref(), Some("persisted"));
        assert_eq!(reloaded.user(), Some(alice()));
    }

    #[test]
    fn test_corrupt_storage_hydrates_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(STORAGE_SESSION_KEY, "{not json");
        let state = SessionState::hydrate(storage);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_partial_stored_user_is_accepted() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(
            STORAGE_SESSION_KEY,
            r#"{"token":"t","user":{"username":"bob"}}"#,
        );
        let state = SessionState::hydrate(storage);
        let user = state.user().unwrap();
        assert_eq!(user.username.as_deref(), Some("bob"));
        assert!(user.id.is_none());
    }

    #[test]
    #[allow(deprecated)]
    fn test_clear_removes_everything() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemoryStorage::new());
        legacy::set_session_id(storage.as_ref(), "old-id");
        let state = SessionState::hydrate(storage.clone());
        state.set_token("t");
        state.set_user(alice());

        state.clear();

        assert_eq!(state.snapshot(), Session::default());
        assert!(legacy::get_session_id(storage.as_ref()).is_none());
        assert!(!SessionState::hydrate(storage).is_authenticated());
    }

    #[test]
    #[allow(deprecated)]
    fn test_legacy_helpers_round_trip() {
        let storage = MemoryStorage::new();
        assert!(legacy::set_session_id(&storage, "sid"));
        assert_eq!(legacy::get_session_id(&storage).as_deref(), Some("sid"));
        assert!(legacy::remove_session_id(&storage));
        assert!(legacy::get_session_id(&storage).is_none());
    }
}
