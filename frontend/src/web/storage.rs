//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供会话持久化，刷新页面后会话依然有效。

use nestmatch::SessionStorage;

/// 浏览器 LocalStorage
///
/// 无法访问 localStorage（隐私模式、被禁用）时所有操作都失败，会话只保存在内存中。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl SessionStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
