//! 按后端资源分组的调用门面
//!
//! 每个分组只是借用 [`Dispatcher`] 的薄包装：构建强类型请求、调用、原样返回结果。

pub mod accounts;
pub mod listings;
pub mod reviews;
pub mod roommates;
pub mod saved_items;
pub mod user_info;

pub use accounts::Accounts;
pub use listings::Listings;
pub use reviews::Reviews;
pub use roommates::Roommates;
pub use saved_items::SavedItems;
pub use user_info::UserInfo;

use crate::dispatcher::Dispatcher;

impl Dispatcher {
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }

    pub fn listings(&self) -> Listings<'_> {
        Listings::new(self)
    }

    pub fn roommates(&self) -> Roommates<'_> {
        Roommates::new(self)
    }

    pub fn saved_items(&self) -> SavedItems<'_> {
        SavedItems::new(self)
    }

    pub fn reviews(&self) -> Reviews<'_> {
        Reviews::new(self)
    }

    pub fn user_info(&self) -> UserInfo<'_> {
        UserInfo::new(self)
    }
}
