use serde_json::Value;

use nestmatch_shared::protocol::saved::*;

use crate::dispatcher::Dispatcher;
use crate::error::ApiResult;

/// 收藏夹
pub struct SavedItems<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> SavedItems<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn add_item(&self, item: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&AddItem {
                item: item.to_string(),
            })
            .await
    }

    pub async fn remove_item(&self, user: &str, item: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&RemoveItem {
                user: user.to_string(),
                item: item.to_string(),
            })
            .await
    }

    pub async fn get_saved_items(&self, user: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&GetSavedItems {
                user: user.to_string(),
            })
            .await
    }

    pub async fn add_tag(&self, user: &str, item: &str, tag: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&AddTag {
                user: user.to_string(),
                item: item.to_string(),
                tag: tag.to_string(),
            })
            .await
    }

    pub async fn remove_tag(&self, user: &str, item: &str, tag: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&RemoveTag {
                user: user.to_string(),
                item: item.to_string(),
                tag: tag.to_string(),
            })
            .await
    }
}
