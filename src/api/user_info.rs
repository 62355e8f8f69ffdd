use serde_json::Value;

use nestmatch_shared::protocol::user_info::*;

use crate::dispatcher::Dispatcher;
use crate::error::ApiResult;

/// 用户资料
pub struct UserInfo<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> UserInfo<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// 当前会话用户的资料
    pub async fn get(&self) -> ApiResult<Value> {
        self.dispatcher.call(&GetUserInfo {}).await
    }

    pub async fn set_info(
        &self,
        user: &str,
        age: u32,
        affiliation: &str,
        gender: &str,
        email_address: &str,
    ) -> ApiResult<Value> {
        self.dispatcher
            .call(&SetInfo {
                user: user.to_string(),
                age,
                affiliation: affiliation.to_string(),
                gender: gender.to_string(),
                email_address: email_address.to_string(),
            })
            .await
    }

    pub async fn delete_info(&self, user: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&DeleteInfo {
                user: user.to_string(),
            })
            .await
    }

    pub async fn update_age(&self, user: &str, age: u32) -> ApiResult<Value> {
        self.dispatcher
            .call(&UpdateAge {
                user: user.to_string(),
                age,
            })
            .await
    }

    pub async fn update_affiliation(&self, user: &str, affiliation: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&UpdateAffiliation {
                user: user.to_string(),
                affiliation: affiliation.to_string(),
            })
            .await
    }

    pub async fn update_gender(&self, user: &str, gender: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&UpdateGender {
                user: user.to_string(),
                gender: gender.to_string(),
            })
            .await
    }

    pub async fn update_email_address(&self, user: &str, email_address: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&UpdateEmailAddress {
                user: user.to_string(),
                email_address: email_address.to_string(),
            })
            .await
    }
}
