//! 账户与会话相关操作

use serde::{Deserialize, Serialize};

use super::ApiRequest;

api_request! {
    /// 注册新账户
    public Register => "/createAccount" {
        username: String,
        password: String,
        age: u32,
        gender: String,
        affiliation: String,
        email_address: String,
    }
}

api_request! {
    /// 校验用户名密码
    public Authenticate => "/PasswordAuth/authenticate" {
        username: String,
        password: String,
    }
}

api_request! {
    /// 注销当前会话
    Logout => "/Sessioning/delete" {}
}

api_request! {
    ChangePassword => "/PasswordAuth/changePassword" {
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        current_pass: String,
        new_pass: String,
    }
}

api_request! {
    /// 删除账户，需要再次输入密码确认
    DeleteAccount => "/PasswordAuth/deleteAccount" {
        password: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        user: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        email_address: Option<String>,
    }
}

/// 为已认证的用户创建会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSession {
    pub user: String,
}

/// 创建会话的响应，`session` 即后续请求使用的 token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session: String,
}

impl ApiRequest for CreateSession {
    type Response = SessionCreated;
    const PATH: &'static str = "/Sessioning/create";
    const AUTHENTICATED: bool = false;
}
