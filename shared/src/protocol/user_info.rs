//! 用户资料相关操作

api_request! {
    /// 读取当前会话用户的资料
    GetUserInfo => "/UserInfo/_getUserInfo" {}
}

api_request! {
    SetInfo => "/UserInfo/setInfo" {
        user: String,
        age: u32,
        affiliation: String,
        gender: String,
        email_address: String,
    }
}

api_request! {
    DeleteInfo => "/UserInfo/deleteInfo" {
        user: String,
    }
}

api_request! {
    UpdateAge => "/UserInfo/updateAge" {
        user: String,
        age: u32,
    }
}

api_request! {
    UpdateAffiliation => "/UserInfo/updateAffiliation" {
        user: String,
        affiliation: String,
    }
}

api_request! {
    UpdateGender => "/UserInfo/updateGender" {
        user: String,
        gender: String,
    }
}

api_request! {
    UpdateEmailAddress => "/UserInfo/updateEmailAddress" {
        user: String,
        email_address: String,
    }
}
