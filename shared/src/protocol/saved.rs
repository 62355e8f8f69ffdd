//! 收藏相关操作

api_request! {
    AddItem => "/SavedItems/addUserRecord" {
        item: String,
    }
}

api_request! {
    RemoveItem => "/SavedItems/removeItem" {
        user: String,
        item: String,
    }
}

api_request! {
    GetSavedItems => "/SavedItems/_getSavedItems" {
        user: String,
    }
}

api_request! {
    AddTag => "/SavedItems/addItemTag" {
        user: String,
        item: String,
        tag: String,
    }
}

api_request! {
    RemoveTag => "/SavedItems/removeItemTag" {
        user: String,
        item: String,
        tag: String,
    }
}
