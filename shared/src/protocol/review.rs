//! 评价相关操作

api_request! {
    CreateReview => "/Reviewing/create" {
        item: String,
        ranking: u32,
        blurb: String,
    }
}

api_request! {
    DeleteReview => "/Reviewing/deleteReview" {
        review: String,
    }
}

api_request! {
    EditRanking => "/Reviewing/editRanking" {
        review: String,
        ranking: u32,
    }
}

api_request! {
    EditBlurb => "/Reviewing/editBlurb" {
        review: String,
        blurb: String,
    }
}

api_request! {
    GetByItem => "/Reviewing/_getReviewByItem" {
        item: String,
    }
}

api_request! {
    GetFromUser => "/Reviewing/_getReviewFromUser" {
        user: String,
    }
}
