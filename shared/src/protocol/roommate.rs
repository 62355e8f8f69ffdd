//! 室友帖子相关操作
//!
//! 编辑类操作以发帖人 (`poster`) 为键，每个用户只有一条帖子。

use chrono::NaiveDate;

api_request! {
    CreatePosting => "/RoommatePosting/create" {
        city: String,
        gender: String,
        age: u32,
        description: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        daily_rhythm: String,
        cleanliness_preference: String,
        home_environment: String,
        guests_visitors: String,
        number_of_roommates: u32,
    }
}

api_request! {
    DeletePosting => "/RoommatePosting/delete" {
        posting_id: String,
    }
}

api_request! {
    GetAllPostings => "/RoommatePosting/getAllPostings" {}
}

api_request! {
    GetByPosterId => "/RoommatePosting/getPostingByPosterId" {
        poster_id: String,
    }
}

api_request! {
    Contact => "/RoommatePosting/contact" {
        posting_id: String,
    }
}

api_request! {
    EditCity => "/RoommatePosting/editCity" {
        poster: String,
        new_city: String,
    }
}

api_request! {
    EditGender => "/RoommatePosting/editGender" {
        poster: String,
        new_gender: String,
    }
}

api_request! {
    EditAge => "/RoommatePosting/editAge" {
        poster: String,
        new_age: u32,
    }
}

api_request! {
    EditDescription => "/RoommatePosting/editDescription" {
        poster: String,
        new_description: String,
    }
}

api_request! {
    EditStartDate => "/RoommatePosting/editStartDate" {
        poster: String,
        new_start_date: NaiveDate,
    }
}

api_request! {
    EditEndDate => "/RoommatePosting/editEndDate" {
        poster: String,
        new_end_date: NaiveDate,
    }
}

api_request! {
    EditDailyRhythm => "/RoommatePosting/editDailyRhythm" {
        poster: String,
        new_value: String,
    }
}

api_request! {
    EditCleanlinessPreference => "/RoommatePosting/editCleanlinessPreference" {
        poster: String,
        new_value: String,
    }
}

api_request! {
    EditHomeEnvironment => "/RoommatePosting/editHomeEnvironment" {
        poster: String,
        new_value: String,
    }
}

api_request! {
    EditGuestsVisitors => "/RoommatePosting/editGuestsVisitors" {
        poster: String,
        new_value: String,
    }
}

api_request! {
    EditNumberOfRoommates => "/RoommatePosting/editNumberOfRoommates" {
        poster: String,
        new_value: u32,
    }
}
