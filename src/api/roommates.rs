//! 室友帖子
//!
//! 编辑操作以发帖人 ID 为键。

use chrono::NaiveDate;
use serde_json::Value;

use nestmatch_shared::protocol::roommate::*;

use crate::dispatcher::Dispatcher;
use crate::error::ApiResult;

/// 创建室友帖子所需的字段
#[derive(Debug, Clone, PartialEq)]
pub struct NewPosting {
    pub city: String,
    pub gender: String,
    pub age: u32,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_rhythm: String,
    pub cleanliness_preference: String,
    pub home_environment: String,
    pub guests_visitors: String,
    pub number_of_roommates: u32,
}

pub struct Roommates<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Roommates<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn create(&self, posting: NewPosting) -> ApiResult<Value> {
        self.dispatcher
            .call(&CreatePosting {
                city: posting.city,
                gender: posting.gender,
                age: posting.age,
                description: posting.description,
                start_date: posting.start_date,
                end_date: posting.end_date,
                daily_rhythm: posting.daily_rhythm,
                cleanliness_preference: posting.cleanliness_preference,
                home_environment: posting.home_environment,
                guests_visitors: posting.guests_visitors,
                number_of_roommates: posting.number_of_roommates,
            })
            .await
    }

    pub async fn delete(&self, posting_id: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&DeletePosting {
                posting_id: posting_id.to_string(),
            })
            .await
    }

    pub async fn get_all(&self) -> ApiResult<Value> {
        self.dispatcher.call(&GetAllPostings {}).await
    }

    pub async fn get_by_poster(&self, poster_id: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&GetByPosterId {
                poster_id: poster_id.to_string(),
            })
            .await
    }

    pub async fn contact(&self, posting_id: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&Contact {
                posting_id: posting_id.to_string(),
            })
            .await
    }

    pub async fn edit_city(&self, poster: &str, new_city: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditCity {
                poster: poster.to_string(),
                new_city: new_city.to_string(),
            })
            .await
    }

    pub async fn edit_gender(&self, poster: &str, new_gender: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditGender {
                poster: poster.to_string(),
                new_gender: new_gender.to_string(),
            })
            .await
    }

    pub async fn edit_age(&self, poster: &str, new_age: u32) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditAge {
                poster: poster.to_string(),
                new_age,
            })
            .await
    }

    pub async fn edit_description(&self, poster: &str, new_description: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditDescription {
                poster: poster.to_string(),
                new_description: new_description.to_string(),
            })
            .await
    }

    pub async fn edit_start_date(
        &self,
        poster: &str,
        new_start_date: NaiveDate,
    ) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditStartDate {
                poster: poster.to_string(),
                new_start_date,
            })
            .await
    }

    pub async fn edit_end_date(&self, poster: &str, new_end_date: NaiveDate) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditEndDate {
                poster: poster.to_string(),
                new_end_date,
            })
            .await
    }

    pub async fn edit_daily_rhythm(&self, poster: &str, new_value: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditDailyRhythm {
                poster: poster.to_string(),
                new_value: new_value.to_string(),
            })
            .await
    }

    pub async fn edit_cleanliness_preference(
        &self,
        poster: &str,
        new_value: &str,
    ) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditCleanlinessPreference {
                poster: poster.to_string(),
                new_value: new_value.to_string(),
            })
            .await
    }

    pub async fn edit_home_environment(&self, poster: &str, new_value: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditHomeEnvironment {
                poster: poster.to_string(),
                new_value: new_value.to_string(),
            })
            .await
    }

    pub async fn edit_guests_visitors(&self, poster: &str, new_value: &str) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditGuestsVisitors {
                poster: poster.to_string(),
                new_value: new_value.to_string(),
            })
            .await
    }

    pub async fn edit_number_of_roommates(&self, poster: &str, new_value: u32) -> ApiResult<Value> {
        self.dispatcher
            .call(&EditNumberOfRoommates {
                poster: poster.to_string(),
                new_value,
            })
            .await
    }
}
