//! 房源相关操作
//!
//! 日期字段使用 ISO 8601 (`YYYY-MM-DD`)，价格为每周价格。

use chrono::NaiveDate;

use crate::{Amenity, Photo};

api_request! {
    CreateListing => "/Listing/create" {
        title: String,
        amenities: Vec<Amenity>,
        photos: Vec<Photo>,
        address: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        price: f64,
        #[serde(rename = "type")]
        listing_type: String,
        description: String,
    }
}

api_request! {
    DeleteListing => "/Listing/delete" {
        listing_id: String,
    }
}

api_request! {
    GetListingById => "/Listing/getListingById" {
        listing_id: String,
    }
}

api_request! {
    GetAllListings => "/Listing/getAllListings" {}
}

api_request! {
    EditTitle => "/Listing/editTitle" {
        listing_id: String,
        new_title: String,
    }
}

api_request! {
    EditAddress => "/Listing/editAddress" {
        listing_id: String,
        new_address: String,
    }
}

api_request! {
    EditStartDate => "/Listing/editStartDate" {
        listing_id: String,
        new_start_date: NaiveDate,
    }
}

api_request! {
    EditEndDate => "/Listing/editEndDate" {
        listing_id: String,
        new_end_date: NaiveDate,
    }
}

api_request! {
    EditPrice => "/Listing/editPrice" {
        listing_id: String,
        new_price: f64,
    }
}

api_request! {
    EditType => "/Listing/editType" {
        listing_id: String,
        new_type: String,
    }
}

api_request! {
    EditDescription => "/Listing/editDescription" {
        listing_id: String,
        new_description: String,
    }
}

api_request! {
    AddPhoto => "/Listing/addPhoto" {
        listing_id: String,
        photo: Photo,
    }
}

api_request! {
    DeletePhoto => "/Listing/deletePhoto" {
        listing_id: String,
        photo_id: String,
    }
}

api_request! {
    AddAmenity => "/Listing/addAmenity" {
        listing_id: String,
        title: String,
        distance: f64,
    }
}

api_request! {
    DeleteAmenity => "/Listing/deleteAmenity" {
        listing_id: String,
        amenity_id: String,
    }
}

api_request! {
    /// 向房东表达意向
    SendInterest => "/Listing/interest" {
        listing_id: String,
    }
}
