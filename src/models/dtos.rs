use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use time::OffsetDateTime;
use crate::models::address::Address;
use crate::models::geo::GeoPoint;
use crate::models::operating_hours::OperatingHours;
use crate::models::photo::Photo;
use crate::models::restaurant::Restaurant;
use crate::models::review::Review;
use crate::models::user::User;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct GeoPointDto {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoPoint> for GeoPointDto {
    fn from(point: GeoPoint) -> Self {
        GeoPointDto {
            latitude: point.lat,
            longitude: point.lon,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDto {
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub upload_date: OffsetDateTime,
}

impl From<Photo> for PhotoDto {
    fn from(photo: Photo) -> Self {
        PhotoDto {
            url: photo.url,
            upload_date: photo.upload_date,
        }
    }
}

pub type UserDto = User;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: String,
    pub content: String,
    pub rating: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub date_posted: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_edited: OffsetDateTime,
    pub photos: Vec<PhotoDto>,
    pub written_by: UserDto,
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        ReviewDto {
            id: review.id,
            content: review.content,
            rating: review.rating,
            date_posted: review.date_posted,
            last_edited: review.last_edited,
            photos: review.photos.into_iter().map(PhotoDto::from).collect(),
            written_by: review.written_by,
        }
    }
}

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDto {
    pub id: String,
    pub name: String,
    pub cuisine_type: String,
    pub contact_information: String,
    pub average_rating: f32,
    pub geo_location: GeoPointDto,
    pub address: Address,
    pub operating_hours: OperatingHours,
    pub photos: Vec<PhotoDto>,
    pub reviews: Vec<ReviewDto>,
    pub created_by: Option<UserDto>,
}

impl From<Restaurant> for RestaurantDto {
    fn from(restaurant: Restaurant) -> Self {
        RestaurantDto {
            id: restaurant.id,
            name: restaurant.name,
            cuisine_type: restaurant.cuisine_type,
            contact_information: restaurant.contact_information,
            average_rating: restaurant.average_rating,
            geo_location: restaurant.geo_location.into(),
            address: restaurant.address,
            operating_hours: restaurant.operating_hours,
            photos: restaurant.photos.into_iter().map(PhotoDto::from).collect(),
            reviews: restaurant.reviews.into_iter().map(ReviewDto::from).collect(),
            created_by: restaurant.created_by,
        }
    }
}

/// Compact form used in search listings.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSummaryDto {
    pub id: String,
    pub name: String,
    pub cuisine_type: String,
    pub average_rating: f32,
    pub total_reviews: usize,
    pub address: Address,
    pub photos: Vec<PhotoDto>,
}

impl From<Restaurant> for RestaurantSummaryDto {
    fn from(restaurant: Restaurant) -> Self {
        RestaurantSummaryDto {
            total_reviews: restaurant.reviews.len(),
            id: restaurant.id,
            name: restaurant.name,
            cuisine_type: restaurant.cuisine_type,
            average_rating: restaurant.average_rating,
            address: restaurant.address,
            photos: restaurant.photos.into_iter().map(PhotoDto::from).collect(),
        }
    }
}
