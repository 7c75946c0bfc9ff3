use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use crate::models::address::Address;
use crate::models::geo::GeoPoint;
use crate::models::operating_hours::OperatingHours;
use crate::models::photo::Photo;
use crate::models::review::Review;
use crate::models::user::User;

/// Restaurant document. Reviews are nested inside it rather than stored on
/// their own.
#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub cuisine_type: String,
    pub contact_information: String,
    #[serde(default)]
    pub average_rating: f32,
    pub geo_location: GeoPoint,
    pub address: Address,
    #[serde(default)]
    pub operating_hours: OperatingHours,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub created_by: Option<User>,
}
