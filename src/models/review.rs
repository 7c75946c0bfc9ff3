use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use crate::models::photo::Photo;
use crate::models::user::User;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub content: String,
    pub rating: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub date_posted: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_edited: OffsetDateTime,
    #[serde(default)]
    pub photos: Vec<Photo>,
    pub written_by: User,
}
