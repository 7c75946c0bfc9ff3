use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub upload_date: OffsetDateTime,
}

impl Photo {
    /// Wraps an already uploaded photo reference, stamped with the current time.
    pub fn from_reference(url: impl Into<String>) -> Self {
        Photo {
            url: url.into(),
            upload_date: OffsetDateTime::now_utc(),
        }
    }
}
