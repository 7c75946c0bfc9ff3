use serde::{Deserialize, Serialize};
use crate::error::AppError;
use crate::helpers::validation::{is_clock_time, Violations};
use crate::models::address::Address;
use crate::models::operating_hours::OperatingHours;

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCreateUpdateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cuisine_type: String,
    #[serde(default)]
    pub contact_information: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub operating_hours: OperatingHours,
    #[serde(default)]
    pub photo_ids: Vec<String>,
}

impl RestaurantCreateUpdateRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.not_blank("name", &self.name, "Restaurant name is required");
        v.not_blank("cuisineType", &self.cuisine_type, "Cuisine type is required");
        v.not_blank(
            "contactInformation",
            &self.contact_information,
            "Contact information is required",
        );

        let address = &self.address;
        v.not_blank("address.streetNumber", &address.street_number, "Street number is required");
        v.not_blank("address.streetName", &address.street_name, "Street name is required");
        v.not_blank("address.city", &address.city, "City is required");
        v.not_blank("address.state", &address.state, "State is required");
        v.not_blank("address.postalCode", &address.postal_code, "Postal code is required");
        v.not_blank("address.country", &address.country, "Country is required");

        for (day, range) in self.operating_hours.days() {
            let Some(range) = range else { continue };
            let open = format!("operatingHours.{day}.openTime");
            let close = format!("operatingHours.{day}.closeTime");
            if range.open_time.trim().is_empty() {
                v.add(open, "Open time must be provided");
            } else if !is_clock_time(&range.open_time) {
                v.add(open, "Open time must be in HH:mm format");
            }
            if range.close_time.trim().is_empty() {
                v.add(close, "Close time must be provided");
            } else if !is_clock_time(&range.close_time) {
                v.add(close, "Close time must be in HH:mm format");
            }
        }

        v.check(!self.photo_ids.is_empty(), "photoIds", "At least one photo ID is required");
        v.into_result()
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreateUpdateRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub photo_ids: Vec<String>,
}

impl ReviewCreateUpdateRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.not_blank("content", &self.content, "Review content is required");
        v.check(
            (1..=5).contains(&self.rating),
            "rating",
            "Rating must be between 1 and 5",
        );
        v.into_result()
    }
}
