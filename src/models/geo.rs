use serde::{Deserialize, Serialize};

/// Point as stored in the index, matching the `geo_point` object form.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Result of resolving an address to coordinates.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoLocation> for GeoPoint {
    fn from(location: GeoLocation) -> Self {
        GeoPoint {
            lat: location.latitude,
            lon: location.longitude,
        }
    }
}
