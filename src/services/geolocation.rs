use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::models::address::Address;
use crate::models::geo::GeoLocation;

/// Resolves a postal address to coordinates.
pub trait GeoLocationService: Send + Sync {
    fn geo_locate(&self, address: &Address) -> GeoLocation;
}

pub const MIN_LATITUDE: f64 = 39.00;
pub const MAX_LATITUDE: f64 = 39.75;
pub const MIN_LONGITUDE: f64 = -94.75;
pub const MAX_LONGITUDE: f64 = -94.45;

/// Stand-in geocoder: ignores the address and picks a uniform point inside
/// the Kansas City bounding box.
pub struct RandomKansasCityGeoLocationService {
    rng: Mutex<StdRng>,
}

impl RandomKansasCityGeoLocationService {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self { rng: Mutex::new(rng) }
    }
}

impl Default for RandomKansasCityGeoLocationService {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoLocationService for RandomKansasCityGeoLocationService {
    fn geo_locate(&self, _address: &Address) -> GeoLocation {
        let mut rng = self.rng.lock();
        GeoLocation {
            latitude: rng.gen_range(MIN_LATITUDE..=MAX_LATITUDE),
            longitude: rng.gen_range(MIN_LONGITUDE..=MAX_LONGITUDE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_stay_inside_bounding_box() {
        let service = RandomKansasCityGeoLocationService::new();
        let address = Address::default();

        for _ in 0..1_000 {
            let location = service.geo_locate(&address);
            assert!((MIN_LATITUDE..=MAX_LATITUDE).contains(&location.latitude));
            assert!((MIN_LONGITUDE..=MAX_LONGITUDE).contains(&location.longitude));
        }
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let a = RandomKansasCityGeoLocationService::seeded(42);
        let b = RandomKansasCityGeoLocationService::seeded(42);
        let address = Address::default();

        for _ in 0..5 {
            assert_eq!(a.geo_locate(&address), b.geo_locate(&address));
        }
    }
}
