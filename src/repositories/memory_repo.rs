use std::collections::BTreeMap;
use axum::async_trait;
use parking_lot::RwLock;
use crate::models::geo::GeoPoint;
use crate::models::page::{Page, PageRequest};
use crate::models::restaurant::Restaurant;
use crate::repositories::query::RestaurantQuery;
use crate::repositories::RestaurantRepository;

const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Process-local index for running without a search cluster. Evaluates the
/// same queries the cluster would, approximating its fuzzy matching.
#[derive(Default)]
pub struct InMemoryRestaurantRepository {
    restaurants: RwLock<BTreeMap<String, Restaurant>>,
}

impl InMemoryRestaurantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.restaurants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryRestaurantRepository {
    async fn save(&self, restaurant: Restaurant) -> anyhow::Result<Restaurant> {
        self.restaurants
            .write()
            .insert(restaurant.id.clone(), restaurant.clone());
        Ok(restaurant)
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Restaurant>> {
        Ok(self.restaurants.read().get(id).cloned())
    }

    async fn search(
        &self,
        query: &RestaurantQuery,
        page_request: PageRequest,
    ) -> anyhow::Result<Page<Restaurant>> {
        let matches = self
            .restaurants
            .read()
            .values()
            .filter(|restaurant| matches_query(restaurant, query))
            .cloned()
            .collect::<Vec<_>>();

        Ok(Page::from_vec(matches, page_request))
    }

    async fn delete_by_id(&self, id: &str) -> anyhow::Result<()> {
        self.restaurants.write().remove(id);
        Ok(())
    }
}

pub fn matches_query(restaurant: &Restaurant, query: &RestaurantQuery) -> bool {
    match query {
        RestaurantQuery::MinRating(min_rating) => restaurant.average_rating >= *min_rating,
        RestaurantQuery::Fuzzy { query, min_rating } => {
            restaurant.average_rating >= *min_rating
                && (fuzzy_matches(&restaurant.name, query)
                    || fuzzy_matches(&restaurant.cuisine_type, query))
        }
        RestaurantQuery::Near { latitude, longitude, radius_miles } => {
            let center = GeoPoint {
                lat: *latitude,
                lon: *longitude,
            };
            distance_miles(&center, &restaurant.geo_location) <= *radius_miles
        }
        RestaurantQuery::All => true,
    }
}

/// A term matches when it is within the automatic edit-distance allowance of
/// any lowercased word in `text`: 0 edits up to 2 chars, 1 up to 5, else 2.
fn fuzzy_matches(text: &str, term: &str) -> bool {
    let term: Vec<char> = term.chars().collect();
    let allowed = match term.len() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    };

    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| {
            let word: Vec<char> = word.chars().collect();
            edit_distance(&word, &term) <= allowed
        })
}

/// Damerau-Levenshtein (optimal string alignment) distance.
fn edit_distance(a: &[char], b: &[char]) -> usize {
    let mut d = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        d[0][j] = j;
    }
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            d[i][j] = (d[i - 1][j] + 1)
                .min(d[i][j - 1] + 1)
                .min(d[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                d[i][j] = d[i][j].min(d[i - 2][j - 2] + 1);
            }
        }
    }
    d[a.len()][b.len()]
}

/// Haversine great-circle distance.
fn distance_miles(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}
