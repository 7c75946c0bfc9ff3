use serde_json::{json, Value};
use crate::error::AppError;
use crate::helpers::validation::Violations;

/// Optional filters accepted by restaurant search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchCriteria {
    pub query: Option<String>,
    pub min_rating: Option<f32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
}

impl SearchCriteria {
    /// Every given number must be finite and in range; the index can't
    /// represent NaN or infinity.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        if let Some(min_rating) = self.min_rating {
            v.check(
                min_rating.is_finite() && min_rating >= 0.0,
                "minRating",
                "must be a non-negative number",
            );
        }
        if let Some(latitude) = self.latitude {
            v.check((-90.0..=90.0).contains(&latitude), "latitude", "must be between -90 and 90");
        }
        if let Some(longitude) = self.longitude {
            v.check(
                (-180.0..=180.0).contains(&longitude),
                "longitude",
                "must be between -180 and 180",
            );
        }
        if let Some(radius) = self.radius {
            v.check(
                radius.is_finite() && radius >= 0.0,
                "radius",
                "must be a non-negative number",
            );
        }
        v.into_result()
    }
}

/// The single filter a search resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum RestaurantQuery {
    MinRating(f32),
    Fuzzy { query: String, min_rating: f32 },
    Near { latitude: f64, longitude: f64, radius_miles: f64 },
    All,
}

impl RestaurantQuery {
    /// First matching rule wins:
    /// 1. rating given without text -> rating filter only
    /// 2. text given -> fuzzy name/cuisine match with rating floor (0 when unset)
    /// 3. point and radius given -> distance filter only
    /// 4. everything
    pub fn from_criteria(criteria: &SearchCriteria) -> Self {
        let text = criteria
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());

        match (text, criteria.min_rating) {
            (None, Some(min_rating)) => return RestaurantQuery::MinRating(min_rating),
            (Some(query), min_rating) => {
                return RestaurantQuery::Fuzzy {
                    query: query.to_string(),
                    min_rating: min_rating.unwrap_or(0.0),
                }
            }
            (None, None) => {}
        }

        match (criteria.latitude, criteria.longitude, criteria.radius) {
            (Some(latitude), Some(longitude), Some(radius_miles)) => RestaurantQuery::Near {
                latitude,
                longitude,
                radius_miles,
            },
            _ => RestaurantQuery::All,
        }
    }

    /// Query DSL body handed to the index as-is.
    pub fn to_query_dsl(&self) -> Value {
        match self {
            RestaurantQuery::MinRating(min_rating) => json!({
                "range": { "averageRating": { "gte": min_rating } }
            }),
            RestaurantQuery::Fuzzy { query, min_rating } => json!({
                "bool": {
                    "must": [
                        { "range": { "averageRating": { "gte": min_rating } } }
                    ],
                    "should": [
                        { "fuzzy": { "name": { "value": query, "fuzziness": "AUTO" } } },
                        { "fuzzy": { "cuisineType": { "value": query, "fuzziness": "AUTO" } } }
                    ],
                    "minimum_should_match": 1
                }
            }),
            RestaurantQuery::Near { latitude, longitude, radius_miles } => json!({
                "bool": {
                    "must": [
                        {
                            "geo_distance": {
                                "distance": format!("{}mi", radius_miles),
                                "geoLocation": { "lat": latitude, "lon": longitude }
                            }
                        }
                    ]
                }
            }),
            RestaurantQuery::All => json!({ "match_all": {} }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> SearchCriteria {
        SearchCriteria::default()
    }

    #[test]
    fn rating_without_text_is_rating_only() {
        let query = RestaurantQuery::from_criteria(&SearchCriteria {
            min_rating: Some(4.0),
            query: Some("   ".into()),
            latitude: Some(39.1),
            longitude: Some(-94.6),
            radius: Some(5.0),
        });

        assert_eq!(query, RestaurantQuery::MinRating(4.0));
    }

    #[test]
    fn text_defaults_rating_floor_to_zero() {
        let query = RestaurantQuery::from_criteria(&SearchCriteria {
            query: Some(" pizza ".into()),
            ..criteria()
        });

        assert_eq!(
            query,
            RestaurantQuery::Fuzzy {
                query: "pizza".into(),
                min_rating: 0.0
            }
        );
    }

    #[test]
    fn text_wins_over_geo_and_keeps_rating() {
        let query = RestaurantQuery::from_criteria(&SearchCriteria {
            query: Some("sushi".into()),
            min_rating: Some(3.5),
            latitude: Some(39.1),
            longitude: Some(-94.6),
            radius: Some(5.0),
        });

        assert_eq!(
            query,
            RestaurantQuery::Fuzzy {
                query: "sushi".into(),
                min_rating: 3.5
            }
        );
    }

    #[test]
    fn geo_needs_all_three_values() {
        let partial = RestaurantQuery::from_criteria(&SearchCriteria {
            latitude: Some(39.1),
            longitude: Some(-94.6),
            ..criteria()
        });
        assert_eq!(partial, RestaurantQuery::All);

        let full = RestaurantQuery::from_criteria(&SearchCriteria {
            latitude: Some(39.1),
            longitude: Some(-94.6),
            radius: Some(2.5),
            ..criteria()
        });
        assert_eq!(
            full,
            RestaurantQuery::Near {
                latitude: 39.1,
                longitude: -94.6,
                radius_miles: 2.5
            }
        );
    }

    #[test]
    fn non_finite_or_negative_numbers_are_invalid() {
        let err = SearchCriteria {
            min_rating: Some(f32::NAN),
            latitude: Some(91.0),
            longitude: Some(f64::NEG_INFINITY),
            radius: Some(-1.0),
            ..criteria()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "minRating: must be a non-negative number, latitude: must be between -90 and 90, \
             longitude: must be between -180 and 180, radius: must be a non-negative number"
        );

        let infinite_radius = SearchCriteria {
            radius: Some(f64::INFINITY),
            ..criteria()
        };
        assert!(infinite_radius.validate().is_err());
    }

    #[test]
    fn ordinary_criteria_are_valid() {
        let criteria = SearchCriteria {
            query: Some("pizza".into()),
            min_rating: Some(0.0),
            latitude: Some(39.1),
            longitude: Some(-94.6),
            radius: Some(0.0),
        };
        assert!(criteria.validate().is_ok());
        assert!(SearchCriteria::default().validate().is_ok());
    }

    #[test]
    fn no_filters_is_all() {
        assert_eq!(RestaurantQuery::from_criteria(&criteria()), RestaurantQuery::All);
    }

    #[test]
    fn fuzzy_dsl_requires_one_should_clause() {
        let dsl = RestaurantQuery::Fuzzy {
            query: "pizza".into(),
            min_rating: 2.0,
        }
        .to_query_dsl();

        assert_eq!(dsl["bool"]["minimum_should_match"], 1);
        assert_eq!(dsl["bool"]["must"][0]["range"]["averageRating"]["gte"], 2.0);
        assert_eq!(dsl["bool"]["should"][0]["fuzzy"]["name"]["value"], "pizza");
        assert_eq!(dsl["bool"]["should"][1]["fuzzy"]["cuisineType"]["fuzziness"], "AUTO");
    }

    #[test]
    fn geo_dsl_uses_miles() {
        let dsl = RestaurantQuery::Near {
            latitude: 39.5,
            longitude: -94.5,
            radius_miles: 10.0,
        }
        .to_query_dsl();

        let filter = &dsl["bool"]["must"][0]["geo_distance"];
        assert_eq!(filter["distance"], "10mi");
        assert_eq!(filter["geoLocation"]["lat"], 39.5);
        assert_eq!(filter["geoLocation"]["lon"], -94.5);
    }

    #[test]
    fn rating_and_all_dsl() {
        assert_eq!(
            RestaurantQuery::MinRating(4.0).to_query_dsl(),
            json!({ "range": { "averageRating": { "gte": 4.0 } } })
        );
        assert_eq!(RestaurantQuery::All.to_query_dsl(), json!({ "match_all": {} }));
    }
}
