use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use crate::error::AppError;
use crate::models::geo::GeoPoint;
use crate::models::page::{Page, PageRequest};
use crate::models::photo::Photo;
use crate::models::requests::RestaurantCreateUpdateRequest;
use crate::models::restaurant::Restaurant;
use crate::models::user::User;
use crate::repositories::query::{RestaurantQuery, SearchCriteria};
use crate::repositories::RestaurantRepository;
use crate::services::geolocation::GeoLocationService;

pub struct RestaurantService {
    repository: Arc<dyn RestaurantRepository>,
    geo_location_service: Arc<dyn GeoLocationService>,
}

impl RestaurantService {
    pub fn new(
        repository: Arc<dyn RestaurantRepository>,
        geo_location_service: Arc<dyn GeoLocationService>,
    ) -> Self {
        Self {
            repository,
            geo_location_service,
        }
    }

    /// New restaurants start with an average rating of 0 and no reviews.
    pub async fn create_restaurant(
        &self,
        author: User,
        request: RestaurantCreateUpdateRequest,
    ) -> Result<Restaurant, AppError> {
        let geo_location: GeoPoint = self.geo_location_service.geo_locate(&request.address).into();

        let restaurant = Restaurant {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            cuisine_type: request.cuisine_type,
            contact_information: request.contact_information,
            average_rating: 0.0,
            geo_location,
            address: request.address,
            operating_hours: request.operating_hours,
            photos: to_photos(request.photo_ids),
            reviews: Vec::new(),
            created_by: Some(author),
        };

        let saved = self.repository.save(restaurant).await?;
        info!("Created restaurant {}", saved.id);
        Ok(saved)
    }

    pub async fn search_restaurants(
        &self,
        criteria: &SearchCriteria,
        page_request: PageRequest,
    ) -> Result<Page<Restaurant>, AppError> {
        criteria.validate()?;
        let query = RestaurantQuery::from_criteria(criteria);
        Ok(self.repository.search(&query, page_request).await?)
    }

    pub async fn get_restaurant(&self, id: &str) -> Result<Option<Restaurant>, AppError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Full overwrite of the editable fields. `id`, `averageRating`, reviews
    /// and the creator are kept.
    pub async fn update_restaurant(
        &self,
        id: &str,
        request: RestaurantCreateUpdateRequest,
    ) -> Result<Restaurant, AppError> {
        let mut restaurant = self.get_restaurant(id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Restaurant with this ID does not exist: {}", id))
        })?;

        restaurant.geo_location = self.geo_location_service.geo_locate(&request.address).into();
        restaurant.name = request.name;
        restaurant.cuisine_type = request.cuisine_type;
        restaurant.contact_information = request.contact_information;
        restaurant.address = request.address;
        restaurant.operating_hours = request.operating_hours;
        restaurant.photos = to_photos(request.photo_ids);

        Ok(self.repository.save(restaurant).await?)
    }

    /// Missing ids are ignored. Photo files stay in storage.
    pub async fn delete_restaurant(&self, id: &str) -> Result<(), AppError> {
        self.repository.delete_by_id(id).await?;
        info!("Deleted restaurant {}", id);
        Ok(())
    }
}

pub(crate) fn to_photos(photo_ids: Vec<String>) -> Vec<Photo> {
    photo_ids.into_iter().map(Photo::from_reference).collect()
}
