use std::sync::Arc;
use tracing::{info, warn};
use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::repositories::elasticsearch_repo::{Credentials, ElasticsearchRestaurantRepository};
use crate::repositories::memory_repo::InMemoryRestaurantRepository;
use crate::repositories::RestaurantRepository;
use crate::services::geolocation::{GeoLocationService, RandomKansasCityGeoLocationService};
use crate::services::photo::PhotoService;
use crate::services::restaurant::RestaurantService;
use crate::services::review::ReviewService;
use crate::services::storage::{FileSystemStorageService, StorageService};

/// Services shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub restaurant_service: Arc<RestaurantService>,
    pub review_service: Arc<ReviewService>,
    pub photo_service: Arc<PhotoService>,
    pub token_verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn RestaurantRepository>,
        storage: Arc<dyn StorageService>,
        geo_location_service: Arc<dyn GeoLocationService>,
        token_verifier: TokenVerifier,
    ) -> Self {
        Self {
            restaurant_service: Arc::new(RestaurantService::new(
                repository.clone(),
                geo_location_service,
            )),
            review_service: Arc::new(ReviewService::new(repository)),
            photo_service: Arc::new(PhotoService::new(storage)),
            token_verifier: Arc::new(token_verifier),
        }
    }

    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let repository: Arc<dyn RestaurantRepository> = match &config.elasticsearch_url {
            Some(url) => {
                let credentials = match (&config.elasticsearch_username, &config.elasticsearch_password) {
                    (Some(username), Some(password)) => Some(Credentials {
                        username: username.clone(),
                        password: password.clone(),
                    }),
                    _ => None,
                };
                let repository = ElasticsearchRestaurantRepository::new(
                    url,
                    &config.elasticsearch_index,
                    credentials,
                )?;
                repository.ensure_index().await?;
                info!("Restaurants stored in elasticsearch at {}", url);
                Arc::new(repository)
            }
            None => {
                warn!("ELASTICSEARCH_URL not set, restaurants are kept in memory only");
                Arc::new(InMemoryRestaurantRepository::new())
            }
        };

        let storage = FileSystemStorageService::init(&config.storage_location).await?;

        Ok(Self::new(
            repository,
            Arc::new(storage),
            Arc::new(RandomKansasCityGeoLocationService::new()),
            config.token_verifier()?,
        ))
    }
}
