use axum::async_trait;
use crate::models::page::{Page, PageRequest};
use crate::models::restaurant::Restaurant;
use crate::repositories::query::RestaurantQuery;

pub mod elasticsearch_repo;
pub mod memory_repo;
pub mod query;

/// Persistence boundary for restaurant documents (reviews included).
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Inserts or fully replaces the document with `restaurant.id`.
    async fn save(&self, restaurant: Restaurant) -> anyhow::Result<Restaurant>;

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Restaurant>>;

    async fn search(
        &self,
        query: &RestaurantQuery,
        page_request: PageRequest,
    ) -> anyhow::Result<Page<Restaurant>>;

    /// Deleting an id that does not exist is not an error.
    async fn delete_by_id(&self, id: &str) -> anyhow::Result<()>;
}
