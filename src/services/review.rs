use std::cmp::Ordering;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;
use crate::error::AppError;
use crate::helpers::pagination::{ReviewSort, ReviewSortField, SortDirection};
use crate::models::page::{Page, PageRequest};
use crate::models::requests::ReviewCreateUpdateRequest;
use crate::models::restaurant::Restaurant;
use crate::models::review::Review;
use crate::models::user::User;
use crate::repositories::RestaurantRepository;
use crate::services::restaurant::to_photos;

/// Reviews are stored inside their restaurant, so every write reloads and
/// saves the whole restaurant document.
pub struct ReviewService {
    repository: Arc<dyn RestaurantRepository>,
}

impl ReviewService {
    pub fn new(repository: Arc<dyn RestaurantRepository>) -> Self {
        Self { repository }
    }

    async fn restaurant_or_not_found(&self, restaurant_id: &str) -> Result<Restaurant, AppError> {
        self.repository
            .find_by_id(restaurant_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Restaurant with this ID does not exist: {}", restaurant_id))
            })
    }

    /// A user may review a restaurant only once.
    pub async fn create_review(
        &self,
        author: User,
        restaurant_id: &str,
        request: ReviewCreateUpdateRequest,
    ) -> Result<Review, AppError> {
        let mut restaurant = self.restaurant_or_not_found(restaurant_id).await?;

        if restaurant.reviews.iter().any(|r| r.written_by.id == author.id) {
            return Err(AppError::ReviewRejected(format!(
                "User {} has already reviewed restaurant {}",
                author.id, restaurant_id
            )));
        }

        let now = OffsetDateTime::now_utc();
        let review = Review {
            id: Uuid::new_v4().to_string(),
            content: request.content,
            rating: request.rating,
            date_posted: now,
            last_edited: now,
            photos: to_photos(request.photo_ids),
            written_by: author,
        };

        restaurant.reviews.push(review.clone());
        self.repository.save(restaurant).await?;
        info!("Created review {} on restaurant {}", review.id, restaurant_id);

        Ok(review)
    }

    pub async fn list_reviews(
        &self,
        restaurant_id: &str,
        sort: ReviewSort,
        page_request: PageRequest,
    ) -> Result<Page<Review>, AppError> {
        let mut reviews = self.restaurant_or_not_found(restaurant_id).await?.reviews;
        reviews.sort_by(|a, b| compare_reviews(a, b, sort));

        Ok(Page::from_vec(reviews, page_request))
    }

    pub async fn get_review(
        &self,
        restaurant_id: &str,
        review_id: &str,
    ) -> Result<Option<Review>, AppError> {
        let restaurant = self.repository.find_by_id(restaurant_id).await?;

        Ok(restaurant.and_then(|r| r.reviews.into_iter().find(|review| review.id == review_id)))
    }

    /// Only the original author may edit; `datePosted` is kept.
    pub async fn update_review(
        &self,
        author: User,
        restaurant_id: &str,
        review_id: &str,
        request: ReviewCreateUpdateRequest,
    ) -> Result<Review, AppError> {
        let mut restaurant = self.restaurant_or_not_found(restaurant_id).await?;

        let review = restaurant
            .reviews
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or_else(|| AppError::ReviewRejected(format!("Review does not exist: {}", review_id)))?;

        if review.written_by.id != author.id {
            return Err(AppError::ReviewRejected(format!(
                "User {} is not the author of review {}",
                author.id, review_id
            )));
        }

        review.content = request.content;
        review.rating = request.rating;
        review.photos = to_photos(request.photo_ids);
        review.last_edited = OffsetDateTime::now_utc();
        let updated = review.clone();

        self.repository.save(restaurant).await?;
        Ok(updated)
    }

    /// Deleting a review that is already gone is not an error.
    pub async fn delete_review(&self, restaurant_id: &str, review_id: &str) -> Result<(), AppError> {
        let mut restaurant = self.restaurant_or_not_found(restaurant_id).await?;

        let before = restaurant.reviews.len();
        restaurant.reviews.retain(|r| r.id != review_id);
        if restaurant.reviews.len() != before {
            self.repository.save(restaurant).await?;
            info!("Deleted review {} from restaurant {}", review_id, restaurant_id);
        }

        Ok(())
    }
}

fn compare_reviews(a: &Review, b: &Review, sort: ReviewSort) -> Ordering {
    let ordering = match sort.field {
        ReviewSortField::DatePosted => a.date_posted.cmp(&b.date_posted),
        ReviewSortField::LastEdited => a.last_edited.cmp(&b.last_edited),
        ReviewSortField::Rating => a.rating.cmp(&b.rating),
    };
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}
