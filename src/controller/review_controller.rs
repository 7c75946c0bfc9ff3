use std::sync::Arc;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use crate::error::AppError;
use crate::helpers::pagination::{PageParams, ReviewSort};
use crate::models::dtos::ReviewDto;
use crate::models::page::Page;
use crate::models::requests::ReviewCreateUpdateRequest;
use crate::models::user::User;
use crate::services::review::ReviewService;
use crate::state::AppState;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/restaurants/:restaurant_id/reviews",
            get(list_reviews).post(create_review),
        )
        .route(
            "/api/restaurants/:restaurant_id/reviews/:review_id",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route_layer(Extension(app_state.review_service))
}

pub async fn create_review(
    Extension(review_service): Extension<Arc<ReviewService>>,
    Extension(user): Extension<User>,
    Path(restaurant_id): Path<String>,
    payload: Result<Json<ReviewCreateUpdateRequest>, JsonRejection>,
) -> Result<Json<ReviewDto>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    request.validate()?;

    let review = review_service
        .create_review(user, &restaurant_id, request)
        .await?;
    Ok(Json(review.into()))
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct SortParam {
    pub sort: Option<String>,
}

pub async fn list_reviews(
    Extension(review_service): Extension<Arc<ReviewService>>,
    Path(restaurant_id): Path<String>,
    sort: Result<Query<SortParam>, QueryRejection>,
    page: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page<ReviewDto>>, AppError> {
    let Query(sort) = sort.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let Query(page) = page.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let sort = ReviewSort::parse(sort.sort.as_deref())?;
    let page_request = page.to_page_request()?;

    let reviews = review_service
        .list_reviews(&restaurant_id, sort, page_request)
        .await?;
    Ok(Json(reviews.map(ReviewDto::from)))
}

/// A missing review answers 204 rather than 404.
pub async fn get_review(
    Extension(review_service): Extension<Arc<ReviewService>>,
    Path((restaurant_id, review_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let review = review_service.get_review(&restaurant_id, &review_id).await?;

    Ok(match review {
        Some(review) => Json(ReviewDto::from(review)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

pub async fn update_review(
    Extension(review_service): Extension<Arc<ReviewService>>,
    Extension(user): Extension<User>,
    Path((restaurant_id, review_id)): Path<(String, String)>,
    payload: Result<Json<ReviewCreateUpdateRequest>, JsonRejection>,
) -> Result<Json<ReviewDto>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    request.validate()?;

    let review = review_service
        .update_review(user, &restaurant_id, &review_id, request)
        .await?;
    Ok(Json(review.into()))
}

pub async fn delete_review(
    Extension(review_service): Extension<Arc<ReviewService>>,
    Path((restaurant_id, review_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    review_service
        .delete_review(&restaurant_id, &review_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
