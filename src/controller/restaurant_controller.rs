use std::sync::Arc;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use crate::error::AppError;
use crate::helpers::pagination::PageParams;
use crate::models::dtos::{RestaurantDto, RestaurantSummaryDto};
use crate::models::page::Page;
use crate::models::requests::RestaurantCreateUpdateRequest;
use crate::models::user::User;
use crate::repositories::query::SearchCriteria;
use crate::services::restaurant::RestaurantService;
use crate::state::AppState;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/restaurants", get(search_restaurants).post(create_restaurant))
        .route(
            "/api/restaurants/:restaurant_id",
            get(get_restaurant).put(update_restaurant).delete(delete_restaurant),
        )
        .route_layer(Extension(app_state.restaurant_service))
}

type Service = Arc<RestaurantService>;

pub async fn create_restaurant(
    Extension(restaurant_service): Extension<Service>,
    Extension(user): Extension<User>,
    payload: Result<Json<RestaurantCreateUpdateRequest>, JsonRejection>,
) -> Result<Json<RestaurantDto>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    request.validate()?;

    let restaurant = restaurant_service.create_restaurant(user, request).await?;
    Ok(Json(restaurant.into()))
}

#[derive(Clone, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchRestaurantParams {
    pub q: Option<String>,
    pub min_rating: Option<f32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
}

impl From<SearchRestaurantParams> for SearchCriteria {
    fn from(params: SearchRestaurantParams) -> Self {
        SearchCriteria {
            query: params.q,
            min_rating: params.min_rating,
            latitude: params.latitude,
            longitude: params.longitude,
            radius: params.radius,
        }
    }
}

pub async fn search_restaurants(
    Extension(restaurant_service): Extension<Service>,
    params: Result<Query<SearchRestaurantParams>, QueryRejection>,
    page: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page<RestaurantSummaryDto>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let Query(page) = page.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let page_request = page.to_page_request()?;

    let results = restaurant_service
        .search_restaurants(&params.into(), page_request)
        .await?;
    Ok(Json(results.map(RestaurantSummaryDto::from)))
}

pub async fn get_restaurant(
    Extension(restaurant_service): Extension<Service>,
    Path(restaurant_id): Path<String>,
) -> Result<Response, AppError> {
    let restaurant = restaurant_service.get_restaurant(&restaurant_id).await?;

    Ok(match restaurant {
        Some(restaurant) => Json(RestaurantDto::from(restaurant)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

pub async fn update_restaurant(
    Extension(restaurant_service): Extension<Service>,
    Path(restaurant_id): Path<String>,
    payload: Result<Json<RestaurantCreateUpdateRequest>, JsonRejection>,
) -> Result<Json<RestaurantDto>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    request.validate()?;

    let restaurant = restaurant_service
        .update_restaurant(&restaurant_id, request)
        .await?;
    Ok(Json(restaurant.into()))
}

pub async fn delete_restaurant(
    Extension(restaurant_service): Extension<Service>,
    Path(restaurant_id): Path<String>,
) -> Result<StatusCode, AppError> {
    restaurant_service.delete_restaurant(&restaurant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
