use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use crate::error::ErrorDto;

pub async fn page_not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorDto {
            status: StatusCode::NOT_FOUND.as_u16(),
            message: "Oops looks like you landed at the wrong endpoint".to_string(),
        }),
    )
}
