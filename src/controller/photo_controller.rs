use std::sync::Arc;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use crate::error::AppError;
use crate::helpers::validation::FieldError;
use crate::models::dtos::PhotoDto;
use crate::services::photo::PhotoService;
use crate::services::storage::{FileUpload, MAX_FILE_SIZE};
use crate::state::AppState;

/// Transport cap on multipart bodies. Kept above the per-file limit so an
/// oversized image is refused by storage validation rather than the transport.
pub const MAX_UPLOAD_BODY: usize = 2 * MAX_FILE_SIZE;

pub fn upload_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/photos", post(upload_photo))
        .route_layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY))
        .route_layer(Extension(app_state.photo_service))
}

/// Reading photos needs no token.
pub fn public_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/photos/:id", get(get_photo))
        .route_layer(Extension(app_state.photo_service))
}

pub async fn upload_photo(
    Extension(photo_service): Extension<Arc<PhotoService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PhotoDto>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::MalformedPayload(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::MalformedPayload(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::MalformedPayload(e.to_string()))?;
        upload = Some(FileUpload {
            original_name,
            content_type,
            data: data.to_vec(),
        });
    }

    let Some(upload) = upload else {
        return Err(AppError::Validation(vec![FieldError::new(
            "file",
            "A file is required",
        )]));
    };

    let photo = photo_service.upload_photo(upload).await?;
    Ok(Json(photo.into()))
}

pub async fn get_photo(
    Extension(photo_service): Extension<Arc<PhotoService>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let photo = photo_service.get_photo_as_resource(&id).await?;

    Ok(match photo {
        Some(photo) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, photo.content_type),
                (header::CONTENT_DISPOSITION, "inline"),
            ],
            photo.data,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}
