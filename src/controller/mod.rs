use std::net::SocketAddr;
use anyhow::Context;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use crate::auth::require_user;
use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::state::AppState;

pub mod health_check;
pub mod photo_controller;
pub mod restaurant_controller;
pub mod review_controller;

pub async fn serve(
    app_state: AppState,
    config: &Config,
) -> anyhow::Result<()> {
    let origins = config
        .origin_urls
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>().with_context(|| format!("Invalid origin url: {}", s)))
        .collect::<anyhow::Result<Vec<HeaderValue>>>()?;

    let application = router_endpoints(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS
                        ])
                        .allow_origin(origins)
                        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                )
        );

    let address: SocketAddr = config.bind_address;
    info!("API server listening on: {} ({})", address, config.environment);
    axum::Server::bind(&address)
        .serve(application.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Error spinning up the API server")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

/// Every route; everything except the health check and photo downloads
/// requires a bearer token.
pub fn router_endpoints(app_state: AppState) -> Router {
    let protected = Router::new()
        .merge(restaurant_controller::router(app_state.clone()))
        .merge(review_controller::router(app_state.clone()))
        .merge(photo_controller::upload_router(app_state.clone()))
        .route_layer(middleware::from_fn_with_state(
            app_state.token_verifier.clone(),
            require_user,
        ));

    Router::new()
        .merge(health_check::router())
        .merge(photo_controller::public_router(app_state))
        .merge(protected)
        .fallback(page_not_found_handler)
}
