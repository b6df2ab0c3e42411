//! Backend-for-frontend behind the DAM asset picker widget.
//!
//! Translates the widget's REST calls into signed upstream function calls
//! via [`dam_client::Picker`]. The caller's upstream API key rides along as
//! a bearer token and is never stored server-side.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

use std::{sync::Arc, time::Duration};

use axum::{http::HeaderName, routing::get, Router};
use dam_client::Picker;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::PagingSettings;

// ------------------------------------------------------------------ //
//  Shared application state                                           //
// ------------------------------------------------------------------ //

/// Shared state injected into every Axum handler via `State`.
pub struct AppState {
    pub picker: Picker,
    pub paging: PagingSettings,
}

// ------------------------------------------------------------------ //
//  Router                                                             //
// ------------------------------------------------------------------ //

pub fn router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(middleware::CORRELATION_HEADER)]);

    Router::new()
        .route("/health", get(handlers::health))
        // Assets
        .route("/api/assets/search", get(handlers::search_assets))
        .route("/api/assets/:asset_id", get(handlers::get_asset_detail))
        // Collection tree
        .route("/api/collections", get(handlers::root_collections))
        .route(
            "/api/collections/:collection_id/children",
            get(handlers::collection_children),
        )
        .route(
            "/api/collections/:collection_id/assets",
            get(handlers::collection_assets),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::correlation_id))
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}
