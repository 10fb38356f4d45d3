use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;

use crate::{
    config::{AppConfig, CorsConfig},
    error::Result,
    routes,
    store::{self, ItemStore},
};

/// Shared across every invocation; the store client is built once per process.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub cors: CorsConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>, cors: CorsConfig) -> Self {
        Self { store, cors }
    }
}

pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    let store = store::connect(&config.store).await?;
    Ok(AppState::new(store, config.cors.clone()))
}

pub fn router(state: AppState, max_body_size: usize) -> Router {
    routes::create_router()
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let state = build_state(config).await?;
    Ok(router(state, config.server.max_body_size))
}
