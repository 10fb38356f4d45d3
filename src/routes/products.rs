//! Local gateway: turns HTTP requests into gateway events for the handlers.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
};
use http::{Method, StatusCode};
use serde_json::json;

use crate::{
    handlers,
    models::{GatewayRequest, GatewayResponse},
    AppState,
};

const COLLECTION_METHODS: &str = "GET,POST,OPTIONS";
const ITEM_METHODS: &str = "GET,PUT,PATCH,DELETE,OPTIONS";

fn event(method: &Method, id: Option<String>, body: &[u8]) -> GatewayRequest {
    GatewayRequest::from_http(method, id, body)
}

fn message(state: &AppState, status: StatusCode, text: &str) -> GatewayResponse {
    GatewayResponse::new(status, json!({ "message": text }).to_string()).with_cors(&state.cors)
}

/// Body extraction failures (oversized or unreadable) answered like handler errors.
fn rejected(state: &AppState, rejection: BytesRejection) -> GatewayResponse {
    tracing::warn!("Rejected request body: {}", rejection.body_text());
    message(state, rejection.status(), &rejection.body_text())
}

pub async fn create_product(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> GatewayResponse {
    match body {
        Ok(body) => handlers::create_product(&state, event(&method, None, &body)).await,
        Err(rejection) => rejected(&state, rejection),
    }
}

pub async fn list_products(State(state): State<AppState>, method: Method) -> GatewayResponse {
    handlers::list_products(&state, event(&method, None, &[])).await
}

pub async fn get_product(
    State(state): State<AppState>,
    method: Method,
    Path(id): Path<String>,
) -> GatewayResponse {
    handlers::get_product(&state, event(&method, Some(id), &[])).await
}

pub async fn update_product(
    State(state): State<AppState>,
    method: Method,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> GatewayResponse {
    match body {
        Ok(body) => handlers::update_product(&state, event(&method, Some(id), &body)).await,
        Err(rejection) => rejected(&state, rejection),
    }
}

pub async fn delete_product(
    State(state): State<AppState>,
    method: Method,
    Path(id): Path<String>,
) -> GatewayResponse {
    handlers::delete_product(&state, event(&method, Some(id), &[])).await
}

pub async fn collection_preflight(State(state): State<AppState>) -> GatewayResponse {
    GatewayResponse::preflight(&state.cors, COLLECTION_METHODS)
}

pub async fn item_preflight(State(state): State<AppState>) -> GatewayResponse {
    GatewayResponse::preflight(&state.cors, ITEM_METHODS)
}

pub async fn not_found(State(state): State<AppState>) -> GatewayResponse {
    message(&state, StatusCode::NOT_FOUND, "Route not found")
}

pub async fn method_not_allowed(State(state): State<AppState>, method: Method) -> GatewayResponse {
    message(
        &state,
        StatusCode::METHOD_NOT_ALLOWED,
        &format!("Method {} is not allowed on this route", method),
    )
}
