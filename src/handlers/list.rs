use http::StatusCode;

use super::{log_event, respond, HandlerKind};
use crate::{
    error::{AppError, Result},
    models::{GatewayRequest, GatewayResponse},
    AppState,
};

pub async fn list_products(state: &AppState, request: GatewayRequest) -> GatewayResponse {
    log_event(HandlerKind::List, &request);

    if request.is_preflight() {
        return GatewayResponse::preflight(&state.cors, HandlerKind::List.allowed_methods());
    }

    respond(&state.cors, list(state).await)
}

// Unpaginated: the whole table comes back in one scan.
async fn list(state: &AppState) -> Result<GatewayResponse> {
    let products = state
        .store
        .scan()
        .await
        .map_err(|e| AppError::internal("Error fetching the products", e))?;

    tracing::info!(count = products.len(), "Products listed");

    GatewayResponse::json(StatusCode::OK, &products)
}
