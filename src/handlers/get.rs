use http::StatusCode;

use super::{log_event, respond, HandlerKind};
use crate::{
    error::{AppError, Result},
    models::{GatewayRequest, GatewayResponse},
    AppState,
};

pub async fn get_product(state: &AppState, request: GatewayRequest) -> GatewayResponse {
    log_event(HandlerKind::Get, &request);

    if request.is_preflight() {
        return GatewayResponse::preflight(&state.cors, HandlerKind::Get.allowed_methods());
    }

    respond(&state.cors, get(state, &request).await)
}

async fn get(state: &AppState, request: &GatewayRequest) -> Result<GatewayResponse> {
    let id = request.require_path_id()?;

    let product = state
        .store
        .get(id)
        .await
        .map_err(|e| AppError::internal("Error fetching the product", e))?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    GatewayResponse::json(StatusCode::OK, &product)
}
