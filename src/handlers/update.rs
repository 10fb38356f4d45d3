use http::StatusCode;

use super::{log_event, respond, HandlerKind};
use crate::{
    error::{AppError, Result},
    models::{GatewayRequest, GatewayResponse, ProductPatch},
    store::StoreError,
    AppState,
};

pub async fn update_product(state: &AppState, request: GatewayRequest) -> GatewayResponse {
    log_event(HandlerKind::Update, &request);

    if request.is_preflight() {
        return GatewayResponse::preflight(&state.cors, HandlerKind::Update.allowed_methods());
    }

    respond(&state.cors, update(state, &request).await)
}

async fn update(state: &AppState, request: &GatewayRequest) -> Result<GatewayResponse> {
    let id = request.require_path_id()?;
    let patch = ProductPatch::from_body(request.json_object()?)?;

    let product = state
        .store
        .update_existing(id, &patch)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => AppError::internal("Error updating the product", other),
        })?;

    tracing::info!(
        product_id = %product.id,
        fields = patch.assignments().len(),
        "Product updated"
    );

    GatewayResponse::json(StatusCode::OK, &product)
}
