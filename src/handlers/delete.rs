use http::StatusCode;
use serde::Serialize;

use super::{log_event, respond, HandlerKind};
use crate::{
    error::{AppError, Result},
    models::{GatewayRequest, GatewayResponse, Product},
    store::StoreError,
    AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResponse {
    message: &'static str,
    deleted_product: Product,
}

pub async fn delete_product(state: &AppState, request: GatewayRequest) -> GatewayResponse {
    log_event(HandlerKind::Delete, &request);

    if request.is_preflight() {
        return GatewayResponse::preflight(&state.cors, HandlerKind::Delete.allowed_methods());
    }

    respond(&state.cors, delete(state, &request).await)
}

async fn delete(state: &AppState, request: &GatewayRequest) -> Result<GatewayResponse> {
    let id = request.require_path_id()?;

    let deleted_product = state
        .store
        .delete_existing(id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => AppError::internal("Error deleting the product", other),
        })?;

    tracing::info!(product_id = %deleted_product.id, "Product deleted");

    GatewayResponse::json(
        StatusCode::OK,
        &DeleteResponse {
            message: "Product deleted successfully",
            deleted_product,
        },
    )
}
