use chrono::Utc;
use http::StatusCode;

use super::{log_event, respond, HandlerKind};
use crate::{
    error::{AppError, Result},
    models::{GatewayRequest, GatewayResponse, NewProduct},
    store::StoreError,
    AppState,
};

pub async fn create_product(state: &AppState, request: GatewayRequest) -> GatewayResponse {
    log_event(HandlerKind::Create, &request);

    if request.is_preflight() {
        return GatewayResponse::preflight(&state.cors, HandlerKind::Create.allowed_methods());
    }

    respond(&state.cors, create(state, &request).await)
}

async fn create(state: &AppState, request: &GatewayRequest) -> Result<GatewayResponse> {
    let body = request.json_object()?;
    let product = NewProduct::from_body(body)?.into_product(Utc::now());

    state
        .store
        .put_new(&product)
        .await
        .map_err(|e| match e {
            StoreError::Conflict => {
                AppError::Conflict("A product with that ID already exists".to_string())
            }
            other => AppError::internal("Error creating the product", other),
        })?;

    tracing::info!(product_id = %product.id, "Product created");

    GatewayResponse::json(StatusCode::CREATED, &product)
}
