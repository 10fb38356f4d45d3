//! Runs one product handler as a Lambda function behind API Gateway.
//!
//! `PRODUCT_HANDLER` selects the operation: create, get, list, update or delete.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use products_api::{app, config::AppConfig, handlers::HandlerKind, models::GatewayResponse};
use serde_json::Value;
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let kind: HandlerKind = std::env::var("PRODUCT_HANDLER")
        .map_err(|_| Error::from("PRODUCT_HANDLER not set"))?
        .parse()?;
    let config = AppConfig::from_env()?;
    let state = app::build_state(&config).await?;

    tracing::info!(handler = %kind, "Product handler ready");

    run(service_fn(|event: LambdaEvent<Value>| {
        let state = state.clone();
        async move { Ok::<GatewayResponse, Error>(kind.invoke_event(&state, event.payload).await) }
    }))
    .await
}
