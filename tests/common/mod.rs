#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use products_api::{
    config::CorsConfig,
    models::{GatewayRequest, GatewayResponse, Product, ProductPatch},
    store::{ItemStore, MemoryStore, StoreError, StoreResult},
    AppState,
};
use serde_json::Value;

pub fn memory_state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()), CorsConfig::default())
}

pub fn failing_state() -> AppState {
    AppState::new(Arc::new(FailingStore), CorsConfig::default())
}

pub fn event(method: &str, id: Option<&str>, body: Option<Value>) -> GatewayRequest {
    let mut raw = serde_json::json!({ "httpMethod": method });
    if let Some(id) = id {
        raw["pathParameters"] = serde_json::json!({ "id": id });
    }
    if let Some(body) = body {
        raw["body"] = Value::String(body.to_string());
    }
    serde_json::from_value(raw).unwrap()
}

pub fn raw_event(method: &str, id: Option<&str>, body: &str) -> GatewayRequest {
    let mut request = event(method, id, None);
    request.body = Some(Value::from(body));
    request
}

pub fn body(response: &GatewayResponse) -> Value {
    response.json_body().unwrap()
}

/// Store whose every call fails like an unreachable table.
pub struct FailingStore;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Other("service unavailable: retries exhausted".to_string()))
}

#[async_trait]
impl ItemStore for FailingStore {
    async fn put_new(&self, _product: &Product) -> StoreResult<()> {
        unavailable()
    }

    async fn get(&self, _id: &str) -> StoreResult<Option<Product>> {
        unavailable()
    }

    async fn scan(&self) -> StoreResult<Vec<Product>> {
        unavailable()
    }

    async fn update_existing(&self, _id: &str, _patch: &ProductPatch) -> StoreResult<Product> {
        unavailable()
    }

    async fn delete_existing(&self, _id: &str) -> StoreResult<Product> {
        unavailable()
    }

    async fn check_health(&self) -> StoreResult<()> {
        unavailable()
    }
}
