//! Gateway-event handlers, one per product operation.

mod create;
mod delete;
mod get;
mod list;
mod update;

use std::{fmt, str::FromStr};

use serde_json::Value;

pub use create::create_product;
pub use delete::delete_product;
pub use get::get_product;
pub use list::list_products;
pub use update::update_product;

use crate::{
    config::CorsConfig,
    error::{AppError, Result},
    models::{GatewayRequest, GatewayResponse},
    AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Create,
    Get,
    List,
    Update,
    Delete,
}

impl HandlerKind {
    pub fn allowed_methods(self) -> &'static str {
        match self {
            HandlerKind::Create => "POST,OPTIONS",
            HandlerKind::Get | HandlerKind::List => "GET,OPTIONS",
            HandlerKind::Update => "PUT,PATCH,OPTIONS",
            HandlerKind::Delete => "DELETE,OPTIONS",
        }
    }

    pub async fn invoke(self, state: &AppState, request: GatewayRequest) -> GatewayResponse {
        match self {
            HandlerKind::Create => create_product(state, request).await,
            HandlerKind::Get => get_product(state, request).await,
            HandlerKind::List => list_products(state, request).await,
            HandlerKind::Update => update_product(state, request).await,
            HandlerKind::Delete => delete_product(state, request).await,
        }
    }

    /// Runs the handler on an undecoded gateway payload.
    pub async fn invoke_event(self, state: &AppState, event: Value) -> GatewayResponse {
        match GatewayRequest::from_event(event) {
            Ok(request) => self.invoke(state, request).await,
            Err(err) => {
                tracing::warn!(handler = %self, "Rejected malformed event: {}", err);
                respond(&state.cors, Err(err))
            }
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandlerKind::Create => "create",
            HandlerKind::Get => "get",
            HandlerKind::List => "list",
            HandlerKind::Update => "update",
            HandlerKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

impl FromStr for HandlerKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(HandlerKind::Create),
            "get" => Ok(HandlerKind::Get),
            "list" => Ok(HandlerKind::List),
            "update" => Ok(HandlerKind::Update),
            "delete" => Ok(HandlerKind::Delete),
            other => Err(AppError::ConfigError(format!("Unknown handler: {}", other))),
        }
    }
}

fn log_event(kind: HandlerKind, request: &GatewayRequest) {
    tracing::info!(
        handler = %kind,
        method = %request.http_method,
        id = request.path_id().unwrap_or("-"),
        "Event received"
    );
}

fn respond(cors: &CorsConfig, result: Result<GatewayResponse>) -> GatewayResponse {
    result.unwrap_or_else(GatewayResponse::from).with_cors(cors)
}
