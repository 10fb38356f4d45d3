mod app_config;
mod dynamo_config;

pub use app_config::{
    AppConfig, CorsConfig, ServerConfig, StaticCredentials, StoreBackend, StoreConfig,
    DEFAULT_ALLOWED_HEADERS,
};
pub use dynamo_config::*;
