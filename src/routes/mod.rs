mod health;
mod products;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/products",
            post(products::create_product)
                .get(products::list_products)
                .options(products::collection_preflight),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .patch(products::update_product)
                .delete(products::delete_product)
                .options(products::item_preflight),
        )
        .method_not_allowed_fallback(products::method_not_allowed)
        .fallback(products::not_found)
}
