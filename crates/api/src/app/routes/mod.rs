use axum::{routing::get, Router};

pub mod suppliers;
pub mod system;
pub mod validation;

/// Router for the public supplier endpoints.
pub fn router() -> Router {
    Router::new()
        .route(
            "/suppliers",
            get(suppliers::list_suppliers).post(suppliers::register_supplier),
        )
        .route(
            "/validate",
            get(validation::validate_link).post(validation::validate_code),
        )
}
