pub mod faucet_controller;

#[cfg(test)]
mod faucet_controller_tests;

use axum::routing::{get, Router};

/// System health check
///
/// Returns a plain status string while the server is up
#[utoipa::path(
    get,
    path = "/api/v1/",
    responses(
        (status = 200, description = "Server is running", body = String)
    ),
    tag = "system"
)]
pub async fn health() -> &'static str {
    "Server is running! 🚀"
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(health))
        .merge(faucet_controller::FaucetController::app())
}
