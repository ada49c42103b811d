pub mod products;

use axum::{http::StatusCode, Json};
use serde_json::json;

pub async fn root() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "message": "Bienvenue sur l'API",
            "documentation": "/docs",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "message": "L'API fonctionne" })),
    )
}
