use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::{NewProduct, Product},
    AppState,
};

fn not_found(id: u64) -> AppError {
    AppError::NotFound(format!("Product {} not found", id))
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    let products = state.store.list().await;
    info!(count = products.len(), "Listed products");
    Json(products)
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    payload.validate().map_err(AppError::BadRequest)?;

    let product = state.store.create(payload).await?;
    info!(id = product.id, name = %product.name, "Created product");

    Ok((StatusCode::CREATED, Json(product)))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Product>> {
    let product = state.store.get(id).await.ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<NewProduct>,
) -> AppResult<Json<Product>> {
    payload.validate().map_err(AppError::BadRequest)?;

    let product = state
        .store
        .update(id, payload)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(id, "Updated product");

    Ok(Json(product))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<serde_json::Value>> {
    state
        .store
        .delete(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(id, "Deleted product");

    Ok(Json(serde_json::json!({
        "message": "Product deleted",
        "id": id,
    })))
}
