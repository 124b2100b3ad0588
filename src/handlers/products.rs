use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{json_body, parse_id, AppState};
use crate::error::AppError;
use crate::models::marketplace::MarketplaceItem;
use crate::storage::ProductFilter;

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
}

/// Handle GET /api/products, searching when `q` is present
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<MarketplaceItem>> {
    let products = match query.q.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => state.storage.search_products(term),
        _ => state.storage.list_products(),
    };
    Json(products)
}

/// Handle POST /api/products/filter
pub async fn filter_products(
    State(state): State<AppState>,
    payload: Result<Json<ProductFilter>, JsonRejection>,
) -> Result<Json<Vec<MarketplaceItem>>, AppError> {
    let filter = json_body(payload)?;
    Ok(Json(state.storage.filter_products(&filter)))
}

/// Handle GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MarketplaceItem>, AppError> {
    let id = parse_id(&id, "product")?;
    state
        .storage
        .get_product(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}
