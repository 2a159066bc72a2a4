//! 产品处理器

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};

use super::{
    model::Product,
    service::{ListParams, ProductService},
    validation::{ProductId, ValidatedProduct},
};
use crate::core::{
    error::CoreError,
    response::{HealthResponse, PageResponse},
};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

pub async fn welcome() -> &'static str {
    "Welcome to the Product API! Go to /api/products to see all products."
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, CoreError> {
    let products = state.product_service.product_count()?;
    Ok(Json(HealthResponse::ok(products)))
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<PageResponse<Product>>, CoreError> {
    let page = state.product_service.list_products(&ListParams::from(query))?;
    Ok(Json(page))
}

pub async fn get_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<Json<Product>, CoreError> {
    let product = state.product_service.get_product(&id)?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    ValidatedProduct(draft): ValidatedProduct,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let product = state.product_service.create_product(draft)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    ValidatedProduct(draft): ValidatedProduct,
) -> Result<Json<Product>, CoreError> {
    let product = state.product_service.update_product(&id, draft)?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<StatusCode, CoreError> {
    state.product_service.delete_product(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
