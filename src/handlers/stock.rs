// src/handlers/stock.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{common::error::AppError, config::AppState, models::stock::StockRecord};

const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LowStockQuery {
    /// Quantidade máxima para entrar no card (padrão 10)
    #[param(value_type = Option<f64>)]
    pub threshold: Option<Decimal>,
}

// GET /api/stock/raw-materials
#[utoipa::path(
    get,
    path = "/api/stock/raw-materials",
    tag = "Stock",
    responses(
        (status = 200, description = "Saldo atual das matérias-primas", body = Vec<StockRecord>)
    )
)]
pub async fn list_raw_materials(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state.stock_service.raw_materials().await?;
    Ok((StatusCode::OK, Json(records)))
}

// GET /api/stock/products
#[utoipa::path(
    get,
    path = "/api/stock/products",
    tag = "Stock",
    responses(
        (status = 200, description = "Saldo atual dos produtos acabados", body = Vec<StockRecord>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state.stock_service.products().await?;
    Ok((StatusCode::OK, Json(records)))
}

// GET /api/stock/low
#[utoipa::path(
    get,
    path = "/api/stock/low",
    tag = "Stock",
    params(LowStockQuery),
    responses(
        (status = 200, description = "Itens no limite ou abaixo dele, do menor saldo para o maior", body = Vec<StockRecord>)
    )
)]
pub async fn list_low_stock(
    State(app_state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> Result<impl IntoResponse, AppError> {
    let threshold = query
        .threshold
        .unwrap_or_else(|| Decimal::from(DEFAULT_LOW_STOCK_THRESHOLD));

    let records = app_state.stock_service.low_stock(threshold).await?;
    Ok((StatusCode::OK, Json(records)))
}
