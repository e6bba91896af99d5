// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::reports::{MonthlyProfitEntry, MonthlySummary, ProfitSummary, TopProductEntry},
};

const TOP_PRODUCTS: i64 = 5;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YearQuery {
    /// Padrão: ano corrente
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    pub year: Option<i32>,
    /// 1..12 (padrão: mês corrente)
    pub month: Option<u32>,
}

// GET /api/reports/profit-summary
#[utoipa::path(
    get,
    path = "/api/reports/profit-summary",
    tag = "Reports",
    responses(
        (status = 200, description = "Receita, custo e lucro: todos os tempos, ano e mês", body = ProfitSummary)
    )
)]
pub async fn profit_summary(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();

    let summary = app_state
        .report_service
        .profit_summary(&app_state.db_pool, today)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/reports/monthly-profit
#[utoipa::path(
    get,
    path = "/api/reports/monthly-profit",
    tag = "Reports",
    params(YearQuery),
    responses(
        (status = 200, description = "12 meses do ano, meses sem movimento zerados", body = Vec<MonthlyProfitEntry>)
    )
)]
pub async fn monthly_profit(
    State(app_state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse, AppError> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let entries = app_state
        .report_service
        .monthly_profit(&app_state.db_pool, year)
        .await?;

    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/reports/monthly-summary
#[utoipa::path(
    get,
    path = "/api/reports/monthly-summary",
    tag = "Reports",
    params(MonthQuery),
    responses(
        (status = 200, description = "Mês pedido vs. mês anterior", body = MonthlySummary),
        (status = 400, description = "Mês inválido")
    )
)]
pub async fn monthly_summary(
    State(app_state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    if !(1..=12).contains(&month) {
        return Err(AppError::InvalidPeriod(format!("month {month} is out of range (1-12)")));
    }

    let summary = app_state
        .report_service
        .monthly_summary(&app_state.db_pool, year, month)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/reports/top-products
#[utoipa::path(
    get,
    path = "/api/reports/top-products",
    tag = "Reports",
    responses(
        (status = 200, description = "Top 5 produtos por receita, com a fatia de cada um", body = Vec<TopProductEntry>)
    )
)]
pub async fn top_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.report_service.top_products(TOP_PRODUCTS).await?;
    Ok((StatusCode::OK, Json(entries)))
}
