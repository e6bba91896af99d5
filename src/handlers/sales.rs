// src/handlers/sales.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::production::RecentQuery,
    models::sales::{Sale, SaleDraft},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordSalesPayload {
    #[validate(length(min = 1, message = "At least one sale draft is required."), nested)]
    pub drafts: Vec<SaleDraft>,
}

// POST /api/sales/batches
#[utoipa::path(
    post,
    path = "/api/sales/batches",
    tag = "Sales",
    request_body = RecordSalesPayload,
    responses(
        (status = 201, description = "Vendas gravadas, estoque baixado", body = Vec<Sale>),
        (status = 400, description = "Payload inválido"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 422, description = "Produto insuficiente para o envio inteiro")
    )
)]
pub async fn record_batch(
    State(app_state): State<AppState>,
    Json(payload): Json<RecordSalesPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let recorded = app_state
        .sales_service
        .record_batch(&app_state.db_pool, &payload.drafts)
        .await?;

    Ok((StatusCode::CREATED, Json(recorded)))
}

// GET /api/sales/batches
#[utoipa::path(
    get,
    path = "/api/sales/batches",
    tag = "Sales",
    params(RecentQuery),
    responses(
        (status = 200, description = "Vendas mais recentes", body = Vec<Sale>)
    )
)]
pub async fn list_recent(
    State(app_state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sales_service.get_recent(query.limit()).await?;
    Ok((StatusCode::OK, Json(sales)))
}
