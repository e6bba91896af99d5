// src/handlers/production.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::production::{Production, ProductionDraft},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordProductionPayload {
    #[validate(length(min = 1, message = "At least one production draft is required."), nested)]
    pub drafts: Vec<ProductionDraft>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    /// Quantos registros (padrão 20, máximo 100)
    pub limit: Option<i64>,
}

impl RecentQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

// POST /api/production/batches
#[utoipa::path(
    post,
    path = "/api/production/batches",
    tag = "Production",
    request_body = RecordProductionPayload,
    responses(
        (status = 201, description = "Produções gravadas, estoque ajustado", body = Vec<Production>),
        (status = 400, description = "Payload inválido"),
        (status = 404, description = "Produto não encontrado"),
        (status = 422, description = "Matéria-prima insuficiente para o envio inteiro")
    )
)]
pub async fn record_batch(
    State(app_state): State<AppState>,
    Json(payload): Json<RecordProductionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let recorded = app_state
        .production_service
        .record_batch(&app_state.db_pool, &payload.drafts)
        .await?;

    Ok((StatusCode::CREATED, Json(recorded)))
}

// GET /api/production/batches
#[utoipa::path(
    get,
    path = "/api/production/batches",
    tag = "Production",
    params(RecentQuery),
    responses(
        (status = 200, description = "Produções mais recentes", body = Vec<Production>)
    )
)]
pub async fn list_recent(
    State(app_state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let productions = app_state.production_service.get_recent(query.limit()).await?;
    Ok((StatusCode::OK, Json(productions)))
}
