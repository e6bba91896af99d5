// src/handlers/ledger.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    ledger::DraftLine,
    models::stock::StockRecord,
    services::ledger_service::DraftPreview,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPayload {
    /// Snapshot que o formulário carregou
    #[serde(default)]
    pub stock: Vec<StockRecord>,

    /// Todas as linhas de todos os rascunhos abertos
    #[serde(default)]
    pub lines: Vec<DraftLine>,
}

// POST /api/ledger/preview
// Não toca no banco: o cliente manda o snapshot e as linhas.
#[utoipa::path(
    post,
    path = "/api/ledger/preview",
    tag = "Ledger",
    request_body = PreviewPayload,
    responses(
        (status = 200, description = "Avaliação por linha e faltas agregadas", body = DraftPreview),
        (status = 400, description = "Snapshot inválido (id vazio, duplicado ou saldo negativo)")
    )
)]
pub async fn preview(
    State(app_state): State<AppState>,
    Json(payload): Json<PreviewPayload>,
) -> Result<impl IntoResponse, AppError> {
    let preview = app_state
        .ledger_service
        .preview(&payload.stock, &payload.lines)?;

    Ok((StatusCode::OK, Json(preview)))
}
