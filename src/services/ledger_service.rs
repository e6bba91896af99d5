// src/services/ledger_service.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    ledger::{self, DraftLine, LineEvaluation, ShortageReport},
    models::stock::{stock_table, StockRecord},
};

/// Resposta do preview: avaliação linha a linha + checagem agregada.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftPreview {
    pub lines: Vec<LineEvaluation>,
    pub shortages: Vec<ShortageReport>,
    pub admissible: bool,
}

/// Sem estado: o snapshot vem de quem chama (o formulário) e tudo é
/// recalculado a cada chamada.
#[derive(Clone, Default)]
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    pub fn preview(&self, stock: &[StockRecord], lines: &[DraftLine]) -> Result<DraftPreview, AppError> {
        let table = stock_table(stock)?;

        let evaluations = ledger::evaluate_lines(lines, &table)?;
        let shortages = ledger::validate_submission(lines, &table)?;

        Ok(DraftPreview {
            admissible: shortages.is_empty(),
            lines: evaluations,
            shortages,
        })
    }
}

/// Gate de gravação, rodado sobre o snapshot travado e antes de qualquer escrita.
///
/// Todo recurso citado precisa existir no snapshot (senão 404, mesmo com
/// quantidade zero). Depois vale a checagem agregada.
pub fn admit_batch(lines: &[DraftLine], snapshot: &[StockRecord], label: &str) -> Result<(), AppError> {
    let table = stock_table(snapshot)?;

    let unknown = lines
        .iter()
        .filter_map(DraftLine::resource)
        .find(|id| table.get(id).is_none());
    if let Some(id) = unknown {
        return Err(AppError::ResourceNotFound(format!("{label} {id}")));
    }

    ledger::check_submission(lines, &table)?;
    Ok(())
}
