// src/services/production_service.rs

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductionRepository, StockRepository},
    models::{
        production::{production_lines, Production, ProductionDraft},
        stock::StockRecord,
    },
    services::ledger_service::admit_batch,
};

#[derive(Clone)]
pub struct ProductionService {
    repo: ProductionRepository,
    stock_repo: StockRepository,
}

impl ProductionService {
    pub fn new(repo: ProductionRepository, stock_repo: StockRepository) -> Self {
        Self { repo, stock_repo }
    }

    pub async fn get_recent(&self, limit: i64) -> Result<Vec<Production>, AppError> {
        self.repo.get_recent(limit).await
    }

    // --- RECORD BATCH ---
    // Um envio do formulário = vários rascunhos. Ou grava tudo, ou nada.
    pub async fn record_batch(
        &self,
        pool: &PgPool,
        drafts: &[ProductionDraft],
    ) -> Result<Vec<Production>, AppError> {
        let today = Utc::now().date_naive();
        let lines = production_lines(drafts);

        let mut tx = pool.begin().await?;

        // 1. Snapshot travado das matérias-primas (a checagem que vale)
        let materials = self.stock_repo.lock_raw_materials(&mut *tx).await?;
        let unit_costs: HashMap<Uuid, Decimal> =
            materials.iter().map(|m| (m.id, m.unit_cost)).collect();

        let records: Vec<StockRecord> = materials.into_iter().map(StockRecord::from).collect();

        // 2. Gate: material desconhecido (404) ou falta (422). O tx cai no drop (rollback).
        admit_batch(&lines, &records, "Raw material")?;

        // 3. Grava um registro por rascunho
        let mut recorded = Vec::with_capacity(drafts.len());

        for draft in drafts {
            if !self.stock_repo.product_exists(&mut *tx, draft.product_id).await? {
                return Err(AppError::ResourceNotFound(format!("Product {}", draft.product_id)));
            }

            let mut production = self.repo
                .create_production(&mut *tx, draft.product_id, draft.quantity, draft.date.unwrap_or(today))
                .await?;

            for usage in &draft.materials {
                let unit_cost = unit_costs.get(&usage.material_id).copied().unwrap_or_default();

                let material = self.repo
                    .add_material(&mut *tx, production.id, usage.material_id, usage.quantity, unit_cost)
                    .await?;

                // Baixa da matéria-prima
                self.stock_repo
                    .adjust_raw_material(&mut *tx, usage.material_id, -usage.quantity)
                    .await?;

                production.materials.push(material);
            }

            // Entrada do produto acabado
            self.stock_repo
                .adjust_product(&mut *tx, draft.product_id, draft.quantity)
                .await?;

            recorded.push(production);
        }

        tx.commit().await?;

        tracing::info!(drafts = recorded.len(), lines = lines.len(), "✅ Produção registrada");
        Ok(recorded)
    }
}
