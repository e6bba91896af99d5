// src/services/sales_service.rs

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{SalesRepository, StockRepository},
    models::{
        sales::{sale_lines, Sale, SaleDraft},
        stock::StockRecord,
    },
    services::ledger_service::admit_batch,
};

#[derive(Clone)]
pub struct SalesService {
    repo: SalesRepository,
    stock_repo: StockRepository,
}

impl SalesService {
    pub fn new(repo: SalesRepository, stock_repo: StockRepository) -> Self {
        Self { repo, stock_repo }
    }

    pub async fn get_recent(&self, limit: i64) -> Result<Vec<Sale>, AppError> {
        self.repo.get_recent(limit).await
    }

    // --- RECORD BATCH (VENDA / SAÍDA) ---
    pub async fn record_batch(&self, pool: &PgPool, drafts: &[SaleDraft]) -> Result<Vec<Sale>, AppError> {
        let today = Utc::now().date_naive();
        let lines = sale_lines(drafts);

        let mut tx = pool.begin().await?;

        // 1. Valida saldo total dos produtos (com trava)
        let products = self.stock_repo.lock_products(&mut *tx).await?;
        let records: Vec<StockRecord> = products.into_iter().map(StockRecord::from).collect();

        admit_batch(&lines, &records, "Product")?;

        // 2. Um pedido por rascunho
        let mut recorded = Vec::with_capacity(drafts.len());

        for draft in drafts {
            if !self.repo.customer_exists(&mut *tx, draft.customer_id).await? {
                return Err(AppError::ResourceNotFound(format!("Customer {}", draft.customer_id)));
            }

            let mut sale = self.repo
                .create_sale(
                    &mut *tx,
                    draft.customer_id,
                    draft.total_amount()?,
                    draft.note.as_deref().map(str::trim).filter(|n| !n.is_empty()),
                    draft.date.unwrap_or(today),
                )
                .await?;

            for item in &draft.items {
                let saved = self.repo
                    .add_item(&mut *tx, sale.id, item.product_id, item.quantity, item.price)
                    .await?;

                // Baixa do produto
                self.stock_repo
                    .adjust_product(&mut *tx, item.product_id, -item.quantity)
                    .await?;

                sale.items.push(saved);
            }

            recorded.push(sale);
        }

        tx.commit().await?;

        tracing::info!(drafts = recorded.len(), lines = lines.len(), "✅ Vendas registradas");
        Ok(recorded)
    }
}
