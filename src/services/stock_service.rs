// src/services/stock_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::StockRepository,
    models::stock::{low_stock, StockRecord},
};

#[derive(Clone)]
pub struct StockService {
    stock_repo: StockRepository,
}

impl StockService {
    pub fn new(stock_repo: StockRepository) -> Self {
        Self { stock_repo }
    }

    pub async fn raw_materials(&self) -> Result<Vec<StockRecord>, AppError> {
        let rows = self.stock_repo.get_raw_materials().await?;
        Ok(rows.into_iter().map(StockRecord::from).collect())
    }

    pub async fn products(&self) -> Result<Vec<StockRecord>, AppError> {
        let rows = self.stock_repo.get_products().await?;
        Ok(rows.into_iter().map(StockRecord::from).collect())
    }

    // Matérias-primas e produtos juntos, filtrados pelo limite
    pub async fn low_stock(&self, threshold: Decimal) -> Result<Vec<StockRecord>, AppError> {
        let mut records = self.raw_materials().await?;
        records.extend(self.products().await?);

        let low = low_stock(records, threshold);
        if !low.is_empty() {
            tracing::debug!(count = low.len(), %threshold, "Itens com estoque baixo");
        }
        Ok(low)
    }
}
