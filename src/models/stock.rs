// src/models/stock.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::ledger::{ResourceStock, SnapshotError, StockTable};

// --- 1. Matéria-prima (saldo + tipo) ---
// Linha de raw_materials já "populada" com o tipo (nome, unidade, custo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialStock {
    #[serde(alias = "_id")]
    pub id: Uuid,
    #[schema(example = "Flour")]
    pub name: String,
    #[schema(example = "100.0")]
    pub quantity: Decimal,
    #[schema(example = "kg")]
    pub unit: String,
    #[serde(default)]
    pub unit_cost: Decimal,
}

// --- 2. Produto acabado (saldo + tipo) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductStock {
    #[serde(alias = "_id")]
    pub id: Uuid,
    #[schema(example = "Bread")]
    pub name: String,
    #[schema(example = "50")]
    pub quantity: Decimal,
    #[schema(example = "un")]
    pub unit: String,
    #[serde(default)]
    pub unit_price: Decimal,
}

// --- 3. Registro com tag ---
// No JSON: { "kind": "rawMaterial", "id": ..., ... }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StockRecord {
    RawMaterial(RawMaterialStock),
    Product(ProductStock),
}

impl StockRecord {
    pub fn quantity(&self) -> Decimal {
        match self {
            StockRecord::RawMaterial(m) => m.quantity,
            StockRecord::Product(p) => p.quantity,
        }
    }

    /// Projeção comum que o ledger entende.
    pub fn to_resource_stock(&self) -> ResourceStock {
        let (id, name, quantity, unit) = match self {
            StockRecord::RawMaterial(m) => (m.id, &m.name, m.quantity, &m.unit),
            StockRecord::Product(p) => (p.id, &p.name, p.quantity, &p.unit),
        };
        ResourceStock {
            resource_id: id.to_string(),
            available_quantity: quantity,
            unit: unit.clone(),
            name: Some(name.clone()),
        }
    }
}

impl From<RawMaterialStock> for StockRecord {
    fn from(value: RawMaterialStock) -> Self {
        StockRecord::RawMaterial(value)
    }
}

impl From<ProductStock> for StockRecord {
    fn from(value: ProductStock) -> Self {
        StockRecord::Product(value)
    }
}

/// Fronteira de ingestão: registros do backend -> tabela do ledger.
pub fn stock_table<'a, I>(records: I) -> Result<StockTable, SnapshotError>
where
    I: IntoIterator<Item = &'a StockRecord>,
{
    StockTable::from_stocks(records.into_iter().map(StockRecord::to_resource_stock))
}

/// Card de "estoque baixo" do dashboard: quantidade <= limite, do menor para o maior.
pub fn low_stock(records: Vec<StockRecord>, threshold: Decimal) -> Vec<StockRecord> {
    let mut low: Vec<StockRecord> = records
        .into_iter()
        .filter(|r| r.quantity() <= threshold)
        .collect();
    low.sort_by(|a, b| a.quantity().cmp(&b.quantity()));
    low
}
