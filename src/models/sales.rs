// src/models/sales.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_not_negative;
use crate::ledger::{DraftLine, DraftPosition, QuantityOverflow};

// --- RASCUNHOS ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDraft {
    pub product_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "3")]
    pub quantity: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "4.50")]
    pub price: Decimal,
}

impl SaleItemDraft {
    /// `None` se o produto quantidade × preço estourar o `Decimal`.
    pub fn total(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.price)
    }
}

/// Um pedido de venda ainda não gravado.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    pub customer_id: Uuid,

    #[validate(length(min = 1, message = "At least one item is required."), nested)]
    pub items: Vec<SaleItemDraft>,

    pub note: Option<String>,

    pub date: Option<NaiveDate>,
}

impl SaleDraft {
    pub fn total_amount(&self) -> Result<Decimal, QuantityOverflow> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.total()?))
            .ok_or_else(|| QuantityOverflow(format!("order of customer {}", self.customer_id)))
    }
}

/// Pedido = grupo, item = linha. O recurso consumido é o produto.
pub fn sale_lines(drafts: &[SaleDraft]) -> Vec<DraftLine> {
    drafts
        .iter()
        .enumerate()
        .flat_map(|(group, draft)| {
            draft.items.iter().enumerate().map(move |(line, item)| {
                DraftLine::new(
                    DraftPosition::new(group as u32, line as u32),
                    item.product_id.to_string(),
                    item.quantity,
                )
            })
        })
        .collect()
}

// --- REGISTROS ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub total_amount: Decimal,
    pub note: Option<String>,
    pub sale_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<SaleItem>,
}
