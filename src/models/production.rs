// src/models/production.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{validate_not_negative, validate_positive};
use crate::ledger::{DraftLine, DraftPosition};

// --- RASCUNHOS (entrada do formulário) ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialUsage {
    pub material_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "12.5")]
    pub quantity: Decimal,
}

/// Um lote de produção ainda não gravado ("Product #1", "Product #2"...).
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionDraft {
    pub product_id: Uuid,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "50")]
    pub quantity: Decimal,

    #[validate(length(min = 1, message = "At least one material is required."), nested)]
    pub materials: Vec<MaterialUsage>,

    // Se não vier, usamos a data de hoje.
    pub date: Option<NaiveDate>,
}

/// Achata os rascunhos em linhas do ledger: rascunho = grupo, material = linha.
pub fn production_lines(drafts: &[ProductionDraft]) -> Vec<DraftLine> {
    drafts
        .iter()
        .enumerate()
        .flat_map(|(group, draft)| {
            draft.materials.iter().enumerate().map(move |(line, usage)| {
                DraftLine::new(
                    DraftPosition::new(group as u32, line as u32),
                    usage.material_id.to_string(),
                    usage.quantity,
                )
            })
        })
        .collect()
}

// --- REGISTROS (o que foi gravado) ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionMaterial {
    pub id: Uuid,
    pub production_id: Uuid,
    pub raw_material_id: Uuid,
    pub quantity: Decimal,
    // Custo unitário no momento da produção (para o relatório de lucro)
    pub unit_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub production_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<ProductionMaterial>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(id: u128, qty: i64) -> MaterialUsage {
        MaterialUsage { material_id: Uuid::from_u128(id), quantity: Decimal::from(qty) }
    }

    fn draft(materials: Vec<MaterialUsage>) -> ProductionDraft {
        ProductionDraft {
            product_id: Uuid::from_u128(99),
            quantity: Decimal::from(10),
            materials,
            date: None,
        }
    }

    #[test]
    fn test_production_lines_positions() {
        let drafts = vec![draft(vec![usage(1, 60), usage(2, 5)]), draft(vec![usage(1, 50)])];
        let lines = production_lines(&drafts);

        let summary: Vec<_> = lines
            .iter()
            .map(|l| (l.group_index, l.line_index, l.resource().unwrap().to_string(), l.amount()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, 0, Uuid::from_u128(1).to_string(), Decimal::from(60)),
                (0, 1, Uuid::from_u128(2).to_string(), Decimal::from(5)),
                (1, 0, Uuid::from_u128(1).to_string(), Decimal::from(50)),
            ]
        );
    }

    #[test]
    fn test_draft_validation() {
        assert!(draft(vec![usage(1, 1)]).validate().is_ok());
        assert!(draft(vec![]).validate().is_err());
        assert!(draft(vec![usage(1, -1)]).validate().is_err());

        let mut zero = draft(vec![usage(1, 1)]);
        zero.quantity = Decimal::ZERO;
        assert!(zero.validate().is_err());
    }
}
