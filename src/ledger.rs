// src/ledger.rs

//! Ledger de consumo dos rascunhos (drafts).
//!
//! Um formulário de produção ou de venda pode ter vários rascunhos ao mesmo
//! tempo ("Produto #1", "Produto #2"...), cada um com várias linhas. Cada
//! linha consome uma quantidade de um recurso (matéria-prima ou produto).
//! Aqui respondemos duas perguntas, sempre recalculando do zero:
//!
//! * quanto resta de um recurso para a linha que está sendo editada,
//!   considerando todas as linhas anteriores do mesmo envio (preview);
//! * se o envio inteiro cabe no estoque conhecido (gate).
//!
//! O preview é só informativo. Quem bloqueia o envio é o gate agregado.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

// ---
// Snapshot de estoque
// ---

/// Quanto existe de um recurso antes de aplicar os rascunhos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStock {
    pub resource_id: String,
    pub available_quantity: Decimal,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Stock entry without an id")]
    BlankResourceId,

    #[error("Resource '{0}' appears more than once in the stock snapshot")]
    DuplicateResource(String),

    #[error("Resource '{0}' has a negative available quantity")]
    NegativeQuantity(String),
}

/// Tabela imutável `resourceId -> ResourceStock` usada durante uma sessão do formulário.
#[derive(Debug, Clone, Default)]
pub struct StockTable {
    entries: HashMap<String, ResourceStock>,
}

impl StockTable {
    /// Monta a tabela validando a fronteira: ids vazios, duplicados ou
    /// quantidades negativas não entram.
    pub fn from_stocks<I>(stocks: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = ResourceStock>,
    {
        let mut entries = HashMap::new();

        for mut stock in stocks {
            let id = stock.resource_id.trim().to_string();
            if id.is_empty() {
                return Err(SnapshotError::BlankResourceId);
            }
            if stock.available_quantity < Decimal::ZERO {
                return Err(SnapshotError::NegativeQuantity(id));
            }
            if entries.contains_key(&id) {
                return Err(SnapshotError::DuplicateResource(id));
            }
            stock.resource_id = id.clone();
            entries.insert(id, stock);
        }

        Ok(Self { entries })
    }

    pub fn get(&self, resource_id: &str) -> Option<&ResourceStock> {
        self.entries.get(resource_id)
    }

    /// Recurso desconhecido não pode ser reservado: vale 0.
    pub fn available(&self, resource_id: &str) -> Decimal {
        self.get(resource_id)
            .map(|s| s.available_quantity)
            .unwrap_or(Decimal::ZERO)
    }
}

// ---
// Linhas dos rascunhos
// ---

/// Posição de uma linha no envio. A ordem é lexicográfica (rascunho, linha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftPosition {
    pub group_index: u32,
    pub line_index: u32,
}

impl DraftPosition {
    pub fn new(group_index: u32, line_index: u32) -> Self {
        Self { group_index, line_index }
    }
}

/// Uma linha (recurso, quantidade) dentro de um rascunho.
///
/// Enquanto o usuário digita, o recurso pode estar vazio e a quantidade pode
/// não ser numérica. Os dois casos contam como zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    pub group_index: u32,
    pub line_index: u32,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    #[schema(value_type = Option<f64>)]
    pub quantity: Option<Decimal>,
}

impl DraftLine {
    pub fn new(position: DraftPosition, resource_id: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            group_index: position.group_index,
            line_index: position.line_index,
            resource_id: Some(resource_id.into()),
            quantity: Some(quantity),
        }
    }

    pub fn position(&self) -> DraftPosition {
        DraftPosition::new(self.group_index, self.line_index)
    }

    /// O recurso selecionado, ou `None` se a linha ainda está em branco.
    pub fn resource(&self) -> Option<&str> {
        self.resource_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn amount(&self) -> Decimal {
        self.quantity.unwrap_or(Decimal::ZERO)
    }

    fn consumes(&self, resource_id: &str) -> bool {
        self.resource() == Some(resource_id)
    }
}

// Aceita número, string numérica, string vazia ou lixo. Só o que for
// número vira Some; o resto fica None (conta como zero).
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| parse_quantity(&value)))
}

pub(crate) fn parse_quantity(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => decimal_from_text(&n.to_string()),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            decimal_from_text(trimmed)
        }
        _ => None,
    }
}

// Número fora da faixa do Decimal satura em MAX/MIN (a linha fica em falta),
// nunca vira zero. Magnitudes abaixo de 1 que não cabem na escala viram 0.
fn decimal_from_text(text: &str) -> Option<Decimal> {
    if let Ok(value) = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) {
        return Some(value);
    }

    let float = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
    let saturated = if float.abs() < 1.0 {
        Decimal::ZERO
    } else if float.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    };
    Some(saturated)
}

// ---
// Resultados
// ---

/// Preview de uma linha. Não bloqueia nada, só pinta o campo de vermelho.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineEvaluation {
    pub group_index: u32,
    pub line_index: u32,
    pub resource_id: String,
    pub available_before_this_line: Decimal,
    pub after_use: Decimal,
    pub insufficient: bool,
    /// Quanto falta ("Insufficient! Need X more"). Zero quando há saldo.
    pub shortfall: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShortageReport {
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub total_requested: Decimal,
    pub available: Decimal,
    pub shortage: Decimal,
    pub unit: String,
}

impl ShortageReport {
    /// Texto mostrado ao usuário, ex.: "Flour: requested 110 kg, available 100 kg, short by 10 kg".
    pub fn describe(&self) -> String {
        let label = self.name.as_deref().unwrap_or(&self.resource_id);
        let unit = if self.unit.is_empty() {
            String::new()
        } else {
            format!(" {}", self.unit)
        };
        format!(
            "{label}: requested {}{unit}, available {}{unit}, short by {}{unit}",
            self.total_requested.normalize(),
            self.available.normalize(),
            self.shortage.normalize(),
        )
    }
}

/// Falta de estoque no envio. Sempre recuperado localmente.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Insufficient stock for {} resource(s)", .shortages.len())]
pub struct InsufficientStock {
    pub shortages: Vec<ShortageReport>,
}

/// As quantidades de um recurso estouram o limite do `Decimal` ao serem somadas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Amounts for '{0}' are too large to add up")]
pub struct QuantityOverflow(pub String);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Overflow(#[from] QuantityOverflow),

    #[error(transparent)]
    Insufficient(#[from] InsufficientStock),
}

// ---
// Operações
// ---

/// Soma o que as linhas estritamente anteriores a `before` já consomem de `resource_id`.
pub fn prior_usage(
    resource_id: &str,
    before: DraftPosition,
    lines: &[DraftLine],
) -> Result<Decimal, QuantityOverflow> {
    lines
        .iter()
        .filter(|line| line.consumes(resource_id) && line.position() < before)
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.amount()))
        .ok_or_else(|| QuantityOverflow(resource_id.to_string()))
}

/// Saldo disponível para a linha em `before`, antes de descontar a própria linha.
pub fn remaining(
    resource_id: &str,
    before: DraftPosition,
    lines: &[DraftLine],
    stock: &StockTable,
) -> Result<Decimal, QuantityOverflow> {
    let used = prior_usage(resource_id, before, lines)?;
    stock
        .available(resource_id)
        .checked_sub(used)
        .ok_or_else(|| QuantityOverflow(resource_id.to_string()))
}

/// Avalia uma linha na sua própria posição. Linhas sem recurso não têm avaliação.
pub fn evaluate_line(
    line: &DraftLine,
    lines: &[DraftLine],
    stock: &StockTable,
) -> Result<Option<LineEvaluation>, QuantityOverflow> {
    let Some(resource_id) = line.resource() else {
        return Ok(None);
    };

    let available = remaining(resource_id, line.position(), lines, stock)?;
    let after_use = available
        .checked_sub(line.amount())
        .ok_or_else(|| QuantityOverflow(resource_id.to_string()))?;
    let insufficient = after_use < Decimal::ZERO;

    Ok(Some(LineEvaluation {
        group_index: line.group_index,
        line_index: line.line_index,
        resource_id: resource_id.to_string(),
        available_before_this_line: available,
        after_use,
        insufficient,
        shortfall: if insufficient { -after_use } else { Decimal::ZERO },
    }))
}

/// Avalia todas as linhas selecionadas, na ordem de posição.
pub fn evaluate_lines(lines: &[DraftLine], stock: &StockTable) -> Result<Vec<LineEvaluation>, QuantityOverflow> {
    let mut evaluations = lines
        .iter()
        .map(|line| evaluate_line(line, lines, stock))
        .filter_map(Result::transpose)
        .collect::<Result<Vec<_>, _>>()?;
    evaluations.sort_by_key(|e| DraftPosition::new(e.group_index, e.line_index));
    Ok(evaluations)
}

/// Checagem agregada do envio inteiro: total pedido por recurso, sem olhar posição.
///
/// Os relatórios saem na ordem em que cada recurso aparece pela primeira vez.
pub fn validate_submission(
    lines: &[DraftLine],
    stock: &StockTable,
) -> Result<Vec<ShortageReport>, QuantityOverflow> {
    let mut ordered: Vec<&DraftLine> = lines.iter().filter(|l| l.resource().is_some()).collect();
    ordered.sort_by_key(|l| l.position());

    let mut totals: Vec<(&str, Decimal)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for line in ordered {
        let Some(resource_id) = line.resource() else {
            continue;
        };
        match index.get(resource_id) {
            Some(&i) => {
                totals[i].1 = totals[i]
                    .1
                    .checked_add(line.amount())
                    .ok_or_else(|| QuantityOverflow(resource_id.to_string()))?;
            }
            None => {
                index.insert(resource_id, totals.len());
                totals.push((resource_id, line.amount()));
            }
        }
    }

    let mut shortages = Vec::new();
    for (resource_id, total_requested) in totals {
        let entry = stock.get(resource_id);
        let available = entry.map(|s| s.available_quantity).unwrap_or(Decimal::ZERO);
        if total_requested <= available {
            continue;
        }
        let shortage = total_requested
            .checked_sub(available)
            .ok_or_else(|| QuantityOverflow(resource_id.to_string()))?;
        shortages.push(ShortageReport {
            resource_id: resource_id.to_string(),
            name: entry.and_then(|s| s.name.clone()),
            total_requested,
            available,
            shortage,
            unit: entry.map(|s| s.unit.clone()).unwrap_or_default(),
        });
    }
    Ok(shortages)
}

/// Versão "gate" do `validate_submission`: qualquer falta vira erro.
pub fn check_submission(lines: &[DraftLine], stock: &StockTable) -> Result<(), SubmissionError> {
    let shortages = validate_submission(lines, stock)?;
    if shortages.is_empty() {
        Ok(())
    } else {
        Err(InsufficientStock { shortages }.into())
    }
}
