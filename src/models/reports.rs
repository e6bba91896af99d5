// src/models/reports.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// 1. Lucro por período (Cards do topo)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitBlock {
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

impl ProfitBlock {
    pub fn new(revenue: Decimal, cost: Decimal) -> Self {
        Self { revenue, cost, profit: revenue - cost }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitSummary {
    pub all_time: ProfitBlock,
    pub current_year: ProfitBlock,
    pub current_month: ProfitBlock,
}

// 2. Gráfico de lucro mês a mês
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProfitEntry {
    pub month: u32,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

// Linha crua do banco: total por mês (1..12)
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyAmount {
    pub month: i32,
    pub amount: Decimal,
}

// 3. Variação percentual ("+12% from last month")
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PercentChange {
    /// `None` quando o período anterior é zero e o atual não.
    pub percentage: Option<Decimal>,
    pub is_positive: bool,
}

// 4. Resumo mensal
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub total_sales: Decimal,
    /// Custo da matéria-prima consumida pela produção do período
    pub total_cost: Decimal,
    pub total_profit: Decimal,
    pub total_items: Decimal,
    pub orders_count: u32,
    pub average_order_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub week: u32,
    pub sales: Decimal,
    pub profit: Decimal,
    pub items: Decimal,
    pub orders: u32,
    pub average_order_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRanking {
    pub name: String,
    pub orders: u32,
    pub sales: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub sales_change: PercentChange,
    pub profit_change: PercentChange,
    pub items_change: PercentChange,
    pub orders_change: PercentChange,
    pub weeks: Vec<WeeklyStats>,
    pub top_customers: Vec<CustomerRanking>,
}

// Uma venda "achatada" para os cálculos do resumo.
#[derive(Debug, Clone, FromRow)]
pub struct SaleFact {
    pub sale_id: Uuid,
    pub sale_date: NaiveDate,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub total_amount: Decimal,
    pub items: Decimal,
}

// Custo de produção agregado por dia.
#[derive(Debug, Clone, FromRow)]
pub struct CostFact {
    pub production_date: NaiveDate,
    pub cost: Decimal,
}

// 5. Top produtos (pizza do dashboard)
#[derive(Debug, Clone, FromRow)]
pub struct ProductRevenue {
    pub product: String,
    pub quantity: Decimal,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProductEntry {
    pub product: String,
    pub quantity: Decimal,
    pub revenue: Decimal,
    pub percentage: Decimal,
}
