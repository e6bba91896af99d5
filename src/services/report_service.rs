// src/services/report_service.rs

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReportRepository,
    models::reports::{
        CostFact, CustomerRanking, MonthlyAmount, MonthlyProfitEntry, MonthlySummary, PercentChange,
        PeriodTotals, ProductRevenue, ProfitBlock, ProfitSummary, SaleFact, TopProductEntry,
        WeeklyStats,
    },
};

const TOP_CUSTOMERS: usize = 5;

#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
}

impl ReportService {
    pub fn new(repo: ReportRepository) -> Self {
        Self { repo }
    }

    // --- Lucro: todos os tempos / ano / mês ---
    pub async fn profit_summary(&self, pool: &PgPool, today: NaiveDate) -> Result<ProfitSummary, AppError> {
        let (month_start, month_end) = month_bounds(today.year(), today.month())?;
        let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
            .ok_or_else(|| AppError::InvalidPeriod(format!("year {}", today.year())))?;
        let year_end = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
            .ok_or_else(|| AppError::InvalidPeriod(format!("year {}", today.year() + 1)))?;

        // Snapshot consistente dos números
        let mut tx = pool.begin().await?;

        let periods = [
            (None, None),
            (Some(year_start), Some(year_end)),
            (Some(month_start), Some(month_end)),
        ];

        let mut blocks = Vec::with_capacity(periods.len());
        for (from, to) in periods {
            let revenue = self.repo.revenue_between(&mut *tx, from, to).await?;
            let cost = self.repo.cost_between(&mut *tx, from, to).await?;
            blocks.push(ProfitBlock::new(revenue, cost));
        }

        tx.commit().await?;

        let mut blocks = blocks.into_iter();
        match (blocks.next(), blocks.next(), blocks.next()) {
            (Some(all_time), Some(current_year), Some(current_month)) => Ok(ProfitSummary {
                all_time,
                current_year,
                current_month,
            }),
            _ => Err(AppError::InternalServerError(anyhow::anyhow!("profit periods incomplete"))),
        }
    }

    // --- Gráfico mês a mês do ano ---
    pub async fn monthly_profit(&self, pool: &PgPool, year: i32) -> Result<Vec<MonthlyProfitEntry>, AppError> {
        let mut tx = pool.begin().await?;
        let revenue = self.repo.monthly_revenue(&mut *tx, year).await?;
        let cost = self.repo.monthly_cost(&mut *tx, year).await?;
        tx.commit().await?;

        Ok(merge_monthly(&revenue, &cost))
    }

    // --- Resumo do mês vs. mês anterior ---
    pub async fn monthly_summary(&self, pool: &PgPool, year: i32, month: u32) -> Result<MonthlySummary, AppError> {
        let (prev_year, prev_month) = previous_month(year, month);
        let (from, _) = month_bounds(prev_year, prev_month)?;
        let (_, to) = month_bounds(year, month)?;

        let mut tx = pool.begin().await?;
        let facts = self.repo.sale_facts(&mut *tx, from, to).await?;
        let costs = self.repo.cost_facts(&mut *tx, from, to).await?;
        tx.commit().await?;

        summarize_month(year, month, &facts, &costs)
    }

    pub async fn top_products(&self, limit: i64) -> Result<Vec<TopProductEntry>, AppError> {
        let rows = self.repo.top_products(limit).await?;
        Ok(with_share(rows))
    }
}

// =============================================================================
//  Cálculos puros
// =============================================================================

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Variação percentual arredondada para inteiro. Base zero não tem variação definida
/// (a não ser 0 -> 0).
pub fn percent_change(current: Decimal, previous: Decimal) -> PercentChange {
    if previous.is_zero() {
        return PercentChange {
            percentage: current.is_zero().then_some(Decimal::ZERO),
            is_positive: current >= Decimal::ZERO,
        };
    }

    let change = (current - previous) / previous * Decimal::ONE_HUNDRED;
    PercentChange {
        percentage: Some(round(change, 0)),
        is_positive: change >= Decimal::ZERO,
    }
}

pub fn average_order_value(revenue: Decimal, orders: u32) -> Decimal {
    if orders == 0 {
        return Decimal::ZERO;
    }
    round(revenue / Decimal::from(orders), 2)
}

/// Semana do mês: dias 1-7 = 1, 8-14 = 2, ...
pub fn week_of_month(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

/// Primeiro dia do mês e primeiro dia do mês seguinte.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let invalid = || AppError::InvalidPeriod(format!("{year}-{month:02} is not a valid month"));

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(invalid)?;
    Ok((start, end))
}

pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 { (year - 1, 12) } else { (year, month - 1) }
}

pub fn period_totals(facts: &[&SaleFact], costs: &[&CostFact]) -> PeriodTotals {
    let total_sales: Decimal = facts.iter().map(|f| f.total_amount).sum();
    let total_cost: Decimal = costs.iter().map(|c| c.cost).sum();
    let total_items: Decimal = facts.iter().map(|f| f.items).sum();
    let orders_count = facts.len() as u32;

    PeriodTotals {
        total_sales,
        total_cost,
        total_profit: total_sales - total_cost,
        total_items,
        orders_count,
        average_order_value: average_order_value(total_sales, orders_count),
    }
}

/// Quebra semanal do mês, com as semanas sem venda zeradas.
pub fn weekly_breakdown(facts: &[&SaleFact], costs: &[&CostFact], last_day: NaiveDate) -> Vec<WeeklyStats> {
    (1..=week_of_month(last_day))
        .map(|week| {
            let sales: Vec<&SaleFact> = facts
                .iter()
                .copied()
                .filter(|f| week_of_month(f.sale_date) == week)
                .collect();
            let spent: Vec<&CostFact> = costs
                .iter()
                .copied()
                .filter(|c| week_of_month(c.production_date) == week)
                .collect();
            let totals = period_totals(&sales, &spent);
            WeeklyStats {
                week,
                sales: totals.total_sales,
                profit: totals.total_profit,
                items: totals.total_items,
                orders: totals.orders_count,
                average_order_value: totals.average_order_value,
            }
        })
        .collect()
}

pub fn top_customers(facts: &[&SaleFact], limit: usize) -> Vec<CustomerRanking> {
    let mut by_customer: HashMap<Uuid, CustomerRanking> = HashMap::new();

    for fact in facts {
        let entry = by_customer.entry(fact.customer_id).or_insert_with(|| CustomerRanking {
            name: fact.customer_name.clone(),
            orders: 0,
            sales: Decimal::ZERO,
        });
        entry.orders += 1;
        entry.sales += fact.total_amount;
    }

    let mut ranking: Vec<CustomerRanking> = by_customer.into_values().collect();
    ranking.sort_by(|a, b| b.sales.cmp(&a.sales).then_with(|| a.name.cmp(&b.name)));
    ranking.truncate(limit);
    ranking
}

/// `facts` e `costs` cobrem o mês anterior e o mês pedido; aqui separamos os dois.
pub fn summarize_month(
    year: i32,
    month: u32,
    facts: &[SaleFact],
    costs: &[CostFact],
) -> Result<MonthlySummary, AppError> {
    let (start, end) = month_bounds(year, month)?;
    let (prev_year, prev_month) = previous_month(year, month);
    let (prev_start, _) = month_bounds(prev_year, prev_month)?;

    let in_current = |day: NaiveDate| day >= start && day < end;
    let in_previous = |day: NaiveDate| day >= prev_start && day < start;

    let current: Vec<&SaleFact> = facts.iter().filter(|f| in_current(f.sale_date)).collect();
    let previous: Vec<&SaleFact> = facts.iter().filter(|f| in_previous(f.sale_date)).collect();
    let current_costs: Vec<&CostFact> = costs.iter().filter(|c| in_current(c.production_date)).collect();
    let previous_costs: Vec<&CostFact> = costs.iter().filter(|c| in_previous(c.production_date)).collect();

    let current_totals = period_totals(&current, &current_costs);
    let previous_totals = period_totals(&previous, &previous_costs);
    let last_day = end.pred_opt().unwrap_or(start);

    Ok(MonthlySummary {
        year,
        month,
        sales_change: percent_change(current_totals.total_sales, previous_totals.total_sales),
        profit_change: percent_change(current_totals.total_profit, previous_totals.total_profit),
        items_change: percent_change(current_totals.total_items, previous_totals.total_items),
        orders_change: percent_change(
            Decimal::from(current_totals.orders_count),
            Decimal::from(previous_totals.orders_count),
        ),
        weeks: weekly_breakdown(&current, &current_costs, last_day),
        top_customers: top_customers(&current, TOP_CUSTOMERS),
        current: current_totals,
        previous: previous_totals,
    })
}

/// Sempre 12 entradas; mês sem movimento vem zerado.
pub fn merge_monthly(revenue: &[MonthlyAmount], cost: &[MonthlyAmount]) -> Vec<MonthlyProfitEntry> {
    let lookup = |rows: &[MonthlyAmount], month: u32| {
        rows.iter()
            .filter(|r| r.month == month as i32)
            .map(|r| r.amount)
            .sum::<Decimal>()
    };

    (1..=12u32)
        .map(|month| {
            let block = ProfitBlock::new(lookup(revenue, month), lookup(cost, month));
            MonthlyProfitEntry {
                month,
                revenue: block.revenue,
                cost: block.cost,
                profit: block.profit,
            }
        })
        .collect()
}

/// Percentual de cada produto sobre a receita listada.
pub fn with_share(rows: Vec<ProductRevenue>) -> Vec<TopProductEntry> {
    let total: Decimal = rows.iter().map(|r| r.revenue).sum();

    rows.into_iter()
        .map(|r| {
            let percentage = if total.is_zero() {
                Decimal::ZERO
            } else {
                round(r.revenue / total * Decimal::ONE_HUNDRED, 2)
            };
            TopProductEntry {
                product: r.product,
                quantity: r.quantity,
                revenue: r.revenue,
                percentage,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fact(day: NaiveDate, customer: u128, name: &str, total: i64, items: i64) -> SaleFact {
        SaleFact {
            sale_id: Uuid::new_v4(),
            sale_date: day,
            customer_id: Uuid::from_u128(customer),
            customer_name: name.to_string(),
            total_amount: Decimal::from(total),
            items: Decimal::from(items),
        }
    }

    #[test]
    fn test_percent_change() {
        let up = percent_change(Decimal::from(28450), Decimal::from(23500));
        assert_eq!(up.percentage, Some(Decimal::from(21)));
        assert!(up.is_positive);

        let down = percent_change(Decimal::from(90), Decimal::from(100));
        assert_eq!(down.percentage, Some(Decimal::from(-10)));
        assert!(!down.is_positive);

        // meio ponto arredonda para longe do zero
        let half = percent_change(Decimal::new(1005, 1), Decimal::from(100));
        assert_eq!(half.percentage, Some(Decimal::ONE));
    }

    #[test]
    fn test_percent_change_from_zero() {
        let none = percent_change(Decimal::from(10), Decimal::ZERO);
        assert_eq!(none.percentage, None);
        assert!(none.is_positive);

        let flat = percent_change(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(flat.percentage, Some(Decimal::ZERO));
        assert!(flat.is_positive);
    }

    #[test]
    fn test_average_order_value() {
        assert_eq!(average_order_value(Decimal::from(100), 3), Decimal::new(3333, 2));
        assert_eq!(average_order_value(Decimal::from(100), 0), Decimal::ZERO);
    }

    #[test]
    fn test_week_of_month() {
        assert_eq!(week_of_month(date(2024, 11, 1)), 1);
        assert_eq!(week_of_month(date(2024, 11, 7)), 1);
        assert_eq!(week_of_month(date(2024, 11, 8)), 2);
        assert_eq!(week_of_month(date(2024, 11, 30)), 5);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(2024, 12).unwrap(), (date(2024, 12, 1), date(2025, 1, 1)));
        assert!(matches!(month_bounds(2024, 13), Err(AppError::InvalidPeriod(_))));
        assert_eq!(previous_month(2024, 1), (2023, 12));
    }

    fn cost(day: NaiveDate, amount: i64) -> CostFact {
        CostFact { production_date: day, cost: Decimal::from(amount) }
    }

    #[test]
    fn test_summarize_month() {
        let facts = vec![
            fact(date(2024, 10, 15), 1, "John Doe", 100, 4),
            fact(date(2024, 11, 2), 1, "John Doe", 60, 2),
            fact(date(2024, 11, 9), 2, "Jane Smith", 90, 3),
            fact(date(2024, 11, 10), 1, "John Doe", 50, 1),
            // fora do intervalo: ignorado
            fact(date(2024, 12, 1), 2, "Jane Smith", 999, 9),
        ];

        let summary = summarize_month(2024, 11, &facts, &[]).unwrap();

        assert_eq!(summary.current.total_sales, Decimal::from(200));
        assert_eq!(summary.current.total_items, Decimal::from(6));
        assert_eq!(summary.current.orders_count, 3);
        assert_eq!(summary.current.average_order_value, Decimal::new(6667, 2));
        assert_eq!(summary.previous.total_sales, Decimal::from(100));
        assert_eq!(summary.sales_change.percentage, Some(Decimal::from(100)));
        assert_eq!(summary.orders_change.percentage, Some(Decimal::from(200)));

        assert_eq!(summary.weeks.len(), 5);
        assert_eq!(summary.weeks[0].sales, Decimal::from(60));
        assert_eq!(summary.weeks[1].orders, 2);
        assert_eq!(summary.weeks[4].orders, 0);

        assert_eq!(summary.top_customers[0].name, "John Doe");
        assert_eq!(summary.top_customers[0].orders, 2);
        assert_eq!(summary.top_customers[0].sales, Decimal::from(110));
    }

    #[test]
    fn test_summarize_month_profit() {
        let facts = vec![
            fact(date(2024, 10, 15), 1, "John Doe", 100, 4),
            fact(date(2024, 11, 2), 1, "John Doe", 60, 2),
            fact(date(2024, 11, 9), 2, "Jane Smith", 90, 3),
        ];
        let costs = vec![
            cost(date(2024, 10, 3), 40),
            cost(date(2024, 11, 1), 20),
            cost(date(2024, 11, 12), 10),
            // semana sem venda, só custo
            cost(date(2024, 11, 29), 30),
        ];

        let summary = summarize_month(2024, 11, &facts, &costs).unwrap();

        assert_eq!(summary.current.total_cost, Decimal::from(60));
        assert_eq!(summary.current.total_profit, Decimal::from(90));
        assert_eq!(summary.previous.total_profit, Decimal::from(60));
        assert_eq!(summary.profit_change.percentage, Some(Decimal::from(50)));
        assert!(summary.profit_change.is_positive);

        assert_eq!(summary.weeks[0].profit, Decimal::from(40));
        assert_eq!(summary.weeks[1].profit, Decimal::from(80));
        assert_eq!(summary.weeks[4].profit, Decimal::from(-30));
    }

    #[test]
    fn test_merge_monthly_fills_gaps() {
        let revenue = vec![MonthlyAmount { month: 2, amount: Decimal::from(500) }];
        let cost = vec![
            MonthlyAmount { month: 2, amount: Decimal::from(200) },
            MonthlyAmount { month: 3, amount: Decimal::from(50) },
        ];

        let entries = merge_monthly(&revenue, &cost);
        assert_eq!(entries.len(), 12);
        assert_eq!(entries[0].profit, Decimal::ZERO);
        assert_eq!(entries[1].profit, Decimal::from(300));
        assert_eq!(entries[2].profit, Decimal::from(-50));
    }

    #[test]
    fn test_with_share() {
        let rows = vec![
            ProductRevenue { product: "Bread".into(), quantity: Decimal::from(10), revenue: Decimal::from(300) },
            ProductRevenue { product: "Cake".into(), quantity: Decimal::from(2), revenue: Decimal::from(100) },
        ];
        let shares = with_share(rows);
        assert_eq!(shares[0].percentage, Decimal::from(75));
        assert_eq!(shares[1].percentage, Decimal::from(25));
        assert!(with_share(vec![]).is_empty());
    }
}
