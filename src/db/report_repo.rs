// src/db/report_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::reports::{CostFact, MonthlyAmount, ProductRevenue, SaleFact},
};

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Intervalos são [from, to). `None` = sem limite daquele lado.

    pub async fn revenue_between<'e, E>(
        &self,
        executor: E,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM sales
            WHERE ($1::date IS NULL OR sale_date >= $1)
              AND ($2::date IS NULL OR sale_date < $2)
            "#,
        )
            .bind(from)
            .bind(to)
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    /// Custo = matéria-prima consumida pela produção no período.
    pub async fn cost_between<'e, E>(
        &self,
        executor: E,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(pm.quantity * pm.unit_cost), 0)
            FROM production_materials pm
            JOIN productions p ON p.id = pm.production_id
            WHERE ($1::date IS NULL OR p.production_date >= $1)
              AND ($2::date IS NULL OR p.production_date < $2)
            "#,
        )
            .bind(from)
            .bind(to)
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    pub async fn monthly_revenue<'e, E>(&self, executor: E, year: i32) -> Result<Vec<MonthlyAmount>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, MonthlyAmount>(
            r#"
            SELECT EXTRACT(MONTH FROM sale_date)::int AS month,
                   SUM(total_amount) AS amount
            FROM sales
            WHERE EXTRACT(YEAR FROM sale_date)::int = $1
            GROUP BY 1
            ORDER BY 1
            "#,
        )
            .bind(year)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn monthly_cost<'e, E>(&self, executor: E, year: i32) -> Result<Vec<MonthlyAmount>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, MonthlyAmount>(
            r#"
            SELECT EXTRACT(MONTH FROM p.production_date)::int AS month,
                   SUM(pm.quantity * pm.unit_cost) AS amount
            FROM production_materials pm
            JOIN productions p ON p.id = pm.production_id
            WHERE EXTRACT(YEAR FROM p.production_date)::int = $1
            GROUP BY 1
            ORDER BY 1
            "#,
        )
            .bind(year)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    /// Uma linha por venda no intervalo, já com o nome do cliente e a soma dos itens.
    pub async fn sale_facts<'e, E>(
        &self,
        executor: E,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SaleFact>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, SaleFact>(
            r#"
            SELECT s.id AS sale_id,
                   s.sale_date,
                   c.id AS customer_id,
                   c.name AS customer_name,
                   s.total_amount,
                   COALESCE(SUM(si.quantity), 0) AS items
            FROM sales s
            JOIN customers c ON c.id = s.customer_id
            LEFT JOIN sale_items si ON si.sale_id = s.id
            WHERE s.sale_date >= $1 AND s.sale_date < $2
            GROUP BY s.id, c.id, c.name
            ORDER BY s.sale_date ASC
            "#,
        )
            .bind(from)
            .bind(to)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    /// Custo de produção por dia no intervalo [from, to).
    pub async fn cost_facts<'e, E>(
        &self,
        executor: E,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CostFact>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, CostFact>(
            r#"
            SELECT p.production_date,
                   SUM(pm.quantity * pm.unit_cost) AS cost
            FROM production_materials pm
            JOIN productions p ON p.id = pm.production_id
            WHERE p.production_date >= $1 AND p.production_date < $2
            GROUP BY p.production_date
            ORDER BY p.production_date ASC
            "#,
        )
            .bind(from)
            .bind(to)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    // Curva ABC (Top produtos por receita, de todos os tempos)
    pub async fn top_products(&self, limit: i64) -> Result<Vec<ProductRevenue>, AppError> {
        let rows = sqlx::query_as::<_, ProductRevenue>(
            r#"
            SELECT t.name AS product,
                   SUM(si.quantity) AS quantity,
                   SUM(si.total) AS revenue
            FROM sale_items si
            JOIN products p ON p.id = si.product_id
            JOIN product_types t ON t.id = p.type_id
            GROUP BY t.id, t.name
            ORDER BY revenue DESC
            LIMIT $1
            "#,
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
