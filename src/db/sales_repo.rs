// src/db/sales_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{Sale, SaleItem},
};

#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_recent(&self, limit: i64) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, total_amount, note, sale_date, created_at
            FROM sales
            ORDER BY sale_date DESC, created_at DESC
            LIMIT $1
            "#,
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(sales)
    }

    pub async fn customer_exists<'e, E>(&self, executor: E, customer_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM customers WHERE id = $1)")
            .bind(customer_id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    pub async fn create_sale<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        total_amount: Decimal,
        note: Option<&str>,
        sale_date: NaiveDate,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (customer_id, total_amount, note, sale_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, customer_id, total_amount, note, sale_date, created_at
            "#,
        )
            .bind(customer_id)
            .bind(total_amount)
            .bind(note)
            .bind(sale_date)
            .fetch_one(executor)
            .await?;
        Ok(sale)
    }

    pub async fn add_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        product_id: Uuid,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (sale_id, product_id, quantity, unit_price, total)
            VALUES ($1, $2, $3, $4, $3 * $4)
            RETURNING id, sale_id, product_id, quantity, unit_price, total
            "#,
        )
            .bind(sale_id)
            .bind(product_id)
            .bind(quantity)
            .bind(unit_price)
            .fetch_one(executor)
            .await?;
        Ok(item)
    }
}
