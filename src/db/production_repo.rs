// src/db/production_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::production::{Production, ProductionMaterial},
};

#[derive(Clone)]
pub struct ProductionRepository {
    pool: PgPool,
}

impl ProductionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_recent(&self, limit: i64) -> Result<Vec<Production>, AppError> {
        let productions = sqlx::query_as::<_, Production>(
            r#"
            SELECT id, product_id, quantity, production_date, created_at
            FROM productions
            ORDER BY production_date DESC, created_at DESC
            LIMIT $1
            "#,
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(productions)
    }

    pub async fn create_production<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: Decimal,
        production_date: NaiveDate,
    ) -> Result<Production, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let production = sqlx::query_as::<_, Production>(
            r#"
            INSERT INTO productions (product_id, quantity, production_date)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, quantity, production_date, created_at
            "#,
        )
            .bind(product_id)
            .bind(quantity)
            .bind(production_date)
            .fetch_one(executor)
            .await?;
        Ok(production)
    }

    pub async fn add_material<'e, E>(
        &self,
        executor: E,
        production_id: Uuid,
        raw_material_id: Uuid,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Result<ProductionMaterial, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let material = sqlx::query_as::<_, ProductionMaterial>(
            r#"
            INSERT INTO production_materials (production_id, raw_material_id, quantity, unit_cost)
            VALUES ($1, $2, $3, $4)
            RETURNING id, production_id, raw_material_id, quantity, unit_cost
            "#,
        )
            .bind(production_id)
            .bind(raw_material_id)
            .bind(quantity)
            .bind(unit_cost)
            .fetch_one(executor)
            .await?;
        Ok(material)
    }
}
