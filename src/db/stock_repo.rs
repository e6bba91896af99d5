// src/db/stock_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::stock::{ProductStock, RawMaterialStock},
};

const RAW_MATERIALS_SELECT: &str = r#"
    SELECT rm.id, t.name, rm.quantity, t.unit, t.unit_cost
    FROM raw_materials rm
    JOIN raw_material_types t ON t.id = rm.type_id
"#;

const PRODUCTS_SELECT: &str = r#"
    SELECT p.id, t.name, p.quantity, t.unit, t.unit_price
    FROM products p
    JOIN product_types t ON t.id = p.type_id
"#;

#[derive(Clone)]
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura (snapshot para o formulário)
    // ---

    pub async fn get_raw_materials(&self) -> Result<Vec<RawMaterialStock>, AppError> {
        let rows = sqlx::query_as::<_, RawMaterialStock>(&format!("{RAW_MATERIALS_SELECT} ORDER BY t.name ASC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_products(&self) -> Result<Vec<ProductStock>, AppError> {
        let rows = sqlx::query_as::<_, ProductStock>(&format!("{PRODUCTS_SELECT} ORDER BY t.name ASC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // ---
    // Leitura com trava (dentro da transação de gravação)
    // ---
    // O FOR UPDATE serializa envios concorrentes: o snapshot que o cliente viu pode
    // estar velho, este aqui é o que vale.

    pub async fn lock_raw_materials<'e, E>(&self, executor: E) -> Result<Vec<RawMaterialStock>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, RawMaterialStock>(&format!(
            "{RAW_MATERIALS_SELECT} ORDER BY rm.id FOR UPDATE OF rm"
        ))
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn lock_products<'e, E>(&self, executor: E) -> Result<Vec<ProductStock>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ProductStock>(&format!(
            "{PRODUCTS_SELECT} ORDER BY p.id FOR UPDATE OF p"
        ))
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    // ---
    // Escrita (movimentação de saldo)
    // ---

    /// Soma `delta` (pode ser negativo) ao saldo da matéria-prima.
    pub async fn adjust_raw_material<'e, E>(
        &self,
        executor: E,
        raw_material_id: Uuid,
        delta: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE raw_materials
            SET quantity = quantity + $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
            .bind(raw_material_id)
            .bind(delta)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("Raw material {raw_material_id}")));
        }
        Ok(())
    }

    pub async fn adjust_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        delta: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity + $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
            .bind(product_id)
            .bind(delta)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("Product {product_id}")));
        }
        Ok(())
    }

    pub async fn product_exists<'e, E>(&self, executor: E, product_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
            .bind(product_id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }
}
