//! Gravação de lotes contra um Postgres de verdade.
//!
//! Rodar com `DATABASE_URL` apontando para um banco descartável:
//! `cargo test --test recording -- --ignored`

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use stockroom::{config::AppState, routes::build_router};

async fn setup() -> PgPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point to a test database");
    let pool = PgPool::connect(&url).await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

async fn seed_raw_material(pool: &PgPool, name: &str, quantity: i64) -> Uuid {
    let type_id: Uuid = sqlx::query_scalar(
        "INSERT INTO raw_material_types (name, unit, unit_cost) VALUES ($1, 'kg', 2) RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query_scalar("INSERT INTO raw_materials (type_id, quantity) VALUES ($1, $2) RETURNING id")
        .bind(type_id)
        .bind(Decimal::from(quantity))
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn seed_product(pool: &PgPool, name: &str, quantity: i64) -> Uuid {
    let type_id: Uuid = sqlx::query_scalar(
        "INSERT INTO product_types (name, unit, unit_price) VALUES ($1, 'un', 5) RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query_scalar("INSERT INTO products (type_id, quantity) VALUES ($1, $2) RETURNING id")
        .bind(type_id)
        .bind(Decimal::from(quantity))
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn quantity_of(pool: &PgPool, table: &str, id: Uuid) -> Decimal {
    sqlx::query_scalar(&format!("SELECT quantity FROM {table} WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn productions_of(pool: &PgPool, product_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM productions WHERE product_id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn post(pool: &PgPool, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = build_router(AppState::from_pool(pool.clone()))
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn production_draft(product: Uuid, material: Uuid, qty: i64) -> Value {
    json!({ "productId": product, "quantity": 10, "materials": [{ "materialId": material, "quantity": qty }] })
}

#[tokio::test]
#[ignore = "requires a Postgres database (DATABASE_URL)"]
async fn production_shortage_writes_nothing() {
    let pool = setup().await;
    let flour = seed_raw_material(&pool, "Flour", 100).await;
    let bread = seed_product(&pool, "Bread", 0).await;

    let (status, body) = post(
        &pool,
        "/api/production/batches",
        json!({ "drafts": [production_draft(bread, flour, 60), production_draft(bread, flour, 50)] }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["shortages"][0]["shortage"].as_f64(), Some(10.0));
    assert_eq!(quantity_of(&pool, "raw_materials", flour).await, Decimal::from(100));
    assert_eq!(quantity_of(&pool, "products", bread).await, Decimal::ZERO);
    assert_eq!(productions_of(&pool, bread).await, 0);
}

#[tokio::test]
#[ignore = "requires a Postgres database (DATABASE_URL)"]
async fn production_that_fits_moves_stock() {
    let pool = setup().await;
    let flour = seed_raw_material(&pool, "Flour", 100).await;
    let bread = seed_product(&pool, "Bread", 0).await;

    let (status, _) = post(
        &pool,
        "/api/production/batches",
        json!({ "drafts": [production_draft(bread, flour, 60), production_draft(bread, flour, 40)] }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(quantity_of(&pool, "raw_materials", flour).await, Decimal::ZERO);
    assert_eq!(quantity_of(&pool, "products", bread).await, Decimal::from(20));
    assert_eq!(productions_of(&pool, bread).await, 2);
}

#[tokio::test]
#[ignore = "requires a Postgres database (DATABASE_URL)"]
async fn production_with_unknown_material_is_not_found() {
    let pool = setup().await;
    let flour = seed_raw_material(&pool, "Flour", 100).await;
    let bread = seed_product(&pool, "Bread", 0).await;

    let (status, _) = post(
        &pool,
        "/api/production/batches",
        json!({ "drafts": [production_draft(bread, flour, 10), production_draft(bread, Uuid::new_v4(), 0)] }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(quantity_of(&pool, "raw_materials", flour).await, Decimal::from(100));
    assert_eq!(productions_of(&pool, bread).await, 0);
}

#[tokio::test]
#[ignore = "requires a Postgres database (DATABASE_URL)"]
async fn sales_shortage_writes_nothing() {
    let pool = setup().await;
    let cake = seed_product(&pool, "Cake", 5).await;
    let customer: Uuid = sqlx::query_scalar("INSERT INTO customers (name) VALUES ('John Doe') RETURNING id")
        .fetch_one(&pool)
        .await
        .unwrap();

    let order = |qty: i64| json!({ "customerId": customer, "items": [{ "productId": cake, "quantity": qty, "price": 5 }] });
    let (status, _) = post(&pool, "/api/sales/batches", json!({ "drafts": [order(3), order(3)] })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(quantity_of(&pool, "products", cake).await, Decimal::from(5));

    let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE customer_id = $1")
        .bind(customer)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sales, 0);
}
