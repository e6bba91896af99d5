// src/routes.rs

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn build_router(app_state: AppState) -> Router {
    let stock_routes = Router::new()
        .route("/raw-materials", get(handlers::stock::list_raw_materials))
        .route("/products", get(handlers::stock::list_products))
        .route("/low", get(handlers::stock::list_low_stock));

    let ledger_routes = Router::new()
        .route("/preview", post(handlers::ledger::preview));

    let production_routes = Router::new()
        .route("/batches"
               ,post(handlers::production::record_batch)
               .get(handlers::production::list_recent)
        );

    let sales_routes = Router::new()
        .route("/batches"
               ,post(handlers::sales::record_batch)
               .get(handlers::sales::list_recent)
        );

    let report_routes = Router::new()
        .route("/profit-summary", get(handlers::reports::profit_summary))
        .route("/monthly-profit", get(handlers::reports::monthly_profit))
        .route("/monthly-summary", get(handlers::reports::monthly_summary))
        .route("/top-products", get(handlers::reports::top_products));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/stock", stock_routes)
        .nest("/api/ledger", ledger_routes)
        .nest("/api/production", production_routes)
        .nest("/api/sales", sales_routes)
        .nest("/api/reports", report_routes)
        .with_state(app_state)
}
