// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{ProductionRepository, ReportRepository, SalesRepository, StockRepository},
    services::{
        ledger_service::LedgerService, production_service::ProductionService,
        report_service::ReportService, sales_service::SalesService, stock_service::StockService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {raw}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self { database_url, bind_addr, max_connections })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub ledger_service: LedgerService,
    pub stock_service: StockService,
    pub production_service: ProductionService,
    pub sales_service: SalesService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar no banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool) -> Self {
        let stock_repo = StockRepository::new(db_pool.clone());
        let production_repo = ProductionRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        Self {
            ledger_service: LedgerService::new(),
            stock_service: StockService::new(stock_repo.clone()),
            production_service: ProductionService::new(production_repo, stock_repo.clone()),
            sales_service: SalesService::new(sales_repo, stock_repo),
            report_service: ReportService::new(report_repo),
            db_pool,
        }
    }
}
