// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::ledger;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom API",
        description = "Estoque, rascunhos de produção/venda e relatórios do painel"
    ),
    paths(
        // --- Stock ---
        handlers::stock::list_raw_materials,
        handlers::stock::list_products,
        handlers::stock::list_low_stock,

        // --- Ledger ---
        handlers::ledger::preview,

        // --- Production ---
        handlers::production::record_batch,
        handlers::production::list_recent,

        // --- Sales ---
        handlers::sales::record_batch,
        handlers::sales::list_recent,

        // --- Reports ---
        handlers::reports::profit_summary,
        handlers::reports::monthly_profit,
        handlers::reports::monthly_summary,
        handlers::reports::top_products,
    ),
    components(
        schemas(
            // --- Ledger ---
            ledger::ResourceStock,
            ledger::DraftPosition,
            ledger::DraftLine,
            ledger::LineEvaluation,
            ledger::ShortageReport,
            services::ledger_service::DraftPreview,

            // --- Stock ---
            models::stock::RawMaterialStock,
            models::stock::ProductStock,
            models::stock::StockRecord,

            // --- Production ---
            models::production::MaterialUsage,
            models::production::ProductionDraft,
            models::production::ProductionMaterial,
            models::production::Production,

            // --- Sales ---
            models::sales::SaleItemDraft,
            models::sales::SaleDraft,
            models::sales::SaleItem,
            models::sales::Sale,

            // --- Reports ---
            models::reports::ProfitBlock,
            models::reports::ProfitSummary,
            models::reports::MonthlyProfitEntry,
            models::reports::PercentChange,
            models::reports::PeriodTotals,
            models::reports::WeeklyStats,
            models::reports::CustomerRanking,
            models::reports::MonthlySummary,
            models::reports::TopProductEntry,

            // --- Payloads ---
            handlers::ledger::PreviewPayload,
            handlers::production::RecordProductionPayload,
            handlers::sales::RecordSalesPayload,
        )
    ),
    tags(
        (name = "Stock", description = "Saldos de matéria-prima e produto"),
        (name = "Ledger", description = "Checagem de saldo entre rascunhos abertos"),
        (name = "Production", description = "Gravação de lotes de produção"),
        (name = "Sales", description = "Gravação de lotes de venda"),
        (name = "Reports", description = "Lucro, resumo mensal e top produtos"),
    )
)]
pub struct ApiDoc;
