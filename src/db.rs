pub mod stock_repo;
pub use stock_repo::StockRepository;
pub mod production_repo;
pub use production_repo::ProductionRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
