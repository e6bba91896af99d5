pub mod ledger_service;
pub mod production_service;
pub mod report_service;
pub mod sales_service;
pub mod stock_service;
