pub mod ledger;
pub mod production;
pub mod reports;
pub mod sales;
pub mod stock;
