pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod routes;
pub mod services;
