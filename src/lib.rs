//! Household ledger - income, expenses and bills from the terminal
//!
//! This library records income and expense transactions, tracks which bills
//! are still unpaid, and aggregates them into monthly views, a running
//! balance, per-category budget progress and savings projections.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, templates, goals, money)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer, including the ledger aggregator
//! - `reports`: Monthly, budget, patrimony and savings reports
//! - `export`: CSV, JSON and YAML export
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `ledger` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use household_ledger::config::{paths::LedgerPaths, settings::Settings};
//! use household_ledger::services::LedgerAggregator;
//! use household_ledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let snapshot = storage.snapshot()?;
//! let balance = LedgerAggregator::net_balance(&snapshot.transactions);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
