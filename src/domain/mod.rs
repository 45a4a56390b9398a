//! Ledger domain: records, P/L, statistics, queries and the store service.

pub mod trade;
pub mod pnl;
pub mod stats;
pub mod query;
pub mod ledger;
pub mod journal;
pub mod config_validation;
pub mod error;
