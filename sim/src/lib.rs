//! Off-chain scenario runner for the constant-product pool engine

pub mod config;
pub mod ledger;
pub mod runner;

pub use config::Scenario;
pub use ledger::{Ledger, LedgerError};
pub use runner::{run, Report};
