//! Constant-product AMM pool program (x·y=k)
//!
//! - `engine`: pure pool transitions (initialize, deposit, withdraw, swap, lock, unlock)
//! - `curve`: swap pricing and LP share math
//! - `guard`: caller capability and lock checks
//! - `registry`: multi-pool storage with optimistic commit
//! - `processor`: on-chain account adapter

pub mod curve;
pub mod engine;
pub mod guard;
pub mod instructions;
pub mod processor;
pub mod registry;
pub mod state;

#[cfg(feature = "bpf-entrypoint")]
mod entrypoint;

pub use engine::{InitializeParams, Transition};
pub use guard::VerifiedCaller;
pub use instructions::AmmInstruction;
pub use registry::PoolRegistry;
pub use state::*;

pinocchio_pubkey::declare_id!("HZouxKXXkqdnrfisr4iVsgKpWf5U1VGQNY8nECiLV9RQ");
