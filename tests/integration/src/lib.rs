//! CPAMM Integration Tests
//!
//! End-to-end scenarios run through the sim ledger, which applies engine
//! transitions the same way the on-chain processor does. Shared fixtures live
//! here.

use cpamm_common::AmmError;
use cpamm_program::{engine, InitializeParams, PoolState};
use cpamm_sim::Ledger;
use pinocchio::pubkey::Pubkey;

pub const ADMIN: Pubkey = [0xAD; 32];
pub const ALICE: Pubkey = [0xA1; 32];
pub const BOB: Pubkey = [0xB0; 32];
pub const MINT_X: Pubkey = [0x01; 32];
pub const MINT_Y: Pubkey = [0x02; 32];

/// Starting token balance of every funded user
pub const FUNDING: u64 = 10_000_000_000;

pub fn pool_params(seed: u64, fee_bps: u16) -> InitializeParams {
    InitializeParams {
        seed,
        fee_bps,
        authority: Some(ADMIN),
        mint_x: MINT_X,
        mint_y: MINT_Y,
        bump: 255,
        lp_bump: 254,
    }
}

/// Ledger with one empty pool and ALICE/BOB funded in both mints
pub fn ledger_with_pool(seed: u64, fee_bps: u16) -> Ledger {
    let mut ledger = Ledger::new();
    ledger
        .create_pool(&pool_params(seed, fee_bps))
        .expect("pool creation");
    for user in [ALICE, BOB] {
        ledger.fund(user, MINT_X, FUNDING).expect("funding");
        ledger.fund(user, MINT_Y, FUNDING).expect("funding");
    }
    ledger
}

/// Standalone pool state seeded with a first deposit of (x, y)
pub fn seeded_pool(fee_bps: u16, x: u64, y: u64) -> Result<PoolState, AmmError> {
    let pool = engine::initialize(&pool_params(1, fee_bps))?;
    Ok(engine::deposit(&pool, 0, x, y)?.next)
}
