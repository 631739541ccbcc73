//! In-memory ledger substrate
//!
//! Holds user token balances and LP balances next to a `PoolRegistry` and
//! applies engine transitions atomically: every balance the transition
//! touches is checked and computed first, then the pool commit runs, then the
//! precomputed balances are written. Any failure leaves the ledger unchanged.

use cpamm_common::{AmmError, SwapDirection};
use cpamm_program::{engine, InitializeParams, PoolRegistry, PoolState, Transition, VerifiedCaller};
use pinocchio::pubkey::Pubkey;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("pool rejected operation: {0}")]
    Pool(AmmError),

    #[error("insufficient token balance: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },

    #[error("balance overflow")]
    Overflow,
}

impl LedgerError {
    /// Stable name used to match expected outcomes in scenarios
    pub fn name(&self) -> String {
        match self {
            LedgerError::Pool(e) => format!("{:?}", e),
            LedgerError::InsufficientFunds { .. } => "InsufficientFunds".to_string(),
            LedgerError::Overflow => "Overflow".to_string(),
        }
    }
}

// AmmError is no_std and has no std::error::Error impl, so no #[from]
impl From<AmmError> for LedgerError {
    fn from(e: AmmError) -> Self {
        LedgerError::Pool(e)
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Default)]
pub struct Ledger {
    registry: PoolRegistry,
    /// (owner, mint) -> balance
    tokens: HashMap<(Pubkey, Pubkey), u64>,
    /// (pool seed, owner) -> LP balance
    lp: HashMap<(u64, Pubkey), u64>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    pub fn pool(&self, seed: u64) -> Result<&PoolState> {
        Ok(self.registry.get(seed)?)
    }

    pub fn balance(&self, owner: &Pubkey, mint: &Pubkey) -> u64 {
        self.tokens.get(&(*owner, *mint)).copied().unwrap_or(0)
    }

    pub fn lp_balance(&self, seed: u64, owner: &Pubkey) -> u64 {
        self.lp.get(&(seed, *owner)).copied().unwrap_or(0)
    }

    /// Credit tokens out of thin air (test and scenario funding)
    pub fn fund(&mut self, owner: Pubkey, mint: Pubkey, amount: u64) -> Result<()> {
        let entry = self.tokens.entry((owner, mint)).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    pub fn create_pool(&mut self, params: &InitializeParams) -> Result<&PoolState> {
        let pool = self.registry.initialize(params)?;
        log::info!(
            "pool {} created: fee {} bps, authority {}",
            params.seed,
            params.fee_bps,
            params.authority.is_some()
        );
        Ok(pool)
    }

    pub fn deposit(
        &mut self,
        seed: u64,
        caller: &Pubkey,
        lp_amount: u64,
        max_x: u64,
        max_y: u64,
    ) -> Result<Transition> {
        let t = engine::deposit(self.pool(seed)?, lp_amount, max_x, max_y)?;
        self.commit(seed, caller, &t)?;
        Ok(t)
    }

    pub fn withdraw(
        &mut self,
        seed: u64,
        caller: &Pubkey,
        lp_amount: u64,
        min_x: u64,
        min_y: u64,
    ) -> Result<Transition> {
        let held = self.lp_balance(seed, caller);
        let t = engine::withdraw(self.pool(seed)?, lp_amount, min_x, min_y, held)?;
        self.commit(seed, caller, &t)?;
        Ok(t)
    }

    pub fn swap(
        &mut self,
        seed: u64,
        caller: &Pubkey,
        amount_in: u64,
        direction: SwapDirection,
        min_out: u64,
    ) -> Result<Transition> {
        let t = engine::swap(self.pool(seed)?, amount_in, direction, min_out)?;
        self.commit(seed, caller, &t)?;
        Ok(t)
    }

    pub fn lock(&mut self, seed: u64, caller: &Pubkey) -> Result<Transition> {
        let verified = VerifiedCaller::assume_verified(*caller);
        let t = engine::lock(self.pool(seed)?, &verified)?;
        self.commit(seed, caller, &t)?;
        Ok(t)
    }

    pub fn unlock(&mut self, seed: u64, caller: &Pubkey) -> Result<Transition> {
        let verified = VerifiedCaller::assume_verified(*caller);
        let t = engine::unlock(self.pool(seed)?, &verified)?;
        self.commit(seed, caller, &t)?;
        Ok(t)
    }

    /// Apply a transition computed elsewhere on behalf of `caller`
    pub fn commit(&mut self, seed: u64, caller: &Pubkey, t: &Transition) -> Result<()> {
        let pool = self.pool(seed)?;
        let (mint_x, mint_y) = (pool.config.mint_x, pool.config.mint_y);
        let d = &t.delta;

        let x = settle(self.balance(caller, &mint_x), d.x_in, d.x_out)?;
        let y = settle(self.balance(caller, &mint_y), d.y_in, d.y_out)?;
        let lp = settle_lp(self.lp_balance(seed, caller), d.lp_minted, d.lp_burned)?;

        self.registry.commit(seed, t)?;

        if d.x_in != 0 || d.x_out != 0 {
            self.tokens.insert((*caller, mint_x), x);
        }
        if d.y_in != 0 || d.y_out != 0 {
            self.tokens.insert((*caller, mint_y), y);
        }
        if d.lp_minted != 0 || d.lp_burned != 0 {
            self.lp.insert((seed, *caller), lp);
        }

        log::debug!(
            "pool {} {} committed at seqno {}: {:?}",
            seed,
            t.op.name(),
            t.next.seqno,
            d
        );
        Ok(())
    }
}

/// Caller balance after paying `paid` into the pool and receiving `received`
fn settle(balance: u64, paid: u64, received: u64) -> Result<u64> {
    let after_pay = balance
        .checked_sub(paid)
        .ok_or(LedgerError::InsufficientFunds {
            have: balance,
            need: paid,
        })?;
    after_pay.checked_add(received).ok_or(LedgerError::Overflow)
}

fn settle_lp(balance: u64, minted: u64, burned: u64) -> Result<u64> {
    let after_burn = balance
        .checked_sub(burned)
        .ok_or(LedgerError::Pool(AmmError::InsufficientBalance))?;
    after_burn.checked_add(minted).ok_or(LedgerError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: Pubkey = [7; 32];
    const ALICE: Pubkey = [10; 32];
    const BOB: Pubkey = [11; 32];
    const MINT_X: Pubkey = [1; 32];
    const MINT_Y: Pubkey = [2; 32];

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger
            .create_pool(&InitializeParams {
                seed: 12345,
                fee_bps: 300,
                authority: Some(ADMIN),
                mint_x: MINT_X,
                mint_y: MINT_Y,
                bump: 0,
                lp_bump: 0,
            })
            .unwrap();
        for user in [ALICE, BOB] {
            ledger.fund(user, MINT_X, 1_000_000_000).unwrap();
            ledger.fund(user, MINT_Y, 1_000_000_000).unwrap();
        }
        ledger
    }

    #[test]
    fn test_deposit_moves_balances() {
        let mut ledger = ledger();
        ledger.deposit(12345, &ALICE, 0, 200_000_000, 300_000_000).unwrap();

        assert_eq!(ledger.balance(&ALICE, &MINT_X), 800_000_000);
        assert_eq!(ledger.balance(&ALICE, &MINT_Y), 700_000_000);
        assert_eq!(ledger.lp_balance(12345, &ALICE), 244_948_974);

        let pool = ledger.pool(12345).unwrap();
        assert_eq!(pool.reserve_x(), 200_000_000);
        assert_eq!(pool.lp_supply(), 244_948_974);
    }

    #[test]
    fn test_swap_settles_both_legs() {
        let mut ledger = ledger();
        ledger.deposit(12345, &ALICE, 0, 300_000_000, 450_000_000).unwrap();
        let t = ledger
            .swap(12345, &BOB, 10_000_000, SwapDirection::XToY, 1)
            .unwrap();

        assert_eq!(t.delta.y_out, 14_094_285);
        assert_eq!(ledger.balance(&BOB, &MINT_X), 990_000_000);
        assert_eq!(ledger.balance(&BOB, &MINT_Y), 1_014_094_285);
    }

    #[test]
    fn test_unfunded_caller_changes_nothing() {
        let mut ledger = ledger();
        ledger.deposit(12345, &ALICE, 0, 200_000_000, 300_000_000).unwrap();
        let before = *ledger.pool(12345).unwrap();

        let carol = [12; 32];
        let err = ledger
            .swap(12345, &carol, 1_000, SwapDirection::XToY, 0)
            .unwrap_err();
        assert_eq!(err, LedgerError::InsufficientFunds { have: 0, need: 1_000 });
        assert_eq!(err.name(), "InsufficientFunds");
        assert_eq!(ledger.pool(12345).unwrap(), &before);
    }

    #[test]
    fn test_withdraw_uses_caller_lp_balance() {
        let mut ledger = ledger();
        ledger.deposit(12345, &ALICE, 0, 200_000_000, 300_000_000).unwrap();

        let err = ledger.withdraw(12345, &BOB, 1, 0, 0).unwrap_err();
        assert_eq!(err, LedgerError::Pool(AmmError::InsufficientBalance));

        let all = ledger.lp_balance(12345, &ALICE);
        ledger.withdraw(12345, &ALICE, all, 0, 0).unwrap();
        assert_eq!(ledger.balance(&ALICE, &MINT_X), 1_000_000_000);
        assert_eq!(ledger.balance(&ALICE, &MINT_Y), 1_000_000_000);
        assert_eq!(ledger.lp_balance(12345, &ALICE), 0);
    }

    #[test]
    fn test_stale_transition_rejected() {
        let mut ledger = ledger();
        ledger.deposit(12345, &ALICE, 0, 200_000_000, 300_000_000).unwrap();

        let snapshot = *ledger.pool(12345).unwrap();
        let a = engine::swap(&snapshot, 1_000_000, SwapDirection::XToY, 0).unwrap();
        let b = engine::swap(&snapshot, 1_000_000, SwapDirection::XToY, 0).unwrap();

        ledger.commit(12345, &BOB, &a).unwrap();
        let bob_x = ledger.balance(&BOB, &MINT_X);
        assert_eq!(
            ledger.commit(12345, &BOB, &b),
            Err(LedgerError::Pool(AmmError::StaleState))
        );
        assert_eq!(ledger.balance(&BOB, &MINT_X), bob_x);
    }

    #[test]
    fn test_lock_requires_authority() {
        let mut ledger = ledger();
        ledger.deposit(12345, &ALICE, 0, 200_000_000, 300_000_000).unwrap();

        assert_eq!(
            ledger.lock(12345, &ALICE).unwrap_err(),
            LedgerError::Pool(AmmError::Unauthorized)
        );
        ledger.lock(12345, &ADMIN).unwrap();
        assert_eq!(
            ledger
                .swap(12345, &BOB, 1_000, SwapDirection::XToY, 0)
                .unwrap_err(),
            LedgerError::Pool(AmmError::PoolLocked)
        );
        ledger.unlock(12345, &ADMIN).unwrap();
        assert!(ledger.swap(12345, &BOB, 1_000, SwapDirection::XToY, 0).is_ok());
    }
}
