//! Guard layer - caller capability and lock-state checks
//!
//! Every mutating engine entry point runs its guard before touching any
//! amounts, so a rejected call never produces a transition.

use crate::state::PoolConfig;
use cpamm_common::AmmError;
use pinocchio::{account_info::AccountInfo, pubkey::Pubkey};

/// Identity that the substrate has authenticated for this call
///
/// On-chain the only way to get one is from a signer account. Host-side
/// substrates (registry tests, the simulator ledger) vouch for the identity
/// explicitly with [`VerifiedCaller::assume_verified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedCaller {
    key: Pubkey,
}

impl VerifiedCaller {
    /// Capability from a signer account
    pub fn from_signer(account: &AccountInfo) -> Result<Self, AmmError> {
        if !account.is_signer() {
            return Err(AmmError::Unauthorized);
        }
        Ok(Self { key: *account.key() })
    }

    /// Capability for an identity the substrate has already authenticated
    pub fn assume_verified(key: Pubkey) -> Self {
        Self { key }
    }

    #[inline]
    pub fn key(&self) -> &Pubkey {
        &self.key
    }
}

/// Deposit/withdraw/swap are only valid on an unlocked pool
#[inline]
pub fn ensure_unlocked(config: &PoolConfig) -> Result<(), AmmError> {
    if config.is_locked() {
        return Err(AmmError::PoolLocked);
    }
    Ok(())
}

/// Caller must be the pool authority; authority-less pools reject everyone
#[inline]
pub fn ensure_authority(config: &PoolConfig, caller: &VerifiedCaller) -> Result<(), AmmError> {
    match config.authority() {
        Some(authority) if authority == caller.key() => Ok(()),
        _ => Err(AmmError::Unauthorized),
    }
}
