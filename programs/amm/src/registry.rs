//! Pool registry - fixed-capacity pool storage keyed by seed
//!
//! Pools live in an append-only arena; a seed-sorted index maps seeds to
//! arena slots for binary-search lookup. Transitions are committed with an
//! optimistic seqno check: a transition computed against an older version of
//! the pool is rejected with `StaleState` and the caller recomputes.

use crate::engine::{self, InitializeParams, Transition};
use crate::state::PoolState;
use arrayvec::ArrayVec;
use cpamm_common::{AmmError, MAX_POOLS};

/// Index entry: seed -> arena slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexEntry {
    seed: u64,
    slot: u16,
}

#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    pools: ArrayVec<PoolState, MAX_POOLS>,
    /// Sorted by seed
    index: ArrayVec<IndexEntry, MAX_POOLS>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    fn find(&self, seed: u64) -> Result<usize, usize> {
        self.index.binary_search_by_key(&seed, |e| e.seed)
    }

    /// Create and register a pool; seeds are unique within the registry
    pub fn initialize(&mut self, params: &InitializeParams) -> Result<&PoolState, AmmError> {
        let pos = match self.find(params.seed) {
            Ok(_) => return Err(AmmError::PoolAlreadyExists),
            Err(pos) => pos,
        };
        if self.pools.is_full() {
            return Err(AmmError::RegistryFull);
        }

        let pool = engine::initialize(params)?;
        let slot = self.pools.len();
        self.pools.push(pool);
        self.index.insert(
            pos,
            IndexEntry {
                seed: params.seed,
                slot: slot as u16,
            },
        );
        Ok(&self.pools[slot])
    }

    pub fn get(&self, seed: u64) -> Result<&PoolState, AmmError> {
        let pos = self.find(seed).map_err(|_| AmmError::PoolNotFound)?;
        Ok(&self.pools[self.index[pos].slot as usize])
    }

    /// Install `transition.next` if the pool is still at `base_seqno`
    pub fn commit(&mut self, seed: u64, transition: &Transition) -> Result<&PoolState, AmmError> {
        let pos = self.find(seed).map_err(|_| AmmError::PoolNotFound)?;
        let slot = self.index[pos].slot as usize;
        let current = &mut self.pools[slot];

        if current.seqno != transition.base_seqno {
            return Err(AmmError::StaleState);
        }
        if transition.next.seed() != seed {
            return Err(AmmError::InvariantViolation);
        }

        *current = transition.next;
        Ok(current)
    }

    /// Pools in ascending seed order
    pub fn iter(&self) -> impl Iterator<Item = &PoolState> + '_ {
        self.index.iter().map(move |e| &self.pools[e.slot as usize])
    }
}
