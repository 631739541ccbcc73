//! End-to-end pool scenarios through the ledger substrate

use cpamm_common::{AmmError, SwapDirection};
use cpamm_integration_tests::*;
use cpamm_program::engine;
use cpamm_sim::LedgerError;

const SEED: u64 = 12345;

#[test]
fn test_initialize_reference_pool() {
    let ledger = ledger_with_pool(SEED, 300);
    let pool = ledger.pool(SEED).unwrap();

    assert_eq!(pool.config.fee_bps, 300);
    assert!(!pool.config.is_locked());
    assert_eq!(pool.reserve_x(), 0);
    assert_eq!(pool.reserve_y(), 0);
    assert_eq!(pool.lp_supply(), 0);
    assert_eq!(pool.seqno, 0);
}

#[test]
fn test_first_deposit_then_proportional_deposit() {
    let mut ledger = ledger_with_pool(SEED, 300);

    let first = ledger.deposit(SEED, &ALICE, 0, 200_000_000, 300_000_000).unwrap();
    assert_eq!(first.delta.lp_minted, 244_948_974);
    assert_eq!(ledger.lp_balance(SEED, &ALICE), 244_948_974);

    // Below the rounded-up requirement on either side
    assert_eq!(
        ledger
            .deposit(SEED, &BOB, 50_000_000, 40_824_829, 61_237_244)
            .unwrap_err(),
        LedgerError::Pool(AmmError::SlippageExceeded)
    );

    let second = ledger
        .deposit(SEED, &BOB, 50_000_000, 40_824_830, 61_237_244)
        .unwrap();
    assert_eq!(second.delta.x_in, 40_824_830);
    assert_eq!(second.delta.y_in, 61_237_244);
    assert_eq!(ledger.balance(&BOB, &MINT_X), FUNDING - 40_824_830);
    assert_eq!(ledger.balance(&BOB, &MINT_Y), FUNDING - 61_237_244);

    let pool = ledger.pool(SEED).unwrap();
    assert_eq!(pool.reserve_x(), 240_824_830);
    assert_eq!(pool.reserve_y(), 361_237_244);
    assert_eq!(pool.lp_supply(), 294_948_974);
}

#[test]
fn test_reference_swap() {
    let mut ledger = ledger_with_pool(SEED, 300);
    ledger.deposit(SEED, &ALICE, 0, 300_000_000, 450_000_000).unwrap();

    let k_before = ledger.pool(SEED).unwrap().invariant_k();
    let t = ledger
        .swap(SEED, &BOB, 10_000_000, SwapDirection::XToY, 14_000_000)
        .unwrap();

    let pool = ledger.pool(SEED).unwrap();
    assert_eq!(pool.reserve_x(), 310_000_000);
    assert_eq!(pool.reserve_y(), 450_000_000 - t.delta.y_out);
    assert_eq!(t.delta.y_out, 14_094_285);
    assert!(pool.invariant_k() >= k_before);
    assert_eq!(ledger.balance(&BOB, &MINT_Y), FUNDING + 14_094_285);
}

#[test]
fn test_swap_slippage_guard() {
    let mut ledger = ledger_with_pool(SEED, 300);
    ledger.deposit(SEED, &ALICE, 0, 300_000_000, 450_000_000).unwrap();

    let before = *ledger.pool(SEED).unwrap();
    assert_eq!(
        ledger
            .swap(SEED, &BOB, 10_000_000, SwapDirection::XToY, 14_094_286)
            .unwrap_err(),
        LedgerError::Pool(AmmError::SlippageExceeded)
    );
    assert_eq!(ledger.pool(SEED).unwrap(), &before);
    assert_eq!(ledger.balance(&BOB, &MINT_X), FUNDING);
}

#[test]
fn test_lock_by_non_authority_then_authority() {
    let mut ledger = ledger_with_pool(SEED, 300);
    ledger.deposit(SEED, &ALICE, 0, 200_000_000, 300_000_000).unwrap();

    assert_eq!(
        ledger.lock(SEED, &ALICE).unwrap_err(),
        LedgerError::Pool(AmmError::Unauthorized)
    );
    ledger.lock(SEED, &ADMIN).unwrap();
    assert_eq!(
        ledger.lock(SEED, &ADMIN).unwrap_err(),
        LedgerError::Pool(AmmError::AlreadyLocked)
    );

    for result in [
        ledger.swap(SEED, &BOB, 10_000_000, SwapDirection::XToY, 0),
        ledger.deposit(SEED, &BOB, 1_000, u64::MAX, u64::MAX),
        ledger.withdraw(SEED, &ALICE, 1_000, 0, 0),
    ] {
        assert_eq!(result.unwrap_err(), LedgerError::Pool(AmmError::PoolLocked));
    }

    ledger.unlock(SEED, &ADMIN).unwrap();
    assert!(ledger
        .swap(SEED, &BOB, 10_000_000, SwapDirection::XToY, 0)
        .is_ok());
}

#[test]
fn test_full_lifecycle_returns_liquidity() {
    let mut ledger = ledger_with_pool(SEED, 30);
    ledger.deposit(SEED, &ALICE, 0, 1_000_000_000, 2_000_000_000).unwrap();

    for i in 0..10u64 {
        let direction = if i % 2 == 0 {
            SwapDirection::XToY
        } else {
            SwapDirection::YToX
        };
        ledger.swap(SEED, &BOB, 5_000_000 + i, direction, 0).unwrap();
    }

    let supply = ledger.pool(SEED).unwrap().lp_supply();
    let t = ledger.withdraw(SEED, &ALICE, supply, 0, 0).unwrap();

    let pool = ledger.pool(SEED).unwrap();
    assert_eq!(pool.reserve_x(), 0);
    assert_eq!(pool.reserve_y(), 0);
    assert_eq!(pool.lp_supply(), 0);

    // Tokens are conserved across the ledger
    let total_x = ledger.balance(&ALICE, &MINT_X) + ledger.balance(&BOB, &MINT_X);
    let total_y = ledger.balance(&ALICE, &MINT_Y) + ledger.balance(&BOB, &MINT_Y);
    assert_eq!(total_x, 2 * FUNDING);
    assert_eq!(total_y, 2 * FUNDING);
    assert!(t.delta.x_out > 0 && t.delta.y_out > 0);
}

#[test]
fn test_concurrent_transitions_serialize() {
    let mut ledger = ledger_with_pool(SEED, 300);
    ledger.deposit(SEED, &ALICE, 0, 200_000_000, 300_000_000).unwrap();

    let snapshot = *ledger.pool(SEED).unwrap();
    let alice_swap = engine::swap(&snapshot, 1_000_000, SwapDirection::XToY, 0).unwrap();
    let bob_swap = engine::swap(&snapshot, 1_000_000, SwapDirection::YToX, 0).unwrap();

    ledger.commit(SEED, &ALICE, &alice_swap).unwrap();
    assert_eq!(
        ledger.commit(SEED, &BOB, &bob_swap),
        Err(LedgerError::Pool(AmmError::StaleState))
    );

    // Recomputed against the new version it goes through
    let current = *ledger.pool(SEED).unwrap();
    let retry = engine::swap(&current, 1_000_000, SwapDirection::YToX, 0).unwrap();
    ledger.commit(SEED, &BOB, &retry).unwrap();
    assert_eq!(ledger.pool(SEED).unwrap().seqno, snapshot.seqno + 2);
}

#[test]
fn test_pools_are_independent() {
    let mut ledger = ledger_with_pool(1, 30);
    ledger.create_pool(&pool_params(2, 100)).unwrap();
    assert_eq!(
        ledger.create_pool(&pool_params(2, 100)).map(|_| ()),
        Err(LedgerError::Pool(AmmError::PoolAlreadyExists))
    );

    ledger.deposit(1, &ALICE, 0, 1_000_000, 1_000_000).unwrap();
    ledger.lock(2, &ADMIN).unwrap();

    assert!(ledger.swap(1, &BOB, 1_000, SwapDirection::XToY, 0).is_ok());
    assert!(ledger.pool(2).unwrap().config.is_locked());
    assert!(!ledger.pool(1).unwrap().config.is_locked());
    assert_eq!(
        ledger.pool(3).map(|_| ()),
        Err(LedgerError::Pool(AmmError::PoolNotFound))
    );
}

#[test]
fn test_reads_are_pure() {
    let mut ledger = ledger_with_pool(SEED, 300);
    ledger.deposit(SEED, &ALICE, 0, 200_000_000, 300_000_000).unwrap();

    let a = *ledger.pool(SEED).unwrap();
    let b = *ledger.pool(SEED).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        engine::quote_swap(&a, 1_000, SwapDirection::XToY),
        engine::quote_swap(&b, 1_000, SwapDirection::XToY)
    );
    assert_eq!(a.spot_price_x_in_y(), Ok(1_500_000));
}
