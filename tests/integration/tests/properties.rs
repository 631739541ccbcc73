//! Property tests over the pool engine

use cpamm_common::SwapDirection;
use cpamm_integration_tests::seeded_pool;
use cpamm_program::engine;
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = SwapDirection> {
    prop_oneof![Just(SwapDirection::XToY), Just(SwapDirection::YToX)]
}

proptest! {
    #[test]
    fn prop_deposit_preserves_ratio(
        x in 1_000u64..1_000_000_000_000,
        y in 1_000u64..1_000_000_000_000,
        lp_frac in 1u64..=1_000,
    ) {
        let pool = seeded_pool(30, x, y).unwrap();
        let supply = pool.lp_supply();
        let lp = (supply as u128 * lp_frac as u128 / 1_000).max(1) as u64;

        let t = engine::deposit(&pool, lp, u64::MAX, u64::MAX).unwrap();

        // Each side is the exact proportional share rounded up: within one unit
        let exact_x = lp as u128 * x as u128;
        let exact_y = lp as u128 * y as u128;
        let s = supply as u128;
        prop_assert!(t.delta.x_in as u128 * s >= exact_x);
        prop_assert!(t.delta.x_in as u128 * s < exact_x + s);
        prop_assert!(t.delta.y_in as u128 * s >= exact_y);
        prop_assert!(t.delta.y_in as u128 * s < exact_y + s);
    }

    #[test]
    fn prop_swap_never_decreases_k(
        x in 1u64..1_000_000_000_000_000,
        y in 1u64..1_000_000_000_000_000,
        fee in 0u16..=10_000,
        amount_in in 1u64..1_000_000_000_000_000,
        dir in direction(),
    ) {
        let pool = seeded_pool(fee, x, y).unwrap();
        if let Ok(t) = engine::swap(&pool, amount_in, dir, 0) {
            prop_assert!(t.next.invariant_k() >= pool.invariant_k());
            prop_assert_eq!(t.next.lp_supply(), pool.lp_supply());
            prop_assert!(t.next.reserve_x() > 0 && t.next.reserve_y() > 0);
        }
    }

    #[test]
    fn prop_deposit_then_withdraw_not_profitable(
        x in 1_000u64..1_000_000_000_000,
        y in 1_000u64..1_000_000_000_000,
        lp in 1u64..1_000_000_000,
    ) {
        let pool = seeded_pool(30, x, y).unwrap();
        let dep = engine::deposit(&pool, lp, u64::MAX, u64::MAX).unwrap();
        let wd = engine::withdraw(&dep.next, lp, 0, 0, lp).unwrap();

        prop_assert!(wd.delta.x_out <= dep.delta.x_in);
        prop_assert!(wd.delta.y_out <= dep.delta.y_in);
    }

    #[test]
    fn prop_swap_round_trip_not_profitable(
        x in 1_000u64..1_000_000_000_000,
        y in 1_000u64..1_000_000_000_000,
        fee in 0u16..=1_000,
        amount_in in 1u64..1_000_000_000,
    ) {
        let pool = seeded_pool(fee, x, y).unwrap();
        if let Ok(there) = engine::swap(&pool, amount_in, SwapDirection::XToY, 0) {
            if let Ok(back) = engine::swap(&there.next, there.delta.y_out, SwapDirection::YToX, 0) {
                prop_assert!(back.delta.x_out <= amount_in);
            }
        }
    }

    #[test]
    fn prop_quote_matches_swap(
        x in 1_000u64..1_000_000_000_000,
        y in 1_000u64..1_000_000_000_000,
        fee in 0u16..=10_000,
        amount_in in 1u64..1_000_000_000_000,
        dir in direction(),
    ) {
        let pool = seeded_pool(fee, x, y).unwrap();
        let quote = engine::quote_swap(&pool, amount_in, dir);
        let swap = engine::swap(&pool, amount_in, dir, 0);
        match (quote, swap) {
            (Ok(q), Ok(t)) => {
                let out = if dir.is_x_in() { t.delta.y_out } else { t.delta.x_out };
                prop_assert_eq!(q.amount_out, out);
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            (q, s) => prop_assert!(false, "quote {:?} and swap {:?} disagree", q, s),
        }
    }
}
