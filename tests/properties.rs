//! Property tests for the clearing invariants.
//!
//! Amounts and reserves stay below 2^40 so the reference arithmetic below
//! fits in plain `u128`.

use batch_clearing::{
    ClearingEngine, Reserves, SwapIntent, SwapOutcome, SwapStatus, Token, quote_out,
    simulate_batch_clearing, simulate_sequential_swap,
};
use proptest::prelude::*;

const MAX_AMOUNT: u128 = 1 << 40;

prop_compose! {
    fn reserves_strategy()(
        reserve0 in 1_000u128..MAX_AMOUNT,
        reserve1 in 1_000u128..MAX_AMOUNT,
    ) -> Reserves {
        Reserves::new(reserve0, reserve1)
    }
}

prop_compose! {
    fn intent_strategy()(
        amount_in in 0u128..1_000_000u128,
        sell in any::<bool>(),
        // Zero (no limit) shows up often enough to exercise the sentinels.
        amount_out in prop_oneof![Just(0u128), 0u128..2_000_000u128],
    ) -> SwapIntent {
        let token_in = if sell { Token::Token1 } else { Token::Token0 };
        SwapIntent::new(amount_in, token_in, amount_out)
    }
}

fn one_sided(token_in: Token) -> impl Strategy<Value = Vec<SwapIntent>> {
    let pairs = (1u128..1_000_000u128, 0u128..2_000_000u128);
    prop::collection::vec(pairs, 0..12).prop_map(move |pairs| {
        pairs
            .into_iter()
            .map(|(amount_in, amount_out)| SwapIntent::new(amount_in, token_in, amount_out))
            .collect()
    })
}

fn filled(swaps: &[SwapOutcome], token_in: Token) -> (u128, u128) {
    swaps
        .iter()
        .filter(|s| s.is_success() && s.token_in == token_in)
        .fold((0, 0), |(i, o), s| (i + s.amount_in, o + s.amount_out))
}

proptest! {
    #[test]
    fn quote_matches_constant_product_formula(
        reserves in reserves_strategy(),
        amount_in in 0u128..MAX_AMOUNT,
    ) {
        let r0 = reserves.reserve0;
        let r1 = reserves.reserve1;
        let expected = 997 * amount_in * r1 / (1000 * r0 + 997 * amount_in);
        prop_assert_eq!(quote_out(&reserves, amount_in, Token::Token0), expected);
        prop_assert!(quote_out(&reserves, amount_in, Token::Token1) < r0);
    }

    #[test]
    fn quote_is_monotonic_in_input(
        reserves in reserves_strategy(),
        a in 0u128..MAX_AMOUNT,
        b in 0u128..MAX_AMOUNT,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            quote_out(&reserves, lo, Token::Token0) <= quote_out(&reserves, hi, Token::Token0)
        );
    }

    #[test]
    fn batch_is_deterministic_and_keeps_order(
        reserves in reserves_strategy(),
        intents in prop::collection::vec(intent_strategy(), 0..16),
    ) {
        let first = simulate_batch_clearing(reserves, &intents).unwrap();
        let second = simulate_batch_clearing(reserves, &intents).unwrap();
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(first.swaps.len(), intents.len());
        for (swap, intent) in first.swaps.iter().zip(&intents) {
            prop_assert_eq!(swap.amount_in, intent.amount_in);
            prop_assert_eq!(swap.token_in, intent.token_in);
            if swap.status == SwapStatus::Failure {
                prop_assert_eq!(swap.amount_out, 0);
            }
            if intent.amount_in == 0 {
                prop_assert_eq!(swap.status, SwapStatus::Failure);
            }
        }
    }

    #[test]
    fn batch_conserves_both_assets(
        reserves in reserves_strategy(),
        intents in prop::collection::vec(intent_strategy(), 0..16),
    ) {
        let result = simulate_batch_clearing(reserves, &intents).unwrap();
        let (buy_in, buy_out) = filled(&result.swaps, Token::Token0);
        let (sell_in, sell_out) = filled(&result.swaps, Token::Token1);

        prop_assert_eq!(
            result.reserves.reserve0 + sell_out,
            reserves.reserve0 + buy_in
        );
        prop_assert_eq!(
            result.reserves.reserve1 + buy_out,
            reserves.reserve1 + sell_in
        );
    }

    #[test]
    fn one_sided_buys_only_drain_asset_one(
        reserves in reserves_strategy(),
        intents in one_sided(Token::Token0),
    ) {
        let result = simulate_batch_clearing(reserves, &intents).unwrap();
        let (buy_in, buy_out) = filled(&result.swaps, Token::Token0);
        prop_assert_eq!(result.reserves.reserve0, reserves.reserve0 + buy_in);
        prop_assert_eq!(result.reserves.reserve1, reserves.reserve1 - buy_out);
    }

    #[test]
    fn one_sided_sells_only_drain_asset_zero(
        reserves in reserves_strategy(),
        intents in one_sided(Token::Token1),
    ) {
        let result = simulate_batch_clearing(reserves, &intents).unwrap();
        let (sell_in, sell_out) = filled(&result.swaps, Token::Token1);
        prop_assert_eq!(result.reserves.reserve1, reserves.reserve1 + sell_in);
        prop_assert_eq!(result.reserves.reserve0, reserves.reserve0 - sell_out);
    }

    #[test]
    fn pool_invariant_never_shrinks(
        reserves in reserves_strategy(),
        intents in prop::collection::vec(intent_strategy(), 0..16),
    ) {
        let k = reserves.reserve0 * reserves.reserve1;

        let batch = simulate_batch_clearing(reserves, &intents).unwrap();
        prop_assert!(batch.reserves.reserve0 * batch.reserves.reserve1 >= k);

        let sequential = simulate_sequential_swap(reserves, &intents).unwrap();
        prop_assert!(sequential.reserves.reserve0 * sequential.reserves.reserve1 >= k);
    }

    #[test]
    fn batch_pays_every_declared_minimum(
        reserves in reserves_strategy(),
        intents in prop::collection::vec(intent_strategy(), 0..16),
    ) {
        let result = simulate_batch_clearing(reserves, &intents).unwrap();
        for (swap, intent) in result.swaps.iter().zip(&intents) {
            if swap.is_success() {
                prop_assert!(swap.amount_out >= intent.amount_out);
                prop_assert!(swap.amount_in > 0);
            }
        }
    }

    #[test]
    fn shared_tick_minimums_hold_near_the_pool_price(
        reserve0 in 1_000_000_000u128..MAX_AMOUNT,
        amounts in prop::collection::vec((1_000u128..100_000u128, 9_950u128..10_000u128), 1..8),
    ) {
        // Minimums within half a percent of the input all bucket next to
        // tick 0, so most batches share ticks with differing rates.
        let reserves = Reserves::new(reserve0, reserve0 + reserve0 / 200);
        let intents: Vec<SwapIntent> = amounts
            .iter()
            .map(|&(amount_in, per_10k)| {
                SwapIntent::new(amount_in, Token::Token0, amount_in * per_10k / 10_000)
            })
            .collect();
        let result = simulate_batch_clearing(reserves, &intents).unwrap();
        for (swap, intent) in result.swaps.iter().zip(&intents) {
            if swap.is_success() {
                prop_assert!(swap.amount_out >= intent.amount_out);
            }
        }
    }

    #[test]
    fn sequential_respects_every_minimum(
        reserves in reserves_strategy(),
        intents in prop::collection::vec(intent_strategy(), 0..16),
    ) {
        let result = ClearingEngine::default()
            .simulate_sequential_swap(reserves, &intents)
            .unwrap();
        for (swap, intent) in result.swaps.iter().zip(&intents) {
            if swap.is_success() {
                prop_assert!(swap.amount_out >= intent.amount_out);
                prop_assert!(swap.amount_in > 0);
            }
        }
    }
}
