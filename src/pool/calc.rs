use alloy_primitives::U512;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::models::{ClearingResult, SwapIntent, SwapOutcome, SwapStatus, Token};
use crate::pool::state::Reserves;

/// LP fee as the fraction of the input that is actually priced,
/// e.g. 997/1000 for a 0.3% fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub numerator: u128,
    pub denominator: u128,
}

impl Default for Fee {
    fn default() -> Self {
        Self {
            numerator: 997,
            denominator: 1000,
        }
    }
}

/// Result of a single constant-product step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    pub amount_out: u128,
    pub status: SwapStatus,
    /// Reserves after the step; equal to the input reserves on failure.
    pub reserves: Reserves,
}

impl StepResult {
    fn rejected(reserves: Reserves) -> Self {
        Self {
            amount_out: 0,
            status: SwapStatus::Failure,
            reserves,
        }
    }
}

/// Output of selling `amount_in` of `token_in`, without touching the pool.
///
/// `floor(a * num * Rout / (Rin * den + a * num))`, exact for all `u128`
/// inputs.
pub fn quote_out(reserves: &Reserves, amount_in: u128, token_in: Token, fee: Fee) -> u128 {
    if amount_in == 0 {
        return 0;
    }
    let (reserve_in, reserve_out) = reserves.oriented(token_in);

    let amount_in_with_fee = U512::from(amount_in) * U512::from(fee.numerator);
    let numerator = amount_in_with_fee * U512::from(reserve_out);
    let denominator = U512::from(reserve_in) * U512::from(fee.denominator) + amount_in_with_fee;
    if denominator.is_zero() {
        return 0;
    }
    // The quotient never exceeds reserve_out.
    u128::try_from(numerator / denominator).unwrap_or(reserve_out)
}

/// Atomic swap against `reserves`.
///
/// Fails without side effects when `amount_in` is zero or the quote is below
/// `min_amount_out`. Only a reserve overflow is an error.
pub fn step(
    reserves: Reserves,
    amount_in: u128,
    token_in: Token,
    min_amount_out: u128,
    fee: Fee,
) -> Result<StepResult> {
    if amount_in == 0 {
        return Ok(StepResult::rejected(reserves));
    }

    let amount_out = quote_out(&reserves, amount_in, token_in, fee);
    if amount_out < min_amount_out {
        return Ok(StepResult::rejected(reserves));
    }

    Ok(StepResult {
        amount_out,
        status: SwapStatus::Success,
        reserves: reserves.apply_swap(token_in, amount_in, amount_out)?,
    })
}

/// Executes intents one at a time, each against the reserves the previous one
/// left behind. This is the non-batched baseline.
pub fn simulate_sequential(
    reserves: Reserves,
    intents: &[SwapIntent],
    fee: Fee,
) -> Result<ClearingResult> {
    let mut current = reserves;
    let mut swaps = Vec::with_capacity(intents.len());

    for intent in intents {
        let res = step(
            current,
            intent.amount_in,
            intent.token_in,
            intent.amount_out,
            fee,
        )?;
        current = res.reserves;
        swaps.push(match res.status {
            SwapStatus::Success => SwapOutcome::success(intent, res.amount_out),
            SwapStatus::Failure => SwapOutcome::failure(intent),
        });
    }

    Ok(ClearingResult {
        reserves: current,
        swaps,
    })
}
