//! Batch swap clearing for a two-asset constant-product pool.
//!
//! Instead of executing swap intents one after another against a moving
//! curve, a batch is bucketed by limit tick, walked outward from the pool
//! price, and settled so that every filled intent on a side pays the same
//! average price.
//!
//! The crate-level functions use the reference configuration (0.3% fee,
//! 1.0001 tick base, single-pass walk); build a [`ClearingEngine`] for
//! anything else.

pub mod clearing;
pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod pool;
pub mod report;
pub mod utils;

pub use config::{ClearingMode, EngineConfig};
pub use engine::{BatchReport, ClearingEngine};
pub use errors::{ClearingError, Result};
pub use models::{BatchSnapshot, ClearingResult, SwapIntent, SwapOutcome, SwapStatus, Token};
pub use pool::{Fee, Reserves, TickBound, TickCodec};

/// Clears `intents` as one batch against `reserves`.
pub fn simulate_batch_clearing(
    reserves: Reserves,
    intents: &[SwapIntent],
) -> Result<ClearingResult> {
    ClearingEngine::default().simulate_batch_clearing(reserves, intents)
}

/// Executes `intents` one at a time, the non-batched baseline.
pub fn simulate_sequential_swap(
    reserves: Reserves,
    intents: &[SwapIntent],
) -> Result<ClearingResult> {
    ClearingEngine::default().simulate_sequential_swap(reserves, intents)
}

/// Output of a single swap, without committing it.
pub fn quote_out(reserves: &Reserves, amount_in: u128, token_in: Token) -> u128 {
    ClearingEngine::default().quote_out(reserves, amount_in, token_in)
}
