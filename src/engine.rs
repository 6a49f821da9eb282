//! Public entry points: batch clearing, the sequential baseline and quotes.

use serde::Serialize;
use tracing::debug;

use crate::clearing::{
    ClearingBounds, ClearingVolumes, WalkReport, Walker, aggregate, distribute,
};
use crate::config::EngineConfig;
use crate::errors::Result;
use crate::models::{ClearingResult, SwapIntent, Token};
use crate::pool::{self, Reserves, TickCodec};

/// Batch clearing plus the walker's view of how it got there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub result: ClearingResult,
    /// Absent when no intent was eligible and the pool was never touched.
    pub walk: Option<WalkReport>,
    /// Rounding dust credited back to the asset-1 reserve.
    pub buy_remainder: u128,
    /// Rounding dust credited back to the asset-0 reserve.
    pub sell_remainder: u128,
}

/// Stateless engine bound to one configuration. Every call is a pure
/// function of its arguments, so one engine can serve any number of
/// independent batches.
#[derive(Debug, Clone, Copy)]
pub struct ClearingEngine {
    config: EngineConfig,
    codec: TickCodec,
}

impl Default for ClearingEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            codec: TickCodec::default(),
        }
    }
}

impl ClearingEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            codec: config.tick_codec()?,
            config,
        })
    }

    pub fn quote_out(&self, reserves: &Reserves, amount_in: u128, token_in: Token) -> u128 {
        pool::quote_out(reserves, amount_in, token_in, self.config.fee)
    }

    /// One intent at a time against a moving constant-product curve.
    pub fn simulate_sequential_swap(
        &self,
        reserves: Reserves,
        intents: &[SwapIntent],
    ) -> Result<ClearingResult> {
        if intents.iter().any(|intent| intent.amount_in > 0) {
            reserves.ensure_liquid()?;
        }
        pool::simulate_sequential(reserves, intents, self.config.fee)
    }

    pub fn simulate_batch_clearing(
        &self,
        reserves: Reserves,
        intents: &[SwapIntent],
    ) -> Result<ClearingResult> {
        self.clear_batch(reserves, intents).map(|report| report.result)
    }

    /// Aggregate, walk, distribute.
    pub fn clear_batch(&self, reserves: Reserves, intents: &[SwapIntent]) -> Result<BatchReport> {
        let book = aggregate(&self.codec, intents)?;

        if book.pending.is_empty() {
            let idle = distribute(
                intents,
                &book.pending,
                &ClearingBounds::default(),
                &ClearingVolumes::default(),
            )?;
            return Ok(BatchReport {
                result: ClearingResult {
                    reserves,
                    swaps: idle.swaps,
                },
                walk: None,
                buy_remainder: 0,
                sell_remainder: 0,
            });
        }

        reserves.ensure_liquid()?;
        let walk = Walker::new(&book.book, self.codec, self.config.fee).walk(
            reserves,
            book.bounds,
            self.config.mode,
        )?;
        let settled = distribute(intents, &book.pending, &walk.bounds, &walk.volumes)?;

        let reserves = walk
            .reserves
            .credit(Token::Token1, settled.buy_remainder)?
            .credit(Token::Token0, settled.sell_remainder)?;

        debug!(
            intents = intents.len(),
            filled = settled.swaps.iter().filter(|s| s.is_success()).count(),
            buy_in = walk.volumes.buy.amount_in,
            buy_out = walk.volumes.buy.amount_out,
            sell_in = walk.volumes.sell.amount_in,
            sell_out = walk.volumes.sell.amount_out,
            "[BATCH] cleared"
        );

        Ok(BatchReport {
            result: ClearingResult {
                reserves,
                swaps: settled.swaps,
            },
            walk: Some(walk),
            buy_remainder: settled.buy_remainder,
            sell_remainder: settled.sell_remainder,
        })
    }
}
