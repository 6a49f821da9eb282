//! Price ⇄ tick conversion on a logarithmic grid.
//!
//! `price(tick) = base^tick`, `tick(price) = floor(ln(price) / ln(base))`.
//! Floating point never leaves this module as an amount: callers only use the
//! resulting ticks to decide which bucket to touch next.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ClearingError, Result};
use crate::pool::state::Reserves;

/// 1.0001, i.e. roughly one basis point per tick.
pub const DEFAULT_TICK_BASE: f64 = 1.0001;

/// A tick, or one of the two sentinels standing for "no limit".
///
/// Variant order gives the total order `NegInfinity < At(_) < PosInfinity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TickBound {
    NegInfinity,
    At(i32),
    PosInfinity,
}

impl fmt::Display for TickBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickBound::NegInfinity => write!(f, "-inf"),
            TickBound::At(tick) => write!(f, "{tick}"),
            TickBound::PosInfinity => write!(f, "+inf"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickCodec {
    base: f64,
    ln_base: f64,
}

impl Default for TickCodec {
    fn default() -> Self {
        Self {
            base: DEFAULT_TICK_BASE,
            ln_base: DEFAULT_TICK_BASE.ln(),
        }
    }
}

impl TickCodec {
    /// Fails unless every ratio of two nonzero `u128` amounts has a tick
    /// that fits in `i32`.
    pub fn new(base: f64) -> Result<Self> {
        if !base.is_finite() || base <= 1.0 {
            return Err(ClearingError::Config(format!(
                "tick base must be finite and greater than 1, got {base}"
            )));
        }
        let ln_base = base.ln();
        let widest = (u128::MAX as f64).ln() / ln_base;
        if widest + 1.0 >= i32::MAX as f64 {
            return Err(ClearingError::Config(format!(
                "tick base {base} is too fine: u128 ratios would need ticks past i32"
            )));
        }
        Ok(Self { base, ln_base })
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn tick_to_price(&self, tick: i32) -> f64 {
        self.base.powi(tick)
    }

    pub fn price_to_tick(&self, price: f64) -> Result<i32> {
        if !price.is_finite() || price <= 0.0 {
            return Err(ClearingError::InvalidPrice(price));
        }
        let tick = (price.ln() / self.ln_base).floor();
        if tick < i32::MIN as f64 || tick > i32::MAX as f64 {
            return Err(ClearingError::InvalidPrice(price));
        }
        Ok(tick as i32)
    }

    /// Tick of the pool's spot price (asset 1 in units of asset 0).
    pub fn reserves_tick(&self, reserves: &Reserves) -> Result<TickBound> {
        reserves.ensure_liquid()?;
        self.price_to_tick(reserves.spot_price()).map(TickBound::At)
    }

    /// Tick of the ratio `numerator / denominator` of two integer amounts.
    /// A zero denominator is "unbounded above", a zero numerator "unbounded
    /// below", so the codec is never evaluated at 0 or infinity.
    pub fn ratio_tick(&self, numerator: u128, denominator: u128) -> Result<TickBound> {
        match (numerator, denominator) {
            (0, 0) => Err(ClearingError::InvalidPrice(f64::NAN)),
            (_, 0) => Ok(TickBound::PosInfinity),
            (0, _) => Ok(TickBound::NegInfinity),
            (n, d) => self.price_to_tick(n as f64 / d as f64).map(TickBound::At),
        }
    }
}
