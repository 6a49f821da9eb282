//! Engine configuration and its environment loader.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ClearingError, Result};
use crate::pool::{DEFAULT_TICK_BASE, Fee, TickCodec};

/// How many times the walker may sweep the two sides of the book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClearingMode {
    /// One buy pass followed by one sell pass.
    #[default]
    SinglePass,
    /// Repeat both passes until a full round commits no bucket.
    FixedPoint,
}

impl FromStr for ClearingMode {
    type Err = ClearingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single-pass" | "single" => Ok(ClearingMode::SinglePass),
            "fixed-point" | "fixpoint" => Ok(ClearingMode::FixedPoint),
            other => Err(ClearingError::Config(format!(
                "unknown clearing mode {other:?} (expected single-pass or fixed-point)"
            ))),
        }
    }
}

impl fmt::Display for ClearingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClearingMode::SinglePass => write!(f, "single-pass"),
            ClearingMode::FixedPoint => write!(f, "fixed-point"),
        }
    }
}

/// Consolidated engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// LP fee applied by every constant-product step.
    pub fee: Fee,
    /// Ratio between adjacent ticks.
    pub tick_base: f64,
    pub mode: ClearingMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fee: Fee::default(),
            tick_base: DEFAULT_TICK_BASE,
            mode: ClearingMode::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(e.into()),
        })
    }

    /// Same as [`EngineConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<Option<String>>,
    {
        let defaults = Self::default();

        let numerator = match lookup("CLEARING_FEE_NUMERATOR")? {
            Some(raw) => raw.trim().parse()?,
            None => defaults.fee.numerator,
        };
        let denominator = match lookup("CLEARING_FEE_DENOMINATOR")? {
            Some(raw) => raw.trim().parse()?,
            None => defaults.fee.denominator,
        };
        let tick_base = match lookup("CLEARING_TICK_BASE")? {
            Some(raw) => raw.trim().parse()?,
            None => defaults.tick_base,
        };
        let mode = match lookup("CLEARING_MODE")? {
            Some(raw) => raw.parse()?,
            None => defaults.mode,
        };

        let config = Self {
            fee: Fee {
                numerator,
                denominator,
            },
            tick_base,
            mode,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fee.denominator == 0 {
            return Err(ClearingError::Config(
                "fee denominator must be positive".into(),
            ));
        }
        if self.fee.numerator > self.fee.denominator {
            return Err(ClearingError::Config(format!(
                "fee numerator {} exceeds denominator {}",
                self.fee.numerator, self.fee.denominator
            )));
        }
        TickCodec::new(self.tick_base).map(|_| ())
    }

    pub fn tick_codec(&self) -> Result<TickCodec> {
        TickCodec::new(self.tick_base)
    }
}
