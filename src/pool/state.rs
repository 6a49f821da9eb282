use serde::{Deserialize, Serialize};

use crate::errors::{ClearingError, Result};
use crate::models::Token;

/// Immutable snapshot of the two pool balances. Every swap produces a new
/// value instead of mutating a shared one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u128; 2]", into = "[u128; 2]")]
pub struct Reserves {
    /// Balance of asset 0.
    pub reserve0: u128,
    /// Balance of asset 1.
    pub reserve1: u128,
}

impl Reserves {
    pub fn new(reserve0: u128, reserve1: u128) -> Self {
        Self { reserve0, reserve1 }
    }

    pub fn get(&self, token: Token) -> u128 {
        match token {
            Token::Token0 => self.reserve0,
            Token::Token1 => self.reserve1,
        }
    }

    /// `(reserve_in, reserve_out)` for a trade selling `token_in`.
    pub fn oriented(&self, token_in: Token) -> (u128, u128) {
        (self.get(token_in), self.get(token_in.other()))
    }

    /// Applies a committed swap: `amount_in` enters on `token_in`'s side and
    /// `amount_out` leaves the other side.
    pub fn apply_swap(&self, token_in: Token, amount_in: u128, amount_out: u128) -> Result<Self> {
        let (reserve_in, reserve_out) = self.oriented(token_in);
        let reserve_in = reserve_in
            .checked_add(amount_in)
            .ok_or(ClearingError::AmountOverflow("crediting the input reserve"))?;
        let reserve_out = reserve_out
            .checked_sub(amount_out)
            .ok_or(ClearingError::AmountOverflow("debiting the output reserve"))?;
        Ok(match token_in {
            Token::Token0 => Self::new(reserve_in, reserve_out),
            Token::Token1 => Self::new(reserve_out, reserve_in),
        })
    }

    /// Returns `amount` to `token`'s side of the pool.
    pub fn credit(&self, token: Token, amount: u128) -> Result<Self> {
        let credited = self
            .get(token)
            .checked_add(amount)
            .ok_or(ClearingError::AmountOverflow("crediting a settlement remainder"))?;
        Ok(match token {
            Token::Token0 => Self::new(credited, self.reserve1),
            Token::Token1 => Self::new(self.reserve0, credited),
        })
    }

    pub fn is_liquid(&self) -> bool {
        self.reserve0 > 0 && self.reserve1 > 0
    }

    pub fn ensure_liquid(&self) -> Result<()> {
        if self.is_liquid() {
            Ok(())
        } else {
            Err(ClearingError::DepletedReserves(self.reserve0, self.reserve1))
        }
    }

    /// Spot price of asset 1 quoted in asset 0. Only meaningful for liquid
    /// reserves.
    pub fn spot_price(&self) -> f64 {
        self.reserve0 as f64 / self.reserve1 as f64
    }
}

impl From<[u128; 2]> for Reserves {
    fn from([reserve0, reserve1]: [u128; 2]) -> Self {
        Self::new(reserve0, reserve1)
    }
}

impl From<Reserves> for [u128; 2] {
    fn from(reserves: Reserves) -> Self {
        [reserves.reserve0, reserves.reserve1]
    }
}
