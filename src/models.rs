//! Shared data structures used throughout the engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ClearingError, Result};
use crate::pool::Reserves;

/// Which asset an intent sells into the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Token {
    /// Sells asset 0 for asset 1; pushes the pool price up (buy side).
    Token0,
    /// Sells asset 1 for asset 0; pushes the pool price down (sell side).
    Token1,
}

impl Token {
    pub fn index(self) -> usize {
        match self {
            Token::Token0 => 0,
            Token::Token1 => 1,
        }
    }

    pub fn other(self) -> Token {
        match self {
            Token::Token0 => Token::Token1,
            Token::Token1 => Token::Token0,
        }
    }
}

impl TryFrom<u8> for Token {
    type Error = ClearingError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Token::Token0),
            1 => Ok(Token::Token1),
            other => Err(ClearingError::UnknownToken(other)),
        }
    }
}

impl From<Token> for u8 {
    fn from(token: Token) -> Self {
        token.index() as u8
    }
}

/// A user's request to trade `amount_in` of `token_in` for at least
/// `amount_out` of the other asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapIntent {
    pub amount_in: u128,
    pub token_in: Token,
    /// Minimum acceptable output; zero means no price limit.
    pub amount_out: u128,
}

impl SwapIntent {
    pub fn new(amount_in: u128, token_in: Token, amount_out: u128) -> Self {
        Self {
            amount_in,
            token_in,
            amount_out,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Success,
    Failure,
}

/// Settlement of a single intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapOutcome {
    pub amount_in: u128,
    pub amount_out: u128,
    pub status: SwapStatus,
    pub token_in: Token,
}

impl SwapOutcome {
    pub fn success(intent: &SwapIntent, amount_out: u128) -> Self {
        Self {
            amount_in: intent.amount_in,
            amount_out,
            status: SwapStatus::Success,
            token_in: intent.token_in,
        }
    }

    pub fn failure(intent: &SwapIntent) -> Self {
        Self {
            amount_in: intent.amount_in,
            amount_out: 0,
            status: SwapStatus::Failure,
            token_in: intent.token_in,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SwapStatus::Success
    }
}

/// Final pool state plus one outcome per submitted intent, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearingResult {
    pub reserves: Reserves,
    pub swaps: Vec<SwapOutcome>,
}

/// A pool snapshot and the batch submitted against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSnapshot {
    pub reserves: Reserves,
    pub intents: Vec<SwapIntent>,
}

impl BatchSnapshot {
    /// Reads a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
