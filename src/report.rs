//! Side-by-side comparison of batch clearing against the sequential router.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Serialize, Serializer};

use crate::engine::{BatchReport, ClearingEngine};
use crate::errors::Result;
use crate::models::{ClearingResult, SwapIntent, SwapStatus, Token};
use crate::pool::Reserves;

/// Decimal places kept for reported prices.
const PRICE_SCALE: i64 = 18;

/// Per-intent outcomes of both modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub index: usize,
    pub token_in: Token,
    pub amount_in: u128,
    pub batch_amount_out: u128,
    pub batch_status: SwapStatus,
    pub sequential_amount_out: u128,
    pub sequential_status: SwapStatus,
}

/// Prices are asset 0 per asset 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSummary {
    pub filled: usize,
    #[serde(serialize_with = "serialize_price")]
    pub final_pool_price: Option<BigDecimal>,
    /// Asset 0 paid per asset 1 received by successful buys.
    #[serde(serialize_with = "serialize_price")]
    pub buy_average_price: Option<BigDecimal>,
    /// Asset 0 received per asset 1 paid by successful sells.
    #[serde(serialize_with = "serialize_price")]
    pub sell_average_price: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    #[serde(serialize_with = "serialize_price")]
    pub initial_pool_price: Option<BigDecimal>,
    pub batch: BatchReport,
    pub sequential: ClearingResult,
    pub batch_summary: ModeSummary,
    pub sequential_summary: ModeSummary,
    pub rows: Vec<ComparisonRow>,
}

/// Runs both modes over the same snapshot.
pub fn compare(
    engine: &ClearingEngine,
    reserves: Reserves,
    intents: &[SwapIntent],
) -> Result<Comparison> {
    let batch = engine.clear_batch(reserves, intents)?;
    let sequential = engine.simulate_sequential_swap(reserves, intents)?;

    let rows = intents
        .iter()
        .zip(batch.result.swaps.iter().zip(&sequential.swaps))
        .enumerate()
        .map(|(index, (intent, (b, s)))| ComparisonRow {
            index,
            token_in: intent.token_in,
            amount_in: intent.amount_in,
            batch_amount_out: b.amount_out,
            batch_status: b.status,
            sequential_amount_out: s.amount_out,
            sequential_status: s.status,
        })
        .collect();

    Ok(Comparison {
        initial_pool_price: pool_price(&reserves),
        batch_summary: summarize(&batch.result),
        sequential_summary: summarize(&sequential),
        batch,
        sequential,
        rows,
    })
}

pub fn summarize(result: &ClearingResult) -> ModeSummary {
    let mut buy = (0u128, 0u128);
    let mut sell = (0u128, 0u128);
    let mut filled = 0;

    for swap in result.swaps.iter().filter(|s| s.is_success()) {
        filled += 1;
        let side = match swap.token_in {
            Token::Token0 => &mut buy,
            Token::Token1 => &mut sell,
        };
        side.0 = side.0.saturating_add(swap.amount_in);
        side.1 = side.1.saturating_add(swap.amount_out);
    }

    ModeSummary {
        filled,
        final_pool_price: pool_price(&result.reserves),
        buy_average_price: ratio(buy.0, buy.1),
        sell_average_price: ratio(sell.1, sell.0),
    }
}

pub fn pool_price(reserves: &Reserves) -> Option<BigDecimal> {
    ratio(reserves.reserve0, reserves.reserve1)
}

/// `numerator / denominator` as an exact decimal truncated to
/// `PRICE_SCALE` places; `None` when the denominator is zero.
fn ratio(numerator: u128, denominator: u128) -> Option<BigDecimal> {
    if denominator == 0 {
        return None;
    }
    let numerator = BigDecimal::from_str(&numerator.to_string()).ok()?;
    let denominator = BigDecimal::from_str(&denominator.to_string()).ok()?;
    Some((numerator / denominator).with_scale(PRICE_SCALE).normalized())
}

fn serialize_price<S: Serializer>(
    price: &Option<BigDecimal>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match price {
        Some(price) => serializer.collect_str(price),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn ratio_is_exact_and_truncated() {
        assert_eq!(ratio(10, 8), Some(decimal("1.25")));
        assert_eq!(ratio(1, 3), Some(decimal("0.333333333333333333")));
        assert_eq!(ratio(5, 0), None);
    }

    #[test]
    fn compare_reports_both_modes() {
        let engine = ClearingEngine::default();
        let intents = [
            SwapIntent::new(10, Token::Token0, 0),
            SwapIntent::new(10, Token::Token0, 0),
        ];
        let report = compare(&engine, Reserves::new(1_000, 1_000), &intents).unwrap();

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.initial_pool_price, Some(decimal("1")));

        // Batch: 20 in -> 19 out, split 9/9 with 1 returned to the pool.
        assert_eq!(report.rows[0].batch_amount_out, 9);
        assert_eq!(report.rows[1].batch_amount_out, 9);
        // Sequential: 9 at (1000, 1000), then 9 at (1010, 991).
        assert_eq!(report.rows[0].sequential_amount_out, 9);
        assert_eq!(report.rows[1].sequential_amount_out, 9);

        assert_eq!(report.batch_summary.filled, 2);
        assert_eq!(
            report.batch_summary.buy_average_price,
            Some(decimal("1.111111111111111111"))
        );
        assert_eq!(report.batch_summary.sell_average_price, None);
    }

    #[test]
    fn comparison_serializes_prices_as_strings() {
        let engine = ClearingEngine::default();
        let intents = [SwapIntent::new(10, Token::Token0, 8)];
        let report = compare(&engine, Reserves::new(100, 100), &intents).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["batchSummary"]["buyAveragePrice"], "1.111111111111111111");
        assert!(json["batchSummary"]["sellAveragePrice"].is_null());
        assert_eq!(json["batch"]["result"]["reserves"][0], 110);
        assert_eq!(json["rows"][0]["batchStatus"], "success");
    }
}
