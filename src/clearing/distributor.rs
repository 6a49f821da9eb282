//! Batch-auction settlement: every crossed order on a side receives the same
//! average price, `side output / side input`, applied to its own input.

use crate::clearing::types::{ClearingBounds, ClearingVolumes, PendingOrder, Side};
use crate::errors::{ClearingError, Result};
use crate::models::{SwapIntent, SwapOutcome};
use crate::utils::mul_div;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    /// One outcome per submitted intent.
    pub swaps: Vec<SwapOutcome>,
    /// Asset-1 output of the buy side left over by floor division.
    pub buy_remainder: u128,
    /// Asset-0 output of the sell side left over by floor division.
    pub sell_remainder: u128,
}

pub fn distribute(
    intents: &[SwapIntent],
    pending: &[PendingOrder],
    bounds: &ClearingBounds,
    volumes: &ClearingVolumes,
) -> Result<Distribution> {
    let mut swaps: Vec<SwapOutcome> = intents.iter().map(SwapOutcome::failure).collect();
    let mut paid = ClearingVolumes::default();

    for order in pending {
        let side = order.side();
        let volume = volumes.get(side);
        if volume.is_empty() || !side.crossed(order, bounds.get(side)) {
            continue;
        }

        let amount_out = mul_div(order.amount_in, volume.amount_out, volume.amount_in)
            .ok_or(ClearingError::AmountOverflow("distributing side output"))?;
        paid.get_mut(side).add(order.amount_in, amount_out)?;
        swaps[order.index] = SwapOutcome::success(&intents[order.index], amount_out);
    }

    let remainder = |side: Side| {
        volumes
            .get(side)
            .amount_out
            .checked_sub(paid.get(side).amount_out)
            .ok_or(ClearingError::AmountOverflow("paying out more than was cleared"))
    };

    Ok(Distribution {
        swaps,
        buy_remainder: remainder(Side::Buy)?,
        sell_remainder: remainder(Side::Sell)?,
    })
}
