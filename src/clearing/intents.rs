//! Folding a batch of intents into tick buckets.

use crate::clearing::types::{ClearingBounds, PendingOrder, Side, TickBook};
use crate::errors::Result;
use crate::models::{SwapIntent, Token};
use crate::pool::{TickBound, TickCodec};

/// Everything the walker and the distributor need from a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentBook {
    pub book: TickBook,
    pub bounds: ClearingBounds,
    /// Eligible intents in submission order.
    pub pending: Vec<PendingOrder>,
}

/// Converts an intent into its tick window.
///
/// Buys accept any price up to `amount_in / amount_out` and have no lower
/// bound; sells accept any price down to `amount_out / amount_in` and have no
/// upper bound. Returns `None` for a zero input.
pub fn to_pending_order(
    codec: &TickCodec,
    index: usize,
    intent: &SwapIntent,
) -> Result<Option<PendingOrder>> {
    if intent.amount_in == 0 {
        return Ok(None);
    }

    let (min_tick, max_tick) = match intent.token_in {
        Token::Token0 => (
            TickBound::NegInfinity,
            codec.ratio_tick(intent.amount_in, intent.amount_out)?,
        ),
        Token::Token1 => (
            codec.ratio_tick(intent.amount_out, intent.amount_in)?,
            TickBound::PosInfinity,
        ),
    };

    Ok(Some(PendingOrder {
        index,
        amount_in: intent.amount_in,
        token_in: intent.token_in,
        max_tick,
        min_tick,
    }))
}

/// Builds the bucket book for a batch.
///
/// Each order adds its input at its limit tick and removes it again at the
/// opposite sentinel, so the book reads as net liquidity entering and leaving
/// range. The declared minimum output, as a sum and as a rate, is recorded at
/// the limit tick.
pub fn aggregate(codec: &TickCodec, intents: &[SwapIntent]) -> Result<IntentBook> {
    let mut out = IntentBook::default();

    for (index, intent) in intents.iter().enumerate() {
        let Some(order) = to_pending_order(codec, index, intent)? else {
            tracing::trace!(index, "[AGG] zero input, intent rejected");
            continue;
        };

        let side = order.side();
        let limit = order.limit_tick();
        let release = match side {
            Side::Buy => order.min_tick,
            Side::Sell => order.max_tick,
        };

        let bucket = out.book.bucket_mut(limit);
        bucket.add_supply(order.token_in, order.amount_in)?;
        bucket.add_guarantee(side, order.amount_in, intent.amount_out)?;
        out.book
            .bucket_mut(release)
            .remove_supply(order.token_in, order.amount_in)?;

        out.bounds.extend(side, limit);
        out.pending.push(order);
    }

    tracing::debug!(
        pending = out.pending.len(),
        buckets = out.book.len(),
        max_tick_buy = %out.bounds.max_tick_buy,
        min_tick_sell = %out.bounds.min_tick_sell,
        "[AGG] batch aggregated"
    );
    Ok(out)
}
