//! Price discovery across the bucket book.
//!
//! Starting from the pool's own tick, the buy pass swaps the highest buy
//! bucket into the pool and works downward while the pool price stays below
//! the bucket's limit; the sell pass mirrors it from the lowest sell bucket
//! upward. A bucket is committed whole or not at all, and only while the
//! side's average rate still pays every committed intent its own minimum.

use serde::Serialize;
use tracing::debug;

use crate::clearing::types::{ClearingBounds, ClearingVolumes, Side, TickBook};
use crate::config::ClearingMode;
use crate::errors::Result;
use crate::models::SwapStatus;
use crate::pool::{Fee, Reserves, TickBound, TickCodec, step};

/// State threaded through the passes, returned as the walk's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkReport {
    pub reserves: Reserves,
    pub current_tick: TickBound,
    pub bounds: ClearingBounds,
    pub volumes: ClearingVolumes,
    pub buy_commits: usize,
    pub sell_commits: usize,
    pub rounds: usize,
}

pub struct Walker<'a> {
    book: &'a TickBook,
    codec: TickCodec,
    fee: Fee,
}

impl<'a> Walker<'a> {
    pub fn new(book: &'a TickBook, codec: TickCodec, fee: Fee) -> Self {
        Self { book, codec, fee }
    }

    /// Runs the passes according to `mode`. `reserves` must be liquid.
    pub fn walk(
        &self,
        reserves: Reserves,
        bounds: ClearingBounds,
        mode: ClearingMode,
    ) -> Result<WalkReport> {
        let mut state = WalkReport {
            reserves,
            current_tick: self.codec.reserves_tick(&reserves)?,
            bounds,
            volumes: ClearingVolumes::default(),
            buy_commits: 0,
            sell_commits: 0,
            rounds: 0,
        };

        loop {
            state.rounds += 1;
            let bought = self.pass(Side::Buy, &mut state)?;
            let sold = self.pass(Side::Sell, &mut state)?;
            state.buy_commits += bought;
            state.sell_commits += sold;

            if mode == ClearingMode::SinglePass || bought + sold == 0 {
                break;
            }
        }

        debug!(
            rounds = state.rounds,
            buy_commits = state.buy_commits,
            sell_commits = state.sell_commits,
            current_tick = %state.current_tick,
            "[WALK] clearing finished"
        );
        Ok(state)
    }

    /// Commits buckets on one side until the price or a guarantee stops it.
    /// Returns the number of committed buckets.
    fn pass(&self, side: Side, state: &mut WalkReport) -> Result<usize> {
        let mut commits = 0;

        loop {
            let bound = state.bounds.get(side);
            if !side.can_advance(state.current_tick, bound) {
                break;
            }
            let Some(bucket) = self.book.get(bound) else {
                break;
            };

            let amount_in = bucket.input(side)?;
            let guarantee = bucket.guarantee(side);
            let res = step(
                state.reserves,
                amount_in,
                side.token_in(),
                guarantee,
                self.fee,
            )?;
            if res.status == SwapStatus::Failure {
                debug!(
                    ?side,
                    tick = %bound,
                    amount_in,
                    guarantee,
                    "[WALK] guarantee not met, pass halted"
                );
                break;
            }

            let post_tick = self.codec.reserves_tick(&res.reserves)?;
            if !side.within_limit(post_tick, bound) {
                debug!(
                    ?side,
                    tick = %bound,
                    post_tick = %post_tick,
                    "[WALK] bucket overshoots its limit, pass halted"
                );
                break;
            }

            let mut volume = *state.volumes.get(side);
            volume.add(amount_in, res.amount_out)?;
            let required = self.book.strictest_rate(side, bound);
            if !required.met_by(volume.amount_in, volume.amount_out) {
                debug!(
                    ?side,
                    tick = %bound,
                    amount_in = volume.amount_in,
                    amount_out = volume.amount_out,
                    "[WALK] side average below a committed minimum, pass halted"
                );
                break;
            }

            state.reserves = res.reserves;
            state.current_tick = post_tick;
            *state.volumes.get_mut(side) = volume;
            state.bounds.set(side, self.book.next_bound(side, bound));
            commits += 1;

            debug!(
                ?side,
                tick = %bound,
                amount_in,
                amount_out = res.amount_out,
                next = %state.bounds.get(side),
                "[WALK] bucket committed"
            );
        }

        Ok(commits)
    }
}
