use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};

use alloy_primitives::{I256, U256};
use serde::Serialize;

use crate::errors::{ClearingError, Result};
use crate::models::Token;
use crate::pool::TickBound;

/// Direction of a clearing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Asset 0 in, asset 1 out. Walks `max_tick_buy` downward.
    Buy,
    /// Asset 1 in, asset 0 out. Walks `min_tick_sell` upward.
    Sell,
}

impl Side {
    pub fn of(token_in: Token) -> Self {
        match token_in {
            Token::Token0 => Side::Buy,
            Token::Token1 => Side::Sell,
        }
    }

    pub fn token_in(self) -> Token {
        match self {
            Side::Buy => Token::Token0,
            Side::Sell => Token::Token1,
        }
    }

    /// Bound value once no bucket is left on this side.
    pub fn exhausted(self) -> TickBound {
        match self {
            Side::Buy => TickBound::NegInfinity,
            Side::Sell => TickBound::PosInfinity,
        }
    }

    /// Whether the pool price still lies strictly inside this side's bound.
    pub fn can_advance(self, current: TickBound, bound: TickBound) -> bool {
        match self {
            Side::Buy => current < bound,
            Side::Sell => current > bound,
        }
    }

    /// Whether a post-swap price still respects the bucket's limit.
    pub fn within_limit(self, post: TickBound, bound: TickBound) -> bool {
        match self {
            Side::Buy => post <= bound,
            Side::Sell => post >= bound,
        }
    }

    /// Whether a pending order's limit tick lies beyond the final bound,
    /// i.e. its bucket was committed.
    pub fn crossed(self, order: &PendingOrder, bound: TickBound) -> bool {
        match self {
            Side::Buy => order.max_tick > bound,
            Side::Sell => order.min_tick < bound,
        }
    }
}

/// Minimum output per unit of input, as an exact fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinRate {
    pub amount_out: u128,
    pub amount_in: u128,
}

impl Default for MinRate {
    fn default() -> Self {
        Self {
            amount_out: 0,
            amount_in: 1,
        }
    }
}

impl MinRate {
    pub fn new(amount_in: u128, amount_out: u128) -> Self {
        Self {
            amount_out,
            amount_in,
        }
    }

    /// Whether `amount_out` for `amount_in` pays at least this rate.
    ///
    /// Equivalent to `floor(x * amount_out / amount_in) >= x * rate` for
    /// every order of input `x` priced at this rate.
    pub fn met_by(self, amount_in: u128, amount_out: u128) -> bool {
        U256::from(amount_out) * U256::from(self.amount_in)
            >= U256::from(self.amount_out) * U256::from(amount_in)
    }

    /// The higher of two rates; `self` on a tie.
    pub fn stricter(self, other: MinRate) -> MinRate {
        if other.met_by(self.amount_in, self.amount_out) {
            self
        } else {
            other
        }
    }
}

/// Net liquidity committed at one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickBucket {
    /// Net asset-0 supply; positive at buy limits, negative at `-inf`.
    pub supply0_net: I256,
    /// Net asset-1 supply; positive at sell limits, negative at `+inf`.
    pub supply1_net: I256,
    /// Asset-0 output owed to the sell intents limited here.
    pub min0_out: u128,
    /// Asset-1 output owed to the buy intents limited here.
    pub min1_out: u128,
    /// Strictest rate asked by a sell intent limited here.
    pub min0_rate: MinRate,
    /// Strictest rate asked by a buy intent limited here.
    pub min1_rate: MinRate,
}

impl TickBucket {
    fn net_mut(&mut self, token: Token) -> &mut I256 {
        match token {
            Token::Token0 => &mut self.supply0_net,
            Token::Token1 => &mut self.supply1_net,
        }
    }

    pub fn net(&self, token: Token) -> I256 {
        match token {
            Token::Token0 => self.supply0_net,
            Token::Token1 => self.supply1_net,
        }
    }

    pub fn add_supply(&mut self, token: Token, amount: u128) -> Result<()> {
        let net = self.net_mut(token);
        *net = net
            .checked_add(signed(amount))
            .ok_or(ClearingError::AmountOverflow("adding bucket supply"))?;
        Ok(())
    }

    pub fn remove_supply(&mut self, token: Token, amount: u128) -> Result<()> {
        let net = self.net_mut(token);
        *net = net
            .checked_sub(signed(amount))
            .ok_or(ClearingError::AmountOverflow("removing bucket supply"))?;
        Ok(())
    }

    /// Records an order's declared minimum `min_out` for `amount_in`.
    pub fn add_guarantee(&mut self, side: Side, amount_in: u128, min_out: u128) -> Result<()> {
        let (slot, rate) = match side {
            Side::Buy => (&mut self.min1_out, &mut self.min1_rate),
            Side::Sell => (&mut self.min0_out, &mut self.min0_rate),
        };
        *slot = slot
            .checked_add(min_out)
            .ok_or(ClearingError::AmountOverflow("accumulating a bucket guarantee"))?;
        *rate = rate.stricter(MinRate::new(amount_in, min_out));
        Ok(())
    }

    pub fn rate(&self, side: Side) -> MinRate {
        match side {
            Side::Buy => self.min1_rate,
            Side::Sell => self.min0_rate,
        }
    }

    /// Output the bucket's intents require before it may be committed.
    pub fn guarantee(&self, side: Side) -> u128 {
        match side {
            Side::Buy => self.min1_out,
            Side::Sell => self.min0_out,
        }
    }

    /// Positive part of the side's net supply, i.e. what a pass would swap.
    pub fn input(&self, side: Side) -> Result<u128> {
        let net = self.net(side.token_in());
        if !net.is_positive() {
            return Ok(0);
        }
        u128::try_from(net.into_raw())
            .map_err(|_| ClearingError::AmountOverflow("bucket supply exceeds u128"))
    }

    pub fn offers(&self, side: Side) -> bool {
        self.net(side.token_in()).is_positive()
    }
}

fn signed(amount: u128) -> I256 {
    I256::from_raw(U256::from(amount))
}

/// Buckets ordered by tick, including the two sentinels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickBook {
    buckets: BTreeMap<TickBound, TickBucket>,
}

impl TickBook {
    pub fn bucket_mut(&mut self, tick: TickBound) -> &mut TickBucket {
        self.buckets.entry(tick).or_default()
    }

    pub fn get(&self, tick: TickBound) -> Option<&TickBucket> {
        self.buckets.get(&tick)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Strictest rate over the side's buckets from where its walk starts
    /// through `bound`, i.e. every bucket committed once `bound` is.
    pub fn strictest_rate(&self, side: Side, bound: TickBound) -> MinRate {
        let tighten = |rate: MinRate, (_, bucket): (&TickBound, &TickBucket)| {
            rate.stricter(bucket.rate(side))
        };
        match side {
            Side::Buy => self
                .buckets
                .range((Included(bound), Unbounded))
                .fold(MinRate::default(), tighten),
            Side::Sell => self
                .buckets
                .range((Unbounded, Included(bound)))
                .fold(MinRate::default(), tighten),
        }
    }

    /// Next bucket past `from` (below for buys, above for sells) that still
    /// offers liquidity on `side`, or the side's exhausted sentinel.
    pub fn next_bound(&self, side: Side, from: TickBound) -> TickBound {
        let next = match side {
            Side::Buy => self
                .buckets
                .range(..from)
                .rev()
                .find(|(_, bucket)| bucket.offers(side)),
            Side::Sell => self
                .buckets
                .range((Excluded(from), Unbounded))
                .find(|(_, bucket)| bucket.offers(side)),
        };
        next.map(|(tick, _)| *tick).unwrap_or(side.exhausted())
    }
}

/// How far each side may move the pool price ("slot0").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearingBounds {
    pub max_tick_buy: TickBound,
    pub min_tick_sell: TickBound,
}

impl Default for ClearingBounds {
    fn default() -> Self {
        Self {
            max_tick_buy: Side::Buy.exhausted(),
            min_tick_sell: Side::Sell.exhausted(),
        }
    }
}

impl ClearingBounds {
    pub fn get(&self, side: Side) -> TickBound {
        match side {
            Side::Buy => self.max_tick_buy,
            Side::Sell => self.min_tick_sell,
        }
    }

    pub fn set(&mut self, side: Side, bound: TickBound) {
        match side {
            Side::Buy => self.max_tick_buy = bound,
            Side::Sell => self.min_tick_sell = bound,
        }
    }

    /// Widens the side's bound to include `tick`.
    pub fn extend(&mut self, side: Side, tick: TickBound) {
        match side {
            Side::Buy => self.max_tick_buy = self.max_tick_buy.max(tick),
            Side::Sell => self.min_tick_sell = self.min_tick_sell.min(tick),
        }
    }
}

/// An eligible intent, reduced to its tick window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOrder {
    /// Position of the intent in the submitted batch.
    pub index: usize,
    pub amount_in: u128,
    pub token_in: Token,
    pub max_tick: TickBound,
    pub min_tick: TickBound,
}

impl PendingOrder {
    pub fn side(&self) -> Side {
        Side::of(self.token_in)
    }

    /// The tick this order's liquidity is bucketed at.
    pub fn limit_tick(&self) -> TickBound {
        match self.side() {
            Side::Buy => self.max_tick,
            Side::Sell => self.min_tick,
        }
    }
}

/// Aggregate input and output of one side's committed buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideVolume {
    pub amount_in: u128,
    pub amount_out: u128,
}

impl SideVolume {
    pub fn add(&mut self, amount_in: u128, amount_out: u128) -> Result<()> {
        self.amount_in = self
            .amount_in
            .checked_add(amount_in)
            .ok_or(ClearingError::AmountOverflow("accumulating input volume"))?;
        self.amount_out = self
            .amount_out
            .checked_add(amount_out)
            .ok_or(ClearingError::AmountOverflow("accumulating output volume"))?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.amount_in == 0
    }
}

/// The walker's four totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearingVolumes {
    /// Asset-0 in, asset-1 out.
    pub buy: SideVolume,
    /// Asset-1 in, asset-0 out.
    pub sell: SideVolume,
}

impl ClearingVolumes {
    pub fn get(&self, side: Side) -> &SideVolume {
        match side {
            Side::Buy => &self.buy,
            Side::Sell => &self.sell,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut SideVolume {
        match side {
            Side::Buy => &mut self.buy,
            Side::Sell => &mut self.sell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_nets_are_signed() {
        let mut bucket = TickBucket::default();
        bucket.remove_supply(Token::Token0, 40).unwrap();
        assert!(!bucket.offers(Side::Buy));
        assert_eq!(bucket.input(Side::Buy).unwrap(), 0);

        bucket.add_supply(Token::Token0, 100).unwrap();
        assert!(bucket.offers(Side::Buy));
        assert_eq!(bucket.input(Side::Buy).unwrap(), 60);
        assert!(!bucket.offers(Side::Sell));
    }

    #[test]
    fn bucket_supply_beyond_u128_is_an_error() {
        let mut bucket = TickBucket::default();
        bucket.add_supply(Token::Token1, u128::MAX).unwrap();
        bucket.add_supply(Token::Token1, u128::MAX).unwrap();
        assert!(matches!(
            bucket.input(Side::Sell),
            Err(ClearingError::AmountOverflow(_))
        ));
    }

    #[test]
    fn next_bound_skips_other_side_buckets() {
        let mut book = TickBook::default();
        book.bucket_mut(TickBound::At(100))
            .add_supply(Token::Token0, 5)
            .unwrap();
        book.bucket_mut(TickBound::At(50))
            .add_supply(Token::Token1, 5)
            .unwrap();
        book.bucket_mut(TickBound::At(30))
            .add_supply(Token::Token0, 5)
            .unwrap();
        book.bucket_mut(TickBound::NegInfinity)
            .remove_supply(Token::Token0, 10)
            .unwrap();

        assert_eq!(
            book.next_bound(Side::Buy, TickBound::At(100)),
            TickBound::At(30)
        );
        assert_eq!(
            book.next_bound(Side::Buy, TickBound::At(30)),
            TickBound::NegInfinity
        );
        assert_eq!(
            book.next_bound(Side::Sell, TickBound::NegInfinity),
            TickBound::At(50)
        );
        assert_eq!(
            book.next_bound(Side::Sell, TickBound::At(50)),
            TickBound::PosInfinity
        );
    }

    #[test]
    fn min_rate_compares_exactly() {
        let rate = MinRate::new(100_000, 99_995);
        assert!(rate.met_by(200_000, 199_990));
        assert!(!rate.met_by(200_000, 199_989));
        assert!(MinRate::default().met_by(10, 0));

        let looser = MinRate::new(100_000, 99_991);
        assert_eq!(rate.stricter(looser), rate);
        assert_eq!(looser.stricter(rate), rate);
    }

    #[test]
    fn strictest_rate_covers_committed_buckets() {
        let mut book = TickBook::default();
        book.bucket_mut(TickBound::At(100))
            .add_guarantee(Side::Buy, 10, 9)
            .unwrap();
        book.bucket_mut(TickBound::At(30))
            .add_guarantee(Side::Buy, 10, 5)
            .unwrap();
        book.bucket_mut(TickBound::At(-40))
            .add_guarantee(Side::Sell, 10, 7)
            .unwrap();

        // Buys walk downward: at tick 30 the bucket at 100 is already in.
        assert_eq!(
            book.strictest_rate(Side::Buy, TickBound::At(30)),
            MinRate::new(10, 9)
        );
        assert_eq!(
            book.strictest_rate(Side::Sell, TickBound::At(-40)),
            MinRate::new(10, 7)
        );
        assert_eq!(
            book.strictest_rate(Side::Sell, TickBound::At(-50)),
            MinRate::default()
        );
    }

    #[test]
    fn bounds_extend_outward_only() {
        let mut bounds = ClearingBounds::default();
        bounds.extend(Side::Buy, TickBound::At(10));
        bounds.extend(Side::Buy, TickBound::At(-3));
        bounds.extend(Side::Sell, TickBound::At(-7));
        bounds.extend(Side::Sell, TickBound::At(4));
        assert_eq!(bounds.max_tick_buy, TickBound::At(10));
        assert_eq!(bounds.min_tick_sell, TickBound::At(-7));
    }
}
