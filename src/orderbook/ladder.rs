//! One side's sorted ladder of price levels.
//!
//! Levels live in a contiguous `Vec`, best first, and every mutation
//! walks from the best level:
//!
//! - O(depth) upsert/delete; the walk stops at the first position where
//!   the side's ordering would be violated
//! - O(1) top of book
//! - Ordered iteration for rendering and depth queries
//!
//! Mutation depth is typically shallow for actively traded symbols, so
//! the linear walk beats tree bookkeeping at the sizes this feed runs.

use std::cmp::Ordering;

use super::level::Level;
use crate::types::{Price, Quantity};

/// Side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Buyers. Best level is the highest price.
    Bid,
    /// Sellers. Best level is the lowest price.
    Ask,
}

/// Price levels for one side of the book, ordered best to worst.
///
/// # Design Decisions
///
/// 1. **Tolerance matching**: prices parsed from decimal text rarely hit
///    a stored value exactly, so the walk matches levels through
///    [`Level::compare`] rather than raw float equality. No two resident
///    levels are ever tolerance-equal.
///
/// 2. **Ordering fixed at construction**: the side's sort direction is
///    captured once as the [`Ordering`] a better-ranked level reports,
///    so the per-step comparison in the walk is against a constant.
///
/// 3. **Depth reporting**: mutations return the 1-based depth they
///    touched, 0 for a no-op. Render gating keys on that depth.
#[derive(Debug, Clone)]
pub struct Ladder {
    /// Which side this ladder holds.
    side: Side,
    /// Relation a resident level bears to a price that belongs deeper.
    ahead: Ordering,
    /// Resident levels, best first.
    levels: Vec<Level>,
}

impl Ladder {
    /// Create an empty ladder for one side.
    #[must_use]
    pub fn new(side: Side) -> Self {
        let ahead = match side {
            Side::Bid => Ordering::Greater,
            Side::Ask => Ordering::Less,
        };
        Self {
            side,
            ahead,
            levels: Vec::new(),
        }
    }

    /// Side this ladder holds.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Insert or update the level at `price`.
    ///
    /// A non-positive quantity is not storable and delegates to
    /// [`remove`](Self::remove). Otherwise the level's quantity is
    /// overwritten in place when a tolerance-equal price is resident,
    /// or a new level is inserted at its sorted position.
    ///
    /// Returns the 1-based depth of the touched level, 0 when nothing
    /// changed.
    pub fn upsert(&mut self, price: Price, quantity: Quantity) -> usize {
        if quantity <= 0.0 {
            return self.remove(price);
        }

        let mut idx = 0;
        while let Some(level) = self.levels.get_mut(idx) {
            match level.compare(price) {
                Ordering::Equal => {
                    level.quantity = quantity;
                    return idx + 1;
                }
                rank if rank == self.ahead => idx += 1,
                _ => break,
            }
        }

        self.levels.insert(idx, Level::new(price, quantity));
        idx + 1
    }

    /// Remove the level at `price`, if one is resident.
    ///
    /// Returns the removed level's 1-based depth. Returns 0 once the
    /// walk passes the position where `price` would sort, or reaches
    /// the end, without a tolerance-equal match.
    pub fn remove(&mut self, price: Price) -> usize {
        let mut idx = 0;
        while let Some(level) = self.levels.get(idx) {
            match level.compare(price) {
                Ordering::Equal => {
                    self.levels.remove(idx);
                    return idx + 1;
                }
                rank if rank == self.ahead => idx += 1,
                _ => return 0,
            }
        }
        0
    }

    /// Best level, if any.
    #[must_use]
    pub fn top_of_book(&self) -> Option<Level> {
        self.levels.first().copied()
    }

    /// True when no levels are resident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of resident levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Levels from best to worst.
    pub fn iter(&self) -> impl Iterator<Item = Level> + '_ {
        self.levels.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(ladder: &Ladder) -> Vec<f64> {
        ladder.iter().map(|level| level.price).collect()
    }

    #[test]
    fn test_new_ladder_is_empty() {
        let bids = Ladder::new(Side::Bid);
        assert!(bids.is_empty());
        assert_eq!(bids.len(), 0);
        assert!(bids.top_of_book().is_none());
        assert_eq!(bids.side(), Side::Bid);
    }

    #[test]
    fn test_add_single_level() {
        let mut bids = Ladder::new(Side::Bid);

        assert_eq!(bids.upsert(100.0, 10.0), 1);
        assert!(!bids.is_empty());

        let top = bids.top_of_book().unwrap();
        assert_eq!(top.price, 100.0);
        assert_eq!(top.quantity, 10.0);
    }

    #[test]
    fn test_update_level_quantity_in_place() {
        let mut bids = Ladder::new(Side::Bid);

        bids.upsert(100.0, 10.0);
        assert_eq!(bids.upsert(100.0, 20.0), 1);

        assert_eq!(bids.len(), 1);
        assert_eq!(bids.top_of_book().unwrap().quantity, 20.0);
    }

    #[test]
    fn test_tolerance_equal_prices_collapse_to_one_level() {
        let mut bids = Ladder::new(Side::Bid);

        bids.upsert(100.0, 10.0);
        assert_eq!(bids.upsert(100.000_000_000_01, 5.0), 1);

        assert_eq!(bids.len(), 1);
        let top = bids.top_of_book().unwrap();
        assert_eq!(top.price, 100.0); // Original price survives the update
        assert_eq!(top.quantity, 5.0);
    }

    #[test]
    fn test_zero_quantity_upsert_deletes() {
        let mut bids = Ladder::new(Side::Bid);

        bids.upsert(100.0, 10.0);
        assert_eq!(bids.upsert(100.0, 0.0), 1);

        assert!(bids.is_empty());
        assert!(bids.top_of_book().is_none());
    }

    #[test]
    fn test_nonpositive_upsert_at_absent_price_is_noop() {
        let mut bids = Ladder::new(Side::Bid);

        assert_eq!(bids.upsert(200.0, 0.0), 0);
        assert_eq!(bids.upsert(200.0, -5.0), 0);
        assert!(bids.is_empty());
    }

    #[test]
    fn test_bid_levels_order_descending() {
        let mut bids = Ladder::new(Side::Bid);

        bids.upsert(100.0, 10.0);
        bids.upsert(105.0, 5.0);
        bids.upsert(95.0, 20.0);

        assert_eq!(prices(&bids), vec![105.0, 100.0, 95.0]);
        let quantities: Vec<f64> = bids.iter().map(|level| level.quantity).collect();
        assert_eq!(quantities, vec![5.0, 10.0, 20.0]);
    }

    #[test]
    fn test_ask_levels_order_ascending() {
        let mut asks = Ladder::new(Side::Ask);

        asks.upsert(100.0, 10.0);
        asks.upsert(95.0, 5.0);
        asks.upsert(105.0, 20.0);

        assert_eq!(prices(&asks), vec![95.0, 100.0, 105.0]);
    }

    #[test]
    fn test_bid_order_preserved_after_best_delete() {
        let mut bids = Ladder::new(Side::Bid);

        bids.upsert(100.0, 10.0);
        bids.upsert(105.0, 5.0);
        bids.upsert(95.0, 20.0);

        assert_eq!(bids.remove(105.0), 1);
        assert_eq!(prices(&bids), vec![100.0, 95.0]);
    }

    #[test]
    fn test_ask_order_preserved_after_middle_delete() {
        let mut asks = Ladder::new(Side::Ask);

        asks.upsert(90.0, 15.0);
        asks.upsert(95.0, 10.0);
        asks.upsert(105.0, 5.0);

        assert_eq!(asks.remove(95.0), 2);
        assert_eq!(prices(&asks), vec![90.0, 105.0]);
    }

    #[test]
    fn test_negative_bid_prices_order_descending() {
        let mut bids = Ladder::new(Side::Bid);

        bids.upsert(-50.0, 5.0);
        bids.upsert(-10.0, 10.0);

        assert_eq!(prices(&bids), vec![-10.0, -50.0]);
    }

    #[test]
    fn test_negative_ask_prices_order_ascending() {
        let mut asks = Ladder::new(Side::Ask);

        asks.upsert(-50.0, 5.0);
        asks.upsert(-10.0, 10.0);

        assert_eq!(prices(&asks), vec![-50.0, -10.0]);
    }

    #[test]
    fn test_insert_depth_reported_at_every_position() {
        let mut asks = Ladder::new(Side::Ask);

        assert_eq!(asks.upsert(10.0, 1.0), 1);
        assert_eq!(asks.upsert(20.0, 1.0), 2); // Append past the tail
        assert_eq!(asks.upsert(15.0, 1.0), 2); // Insert between
        assert_eq!(asks.upsert(5.0, 1.0), 1); // New best
        assert_eq!(prices(&asks), vec![5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_delete_depth_reported_at_every_position() {
        let mut bids = Ladder::new(Side::Bid);

        bids.upsert(105.0, 1.0);
        bids.upsert(100.0, 1.0);
        bids.upsert(95.0, 1.0);

        assert_eq!(bids.remove(100.0), 2);
        assert_eq!(bids.remove(95.0), 2); // Deepest level after the first delete
        assert_eq!(bids.remove(105.0), 1);
        assert!(bids.is_empty());
    }

    #[test]
    fn test_delete_between_resident_prices_is_noop() {
        let mut bids = Ladder::new(Side::Bid);

        bids.upsert(105.0, 1.0);
        bids.upsert(95.0, 1.0);

        assert_eq!(bids.remove(101.0), 0);
        assert_eq!(bids.remove(90.0), 0); // Past the worst level
        assert_eq!(bids.len(), 2);
    }

    #[test]
    fn test_delete_from_empty_ladder_is_noop() {
        let mut asks = Ladder::new(Side::Ask);
        assert_eq!(asks.remove(100.0), 0);
    }

    #[test]
    fn test_delete_then_reinsert_matches_fresh_upsert() {
        let mut churned = Ladder::new(Side::Bid);
        churned.upsert(100.0, 10.0);
        churned.remove(100.0);
        assert_eq!(churned.upsert(100.0, 7.0), 1);

        let mut fresh = Ladder::new(Side::Bid);
        assert_eq!(fresh.upsert(100.0, 7.0), 1);

        assert_eq!(churned.len(), fresh.len());
        assert_eq!(
            churned.top_of_book().unwrap().quantity,
            fresh.top_of_book().unwrap().quantity
        );
    }
}
