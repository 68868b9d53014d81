//! A single aggregated price level.

use std::cmp::Ordering;

use crate::types::{Price, Quantity};

/// Maximum absolute difference at which two prices count as the same price.
///
/// Feed prices arrive as decimal text and pick up representation error
/// when parsed to binary floating point. Prices run up to the order of
/// 100 000, so machine epsilon is scaled for that magnitude.
pub const PRICE_EPSILON: f64 = f64::EPSILON * 100_000.0;

/// One aggregated price level on one side of the book.
///
/// The price is fixed for the life of the level; the quantity is
/// overwritten in place by upserts at the same (tolerance-equal) price
/// and must stay positive while the level is resident.
#[derive(Debug, Clone, Copy)]
pub struct Level {
    /// Level price.
    pub price: Price,
    /// Total quantity resting at this price.
    pub quantity: Quantity,
}

impl Level {
    /// Create a level.
    #[must_use]
    pub const fn new(price: Price, quantity: Quantity) -> Self {
        Self { price, quantity }
    }

    /// Three-way relation between this level's price and a candidate price.
    ///
    /// `Equal` when the absolute difference is within [`PRICE_EPSILON`];
    /// `Greater` or `Less` only when the difference exceeds it. Every
    /// ladder walk goes through this one relation, so the "match here"
    /// and "insert here" decisions share a single tie-break rule.
    #[must_use]
    pub fn compare(&self, candidate: Price) -> Ordering {
        let diff = self.price - candidate;
        if diff.abs() <= PRICE_EPSILON {
            Ordering::Equal
        } else if diff > 0.0 {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    }
}
