//! Fixed-point numeric types for prices and quantities
//!
//! Prices are signed 64-bit tick counts; the tick size of the symbol gives
//! them their monetary meaning. Quantities and timestamps stay as plain
//! unsigned integers. No floating point anywhere, so identical inputs
//! always produce identical books.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Number of units (shares, contracts, lots).
pub type Quantity = u64;

/// Monotonic nanosecond timestamp.
pub type Timestamp = u64;

/// Sentinel quantity — orders must carry a positive quantity.
pub const INVALID_QUANTITY: Quantity = 0;

/// Price as a signed fixed-point tick count.
///
/// A valid order price is positive; the sentinel `Price::INVALID` (-1)
/// marks "no price" in wire records where an option does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Sentinel for "no price".
    pub const INVALID: Price = Price(-1);

    pub const fn new(ticks: i64) -> Self {
        Self(ticks)
    }

    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Whether this is a usable order price.
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }

    /// Midpoint of two prices, rounded toward zero.
    pub fn midpoint(self, other: Price) -> Price {
        Price((self.0 + other.0) / 2)
    }
}

impl From<i64> for Price {
    fn from(ticks: i64) -> Self {
        Self(ticks)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Price;

    fn sub(self, rhs: Price) -> Price {
        Price(self.0 - rhs.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
