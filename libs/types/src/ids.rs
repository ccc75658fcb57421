//! Opaque identifier types for engine entities
//!
//! Identifiers are caller-assigned `u64` values carried on the wire; the
//! engine never generates order or trader ids. Zero is reserved as the
//! invalid sentinel for all three.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an order, assigned by the submitting client.
///
/// Must be unique for the lifetime of the engine; reuse after a fill or
/// cancel is not detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Sentinel for "no order".
    pub const INVALID: OrderId = OrderId(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for OrderId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trading participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraderId(u64);

impl TraderId {
    /// Sentinel for "anonymous" — self-trade prevention skips it.
    pub const INVALID: TraderId = TraderId(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for TraderId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trade, assigned by the owning book.
///
/// Strictly increasing within a book, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(u64);

impl TradeId {
    pub const INVALID: TradeId = TradeId(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub fn next(self) -> TradeId {
        TradeId(self.0 + 1)
    }
}

impl From<u64> for TradeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
