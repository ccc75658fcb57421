//! Per-symbol configuration

use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Self-trade prevention policy applied when an incoming order would match
/// a resting order from the same trader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StpPolicy {
    /// No prevention — the match proceeds.
    None,
    /// Drop the remainder of the incoming order.
    CancelIncoming,
    /// Remove the resting order and keep matching.
    CancelResting,
    /// Remove the resting order and drop the incoming remainder.
    CancelBoth,
}

/// Static configuration registered per symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolConfig {
    pub symbol: String,
    /// Minimum price increment, in ticks.
    pub tick_size: Price,
    /// Minimum quantity increment.
    pub lot_size: Quantity,
    /// Minimum order quantity.
    pub min_quantity: Quantity,
    pub stp_policy: StpPolicy,
}

impl SymbolConfig {
    /// A config with unit sizes and the default STP policy.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            tick_size: Price::new(1),
            lot_size: 1,
            min_quantity: 1,
            stp_policy: StpPolicy::CancelIncoming,
        }
    }

    pub fn with_stp_policy(mut self, policy: StpPolicy) -> Self {
        self.stp_policy = policy;
        self
    }

    pub fn is_valid(&self) -> bool {
        !self.symbol.is_empty()
            && self.tick_size.ticks() > 0
            && self.lot_size > 0
            && self.min_quantity > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SymbolConfig::new("TEST").is_valid());
    }

    #[test]
    fn test_empty_symbol_invalid() {
        assert!(!SymbolConfig::new("").is_valid());
    }

    #[test]
    fn test_zero_sizes_invalid() {
        let mut config = SymbolConfig::new("TEST");
        config.tick_size = Price::new(0);
        assert!(!config.is_valid());

        let mut config = SymbolConfig::new("TEST");
        config.lot_size = 0;
        assert!(!config.is_valid());

        let mut config = SymbolConfig::new("TEST");
        config.min_quantity = 0;
        assert!(!config.is_valid());
    }

    #[test]
    fn test_builder_sets_policy() {
        let config = SymbolConfig::new("TEST").with_stp_policy(StpPolicy::CancelBoth);
        assert_eq!(config.stp_policy, StpPolicy::CancelBoth);
    }
}
