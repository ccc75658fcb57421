//! Engine telemetry
//!
//! Process-wide counters, running latency aggregates, and the per-symbol
//! snapshot the book writes after each mutation. The engine is
//! single-threaded by contract, so plain integers suffice; the exported
//! snapshot is an owned value safe to ship elsewhere.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::mem;
use types::numeric::{Price, Quantity};

/// Per-symbol statistics, refreshed after every book mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymbolStats {
    pub active_orders: u64,
    pub bid_levels: u64,
    pub ask_levels: u64,
    pub trade_volume: u64,
    pub trade_count: u64,
    /// Deepest bid level of the current book.
    pub max_bid_depth: Quantity,
    /// Deepest ask level of the current book.
    pub max_ask_depth: Quantity,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
}

/// Engine-wide counters and latency aggregates.
#[derive(Debug, Default)]
pub struct Telemetry {
    orders_processed: u64,
    orders_accepted: u64,
    orders_rejected: u64,
    orders_cancelled: u64,
    total_trades: u64,

    total_latency_ns: u64,
    latency_count: u64,
    max_latency_ns: u64,
    min_latency_ns: u64,

    symbol_stats: HashMap<String, SymbolStats>,
}

/// Owned export of the telemetry state.
///
/// Symbols are sorted so two snapshots of identical state serialize
/// identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub orders_processed: u64,
    pub orders_accepted: u64,
    pub orders_rejected: u64,
    pub orders_cancelled: u64,
    pub total_trades: u64,
    pub avg_latency_ns: u64,
    pub max_latency_ns: u64,
    pub min_latency_ns: u64,
    pub symbols: BTreeMap<String, SymbolStats>,
    pub memory_bytes_estimate: u64,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_order_processed(&mut self) {
        self.orders_processed += 1;
    }

    pub fn record_order_accepted(&mut self) {
        self.orders_accepted += 1;
    }

    pub fn record_order_rejected(&mut self) {
        self.orders_rejected += 1;
    }

    pub fn record_order_cancelled(&mut self) {
        self.orders_cancelled += 1;
    }

    pub fn record_trade(&mut self, symbol: &str, quantity: Quantity) {
        self.total_trades += 1;

        let stats = self.symbol_stats.entry(symbol.to_string()).or_default();
        stats.trade_count += 1;
        stats.trade_volume += quantity;
    }

    pub fn record_latency(&mut self, latency_ns: u64) {
        self.total_latency_ns += latency_ns;
        self.latency_count += 1;
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
        self.min_latency_ns = if self.latency_count == 1 {
            latency_ns
        } else {
            self.min_latency_ns.min(latency_ns)
        };
    }

    pub fn update_symbol_stats(&mut self, symbol: &str, stats: SymbolStats) {
        self.symbol_stats.insert(symbol.to_string(), stats);
    }

    pub fn orders_processed(&self) -> u64 {
        self.orders_processed
    }

    pub fn orders_accepted(&self) -> u64 {
        self.orders_accepted
    }

    pub fn orders_rejected(&self) -> u64 {
        self.orders_rejected
    }

    pub fn orders_cancelled(&self) -> u64 {
        self.orders_cancelled
    }

    pub fn total_trades(&self) -> u64 {
        self.total_trades
    }

    pub fn avg_latency_ns(&self) -> u64 {
        if self.latency_count > 0 {
            self.total_latency_ns / self.latency_count
        } else {
            0
        }
    }

    pub fn max_latency_ns(&self) -> u64 {
        self.max_latency_ns
    }

    pub fn min_latency_ns(&self) -> u64 {
        self.min_latency_ns
    }

    pub fn get_symbol_stats(&self, symbol: &str) -> Option<&SymbolStats> {
        self.symbol_stats.get(symbol)
    }

    /// Owned, deterministic export of the current state.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            orders_processed: self.orders_processed,
            orders_accepted: self.orders_accepted,
            orders_rejected: self.orders_rejected,
            orders_cancelled: self.orders_cancelled,
            total_trades: self.total_trades,
            avg_latency_ns: self.avg_latency_ns(),
            max_latency_ns: self.max_latency_ns,
            min_latency_ns: self.min_latency_ns,
            symbols: self
                .symbol_stats
                .iter()
                .map(|(symbol, stats)| (symbol.clone(), *stats))
                .collect(),
            memory_bytes_estimate: self.estimate_memory_bytes() as u64,
        }
    }

    /// Zero every counter and drop all per-symbol stats.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Approximate memory footprint of the telemetry itself.
    pub fn estimate_memory_bytes(&self) -> usize {
        mem::size_of::<Self>()
            + self
                .symbol_stats
                .keys()
                .map(|symbol| symbol.len() + mem::size_of::<SymbolStats>())
                .sum::<usize>()
    }
}
