//! Trade tape
//!
//! Bounded ring of the most recent trades for one symbol. The engine
//! appends every stamped trade; readers get value copies.

use std::collections::VecDeque;
use std::fmt::Write as _;
use types::events::TradeEvent;

const DEFAULT_MAX_HISTORY: usize = 10_000;

/// Recent trade history for a symbol.
#[derive(Debug)]
pub struct TradeTape {
    trades: VecDeque<TradeEvent>,
    max_history: usize,
}

impl Default for TradeTape {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl TradeTape {
    pub fn new(max_history: usize) -> Self {
        Self {
            trades: VecDeque::with_capacity(max_history.min(DEFAULT_MAX_HISTORY)),
            max_history,
        }
    }

    /// Append a trade, evicting the oldest entries past the cap.
    pub fn add_trade(&mut self, trade: TradeEvent) {
        self.trades.push_back(trade);
        while self.trades.len() > self.max_history {
            self.trades.pop_front();
        }
    }

    /// The most recent `max_count` trades, oldest of them first.
    pub fn get_recent_trades(&self, max_count: usize) -> Vec<TradeEvent> {
        let count = max_count.min(self.trades.len());
        self.trades.iter().skip(self.trades.len() - count).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn clear(&mut self) {
        self.trades.clear();
    }

    /// Render the whole tape as CSV, header first.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "trade_id,symbol,timestamp,price,quantity,side,\
             aggressive_order_id,passive_order_id,aggressive_trader_id,passive_trader_id\n",
        );

        for trade in &self.trades {
            let side = match trade.aggressor_side {
                types::order::Side::Buy => "BUY",
                types::order::Side::Sell => "SELL",
            };
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{}",
                trade.trade_id,
                trade.symbol,
                trade.timestamp,
                trade.price,
                trade.quantity,
                side,
                trade.aggressive_order_id,
                trade.passive_order_id,
                trade.aggressive_trader_id,
                trade.passive_trader_id,
            );
        }

        out
    }
}
