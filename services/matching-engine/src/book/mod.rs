//! Order book infrastructure
//!
//! Price levels, the two half-books, and the per-symbol book that owns
//! matching.

pub mod ask_book;
pub mod bid_book;
pub mod order_book;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use order_book::{BookError, OrderBook};
pub use price_level::PriceLevelQueue;
