//! Market Data Service
//!
//! Snapshot types produced by the order book, the binary depth codec used
//! for out-of-band distribution, and the lock-free publication path that
//! carries trade events off the matching thread.

pub mod binary;
pub mod publisher;
pub mod snapshot;
pub mod spsc;

pub use publisher::MarketDataPublisher;
pub use snapshot::{DepthSnapshot, PriceLevel, TopOfBook};
pub use spsc::SpscRing;
