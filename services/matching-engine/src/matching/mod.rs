//! Matching helpers
//!
//! Price-compatibility predicates and the self-trade prevention decision.

pub mod crossing;
pub mod stp;
