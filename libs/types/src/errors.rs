//! Result code taxonomy
//!
//! Every intent handled by the engine resolves to exactly one code; the
//! string form is stable and appears verbatim in rejection messages and
//! the event log.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of handling an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    Success,
    RejectedInvalidSymbol,
    RejectedInvalidPrice,
    RejectedInvalidQuantity,
    RejectedOrderNotFound,
    /// Reserved — STP suppression currently emits no rejection.
    RejectedSelfTrade,
    RejectedFokNotFillable,
    /// Reserved for a risk layer in front of the engine.
    RejectedRiskLimit,
    RejectedUnknownError,
}

impl ResultCode {
    pub fn is_success(self) -> bool {
        self == ResultCode::Success
    }

    /// Stable wire string, shared with the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ResultCode::Success => "SUCCESS",
            ResultCode::RejectedInvalidSymbol => "REJECTED_INVALID_SYMBOL",
            ResultCode::RejectedInvalidPrice => "REJECTED_INVALID_PRICE",
            ResultCode::RejectedInvalidQuantity => "REJECTED_INVALID_QUANTITY",
            ResultCode::RejectedOrderNotFound => "REJECTED_ORDER_NOT_FOUND",
            ResultCode::RejectedSelfTrade => "REJECTED_SELF_TRADE",
            ResultCode::RejectedFokNotFillable => "REJECTED_FOK_NOT_FILLABLE",
            ResultCode::RejectedRiskLimit => "REJECTED_RISK_LIMIT",
            ResultCode::RejectedUnknownError => "REJECTED_UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
