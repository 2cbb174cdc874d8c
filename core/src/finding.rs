//! Detection output types: pattern taxonomy, roles, and matched groups.
//!
//! A `PatternGroup` is one matched pattern instance (one cycle, one star,
//! one merged chain family). Detectors create groups; the aggregator
//! consumes them immediately. Groups are never persisted.

use crate::types::{AccountId, TransactionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three laundering typologies the engine searches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Closed loop of same-day, equal-amount transfers (3 or 4 accounts).
    CircularTransfer,
    /// Many distinct sources splitting sub-threshold deposits into one sink
    /// on a single day.
    StarFanIn,
    /// Multi-hop same-day transfer chain terminating in a high-risk country.
    CrossBorderLayering,
}

impl PatternType {
    /// Stable label written to the `detected_suspicious_type` output column.
    pub fn label(&self) -> &'static str {
        match self {
            PatternType::CircularTransfer => "circular_transfer",
            PatternType::StarFanIn => "star_fan_in",
            PatternType::CrossBorderLayering => "cross_border_layering",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Role attributed to an account within one matched group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Primary beneficiary/originator of the pattern instance.
    Launderer,
    /// Any other participating account.
    Accomplice,
}

impl Role {
    /// Stable label written to the `detected_suspicious_role` output column.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Launderer => "launderer",
            Role::Accomplice => "accomplice",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One matched pattern instance with its full membership.
///
/// Exactly one launderer per group; `accomplices` holds every other member
/// account in the detector's deterministic order, deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternGroup {
    pub pattern: PatternType,
    pub launderer: AccountId,
    pub accomplices: Vec<AccountId>,
    pub transactions: Vec<TransactionId>,
}

impl PatternGroup {
    /// Number of member accounts, launderer included.
    pub fn account_count(&self) -> usize {
        1 + self.accomplices.len()
    }
}

/// The single finding an account ends up with after aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountFinding {
    pub pattern: PatternType,
    pub role: Role,
}
