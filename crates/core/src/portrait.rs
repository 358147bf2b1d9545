//! Portrait submission workflow.
//!
//! Residents submit portraits through the public site; they start out
//! `pending` and an admin either approves (published) or rejects them.
//! A decision is final.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortraitStatus {
    Pending,
    Approved,
    Rejected,
}

impl PortraitStatus {
    /// Database `status` column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(CoreError::Validation(format!(
                "Unknown portrait status '{other}'. Must be one of: pending, approved, rejected"
            ))),
        }
    }
}

/// Admin decision on a pending portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(self) -> PortraitStatus {
        match self {
            Self::Approve => PortraitStatus::Approved,
            Self::Reject => PortraitStatus::Rejected,
        }
    }
}

/// Check that a portrait currently in `current` can receive a decision.
pub fn validate_review(current: PortraitStatus) -> Result<(), CoreError> {
    match current {
        PortraitStatus::Pending => Ok(()),
        done => Err(CoreError::Conflict(format!(
            "Portrait has already been {}",
            done.as_str()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_round_trips_db_values() {
        for s in [PortraitStatus::Pending, PortraitStatus::Approved, PortraitStatus::Rejected] {
            assert_eq!(PortraitStatus::parse(s.as_str()).unwrap(), s);
        }
        assert!(PortraitStatus::parse("archived").is_err());
    }

    #[test]
    fn only_pending_can_be_reviewed() {
        assert!(validate_review(PortraitStatus::Pending).is_ok());
        assert_matches!(validate_review(PortraitStatus::Approved), Err(CoreError::Conflict(_)));
        assert_matches!(validate_review(PortraitStatus::Rejected), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn decisions_map_to_statuses() {
        assert_eq!(ReviewDecision::Approve.target_status(), PortraitStatus::Approved);
        assert_eq!(ReviewDecision::Reject.target_status(), PortraitStatus::Rejected);
    }
}
