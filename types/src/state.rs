//! Role, status, and choice enums shared across the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A contributor's role. The set is closed; promotion Ordinary → Super is
/// monotonic and never reverted by the verification engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributorRole {
    /// A regular registered contributor.
    Ordinary,
    /// A promoted contributor with the highest vote weight.
    Super,
    /// An administrator. Administrators keep their role; they are not
    /// promoted to Super and carry no special vote weight.
    Admin,
}

impl ContributorRole {
    pub fn is_super(&self) -> bool {
        matches!(self, Self::Super)
    }
}

/// Verification status of a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Awaiting enough weighted votes.
    Pending,
    /// The community confirmed the submission.
    Verified,
    /// Weighted opposition crossed the rejection threshold.
    Rejected,
    /// Close, contested split with meaningful turnout.
    Disputed,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
            Self::Disputed => "disputed",
        };
        write!(f, "{s}")
    }
}

/// What kind of map fact a submission proposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Landmark,
    Route,
}

/// A voter's assertion about a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Yes,
    No,
}

impl VoteChoice {
    /// Parse a wire-level choice string. Anything outside {yes, no} is
    /// rejected before any state mutation.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }
}
