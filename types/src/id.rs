//! Opaque identifiers with `ctr_` / `sub_` prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A contributor identifier, always prefixed with `ctr_`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContributorId(String);

impl ContributorId {
    /// The standard prefix for contributor identifiers.
    pub const PREFIX: &'static str = "ctr_";

    /// Create a new contributor id from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `ctr_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "id must start with ctr_");
        Self(s)
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this identifier is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for ContributorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContributorId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A submission identifier, always prefixed with `sub_`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// The standard prefix for submission identifiers.
    pub const PREFIX: &'static str = "sub_";

    /// Create a new submission id from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `sub_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "id must start with sub_");
        Self(s)
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this identifier is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SubmissionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
