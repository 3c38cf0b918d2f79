//! Contributor profile storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use waymark_types::{ContributorId, ContributorRole, SubmissionKind, Timestamp};

/// Maximum reputation score. Mutations clamp to this bound.
pub const MAX_REPUTATION: u8 = 100;

/// Per-contributor profile maintained by the verification engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContributorProfile {
    pub id: ContributorId,
    pub role: ContributorRole,
    /// Reputation score, always within 0..=100.
    reputation: u8,
    /// Cumulative count of this contributor's own landmarks that verified.
    pub verified_landmarks: u32,
    /// Cumulative count of this contributor's own routes that verified.
    pub verified_routes: u32,
    /// Parallel aggregate counter, kept in lockstep with the two above for
    /// callers that only read the total.
    pub contributions_verified: u32,
    /// Total votes this contributor has cast that have been settled against
    /// a final outcome.
    pub votes_cast: u32,
    /// Of those, how many matched the settled outcome.
    pub votes_correct: u32,
    pub registered_at: Timestamp,
}

impl ContributorProfile {
    /// A fresh Ordinary profile with zeroed counters.
    pub fn new(id: ContributorId, registered_at: Timestamp) -> Self {
        Self {
            id,
            role: ContributorRole::Ordinary,
            reputation: 0,
            verified_landmarks: 0,
            verified_routes: 0,
            contributions_verified: 0,
            votes_cast: 0,
            votes_correct: 0,
            registered_at,
        }
    }

    pub fn reputation(&self) -> u8 {
        self.reputation
    }

    /// Set the reputation score, clamping to the 0..=100 bound.
    pub fn set_reputation(&mut self, value: u8) {
        self.reputation = value.min(MAX_REPUTATION);
    }

    /// Historical voting accuracy, or `None` before the first settled vote.
    pub fn accuracy(&self) -> Option<f64> {
        if self.votes_cast == 0 {
            None
        } else {
            Some(self.votes_correct as f64 / self.votes_cast as f64)
        }
    }

    /// Record one settled vote against a final outcome.
    pub fn record_settled_vote(&mut self, correct: bool) {
        self.votes_cast += 1;
        if correct {
            self.votes_correct += 1;
        }
    }

    /// Credit one verified submission of the given kind.
    pub fn credit_verified(&mut self, kind: SubmissionKind) {
        match kind {
            SubmissionKind::Landmark => self.verified_landmarks += 1,
            SubmissionKind::Route => self.verified_routes += 1,
        }
        self.contributions_verified += 1;
    }

    /// Total verified submissions across both kinds.
    pub fn verified_total(&self) -> u32 {
        self.verified_landmarks + self.verified_routes
    }
}

/// Trait for contributor profile storage operations.
pub trait ContributorStore: Send + Sync {
    fn get_profile(&self, id: &ContributorId) -> Result<ContributorProfile, StoreError>;
    fn put_profile(&self, profile: &ContributorProfile) -> Result<(), StoreError>;
    /// Insert a new profile; fails with `Duplicate` if the id exists.
    fn insert_profile(&self, profile: &ContributorProfile) -> Result<(), StoreError>;
    fn exists(&self, id: &ContributorId) -> Result<bool, StoreError>;
    fn profile_count(&self) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_profile() -> ContributorProfile {
        ContributorProfile::new(ContributorId::new("ctr_alice"), Timestamp::new(1000))
    }

    #[test]
    fn reputation_clamps_to_bound() {
        let mut profile = test_profile();
        profile.set_reputation(250);
        assert_eq!(profile.reputation(), 100);
        profile.set_reputation(70);
        assert_eq!(profile.reputation(), 70);
    }

    #[test]
    fn accuracy_none_before_first_settled_vote() {
        let mut profile = test_profile();
        assert!(profile.accuracy().is_none());
        profile.record_settled_vote(true);
        profile.record_settled_vote(false);
        assert_eq!(profile.accuracy(), Some(0.5));
    }

    #[test]
    fn credit_updates_kind_and_aggregate_counters() {
        let mut profile = test_profile();
        profile.credit_verified(SubmissionKind::Landmark);
        profile.credit_verified(SubmissionKind::Route);
        profile.credit_verified(SubmissionKind::Route);
        assert_eq!(profile.verified_landmarks, 1);
        assert_eq!(profile.verified_routes, 2);
        assert_eq!(profile.contributions_verified, 3);
        assert_eq!(profile.verified_total(), 3);
    }
}
