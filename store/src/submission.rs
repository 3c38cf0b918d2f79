//! Submission storage trait and the persisted submission record.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use waymark_types::{
    ContributorId, Geometry, SubmissionId, SubmissionKind, SubmissionStatus, Timestamp, VoteChoice,
    WaymarkError,
};

/// One contributor's vote on one submission.
///
/// The weight is snapshotted at cast time and never recomputed from the
/// voter's later profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vote {
    pub voter: ContributorId,
    pub choice: VoteChoice,
    pub weight: f64,
    pub cast_at: Timestamp,
}

/// Cached verification tally, recomputed on every committed vote change.
/// Never allowed to go stale after a committed vote.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct TallySnapshot {
    pub total_weight: f64,
    pub yes_weight: f64,
    pub no_weight: f64,
    /// 0–100 blend of turnout and agreement.
    pub confidence: f64,
}

/// A landmark or route proposed by a contributor, pending community
/// verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub kind: SubmissionKind,
    pub creator: ContributorId,
    pub geometry: Geometry,
    status: SubmissionStatus,
    /// Mirror of `status == Verified`, kept for callers that only need the
    /// boolean. Updated in lockstep with `status`.
    verified: bool,
    /// At most one vote per contributor; casting again replaces the entry.
    pub votes: Vec<Vote>,
    pub tally: TallySnapshot,
    /// Set exactly once, the first time the submission enters Verified.
    /// Drives the single-fire creator credit.
    pub first_verified_at: Option<Timestamp>,
    /// Set exactly once, the first time the submission settles Verified or
    /// Rejected. Drives the one-shot voter-accuracy update.
    pub accuracy_settled_at: Option<Timestamp>,
    /// Optimistic-concurrency version, bumped by the store on every save.
    pub version: u64,
    pub created_at: Timestamp,
}

impl Submission {
    /// A new landmark submission at a single point.
    pub fn landmark(
        id: SubmissionId,
        creator: ContributorId,
        point: waymark_types::GeoPoint,
        created_at: Timestamp,
    ) -> Result<Self, WaymarkError> {
        Ok(Self::new(
            id,
            SubmissionKind::Landmark,
            creator,
            Geometry::point(point)?,
            created_at,
        ))
    }

    /// A new route submission along an ordered path of ≥ 2 points.
    pub fn route(
        id: SubmissionId,
        creator: ContributorId,
        points: Vec<waymark_types::GeoPoint>,
        created_at: Timestamp,
    ) -> Result<Self, WaymarkError> {
        Ok(Self::new(
            id,
            SubmissionKind::Route,
            creator,
            Geometry::path(points)?,
            created_at,
        ))
    }

    fn new(
        id: SubmissionId,
        kind: SubmissionKind,
        creator: ContributorId,
        geometry: Geometry,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            kind,
            creator,
            geometry,
            status: SubmissionStatus::Pending,
            verified: false,
            votes: Vec::new(),
            tally: TallySnapshot::default(),
            first_verified_at: None,
            accuracy_settled_at: None,
            version: 0,
            created_at,
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Update the status, keeping the `verified` mirror in lockstep.
    pub fn set_status(&mut self, status: SubmissionStatus) {
        self.status = status;
        self.verified = status == SubmissionStatus::Verified;
    }

    /// Insert or replace this voter's vote. Returns the replaced vote, if
    /// any, so at most one entry per contributor ever exists.
    pub fn upsert_vote(&mut self, vote: Vote) -> Option<Vote> {
        match self.votes.iter_mut().find(|v| v.voter == vote.voter) {
            Some(existing) => Some(std::mem::replace(existing, vote)),
            None => {
                self.votes.push(vote);
                None
            }
        }
    }

    /// This voter's current vote, if they have cast one.
    pub fn vote_by(&self, voter: &ContributorId) -> Option<&Vote> {
        self.votes.iter().find(|v| &v.voter == voter)
    }
}

/// Trait for submission storage operations.
///
/// `put_submission` is the serialization point for concurrent votes: it must
/// compare-and-swap on the record version so two interleaved cast-vote calls
/// cannot overwrite each other's vote list.
pub trait SubmissionStore: Send + Sync {
    /// Load a submission with its embedded vote log.
    fn get_submission(&self, id: &SubmissionId) -> Result<Submission, StoreError>;

    /// Insert a new submission; fails with `Duplicate` if the id exists.
    fn insert_submission(&self, submission: &Submission) -> Result<(), StoreError>;

    /// Atomically replace a submission if the stored version still equals
    /// `expected_version`; the stored record gets `expected_version + 1`.
    /// Fails with `VersionConflict` otherwise.
    fn put_submission(
        &self,
        submission: &Submission,
        expected_version: u64,
    ) -> Result<(), StoreError>;

    fn exists(&self, id: &SubmissionId) -> Result<bool, StoreError>;
    fn submission_count(&self) -> Result<u64, StoreError>;
    fn iter_submissions(&self) -> Result<Vec<Submission>, StoreError>;

    fn iter_verified_submissions(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(self
            .iter_submissions()?
            .into_iter()
            .filter(|s| s.is_verified())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::GeoPoint;

    fn test_submission() -> Submission {
        Submission::landmark(
            SubmissionId::new("sub_well"),
            ContributorId::new("ctr_alice"),
            GeoPoint::new(6.5, 3.3),
            Timestamp::new(1000),
        )
        .unwrap()
    }

    fn test_vote(voter: &str, choice: VoteChoice, at: u64) -> Vote {
        Vote {
            voter: ContributorId::new(voter),
            choice,
            weight: 1.0,
            cast_at: Timestamp::new(at),
        }
    }

    #[test]
    fn new_submission_starts_pending_and_empty() {
        let sub = test_submission();
        assert_eq!(sub.status(), SubmissionStatus::Pending);
        assert!(!sub.is_verified());
        assert!(sub.votes.is_empty());
        assert_eq!(sub.version, 0);
        assert!(sub.first_verified_at.is_none());
    }

    #[test]
    fn status_and_verified_mirror_agree() {
        let mut sub = test_submission();
        sub.set_status(SubmissionStatus::Verified);
        assert!(sub.is_verified());
        sub.set_status(SubmissionStatus::Disputed);
        assert!(!sub.is_verified());
    }

    #[test]
    fn upsert_replaces_prior_vote_from_same_voter() {
        let mut sub = test_submission();
        assert!(sub.upsert_vote(test_vote("ctr_bob", VoteChoice::Yes, 10)).is_none());
        let replaced = sub.upsert_vote(test_vote("ctr_bob", VoteChoice::No, 20));
        assert_eq!(replaced.unwrap().choice, VoteChoice::Yes);
        assert_eq!(sub.votes.len(), 1);
        assert_eq!(sub.vote_by(&ContributorId::new("ctr_bob")).unwrap().choice, VoteChoice::No);
    }

    #[test]
    fn votes_from_distinct_voters_accumulate() {
        let mut sub = test_submission();
        sub.upsert_vote(test_vote("ctr_bob", VoteChoice::Yes, 10));
        sub.upsert_vote(test_vote("ctr_carol", VoteChoice::No, 11));
        assert_eq!(sub.votes.len(), 2);
    }
}
