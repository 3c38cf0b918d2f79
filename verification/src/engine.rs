//! The verification engine — recomputes a submission's tally and status on
//! every vote change and applies the one-time side effects.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use waymark_store::contributor::ContributorStore;
use waymark_store::submission::{Submission, SubmissionStore, TallySnapshot, Vote};
use waymark_store::StoreError;
use waymark_types::{
    ContributorId, ContributorRole, SubmissionId, SubmissionStatus, Timestamp, VerificationParams,
    VoteChoice,
};

use crate::error::VerificationError;
use crate::tally::{compute_tally, TallyOutcome};
use crate::weight::weight_for;

/// What a cast-vote call returns to the serving layer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub status: SubmissionStatus,
    pub verified: bool,
    pub total_weight: f64,
    pub yes_weight: f64,
    pub no_weight: f64,
    pub confidence: f64,
    /// The weight snapshotted onto this voter's vote record.
    pub applied_weight: f64,
}

/// The engine ties the weight policy, decay, and tally state machine to the
/// stores. All operations are synchronous and request-scoped; `now` is always
/// passed in by the caller.
pub struct VerificationEngine {
    contributors: Arc<dyn ContributorStore>,
    submissions: Arc<dyn SubmissionStore>,
    params: VerificationParams,
}

impl VerificationEngine {
    pub fn new(
        contributors: Arc<dyn ContributorStore>,
        submissions: Arc<dyn SubmissionStore>,
        params: VerificationParams,
    ) -> Self {
        Self {
            contributors,
            submissions,
            params,
        }
    }

    pub fn params(&self) -> &VerificationParams {
        &self.params
    }

    /// Parse a wire-level choice, rejecting anything outside {yes, no}
    /// before any state is touched.
    pub fn parse_choice(raw: &str) -> Result<VoteChoice, VerificationError> {
        VoteChoice::parse(raw).ok_or_else(|| VerificationError::InvalidChoice(raw.to_string()))
    }

    /// Pure recomputation for the read path — no vote history is mutated.
    pub fn recompute_tally(&self, submission: &Submission, now: Timestamp) -> TallyOutcome {
        compute_tally(&submission.votes, &self.params, now)
    }

    /// Cast (or replace) a contributor's vote on a submission.
    ///
    /// Loads the voter's profile, snapshots their weight, replaces any prior
    /// vote by the same contributor, recomputes the tally and status, and
    /// persists the submission via compare-and-swap. A version conflict means
    /// another vote landed first; the whole recomputation is retried against
    /// the fresh record, a bounded number of times.
    ///
    /// Unknown submission or contributor fails before anything is written.
    pub fn cast_vote(
        &self,
        submission_id: &SubmissionId,
        contributor_id: &ContributorId,
        choice: VoteChoice,
        now: Timestamp,
    ) -> Result<VoteReceipt, VerificationError> {
        let voter = self
            .contributors
            .get_profile(contributor_id)
            .map_err(|e| match e {
                StoreError::NotFound(id) => VerificationError::ContributorNotFound(id),
                other => VerificationError::Store(other),
            })?;
        let applied_weight = weight_for(&voter, &self.params);

        for attempt in 0..=self.params.max_cas_retries {
            let mut submission =
                self.submissions
                    .get_submission(submission_id)
                    .map_err(|e| match e {
                        StoreError::NotFound(id) => VerificationError::SubmissionNotFound(id),
                        other => VerificationError::Store(other),
                    })?;
            let expected_version = submission.version;
            let previous_status = submission.status();

            submission.upsert_vote(Vote {
                voter: contributor_id.clone(),
                choice,
                weight: applied_weight,
                cast_at: now,
            });

            let outcome = compute_tally(&submission.votes, &self.params, now);
            submission.tally = TallySnapshot {
                total_weight: outcome.total_weight,
                yes_weight: outcome.yes_weight,
                no_weight: outcome.no_weight,
                confidence: outcome.confidence,
            };
            submission.set_status(outcome.status);

            // The transition point must be detected inside this same
            // recomputation: `first_verified_at` is persisted with the
            // submission, so the credit cannot double-fire if the submission
            // later leaves and re-enters Verified.
            let newly_verified = outcome.status == SubmissionStatus::Verified
                && submission.first_verified_at.is_none();
            if newly_verified {
                submission.first_verified_at = Some(now);
            }

            let newly_settled = matches!(
                outcome.status,
                SubmissionStatus::Verified | SubmissionStatus::Rejected
            ) && submission.accuracy_settled_at.is_none();
            if newly_settled {
                submission.accuracy_settled_at = Some(now);
            }
            let settled_votes: Vec<(ContributorId, VoteChoice)> = if newly_settled {
                submission
                    .votes
                    .iter()
                    .map(|v| (v.voter.clone(), v.choice))
                    .collect()
            } else {
                Vec::new()
            };

            match self.submissions.put_submission(&submission, expected_version) {
                Ok(()) => {
                    if previous_status != outcome.status {
                        debug!(
                            submission = %submission.id,
                            from = %previous_status,
                            to = %outcome.status,
                            "submission status changed"
                        );
                    }
                    if newly_verified {
                        self.credit_creator(&submission, now)?;
                    }
                    if newly_settled {
                        self.settle_accuracy(&settled_votes, outcome.status)?;
                    }
                    return Ok(VoteReceipt {
                        status: outcome.status,
                        verified: outcome.verified,
                        total_weight: outcome.total_weight,
                        yes_weight: outcome.yes_weight,
                        no_weight: outcome.no_weight,
                        confidence: outcome.confidence,
                        applied_weight,
                    });
                }
                Err(StoreError::VersionConflict { .. }) => {
                    debug!(
                        submission = %submission_id,
                        attempt,
                        "vote lost an optimistic-concurrency race, retrying"
                    );
                    continue;
                }
                Err(other) => return Err(VerificationError::Store(other)),
            }
        }

        warn!(
            submission = %submission_id,
            retries = self.params.max_cas_retries,
            "cast-vote retries exhausted"
        );
        Err(VerificationError::Conflict(self.params.max_cas_retries))
    }

    /// One-time creator credit on the first transition into Verified, plus
    /// the monotonic promotion check.
    fn credit_creator(
        &self,
        submission: &Submission,
        now: Timestamp,
    ) -> Result<(), VerificationError> {
        let mut creator = self.contributors.get_profile(&submission.creator)?;
        creator.credit_verified(submission.kind);

        if creator.verified_total() >= self.params.promotion_threshold
            && creator.role == ContributorRole::Ordinary
        {
            creator.role = ContributorRole::Super;
            info!(
                contributor = %creator.id,
                verified_total = creator.verified_total(),
                at = %now,
                "contributor promoted to super"
            );
        }

        self.contributors.put_profile(&creator)?;
        Ok(())
    }

    /// One-time voter accuracy settlement against the first Verified or
    /// Rejected outcome. A yes vote is correct iff the outcome was Verified.
    fn settle_accuracy(
        &self,
        votes: &[(ContributorId, VoteChoice)],
        outcome: SubmissionStatus,
    ) -> Result<(), VerificationError> {
        let outcome_was_yes = outcome == SubmissionStatus::Verified;
        for (voter, choice) in votes {
            let mut profile = self.contributors.get_profile(voter)?;
            let correct = (*choice == VoteChoice::Yes) == outcome_was_yes;
            profile.record_settled_vote(correct);
            self.contributors.put_profile(&profile)?;
        }
        Ok(())
    }
}
