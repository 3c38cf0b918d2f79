//! Tally computation and the status state machine.
//!
//! `compute_tally` is a pure function of the vote set at evaluation time.
//! Status is re-derived from scratch on every call (level-triggered), so a
//! submission can leave Verified again if later votes or decay shift the
//! balance. One-time side effects are the engine's job, not this module's.

use serde::{Deserialize, Serialize};
use waymark_store::submission::Vote;
use waymark_types::{SubmissionStatus, Timestamp, VerificationParams, VoteChoice};

use crate::decay::decay_factor;

/// Result of recomputing a submission's weighted tally.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TallyOutcome {
    pub status: SubmissionStatus,
    /// Mirror of `status == Verified`.
    pub verified: bool,
    pub total_weight: f64,
    pub yes_weight: f64,
    pub no_weight: f64,
    /// The dynamic threshold this tally was measured against.
    pub required_weight: f64,
    /// 0–100 blend of turnout and agreement.
    pub confidence: f64,
}

/// Recompute the full weighted tally for a vote set.
///
/// Each vote contributes its snapshotted weight attenuated by exponential
/// decay of its age. The verification threshold rises slightly with every
/// vote cast, so a burst of low-weight votes cannot push a submission over
/// the line on turnout alone.
pub fn compute_tally(votes: &[Vote], params: &VerificationParams, now: Timestamp) -> TallyOutcome {
    let mut total_weight = 0.0;
    let mut yes_weight = 0.0;
    let mut no_weight = 0.0;

    for vote in votes {
        let effective = vote.weight * decay_factor(vote.cast_at.age_hours(now), params.decay_rate_per_hour);
        total_weight += effective;
        match vote.choice {
            VoteChoice::Yes => yes_weight += effective,
            VoteChoice::No => no_weight += effective,
        }
    }

    let required_weight = params.required_weight(votes.len());
    // Guards division by zero when no votes exist.
    let safe_total = total_weight.max(1.0);

    let participation = (total_weight / (required_weight * 1.5)).min(1.0) * 50.0;
    let agreement = (yes_weight / safe_total) * 50.0;
    let confidence = (participation + agreement).min(100.0);

    let status = resolve_status(
        total_weight,
        yes_weight,
        no_weight,
        required_weight,
        safe_total,
        params,
    );

    TallyOutcome {
        status,
        verified: status == SubmissionStatus::Verified,
        total_weight,
        yes_weight,
        no_weight,
        required_weight,
        confidence,
    }
}

fn resolve_status(
    total_weight: f64,
    yes_weight: f64,
    no_weight: f64,
    required_weight: f64,
    safe_total: f64,
    params: &VerificationParams,
) -> SubmissionStatus {
    if total_weight >= required_weight && yes_weight / safe_total >= params.agreement_ratio {
        SubmissionStatus::Verified
    } else if no_weight >= required_weight * params.rejection_ratio {
        SubmissionStatus::Rejected
    } else if (yes_weight - no_weight).abs() < params.dispute_margin
        && total_weight >= params.dispute_min_weight
    {
        SubmissionStatus::Disputed
    } else {
        SubmissionStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::ContributorId;

    fn params() -> VerificationParams {
        VerificationParams::default()
    }

    fn vote(n: u8, choice: VoteChoice, weight: f64, cast_at: u64) -> Vote {
        Vote {
            voter: ContributorId::new(format!("ctr_{n}")),
            choice,
            weight,
            cast_at: Timestamp::new(cast_at),
        }
    }

    const NOW: Timestamp = Timestamp::EPOCH;

    #[test]
    fn zero_votes_is_pending_with_zero_confidence() {
        let outcome = compute_tally(&[], &params(), NOW);
        assert_eq!(outcome.status, SubmissionStatus::Pending);
        assert!(!outcome.verified);
        assert_eq!(outcome.total_weight, 0.0);
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(outcome.required_weight, 5.0);
    }

    #[test]
    fn five_unanimous_base_votes_stay_pending() {
        // total 5 < required 5 + 0.2*5 = 6; no-weight 0 so rejection and
        // dispute checks both fail.
        let votes: Vec<Vote> = (0..5).map(|n| vote(n, VoteChoice::Yes, 1.0, 0)).collect();
        let outcome = compute_tally(&votes, &params(), NOW);
        assert_eq!(outcome.total_weight, 5.0);
        assert_eq!(outcome.required_weight, 6.0);
        assert_eq!(outcome.status, SubmissionStatus::Pending);
    }

    #[test]
    fn threshold_outruns_unanimous_base_weight_votes() {
        // Six unanimous base votes: 6 < 7.2. A seventh: 7 < 8.4. The bar
        // rises faster than base-weight turnout can chase it.
        let six: Vec<Vote> = (0..6).map(|n| vote(n, VoteChoice::Yes, 1.0, 0)).collect();
        let outcome = compute_tally(&six, &params(), NOW);
        assert!((outcome.required_weight - 7.2).abs() < 1e-9);
        assert_eq!(outcome.status, SubmissionStatus::Pending);

        let seven: Vec<Vote> = (0..7).map(|n| vote(n, VoteChoice::Yes, 1.0, 0)).collect();
        let outcome = compute_tally(&seven, &params(), NOW);
        assert!((outcome.required_weight - 8.4).abs() < 1e-9);
        assert_eq!(outcome.status, SubmissionStatus::Pending);
    }

    #[test]
    fn one_super_one_base_not_yet_verified() {
        let votes = vec![
            vote(0, VoteChoice::Yes, 4.0, 0),
            vote(1, VoteChoice::Yes, 1.0, 0),
        ];
        let outcome = compute_tally(&votes, &params(), NOW);
        assert_eq!(outcome.total_weight, 5.0);
        assert!((outcome.required_weight - 5.4).abs() < 1e-9);
        assert_eq!(outcome.status, SubmissionStatus::Pending);
    }

    #[test]
    fn two_super_voters_verify() {
        let votes = vec![
            vote(0, VoteChoice::Yes, 4.0, 0),
            vote(1, VoteChoice::Yes, 4.0, 0),
        ];
        let outcome = compute_tally(&votes, &params(), NOW);
        assert_eq!(outcome.total_weight, 8.0);
        assert!((outcome.required_weight - 5.4).abs() < 1e-9);
        assert_eq!(outcome.status, SubmissionStatus::Verified);
        assert!(outcome.verified);
    }

    #[test]
    fn lopsided_no_split_short_of_both_rejection_and_dispute() {
        // yes 1 / no 3 over 3 votes: rejection needs (5 + 0.6) * 0.6 = 3.36,
        // and |1 - 3| = 2 is not strictly under the dispute margin.
        let votes = vec![
            vote(0, VoteChoice::Yes, 1.0, 0),
            vote(1, VoteChoice::No, 2.0, 0),
            vote(2, VoteChoice::No, 1.0, 0),
        ];
        let outcome = compute_tally(&votes, &params(), NOW);
        assert_eq!(outcome.yes_weight, 1.0);
        assert_eq!(outcome.no_weight, 3.0);
        assert_eq!(outcome.status, SubmissionStatus::Pending);
    }

    #[test]
    fn heavy_opposition_rejects() {
        let votes = vec![
            vote(0, VoteChoice::No, 2.0, 0),
            vote(1, VoteChoice::No, 2.0, 0),
        ];
        // required = 5.4, rejection bar = 3.24, no-weight 4.
        let outcome = compute_tally(&votes, &params(), NOW);
        assert_eq!(outcome.status, SubmissionStatus::Rejected);
    }

    #[test]
    fn close_split_with_turnout_is_disputed() {
        let votes = vec![
            vote(0, VoteChoice::Yes, 2.0, 0),
            vote(1, VoteChoice::No, 1.5, 0),
        ];
        // |2 - 1.5| < 2 and total 3.5 >= 3; rejection bar 3.24 > 1.5.
        let outcome = compute_tally(&votes, &params(), NOW);
        assert_eq!(outcome.status, SubmissionStatus::Disputed);
    }

    #[test]
    fn close_split_without_turnout_stays_pending() {
        let votes = vec![
            vote(0, VoteChoice::Yes, 1.0, 0),
            vote(1, VoteChoice::No, 1.0, 0),
        ];
        // |1 - 1| < 2 but total 2 < 3.
        let outcome = compute_tally(&votes, &params(), NOW);
        assert_eq!(outcome.status, SubmissionStatus::Pending);
    }

    #[test]
    fn decay_can_unverify_a_submission() {
        let votes = vec![
            vote(0, VoteChoice::Yes, 4.0, 0),
            vote(1, VoteChoice::Yes, 4.0, 0),
        ];
        let fresh = compute_tally(&votes, &params(), NOW);
        assert_eq!(fresh.status, SubmissionStatus::Verified);

        // ~2 half-lives later the same votes total ~2.0 < 5.4.
        let later = Timestamp::new(280 * 3600);
        let aged = compute_tally(&votes, &params(), later);
        assert!(aged.total_weight < fresh.total_weight);
        assert_eq!(aged.status, SubmissionStatus::Pending);
    }

    #[test]
    fn confidence_rewards_turnout_and_agreement() {
        let votes = vec![
            vote(0, VoteChoice::Yes, 4.0, 0),
            vote(1, VoteChoice::Yes, 4.0, 0),
        ];
        let outcome = compute_tally(&votes, &params(), NOW);
        // participation: min(1, 8 / (5.4 * 1.5)) * 50 = 49.38...;
        // agreement: 50. Total just under 100.
        assert!(outcome.confidence > 99.0);
        assert!(outcome.confidence <= 100.0);
    }

    #[test]
    fn confidence_is_low_on_contested_splits() {
        let votes = vec![
            vote(0, VoteChoice::Yes, 1.0, 0),
            vote(1, VoteChoice::No, 1.0, 0),
        ];
        let outcome = compute_tally(&votes, &params(), NOW);
        // participation: 2 / (5.4 * 1.5) * 50 = 12.3...; agreement: 25.
        assert!(outcome.confidence > 37.0 && outcome.confidence < 38.0);
    }
}
