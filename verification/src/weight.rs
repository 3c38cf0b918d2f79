//! Vote weight policy — maps a contributor's profile to a voting weight.
//!
//! The landmark and route code paths historically checked accuracy and
//! reputation in different orders with drifting thresholds. This is the
//! unified precedence; see DESIGN.md.

use waymark_store::ContributorProfile;
use waymark_types::VerificationParams;

/// Compute the voting weight for a contributor at the moment a vote is cast.
///
/// Precedence, first match wins:
/// 1. Super contributors get `super_weight`.
/// 2. Contributors with ≥ 1 settled vote and accuracy ≥ `accuracy_threshold`
///    get `trusted_weight`.
/// 3. Contributors with reputation ≥ `reputation_threshold` get
///    `trusted_weight`.
/// 4. Everyone else gets `base_weight`.
///
/// Pure function of the profile; always returns a positive weight.
pub fn weight_for(profile: &ContributorProfile, params: &VerificationParams) -> f64 {
    if profile.role.is_super() {
        return params.super_weight;
    }
    if let Some(accuracy) = profile.accuracy() {
        if accuracy >= params.accuracy_threshold {
            return params.trusted_weight;
        }
    }
    if profile.reputation() >= params.reputation_threshold {
        return params.trusted_weight;
    }
    params.base_weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::{ContributorId, ContributorRole, Timestamp};

    fn profile() -> ContributorProfile {
        ContributorProfile::new(ContributorId::new("ctr_test"), Timestamp::new(0))
    }

    fn params() -> VerificationParams {
        VerificationParams::default()
    }

    #[test]
    fn super_contributor_outranks_everything() {
        let mut p = profile();
        p.role = ContributorRole::Super;
        p.set_reputation(0);
        assert_eq!(weight_for(&p, &params()), 4.0);
    }

    #[test]
    fn accurate_voter_gets_trusted_weight() {
        let mut p = profile();
        for _ in 0..4 {
            p.record_settled_vote(true);
        }
        p.record_settled_vote(false); // 4/5 = 0.8, on the threshold
        assert_eq!(weight_for(&p, &params()), 2.0);
    }

    #[test]
    fn zero_votes_cast_falls_through_to_reputation() {
        let mut p = profile();
        p.set_reputation(70);
        assert_eq!(weight_for(&p, &params()), 2.0);
    }

    #[test]
    fn inaccurate_voter_can_still_qualify_by_reputation() {
        let mut p = profile();
        p.record_settled_vote(false);
        p.set_reputation(85);
        assert_eq!(weight_for(&p, &params()), 2.0);
    }

    #[test]
    fn newcomer_gets_base_weight() {
        assert_eq!(weight_for(&profile(), &params()), 1.0);
    }

    #[test]
    fn admin_is_not_weighted_like_super() {
        let mut p = profile();
        p.role = ContributorRole::Admin;
        assert_eq!(weight_for(&p, &params()), 1.0);
    }
}
