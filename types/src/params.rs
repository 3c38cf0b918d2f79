//! Verification parameters — every tunable constant of the crowd-verification
//! contract lives here.
//!
//! The defaults are the numeric contract the rest of the workspace (and its
//! tests) depend on. Historical landmark and route code paths drifted apart
//! on a few of these; this struct is the single unified source.

use serde::{Deserialize, Serialize};

/// All parameters of the weighted, decay-aware verification algorithm.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationParams {
    // ── Vote weighting ───────────────────────────────────────────────────
    /// Weight for Super contributors.
    pub super_weight: f64,

    /// Weight for contributors with a strong voting track record or high
    /// reputation.
    pub trusted_weight: f64,

    /// Base weight for everyone else.
    pub base_weight: f64,

    /// Historical voting accuracy (correct / total) needed for the trusted
    /// weight. Requires at least one prior vote.
    pub accuracy_threshold: f64,

    /// Reputation score (0–100) needed for the trusted weight.
    pub reputation_threshold: u8,

    // ── Decay ────────────────────────────────────────────────────────────
    /// Exponential decay constant per hour of vote age.
    /// 0.005 gives a half-life of roughly 139 hours (~5.8 days).
    pub decay_rate_per_hour: f64,

    // ── Tally thresholds ─────────────────────────────────────────────────
    /// Base required weight before any submission can verify.
    pub required_weight_base: f64,

    /// Extra required weight per vote cast. More participation raises the
    /// bar slightly, so a burst of low-weight votes cannot verify alone.
    pub required_weight_per_vote: f64,

    /// Minimum yes-weight share of the total for verification.
    pub agreement_ratio: f64,

    /// Fraction of the required weight that no-weight must reach to reject.
    pub rejection_ratio: f64,

    /// A split narrower than this (in absolute weight) is contested.
    pub dispute_margin: f64,

    /// Minimum total weight before a contested split counts as disputed.
    pub dispute_min_weight: f64,

    // ── Side effects ─────────────────────────────────────────────────────
    /// Cumulative verified submissions (landmarks + routes) that promote a
    /// contributor to Super.
    pub promotion_threshold: u32,

    /// How many times a cast-vote call retries after an optimistic-lock
    /// conflict before surfacing the failure.
    pub max_cas_retries: u32,
}

impl VerificationParams {
    /// Waymark defaults — the intended live configuration.
    pub fn waymark_defaults() -> Self {
        Self {
            super_weight: 4.0,
            trusted_weight: 2.0,
            base_weight: 1.0,
            accuracy_threshold: 0.8,
            reputation_threshold: 70,

            decay_rate_per_hour: 0.005,

            required_weight_base: 5.0,
            required_weight_per_vote: 0.2,
            agreement_ratio: 0.8,
            rejection_ratio: 0.6,
            dispute_margin: 2.0,
            dispute_min_weight: 3.0,

            promotion_threshold: 10,
            max_cas_retries: 5,
        }
    }

    /// The dynamic verification threshold for a given vote count.
    pub fn required_weight(&self, vote_count: usize) -> f64 {
        self.required_weight_base + self.required_weight_per_vote * vote_count as f64
    }
}

/// Default is the Waymark live configuration.
impl Default for VerificationParams {
    fn default() -> Self {
        Self::waymark_defaults()
    }
}
