//! Time decay of vote influence.

/// Multiplicative decay factor for a vote of the given age.
///
/// `exp(-rate * age_hours)`: 1.0 at age zero, strictly decreasing,
/// asymptotically approaching (but never reaching) zero. At the default rate
/// of 0.005/hour the half-life is about 139 hours.
///
/// Negative ages are clamped to zero so a vote never gains influence.
pub fn decay_factor(age_hours: f64, rate_per_hour: f64) -> f64 {
    (-rate_per_hour * age_hours.max(0.0)).exp()
}
