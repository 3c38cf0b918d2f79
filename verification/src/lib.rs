//! Weighted, decay-aware crowd-verification of landmarks and routes.
//!
//! Contributors vote yes/no on submitted map facts. Each vote carries a
//! weight derived from the voter's role, reputation, and track record, and
//! loses influence as it ages. The engine recomputes the full tally on every
//! vote change and drives the submission through
//! pending / verified / rejected / disputed.
//!
//! The engine is synchronous and clock-free: callers pass `now` explicitly,
//! and all persistence goes through the abstract store traits.

pub mod decay;
pub mod engine;
pub mod error;
pub mod tally;
pub mod weight;

pub use decay::decay_factor;
pub use engine::{VerificationEngine, VoteReceipt};
pub use error::VerificationError;
pub use tally::{compute_tally, TallyOutcome};
pub use weight::weight_for;
