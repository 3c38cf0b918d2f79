//! Fundamental types for the Waymark verification backend.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: identifiers, geometry, timestamps, verification parameters, and
//! role/status enums.

pub mod error;
pub mod geo;
pub mod id;
pub mod params;
pub mod state;
pub mod time;

pub use error::WaymarkError;
pub use geo::{GeoPoint, Geometry};
pub use id::{ContributorId, SubmissionId};
pub use params::VerificationParams;
pub use state::{ContributorRole, SubmissionKind, SubmissionStatus, VoteChoice};
pub use time::Timestamp;
