//! Abstract storage traits for the Waymark backend.
//!
//! Every storage backend (the embedded in-memory store today, a document
//! store later) implements these traits. The rest of the codebase depends
//! only on the traits.

pub mod contributor;
pub mod error;
pub mod submission;

pub use contributor::{ContributorProfile, ContributorStore};
pub use error::StoreError;
pub use submission::{Submission, SubmissionStore, TallySnapshot, Vote};
