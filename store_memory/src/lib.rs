//! In-memory storage backend.
//!
//! Thread-safe `Mutex<HashMap>` maps implementing the Waymark store traits
//! with per-record version checks. Doubles as the embedded backend for the
//! lightweight server and as the deterministic store for tests.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::MemoryStore;
