//! REST server for the Waymark backend.
//!
//! Provides endpoints for:
//! - Contributor registration and profile lookup
//! - Landmark/route submission
//! - Vote casting and tally queries
//!
//! The server is thin glue: it parses requests, reads the clock, and hands
//! everything to the verification engine. No map rendering, authentication,
//! or localization lives here.

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::ServerConfig;
pub use error::RpcError;
pub use server::RpcServer;
