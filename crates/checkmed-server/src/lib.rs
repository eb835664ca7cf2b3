//! HTTP surface for the CheckMed verification pipeline.
//!
//! Thin transport layer: multipart extraction, wire-status mapping, and
//! route wiring. All decision logic lives in `checkmed-core`; persistence
//! in `checkmed-registry`.

pub mod extract;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
