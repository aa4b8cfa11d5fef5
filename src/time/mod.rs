//! Wall-clock sources.
//!
//! Issuance and verification take the current time from a [`Clock`] so tests
//! can pin or advance it.

pub mod clock;

// Re-export for convenience
pub use clock::*;
