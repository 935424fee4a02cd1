//! Pure scoring engines.
//!
//! # Responsibility
//! - Aggregate a vote set into per-criterion statistics and a GUT score.
//! - Classify scores into priority tiers and dispersion into consensus tiers.
//!
//! # Invariants
//! - Nothing here touches storage or holds shared state.

pub mod aggregate;
pub mod classify;
