//! Domain model for collaborative GUT scoring.
//!
//! # Responsibility
//! - Define problems, votes and the validated score triple.
//! - Validate raw input before it can reach persistence.
//!
//! # Invariants
//! - Every problem is identified by a name-derived `ProblemId`.
//! - Every vote carries a `Score` whose criteria lie in `[1, 5]`.

pub mod problem;
pub mod score;
pub mod vote;
