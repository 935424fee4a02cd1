//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define keyed persistence contracts for problems and votes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes receive already-validated model values.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod problem_repo;
pub mod vote_repo;
