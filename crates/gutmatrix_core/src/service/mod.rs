//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into registry, voting and report APIs.
//! - Keep presentation layers decoupled from storage details.
//!
//! # Invariants
//! - Presentation never recomputes aggregation; `ReportBuilder` is the only
//!   ranked read surface.

pub mod registry_service;
pub mod report_service;
pub mod vote_service;
