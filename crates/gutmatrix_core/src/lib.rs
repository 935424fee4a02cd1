//! Collaborative GUT scoring core.
//!
//! Participants rate shared problems on Gravity, Urgency and Trend (1–5).
//! This crate stores one current vote per participant and problem, and
//! derives the ranked priority report from the current vote set.

pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scoring;
pub mod service;

pub use error::{CoreError, CoreResult, ErrorKind};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::problem::{normalize_problem_name, problem_id_for_name, Problem, ProblemId};
pub use model::score::{Criterion, Score, ValidationError, MAX_RATING, MIN_RATING};
pub use model::vote::{ParticipantId, Vote};
pub use repo::problem_repo::{
    ProblemRepository, RepoError, RepoResult, ResetSummary, SqliteProblemRepository,
};
pub use repo::vote_repo::{
    BallotEntry, ProblemVotes, SqliteVoteRepository, VoteRepository, WorkspaceCounts,
};
pub use scoring::aggregate::{aggregate, Aggregate, CriterionStats};
pub use scoring::classify::{ConsensusProfile, ConsensusTier, PriorityTier};
pub use service::registry_service::{ProblemRegistry, Role};
pub use service::report_service::{
    derive_insights, ExportRow, Insight, ReportBuilder, ReportEntry, WorkspaceStats,
};
pub use service::vote_service::VoteStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
