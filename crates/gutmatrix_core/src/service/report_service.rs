//! Consolidated report use-case service.
//!
//! # Responsibility
//! - Join problems, aggregates and classifications into the ranked view.
//! - Provide workspace counters, interpretation flags and flat export rows.
//!
//! # Invariants
//! - Every report is computed from one consistent read snapshot.
//! - Problems without votes never appear in the ranking.
//! - Ranking is `gut_score DESC`, ties by creation position ASC.

use crate::error::{CoreError, CoreResult};
use crate::model::problem::{Problem, ProblemId};
use crate::model::score::Criterion;
use crate::repo::vote_repo::{VoteRepository, WorkspaceCounts};
use crate::scoring::aggregate::{aggregate, round2, Aggregate};
use crate::scoring::classify::{ConsensusProfile, ConsensusTier, PriorityTier};
use log::info;
use serde::Serialize;
use std::time::Instant;

/// Mean rating at or above which a criterion is flagged as pressing.
pub const PRESSING_MEAN_THRESHOLD: f64 = 4.0;

/// Automatic interpretation flag attached to a ranked problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    /// Mean gravity is at least 4.
    SevereProblem,
    /// Mean urgency is at least 4.
    ActNow,
    /// Mean trend is at least 4.
    WorseningFast,
    /// Participants disagree strongly on this criterion; discuss further.
    Divergence(Criterion),
}

/// One row of the ranked report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub problem: Problem,
    pub aggregate: Aggregate,
    pub priority: PriorityTier,
    pub consensus: ConsensusProfile,
    pub insights: Vec<Insight>,
}

/// Flat tabular record for spreadsheet-style export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub name: String,
    pub votes: usize,
    pub mean_gravity: f64,
    pub sum_gravity: u32,
    pub mean_urgency: f64,
    pub sum_urgency: u32,
    pub mean_trend: f64,
    pub sum_trend: u32,
    pub gut_score: f64,
    pub priority: &'static str,
}

impl From<&ReportEntry> for ExportRow {
    fn from(entry: &ReportEntry) -> Self {
        let stats = &entry.aggregate;
        Self {
            name: entry.problem.name.clone(),
            votes: stats.count,
            mean_gravity: round2(stats.gravity.mean),
            sum_gravity: stats.gravity.sum,
            mean_urgency: round2(stats.urgency.mean),
            sum_urgency: stats.urgency.sum,
            mean_trend: round2(stats.trend.mean),
            sum_trend: stats.trend.sum,
            gut_score: round2(stats.gut_score),
            priority: entry.priority.label(),
        }
    }
}

/// Workspace-wide counters shown above the ranking.
pub type WorkspaceStats = WorkspaceCounts;

/// Report builder facade over vote repository implementations.
pub struct ReportBuilder<R: VoteRepository> {
    repo: R,
}

impl<R: VoteRepository> ReportBuilder<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Aggregates the current votes of one problem.
    ///
    /// Returns `Ok(None)` when the problem exists but has no votes yet.
    ///
    /// # Errors
    /// - `NotFound` when the problem does not exist.
    pub fn aggregate(&self, problem_id: ProblemId) -> CoreResult<Option<Aggregate>> {
        let votes = self.repo.list_votes(problem_id)?;
        Ok(aggregate(&votes))
    }

    /// Builds the ranked report over every problem with at least one vote.
    pub fn build_report(&self) -> CoreResult<Vec<ReportEntry>> {
        let started_at = Instant::now();
        let scoreboard = self.repo.scoreboard()?;
        let problem_count = scoreboard.len();

        let mut entries: Vec<ReportEntry> = scoreboard
            .into_iter()
            .filter_map(|item| {
                let aggregate = aggregate(&item.votes)?;
                Some(build_entry(item.problem, aggregate))
            })
            .collect();

        entries.sort_by(|left, right| {
            right
                .aggregate
                .gut_score
                .total_cmp(&left.aggregate.gut_score)
                .then_with(|| left.problem.position.cmp(&right.problem.position))
        });

        info!(
            "event=report_build module=report status=ok problems={} ranked={} duration_ms={}",
            problem_count,
            entries.len(),
            started_at.elapsed().as_millis()
        );
        Ok(entries)
    }

    /// Flattens the ranked report into export rows, reals rounded to two decimals.
    pub fn export_rows(&self) -> CoreResult<Vec<ExportRow>> {
        Ok(self.build_report()?.iter().map(ExportRow::from).collect())
    }

    pub fn workspace_stats(&self) -> CoreResult<WorkspaceStats> {
        self.repo.counts().map_err(CoreError::from)
    }
}

fn build_entry(problem: Problem, aggregate: Aggregate) -> ReportEntry {
    let consensus = ConsensusProfile::from_aggregate(&aggregate);
    ReportEntry {
        priority: PriorityTier::from_gut_score(aggregate.gut_score),
        insights: derive_insights(&aggregate, &consensus),
        problem,
        aggregate,
        consensus,
    }
}

/// Derives interpretation flags from an aggregate and its consensus profile.
pub fn derive_insights(aggregate: &Aggregate, consensus: &ConsensusProfile) -> Vec<Insight> {
    let mut insights = Vec::new();
    if aggregate.gravity.mean >= PRESSING_MEAN_THRESHOLD {
        insights.push(Insight::SevereProblem);
    }
    if aggregate.urgency.mean >= PRESSING_MEAN_THRESHOLD {
        insights.push(Insight::ActNow);
    }
    if aggregate.trend.mean >= PRESSING_MEAN_THRESHOLD {
        insights.push(Insight::WorseningFast);
    }
    for criterion in Criterion::ALL {
        if consensus.get(criterion) == ConsensusTier::Low {
            insights.push(Insight::Divergence(criterion));
        }
    }
    insights
}
