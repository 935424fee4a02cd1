//! Problem registry use-case service.
//!
//! # Responsibility
//! - Gate administrative problem mutations on the caller-supplied role.
//! - Validate names before they reach persistence.
//!
//! # Invariants
//! - Only `Role::Admin` callers may create, update, remove or reset.
//! - Removal cascades to votes; this is the only vote deletion path.

use crate::error::{CoreError, CoreResult};
use crate::model::problem::{Problem, ProblemDraft, ProblemId};
use crate::repo::problem_repo::{ProblemRepository, ResetSummary};
use log::{info, warn};

/// Caller role, established by an authentication gate outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Participant,
}

/// Problem registry facade over repository implementations.
pub struct ProblemRegistry<R: ProblemRepository> {
    repo: R,
}

impl<R: ProblemRepository> ProblemRegistry<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a problem, or updates name/description of the problem with
    /// the same normalized name. Returns its stable id.
    ///
    /// # Errors
    /// - `AdminRequired` for non-admin callers.
    /// - `Validation` when the name is blank.
    pub fn create_or_update(
        &self,
        role: Role,
        name: &str,
        description: Option<&str>,
    ) -> CoreResult<ProblemId> {
        require_admin(role, "problem_upsert")?;
        let draft = ProblemDraft::new(name, description)?;
        let problem = self.repo.upsert_problem(&draft)?;

        info!(
            "event=problem_upsert module=registry status=ok problem_id={} position={}",
            problem.id, problem.position
        );
        Ok(problem.id)
    }

    pub fn get(&self, id: ProblemId) -> CoreResult<Option<Problem>> {
        Ok(self.repo.get_problem(id)?)
    }

    /// Lists problems in creation order.
    pub fn list(&self) -> CoreResult<Vec<Problem>> {
        Ok(self.repo.list_problems()?)
    }

    /// Removes a problem and every vote on it.
    ///
    /// Returns `false` when the id is unknown.
    pub fn remove(&self, role: Role, id: ProblemId) -> CoreResult<bool> {
        require_admin(role, "problem_remove")?;
        match self.repo.remove_problem(id)? {
            Some(votes_removed) => {
                info!(
                    "event=problem_remove module=registry status=ok problem_id={} votes_removed={}",
                    id, votes_removed
                );
                Ok(true)
            }
            None => {
                info!(
                    "event=problem_remove module=registry status=absent problem_id={}",
                    id
                );
                Ok(false)
            }
        }
    }

    /// Removes every problem and vote in the workspace.
    pub fn reset(&self, role: Role) -> CoreResult<ResetSummary> {
        require_admin(role, "workspace_reset")?;
        let summary = self.repo.clear_all()?;
        info!(
            "event=workspace_reset module=registry status=ok problems_removed={} votes_removed={}",
            summary.problems_removed, summary.votes_removed
        );
        Ok(summary)
    }
}

fn require_admin(role: Role, event: &str) -> CoreResult<()> {
    if role == Role::Admin {
        return Ok(());
    }
    warn!("event={event} module=registry status=denied error_code=admin_required");
    Err(CoreError::AdminRequired)
}
