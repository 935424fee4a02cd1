//! Vote store use-case service.
//!
//! # Responsibility
//! - Validate raw ratings and participant ids before storage.
//! - Expose the keyed upsert/read operations used by voting screens.
//!
//! # Invariants
//! - Invalid input never reaches the repository, so a rejected re-vote
//!   leaves the previous vote untouched.
//! - Logs carry problem ids only, never participant names.

use crate::error::CoreResult;
use crate::model::problem::ProblemId;
use crate::model::score::Score;
use crate::model::vote::{ParticipantId, Vote};
use crate::repo::vote_repo::{BallotEntry, VoteRepository};
use log::{debug, info};
use std::time::Instant;

/// Vote store facade over repository implementations.
pub struct VoteStore<R: VoteRepository> {
    repo: R,
}

impl<R: VoteRepository> VoteStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records or replaces `participant_id`'s vote on `problem_id`.
    ///
    /// # Errors
    /// - `Validation` when a rating is outside `[1, 5]` or the participant is blank.
    /// - `NotFound` when the problem does not exist (including after removal).
    pub fn upsert_vote(
        &self,
        problem_id: ProblemId,
        participant_id: &str,
        gravity: i64,
        urgency: i64,
        trend: i64,
    ) -> CoreResult<Vote> {
        let participant_id = ParticipantId::parse(participant_id)?;
        let score = Score::new(gravity, urgency, trend)?;

        let started_at = Instant::now();
        let vote = self.repo.upsert_vote(problem_id, &participant_id, score)?;
        info!(
            "event=vote_upsert module=vote status=ok problem_id={} duration_ms={}",
            problem_id,
            started_at.elapsed().as_millis()
        );
        Ok(vote)
    }

    /// Returns the participant's latest committed vote, if any.
    pub fn get_vote(&self, problem_id: ProblemId, participant_id: &str) -> CoreResult<Option<Vote>> {
        let participant_id = ParticipantId::parse(participant_id)?;
        Ok(self.repo.get_vote(problem_id, &participant_id)?)
    }

    /// Returns the exact current vote set of a problem.
    pub fn list_votes(&self, problem_id: ProblemId) -> CoreResult<Vec<Vote>> {
        let votes = self.repo.list_votes(problem_id)?;
        debug!(
            "event=vote_list module=vote status=ok problem_id={} count={}",
            problem_id,
            votes.len()
        );
        Ok(votes)
    }

    /// Lists every problem with this participant's previous vote, for
    /// pre-populating a voting form.
    pub fn participant_ballot(&self, participant_id: &str) -> CoreResult<Vec<BallotEntry>> {
        let participant_id = ParticipantId::parse(participant_id)?;
        Ok(self.repo.ballot(&participant_id)?)
    }
}
