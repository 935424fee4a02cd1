//! Vote repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store exactly one current vote per `(problem, participant)` key.
//! - Serve consistent multi-statement reads used by aggregation and reports.
//!
//! # Invariants
//! - `upsert_vote` writes all three criteria in one statement inside an
//!   IMMEDIATE transaction; racing writers on one key serialize and the last
//!   commit wins.
//! - Voting on a problem that does not exist fails with `NotFound` and writes
//!   nothing.
//! - Snapshot reads run inside one read transaction, so they never mix
//!   states from before and after a concurrent commit.

use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::problem::{Problem, ProblemId};
use crate::model::score::Score;
use crate::model::vote::{ParticipantId, Vote};
use crate::repo::problem_repo::{
    ensure_connection_ready, find_problem, load_problems, parse_problem_uuid, RepoError,
    RepoResult,
};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;

const VOTE_SELECT_SQL: &str = "SELECT
    problem_uuid,
    participant_id,
    gravity,
    urgency,
    trend,
    submitted_at
FROM votes";

/// One problem together with its full current vote set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemVotes {
    pub problem: Problem,
    /// Ordered by participant id.
    pub votes: Vec<Vote>,
}

/// One problem paired with a given participant's current vote, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallotEntry {
    pub problem: Problem,
    pub vote: Option<Vote>,
}

/// Workspace-wide row counts read in a single statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkspaceCounts {
    pub problems: usize,
    pub votes: usize,
    pub participants: usize,
}

/// Repository interface for vote storage.
pub trait VoteRepository {
    /// Inserts or replaces the vote for `(problem_id, participant_id)`.
    fn upsert_vote(
        &self,
        problem_id: ProblemId,
        participant_id: &ParticipantId,
        score: Score,
    ) -> RepoResult<Vote>;
    fn get_vote(
        &self,
        problem_id: ProblemId,
        participant_id: &ParticipantId,
    ) -> RepoResult<Option<Vote>>;
    /// Returns the current vote set of an existing problem.
    fn list_votes(&self, problem_id: ProblemId) -> RepoResult<Vec<Vote>>;
    /// Returns every problem in creation order with its votes.
    fn scoreboard(&self) -> RepoResult<Vec<ProblemVotes>>;
    /// Returns every problem in creation order with one participant's vote.
    fn ballot(&self, participant_id: &ParticipantId) -> RepoResult<Vec<BallotEntry>>;
    fn counts(&self) -> RepoResult<WorkspaceCounts>;
}

/// SQLite-backed vote repository.
pub struct SqliteVoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl VoteRepository for SqliteVoteRepository<'_> {
    fn upsert_vote(
        &self,
        problem_id: ProblemId,
        participant_id: &ParticipantId,
        score: Score,
    ) -> RepoResult<Vote> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let problem_uuid = problem_id.to_string();

        if !problem_exists(&tx, problem_uuid.as_str())? {
            return Err(RepoError::NotFound(problem_id));
        }

        let submitted_at: i64 = tx.query_row(
            &format!(
                "INSERT INTO votes (
                    problem_uuid,
                    participant_id,
                    gravity,
                    urgency,
                    trend,
                    submitted_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, {NOW_EPOCH_MS_SQL})
                ON CONFLICT (problem_uuid, participant_id) DO UPDATE SET
                    gravity = excluded.gravity,
                    urgency = excluded.urgency,
                    trend = excluded.trend,
                    submitted_at = excluded.submitted_at
                RETURNING submitted_at;"
            ),
            params![
                problem_uuid.as_str(),
                participant_id.as_str(),
                score.gravity(),
                score.urgency(),
                score.trend(),
            ],
            |row| row.get(0),
        )?;
        tx.commit()?;

        Ok(Vote {
            problem_id,
            participant_id: participant_id.clone(),
            score,
            submitted_at,
        })
    }

    fn get_vote(
        &self,
        problem_id: ProblemId,
        participant_id: &ParticipantId,
    ) -> RepoResult<Option<Vote>> {
        self.conn
            .query_row(
                &format!("{VOTE_SELECT_SQL} WHERE problem_uuid = ?1 AND participant_id = ?2;"),
                params![problem_id.to_string(), participant_id.as_str()],
                read_vote_columns,
            )
            .optional()?
            .map(VoteColumns::into_vote)
            .transpose()
    }

    fn list_votes(&self, problem_id: ProblemId) -> RepoResult<Vec<Vote>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        if find_problem(&tx, problem_id)?.is_none() {
            return Err(RepoError::NotFound(problem_id));
        }
        let votes = load_votes_for_problem(&tx, problem_id)?;
        tx.commit()?;
        Ok(votes)
    }

    fn scoreboard(&self) -> RepoResult<Vec<ProblemVotes>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let problems = load_problems(&tx)?;
        let mut grouped = load_all_votes(&tx)?;
        tx.commit()?;

        Ok(problems
            .into_iter()
            .map(|problem| {
                let votes = grouped.remove(&problem.id).unwrap_or_default();
                ProblemVotes { problem, votes }
            })
            .collect())
    }

    fn ballot(&self, participant_id: &ParticipantId) -> RepoResult<Vec<BallotEntry>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let problems = load_problems(&tx)?;

        let mut stmt = tx.prepare(&format!("{VOTE_SELECT_SQL} WHERE participant_id = ?1;"))?;
        let mut rows = stmt.query([participant_id.as_str()])?;
        let mut by_problem = HashMap::new();
        while let Some(row) = rows.next()? {
            let vote = read_vote_columns(row)?.into_vote()?;
            by_problem.insert(vote.problem_id, vote);
        }
        drop(rows);
        drop(stmt);
        tx.commit()?;

        Ok(problems
            .into_iter()
            .map(|problem| {
                let vote = by_problem.remove(&problem.id);
                BallotEntry { problem, vote }
            })
            .collect())
    }

    fn counts(&self) -> RepoResult<WorkspaceCounts> {
        let (problems, votes, participants): (i64, i64, i64) = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM problems),
                (SELECT COUNT(*) FROM votes),
                (SELECT COUNT(DISTINCT participant_id) FROM votes);",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(WorkspaceCounts {
            problems: to_count(problems)?,
            votes: to_count(votes)?,
            participants: to_count(participants)?,
        })
    }
}

struct VoteColumns {
    problem_uuid: String,
    participant_id: String,
    gravity: i64,
    urgency: i64,
    trend: i64,
    submitted_at: i64,
}

impl VoteColumns {
    fn into_vote(self) -> RepoResult<Vote> {
        let problem_id = parse_problem_uuid(&self.problem_uuid)?;
        let participant_id = ParticipantId::parse(&self.participant_id).map_err(|_| {
            RepoError::InvalidData(format!(
                "empty participant for problem `{problem_id}` in votes.participant_id"
            ))
        })?;
        let score = Score::new(self.gravity, self.urgency, self.trend).map_err(|err| {
            RepoError::InvalidData(format!("invalid score for problem `{problem_id}`: {err}"))
        })?;

        Ok(Vote {
            problem_id,
            participant_id,
            score,
            submitted_at: self.submitted_at,
        })
    }
}

fn read_vote_columns(row: &Row<'_>) -> rusqlite::Result<VoteColumns> {
    Ok(VoteColumns {
        problem_uuid: row.get("problem_uuid")?,
        participant_id: row.get("participant_id")?,
        gravity: row.get("gravity")?,
        urgency: row.get("urgency")?,
        trend: row.get("trend")?,
        submitted_at: row.get("submitted_at")?,
    })
}

fn load_votes_for_problem(conn: &Connection, problem_id: ProblemId) -> RepoResult<Vec<Vote>> {
    let mut stmt = conn.prepare(&format!(
        "{VOTE_SELECT_SQL} WHERE problem_uuid = ?1 ORDER BY participant_id ASC;"
    ))?;
    let mut rows = stmt.query([problem_id.to_string()])?;
    let mut votes = Vec::new();
    while let Some(row) = rows.next()? {
        votes.push(read_vote_columns(row)?.into_vote()?);
    }
    Ok(votes)
}

fn load_all_votes(conn: &Connection) -> RepoResult<HashMap<ProblemId, Vec<Vote>>> {
    let mut stmt = conn.prepare(&format!(
        "{VOTE_SELECT_SQL} ORDER BY problem_uuid ASC, participant_id ASC;"
    ))?;
    let mut rows = stmt.query([])?;
    let mut grouped: HashMap<ProblemId, Vec<Vote>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let vote = read_vote_columns(row)?.into_vote()?;
        grouped.entry(vote.problem_id).or_default().push(vote);
    }
    Ok(grouped)
}

fn problem_exists(tx: &Transaction<'_>, problem_uuid: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM problems WHERE uuid = ?1);",
        [problem_uuid],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn to_count(value: i64) -> RepoResult<usize> {
    usize::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative row count `{value}`")))
}
