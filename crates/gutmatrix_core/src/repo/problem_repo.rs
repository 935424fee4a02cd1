//! Problem repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create-or-update, lookup, ordered listing and cascading removal
//!   over the `problems` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Upsert is keyed by the name-derived uuid and never changes `position`
//!   or `created_at` of an existing row.
//! - Listing order is `position ASC` (creation order).
//! - Removal deletes the problem and all of its votes in one transaction.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::{DbError, NOW_EPOCH_MS_SQL};
use crate::model::problem::{Problem, ProblemDraft, ProblemId};
use crate::model::score::ValidationError;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub(crate) const PROBLEM_SELECT_SQL: &str = "SELECT
    position,
    uuid,
    name,
    description,
    created_at,
    updated_at
FROM problems";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for problem and vote persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before any SQL ran.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Referenced problem does not exist.
    NotFound(ProblemId),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "problem not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row counts removed by a workspace reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetSummary {
    pub problems_removed: usize,
    pub votes_removed: usize,
}

/// Repository interface for problem definitions.
pub trait ProblemRepository {
    /// Inserts a new problem or overwrites name/description of an existing one.
    fn upsert_problem(&self, draft: &ProblemDraft) -> RepoResult<Problem>;
    fn get_problem(&self, id: ProblemId) -> RepoResult<Option<Problem>>;
    /// Lists all problems in creation order.
    fn list_problems(&self) -> RepoResult<Vec<Problem>>;
    /// Removes a problem and its votes. Returns the number of votes removed,
    /// or `None` when the problem does not exist.
    fn remove_problem(&self, id: ProblemId) -> RepoResult<Option<usize>>;
    /// Removes every problem and vote.
    fn clear_all(&self) -> RepoResult<ResetSummary>;
}

/// SQLite-backed problem repository.
pub struct SqliteProblemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProblemRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProblemRepository for SqliteProblemRepository<'_> {
    fn upsert_problem(&self, draft: &ProblemDraft) -> RepoResult<Problem> {
        let sql = format!(
            "INSERT INTO problems (uuid, name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, {NOW_EPOCH_MS_SQL}, {NOW_EPOCH_MS_SQL})
             ON CONFLICT (uuid) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                updated_at = excluded.updated_at
             RETURNING position, uuid, name, description, created_at, updated_at;"
        );

        let row = self.conn.query_row(
            &sql,
            params![
                draft.id.to_string(),
                draft.name.as_str(),
                draft.description.as_deref()
            ],
            read_problem_columns,
        )?;
        row.into_problem()
    }

    fn get_problem(&self, id: ProblemId) -> RepoResult<Option<Problem>> {
        find_problem(self.conn, id)
    }

    fn list_problems(&self) -> RepoResult<Vec<Problem>> {
        load_problems(self.conn)
    }

    fn remove_problem(&self, id: ProblemId) -> RepoResult<Option<usize>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let id_text = id.to_string();

        let votes_removed = tx.execute(
            "DELETE FROM votes WHERE problem_uuid = ?1;",
            [id_text.as_str()],
        )?;
        let problems_removed =
            tx.execute("DELETE FROM problems WHERE uuid = ?1;", [id_text.as_str()])?;

        if problems_removed == 0 {
            // Nothing to remove; votes cannot exist without their problem.
            tx.rollback()?;
            return Ok(None);
        }

        tx.commit()?;
        Ok(Some(votes_removed))
    }

    fn clear_all(&self) -> RepoResult<ResetSummary> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let votes_removed = tx.execute("DELETE FROM votes;", [])?;
        let problems_removed = tx.execute("DELETE FROM problems;", [])?;
        tx.commit()?;

        Ok(ResetSummary {
            problems_removed,
            votes_removed,
        })
    }
}

/// Raw problem columns, converted to `Problem` outside the rusqlite closure
/// so conversion failures surface as `RepoError::InvalidData`.
pub(crate) struct ProblemColumns {
    position: i64,
    uuid: String,
    name: String,
    description: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl ProblemColumns {
    pub(crate) fn into_problem(self) -> RepoResult<Problem> {
        let id = parse_problem_uuid(&self.uuid)?;
        if self.name.trim().is_empty() {
            return Err(RepoError::InvalidData(format!(
                "empty name for problem `{id}` in problems.name"
            )));
        }

        Ok(Problem {
            id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
            position: self.position,
        })
    }
}

pub(crate) fn read_problem_columns(row: &Row<'_>) -> rusqlite::Result<ProblemColumns> {
    Ok(ProblemColumns {
        position: row.get("position")?,
        uuid: row.get("uuid")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn find_problem(conn: &Connection, id: ProblemId) -> RepoResult<Option<Problem>> {
    conn.query_row(
        &format!("{PROBLEM_SELECT_SQL} WHERE uuid = ?1;"),
        [id.to_string()],
        read_problem_columns,
    )
    .optional()?
    .map(ProblemColumns::into_problem)
    .transpose()
}

pub(crate) fn load_problems(conn: &Connection) -> RepoResult<Vec<Problem>> {
    let mut stmt = conn.prepare(&format!("{PROBLEM_SELECT_SQL} ORDER BY position ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut problems = Vec::new();
    while let Some(row) = rows.next()? {
        problems.push(read_problem_columns(row)?.into_problem()?);
    }
    Ok(problems)
}

pub(crate) fn parse_problem_uuid(value: &str) -> RepoResult<ProblemId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}`")))
}

pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
