//! Error taxonomy surfaced by core services.
//!
//! # Invariants
//! - Every variant is recoverable by the caller; the core never retries.
//! - A failed operation leaves no partially committed state behind.

use crate::model::problem::ProblemId;
use crate::model::score::ValidationError;
use crate::repo::problem_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, CoreError>;

/// Coarse classification used by presentation layers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Persistence,
    Forbidden,
}

/// Service-level error for registry, vote and report use-cases.
#[derive(Debug)]
pub enum CoreError {
    /// Caller input is invalid; nothing was written.
    Validation(ValidationError),
    /// Referenced problem does not exist.
    NotFound(ProblemId),
    /// Storage failed or returned corrupt data.
    Persistence(RepoError),
    /// Operation requires the administrator role.
    AdminRequired,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::AdminRequired => ErrorKind::Forbidden,
        }
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "problem not found: {id}"),
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
            Self::AdminRequired => write!(f, "operation requires the administrator role"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::NotFound(_) | Self::AdminRequired => None,
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Persistence(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreError, ErrorKind};
    use crate::model::problem::problem_id_for_name;
    use crate::model::score::ValidationError;
    use crate::repo::problem_repo::RepoError;

    #[test]
    fn repo_errors_map_onto_core_taxonomy() {
        let id = problem_id_for_name("gone");
        let not_found = CoreError::from(RepoError::NotFound(id));
        assert!(matches!(not_found, CoreError::NotFound(found) if found == id));
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let validation = CoreError::from(RepoError::Validation(ValidationError::EmptyParticipant));
        assert_eq!(validation.kind(), ErrorKind::Validation);

        let persistence = CoreError::from(RepoError::InvalidData("bad".to_string()));
        assert_eq!(persistence.kind(), ErrorKind::Persistence);
        assert!(persistence.to_string().contains("bad"));
    }
}
