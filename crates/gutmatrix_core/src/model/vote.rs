//! Vote domain model.
//!
//! # Invariants
//! - A vote is keyed by `(problem_id, participant_id)`; at most one exists per key.
//! - `score` is always a validated `Score`.

use crate::model::problem::ProblemId;
use crate::model::score::{Score, ValidationError};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Participant identity as typed at login, trimmed. Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyParticipant);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ParticipantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current vote of one participant on one problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vote {
    pub problem_id: ProblemId,
    pub participant_id: ParticipantId,
    pub score: Score,
    /// Epoch milliseconds of the last write.
    pub submitted_at: i64,
}

#[cfg(test)]
mod tests {
    use super::ParticipantId;
    use crate::model::score::ValidationError;

    #[test]
    fn participant_is_trimmed_and_must_not_be_blank() {
        assert_eq!(ParticipantId::parse("  Ana ").unwrap().as_str(), "Ana");
        assert_eq!(
            ParticipantId::parse(" \t").unwrap_err(),
            ValidationError::EmptyParticipant
        );
    }
}
