//! Problem domain model.
//!
//! # Responsibility
//! - Define the scored problem record and its stable identity.
//! - Derive identity from the normalized name so repeated submissions of the
//!   same name address the same problem.
//!
//! # Invariants
//! - `id` is a pure function of `normalize_problem_name(name)`.
//! - `name` is never empty.
//! - `created_at` and `position` never change after first insertion.

use crate::model::score::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a problem.
pub type ProblemId = Uuid;

/// Namespace for name-derived problem ids (UUID v5).
const PROBLEM_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2b9e_53d4_4a8e_9c0b_7e21_5d3a_c4f7);

/// Persisted problem definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    /// Display name as last submitted, trimmed.
    pub name: String,
    pub description: Option<String>,
    /// Epoch milliseconds of first creation.
    pub created_at: i64,
    /// Epoch milliseconds of the last create-or-update.
    pub updated_at: i64,
    /// Insertion sequence; defines creation order.
    pub position: i64,
}

/// Validated input for creating or updating a problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemDraft {
    pub id: ProblemId,
    pub name: String,
    pub description: Option<String>,
}

impl ProblemDraft {
    /// Validates raw admin input and derives the stable id.
    pub fn new(name: &str, description: Option<&str>) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProblemName);
        }

        let description = description
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Self {
            id: problem_id_for_name(name),
            name: name.to_string(),
            description,
        })
    }
}

/// Canonical form used for identity: trimmed, single-spaced, lowercase.
pub fn normalize_problem_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Derives the stable id for a problem name.
pub fn problem_id_for_name(name: &str) -> ProblemId {
    Uuid::new_v5(
        &PROBLEM_ID_NAMESPACE,
        normalize_problem_name(name).as_bytes(),
    )
}
