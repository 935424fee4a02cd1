//! GUT score value.
//!
//! # Responsibility
//! - Define the `{gravity, urgency, trend}` triple submitted by participants.
//! - Enforce per-criterion bounds before any value reaches storage.
//!
//! # Invariants
//! - Every criterion of a constructed `Score` lies in `[MIN_RATING, MAX_RATING]`.
//! - `Score` is only constructible through validated paths.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest accepted rating for any criterion.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating for any criterion.
pub const MAX_RATING: u8 = 5;

/// One of the three scoring axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// How much damage the problem causes.
    Gravity,
    /// How soon something must be done.
    Urgency,
    /// How fast the problem gets worse if left alone.
    Trend,
}

impl Criterion {
    /// All criteria in canonical G, U, T order.
    pub const ALL: [Criterion; 3] = [Criterion::Gravity, Criterion::Urgency, Criterion::Trend];

    /// Stable lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gravity => "gravity",
            Self::Urgency => "urgency",
            Self::Trend => "trend",
        }
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input validation failures raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A criterion rating falls outside `[MIN_RATING, MAX_RATING]`.
    CriterionOutOfRange { criterion: Criterion, value: i64 },
    /// Problem name is empty after trimming.
    EmptyProblemName,
    /// Participant identifier is empty after trimming.
    EmptyParticipant,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CriterionOutOfRange { criterion, value } => write!(
                f,
                "{criterion} must be between {MIN_RATING} and {MAX_RATING}, got {value}"
            ),
            Self::EmptyProblemName => write!(f, "problem name cannot be empty"),
            Self::EmptyParticipant => write!(f, "participant id cannot be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Validated `{gravity, urgency, trend}` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Score {
    gravity: u8,
    urgency: u8,
    trend: u8,
}

impl Score {
    /// Builds a score, rejecting the first criterion that is out of bounds.
    ///
    /// Accepts `i64` so callers can pass raw user input without a lossy
    /// pre-conversion hiding out-of-range values.
    pub fn new(gravity: i64, urgency: i64, trend: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            gravity: check_rating(Criterion::Gravity, gravity)?,
            urgency: check_rating(Criterion::Urgency, urgency)?,
            trend: check_rating(Criterion::Trend, trend)?,
        })
    }

    pub fn gravity(&self) -> u8 {
        self.gravity
    }

    pub fn urgency(&self) -> u8 {
        self.urgency
    }

    pub fn trend(&self) -> u8 {
        self.trend
    }

    /// Returns the rating for one criterion.
    pub fn get(&self, criterion: Criterion) -> u8 {
        match criterion {
            Criterion::Gravity => self.gravity,
            Criterion::Urgency => self.urgency,
            Criterion::Trend => self.trend,
        }
    }

    /// Integer GUT product of a single vote, in `[1, 125]`.
    pub fn product(&self) -> u32 {
        u32::from(self.gravity) * u32::from(self.urgency) * u32::from(self.trend)
    }
}

fn check_rating(criterion: Criterion, value: i64) -> Result<u8, ValidationError> {
    if (i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&value) {
        // Bounds check above guarantees the value fits in u8.
        Ok(value as u8)
    } else {
        Err(ValidationError::CriterionOutOfRange { criterion, value })
    }
}

#[cfg(test)]
mod tests {
    use super::{Criterion, Score, ValidationError};

    #[test]
    fn accepts_bounds_inclusive() {
        let low = Score::new(1, 1, 1).unwrap();
        let high = Score::new(5, 5, 5).unwrap();
        assert_eq!(low.product(), 1);
        assert_eq!(high.product(), 125);
    }

    #[test]
    fn rejects_first_out_of_range_criterion() {
        let err = Score::new(3, 0, 9).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CriterionOutOfRange {
                criterion: Criterion::Urgency,
                value: 0
            }
        );

        let err = Score::new(6, 3, 3).unwrap_err();
        assert!(err.to_string().contains("gravity"));
    }

    #[test]
    fn get_matches_named_accessors() {
        let score = Score::new(2, 3, 4).unwrap();
        assert_eq!(score.get(Criterion::Gravity), score.gravity());
        assert_eq!(score.get(Criterion::Urgency), score.urgency());
        assert_eq!(score.get(Criterion::Trend), score.trend());
        assert_eq!(score.product(), 24);
    }
}
