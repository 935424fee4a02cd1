//! Priority and consensus classification.
//!
//! Both mappings are total over `f64` and split the line into exactly three
//! tiers. Boundary values belong to the higher-score / lower-dispersion tier.

use crate::model::score::Criterion;
use crate::scoring::aggregate::Aggregate;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Minimum GUT score classified as high priority.
pub const HIGH_PRIORITY_MIN_SCORE: f64 = 64.0;
/// Minimum GUT score classified as medium priority.
pub const MEDIUM_PRIORITY_MIN_SCORE: f64 = 27.0;
/// Maximum standard deviation classified as high agreement.
pub const HIGH_CONSENSUS_MAX_STDDEV: f64 = 0.8;
/// Maximum standard deviation classified as medium agreement.
pub const MEDIUM_CONSENSUS_MAX_STDDEV: f64 = 1.5;

/// Priority derived from a problem's GUT score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    pub fn from_gut_score(score: f64) -> Self {
        if score >= HIGH_PRIORITY_MIN_SCORE {
            Self::High
        } else if score >= MEDIUM_PRIORITY_MIN_SCORE {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Display for PriorityTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Agreement level among participants on one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusTier {
    High,
    Medium,
    Low,
}

impl ConsensusTier {
    pub fn from_stddev(stddev: f64) -> Self {
        if stddev <= HIGH_CONSENSUS_MAX_STDDEV {
            Self::High
        } else if stddev <= MEDIUM_CONSENSUS_MAX_STDDEV {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Display for ConsensusTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-criterion consensus. There is deliberately no combined value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsensusProfile {
    pub gravity: ConsensusTier,
    pub urgency: ConsensusTier,
    pub trend: ConsensusTier,
}

impl ConsensusProfile {
    pub fn from_aggregate(aggregate: &Aggregate) -> Self {
        Self {
            gravity: ConsensusTier::from_stddev(aggregate.gravity.stddev),
            urgency: ConsensusTier::from_stddev(aggregate.urgency.stddev),
            trend: ConsensusTier::from_stddev(aggregate.trend.stddev),
        }
    }

    pub fn get(&self, criterion: Criterion) -> ConsensusTier {
        match criterion {
            Criterion::Gravity => self.gravity,
            Criterion::Urgency => self.urgency,
            Criterion::Trend => self.trend,
        }
    }
}
