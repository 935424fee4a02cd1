//! Aggregation of a problem's current vote set.
//!
//! # Invariants
//! - An empty vote set has no aggregate; callers must not treat it as low.
//! - Standard deviation uses the population formula and is exactly `0.0`
//!   for a single vote.
//! - Means, `gut_score` and variance are each a single division of exact
//!   integer totals, so a value that is mathematically on a tier boundary
//!   compares equal to it.

use crate::model::score::Criterion;
use crate::model::vote::Vote;
use serde::Serialize;

/// Summary statistics of one criterion across a vote set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriterionStats {
    pub mean: f64,
    pub sum: u32,
    pub stddev: f64,
}

/// Derived statistics for one problem. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    pub count: usize,
    pub gravity: CriterionStats,
    pub urgency: CriterionStats,
    pub trend: CriterionStats,
    pub gut_score: f64,
}

impl Aggregate {
    pub fn criterion(&self, criterion: Criterion) -> &CriterionStats {
        match criterion {
            Criterion::Gravity => &self.gravity,
            Criterion::Urgency => &self.urgency,
            Criterion::Trend => &self.trend,
        }
    }

    /// Copy with every real value rounded to two decimals, for display.
    ///
    /// Classification must use the unrounded aggregate.
    pub fn rounded(&self) -> Aggregate {
        let round_stats = |stats: &CriterionStats| CriterionStats {
            mean: round2(stats.mean),
            sum: stats.sum,
            stddev: round2(stats.stddev),
        };

        Aggregate {
            count: self.count,
            gravity: round_stats(&self.gravity),
            urgency: round_stats(&self.urgency),
            trend: round_stats(&self.trend),
            gut_score: round2(self.gut_score),
        }
    }
}

/// Computes the aggregate of a vote set, or `None` when it is empty.
pub fn aggregate(votes: &[Vote]) -> Option<Aggregate> {
    if votes.is_empty() {
        return None;
    }

    let gravity = CriterionTotals::collect(votes, Criterion::Gravity);
    let urgency = CriterionTotals::collect(votes, Criterion::Urgency);
    let trend = CriterionTotals::collect(votes, Criterion::Trend);

    let count = votes.len() as u128;
    let product = u128::from(gravity.sum) * u128::from(urgency.sum) * u128::from(trend.sum);

    Some(Aggregate {
        count: votes.len(),
        gravity: gravity.stats(),
        urgency: urgency.stats(),
        trend: trend.stats(),
        gut_score: product as f64 / (count * count * count) as f64,
    })
}

struct CriterionTotals {
    count: u64,
    sum: u32,
    sum_of_squares: u64,
}

impl CriterionTotals {
    fn collect(votes: &[Vote], criterion: Criterion) -> Self {
        let mut totals = Self {
            count: votes.len() as u64,
            sum: 0,
            sum_of_squares: 0,
        };
        for vote in votes {
            let rating = vote.score.get(criterion);
            totals.sum += u32::from(rating);
            totals.sum_of_squares += u64::from(rating) * u64::from(rating);
        }
        totals
    }

    fn stats(&self) -> CriterionStats {
        let sum = u64::from(self.sum);
        // n * sum(x^2) - sum(x)^2 is n^2 times the population variance.
        let scaled_variance = (self.count * self.sum_of_squares).saturating_sub(sum * sum);
        let stddev = if self.count <= 1 {
            0.0
        } else {
            (scaled_variance as f64 / (self.count * self.count) as f64).sqrt()
        };

        CriterionStats {
            mean: f64::from(self.sum) / self.count as f64,
            sum: self.sum,
            stddev,
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{aggregate, round2};
    use crate::model::problem::problem_id_for_name;
    use crate::model::score::{Criterion, Score};
    use crate::model::vote::{ParticipantId, Vote};

    fn vote(participant: &str, g: i64, u: i64, t: i64) -> Vote {
        Vote {
            problem_id: problem_id_for_name("x"),
            participant_id: ParticipantId::parse(participant).unwrap(),
            score: Score::new(g, u, t).unwrap(),
            submitted_at: 0,
        }
    }

    #[test]
    fn empty_vote_set_has_no_aggregate() {
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn single_vote_has_zero_dispersion() {
        let result = aggregate(&[vote("ana", 2, 3, 4)]).unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.gravity.stddev, 0.0);
        assert_eq!(result.urgency.stddev, 0.0);
        assert_eq!(result.trend.stddev, 0.0);
        assert_eq!(result.gut_score, 24.0);
    }

    #[test]
    fn two_votes_produce_expected_means_sums_and_population_stddev() {
        let result = aggregate(&[vote("ana", 4, 5, 4), vote("bo", 5, 4, 5)]).unwrap();
        for criterion in Criterion::ALL {
            let stats = result.criterion(criterion);
            assert_eq!(stats.mean, 4.5);
            assert_eq!(stats.sum, 9);
            assert_eq!(stats.stddev, 0.5);
        }
        assert_eq!(result.gut_score, 91.125);
    }

    #[test]
    fn criteria_are_computed_independently() {
        let result = aggregate(&[
            vote("a", 1, 5, 3),
            vote("b", 5, 5, 3),
            vote("c", 3, 5, 3),
        ])
        .unwrap();
        assert_eq!(result.gravity.mean, 3.0);
        assert!((result.gravity.stddev - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(result.urgency.stddev, 0.0);
        assert_eq!(result.trend.sum, 9);
        assert_eq!(result.gut_score, 45.0);
    }

    #[test]
    fn values_exactly_on_tier_boundaries_are_exact() {
        let stddev_boundary = aggregate(&[
            vote("a", 1, 1, 1),
            vote("b", 3, 1, 1),
            vote("c", 3, 1, 1),
            vote("d", 3, 1, 1),
            vote("e", 3, 1, 1),
        ])
        .unwrap();
        assert_eq!(stddev_boundary.gravity.stddev, 0.8);

        let wide = aggregate(&[vote("a", 1, 1, 1), vote("b", 4, 1, 1)]).unwrap();
        assert_eq!(wide.gravity.stddev, 1.5);

        // Means 1.2, 4.5 and 5.0.
        let mut votes = Vec::new();
        for (index, gravity) in [2, 2, 1, 1, 1, 1, 1, 1, 1, 1].into_iter().enumerate() {
            let urgency = if index < 5 { 5 } else { 4 };
            votes.push(vote(&format!("p{index}"), gravity, urgency, 5));
        }
        assert_eq!(aggregate(&votes).unwrap().gut_score, 27.0);
    }

    #[test]
    fn gut_score_uses_unrounded_means() {
        let result = aggregate(&[
            vote("a", 1, 1, 1),
            vote("b", 2, 2, 2),
            vote("c", 2, 2, 2),
        ])
        .unwrap();
        let mean = 5.0 / 3.0;
        assert!((result.gut_score - mean * mean * mean).abs() < 1e-12);
        assert_eq!(result.rounded().gravity.mean, 1.67);
        assert_eq!(result.rounded().gut_score, round2(mean * mean * mean));
    }
}
