use crate::core::deadline::days_remaining;
use crate::models::{MatchScore, Objective};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Optional post-filters applied on top of the score threshold
///
/// Every criterion narrows the result; none of them can admit a pair that the
/// threshold rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct MatchCriteria {
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub min_research_alignment: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub min_methodology_match: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub min_career_stage_fit: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub min_budget_alignment: Option<f64>,
    /// Keep objectives whose deadline is at most this many days away
    #[validate(range(min = 0))]
    #[serde(default)]
    pub max_deadline_days: Option<i64>,
    #[serde(default)]
    pub exclude_past_deadlines: bool,
}

impl MatchCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check the component minimums against a score
    #[inline]
    pub fn accepts_score(&self, score: &MatchScore) -> bool {
        meets(self.min_research_alignment, score.research_alignment)
            && meets(self.min_methodology_match, score.methodology_match)
            && meets(self.min_career_stage_fit, score.career_stage_fit)
            && meets(self.min_budget_alignment, score.budget_alignment)
    }

    /// Check the deadline criteria against an objective
    ///
    /// A maximum lead time implies the deadline has not passed.
    #[inline]
    pub fn accepts_deadline(&self, objective: &Objective, today: NaiveDate) -> bool {
        let days = days_remaining(objective.deadline, today);

        if (self.exclude_past_deadlines || self.max_deadline_days.is_some()) && days < 0 {
            return false;
        }

        match self.max_deadline_days {
            Some(max_days) => days <= max_days,
            None => true,
        }
    }

    #[inline]
    pub fn accepts(&self, score: &MatchScore, objective: &Objective, today: NaiveDate) -> bool {
        self.accepts_score(score) && self.accepts_deadline(objective, today)
    }
}

#[inline]
fn meets(minimum: Option<f64>, value: f64) -> bool {
    minimum.map_or(true, |min| value >= min)
}
