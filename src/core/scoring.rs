use crate::core::{
    budget::{budget_score_for_range, estimate_budget_range},
    career::{career_stage_score, StageAdjacency},
    deadline::{urgency_score, DEFAULT_MIN_DEADLINE_DAYS},
    methodology::methodology_score,
    text::{research_alignment, SubjectTokens},
};
use crate::models::{MatchScore, Objective, ScoringWeights, Subject};
use chrono::{DateTime, Datelike, Utc};
use std::collections::HashSet;
use thiserror::Error;

/// Provenance tag stamped on every score
///
/// Changing any scoring constant changes ranking and must bump this tag.
pub const ALGORITHM_VERSION: &str = "matching-engine/1.0";

/// Tolerance on the weight sum
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Rejected scoring or selection configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("scoring weights must sum to 1.0 (got {sum})")]
    WeightSum { sum: f64 },

    #[error("scoring weight `{name}` must be a finite, non-negative number (got {value})")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("min_deadline_days must not be negative (got {0})")]
    NegativeDeadlineDays(i64),

    #[error("min_score_threshold must be within [0, 1] (got {0})")]
    ThresholdOutOfRange(f64),

    #[error("max_matches_per_subject must be at least 1")]
    ZeroMatchLimit,
}

/// Immutable scoring configuration held by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfiguration {
    pub weights: ScoringWeights,
    pub stage_adjacency: StageAdjacency,
    pub min_deadline_days: i64,
}

impl ScoringConfiguration {
    pub fn new(weights: ScoringWeights, min_deadline_days: i64) -> Self {
        Self {
            weights,
            stage_adjacency: StageAdjacency::default(),
            min_deadline_days,
        }
    }

    pub fn with_stage_adjacency(mut self, stage_adjacency: StageAdjacency) -> Self {
        self.stage_adjacency = stage_adjacency;
        self
    }

    /// Check the weight invariants; weights are never renormalized
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in self.weights.as_array() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidWeight { name, value });
            }
        }

        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigurationError::WeightSum { sum });
        }

        if self.min_deadline_days < 0 {
            return Err(ConfigurationError::NegativeDeadlineDays(self.min_deadline_days));
        }

        Ok(())
    }
}

impl Default for ScoringConfiguration {
    fn default() -> Self {
        Self::new(ScoringWeights::default(), DEFAULT_MIN_DEADLINE_DAYS)
    }
}

/// The five component scores of one pair, before weighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub research_alignment: f64,
    pub methodology_match: f64,
    pub career_stage_fit: f64,
    pub deadline_urgency: f64,
    pub budget_alignment: f64,
}

impl ComponentScores {
    /// Weighted sum, clipped to [0, 1]
    #[inline]
    pub fn weighted_total(&self, weights: &ScoringWeights) -> f64 {
        let total = self.research_alignment * weights.research_alignment
            + self.methodology_match * weights.methodology_match
            + self.career_stage_fit * weights.career_stage_fit
            + self.deadline_urgency * weights.deadline_urgency
            + self.budget_alignment * weights.budget_alignment;

        total.clamp(0.0, 1.0)
    }

    pub fn into_match_score(self, weights: &ScoringWeights, calculated_at: DateTime<Utc>) -> MatchScore {
        MatchScore {
            total_score: self.weighted_total(weights),
            research_alignment: self.research_alignment,
            methodology_match: self.methodology_match,
            career_stage_fit: self.career_stage_fit,
            deadline_urgency: self.deadline_urgency,
            budget_alignment: self.budget_alignment,
            scoring_algorithm: ALGORITHM_VERSION.to_string(),
            calculated_at,
        }
    }
}

/// Run every component scorer for one pair
///
/// Token sets are passed in precomputed so batch callers can share them.
pub fn component_scores(
    subject: &Subject,
    subject_tokens: &SubjectTokens,
    objective: &Objective,
    objective_tokens: &HashSet<String>,
    config: &ScoringConfiguration,
    as_of: DateTime<Utc>,
) -> ComponentScores {
    let today = as_of.date_naive();

    ComponentScores {
        research_alignment: research_alignment(subject_tokens, objective_tokens, as_of.year()),
        methodology_match: methodology_score(
            &subject.methodologies,
            &objective.preferred_methodologies,
        ),
        career_stage_fit: career_stage_score(
            subject.career_stage,
            &objective.eligible_career_stages,
            &config.stage_adjacency,
        ),
        deadline_urgency: urgency_score(objective.deadline, today, config.min_deadline_days),
        budget_alignment: budget_score_for_range(
            estimate_budget_range(subject),
            objective.max_award_amount,
        ),
    }
}
