use crate::core::{
    scoring::{component_scores, ConfigurationError, ScoringConfiguration},
    text::{objective_token_set, SubjectTokens},
};
use crate::models::{MatchScore, Objective, Subject};
use crate::services::TokenCache;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// A scored subject/objective pair from a batch run
#[derive(Debug, Clone)]
pub struct ScoredPair<'a> {
    pub subject: &'a Subject,
    pub objective: &'a Objective,
    pub score: MatchScore,
    /// Position in the cross product: subject_index * |objectives| + objective_index
    pub pair_index: usize,
}

/// Scores subject/objective pairs with a fixed configuration
///
/// # Pipeline
/// 1. Tokenize subjects (once each) and objectives (through the token cache)
/// 2. Score every pair of the cross product in parallel
/// 3. Drop pairs under the threshold
/// 4. Rank by total score, ties broken by pair index
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    config: ScoringConfiguration,
}

impl MatchingEngine {
    /// Build an engine, rejecting invalid weights before any scoring happens
    pub fn new(config: ScoringConfiguration) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_default_config() -> Self {
        Self {
            config: ScoringConfiguration::default(),
        }
    }

    pub fn config(&self) -> &ScoringConfiguration {
        &self.config
    }

    /// Score one pair as of the given instant
    ///
    /// Pure: identical inputs and `as_of` give an identical score.
    pub fn calculate_match_score(
        &self,
        subject: &Subject,
        objective: &Objective,
        as_of: DateTime<Utc>,
    ) -> MatchScore {
        let subject_tokens = SubjectTokens::from_subject(subject);
        let objective_tokens = objective_token_set(objective);
        self.score_tokens(subject, &subject_tokens, objective, &objective_tokens, as_of)
    }

    /// Score one pair, reusing the objective's cached token set
    pub fn calculate_match_score_cached(
        &self,
        subject: &Subject,
        objective: &Objective,
        cache: &TokenCache,
        as_of: DateTime<Utc>,
    ) -> MatchScore {
        let subject_tokens = SubjectTokens::from_subject(subject);
        let objective_tokens = cache.get_or_compute(objective);
        self.score_tokens(subject, &subject_tokens, objective, &objective_tokens, as_of)
    }

    #[inline]
    fn score_tokens(
        &self,
        subject: &Subject,
        subject_tokens: &SubjectTokens,
        objective: &Objective,
        objective_tokens: &HashSet<String>,
        as_of: DateTime<Utc>,
    ) -> MatchScore {
        component_scores(subject, subject_tokens, objective, objective_tokens, &self.config, as_of)
            .into_match_score(&self.config.weights, as_of)
    }

    /// Score the full cross product and keep pairs at or above the threshold
    ///
    /// Results are sorted by total score descending; equal scores keep their
    /// cross-product order, so the output does not depend on how the parallel
    /// work was scheduled.
    pub fn batch_score_matches<'a>(
        &self,
        subjects: &'a [Subject],
        objectives: &'a [Objective],
        min_score_threshold: f64,
        cache: &TokenCache,
        as_of: DateTime<Utc>,
    ) -> Vec<ScoredPair<'a>> {
        if subjects.is_empty() || objectives.is_empty() {
            return Vec::new();
        }

        let subject_tokens: Vec<SubjectTokens> =
            subjects.par_iter().map(SubjectTokens::from_subject).collect();
        let objective_tokens: Vec<Arc<HashSet<String>>> = objectives
            .par_iter()
            .map(|objective| cache.get_or_compute(objective))
            .collect();

        let objective_count = objectives.len();
        let pair_count = subjects.len() * objective_count;

        let mut scored: Vec<ScoredPair<'a>> = (0..pair_count)
            .into_par_iter()
            .filter_map(|pair_index| {
                let subject_index = pair_index / objective_count;
                let objective_index = pair_index % objective_count;
                let subject = &subjects[subject_index];
                let objective = &objectives[objective_index];

                let score = self.score_tokens(
                    subject,
                    &subject_tokens[subject_index],
                    objective,
                    &objective_tokens[objective_index],
                    as_of,
                );

                (score.total_score >= min_score_threshold).then(|| ScoredPair {
                    subject,
                    objective,
                    score,
                    pair_index,
                })
            })
            .collect();

        scored.sort_by(rank_order);

        tracing::debug!(
            "Scored {} pairs, {} at or above threshold {}",
            pair_count,
            scored.len(),
            min_score_threshold
        );

        scored
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::with_default_config()
    }
}

/// Total score descending, then cross-product position ascending
pub fn rank_order(a: &ScoredPair<'_>, b: &ScoredPair<'_>) -> Ordering {
    b.score
        .total_score
        .partial_cmp(&a.score.total_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.pair_index.cmp(&b.pair_index))
}
