use crate::core::{
    filters::MatchCriteria,
    matcher::{rank_order, MatchingEngine, ScoredPair},
    scoring::ConfigurationError,
};
use crate::models::{MatchRecord, Objective, Subject};
use crate::services::{TokenCache, DEFAULT_TOKEN_CACHE_CAPACITY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const DEFAULT_MIN_SCORE_THRESHOLD: f64 = 0.3;
pub const DEFAULT_MAX_MATCHES_PER_SUBJECT: usize = 10;

/// Threshold and per-subject cap for a selection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionSettings {
    pub min_score_threshold: f64,
    pub max_matches_per_subject: usize,
}

impl SelectionSettings {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..=1.0).contains(&self.min_score_threshold) {
            return Err(ConfigurationError::ThresholdOutOfRange(self.min_score_threshold));
        }
        if self.max_matches_per_subject == 0 {
            return Err(ConfigurationError::ZeroMatchLimit);
        }
        Ok(())
    }
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            min_score_threshold: DEFAULT_MIN_SCORE_THRESHOLD,
            max_matches_per_subject: DEFAULT_MAX_MATCHES_PER_SUBJECT,
        }
    }
}

/// Result of a selection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionOutcome {
    /// Ranked matches per subject; subjects without a qualifying match are absent
    pub matches: BTreeMap<String, Vec<MatchRecord>>,
    pub subjects_evaluated: usize,
    pub objectives_evaluated: usize,
    pub pairs_evaluated: usize,
    pub run_at: DateTime<Utc>,
}

impl SelectionOutcome {
    pub fn total_matches(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    /// All records, grouped by subject in id order, each group in rank order
    pub fn records(&self) -> impl Iterator<Item = &MatchRecord> {
        self.matches.values().flatten()
    }
}

/// Groups engine output per subject and keeps the best matches of each
#[derive(Debug, Clone)]
pub struct MatchSelector {
    engine: Arc<MatchingEngine>,
    settings: SelectionSettings,
    cache_capacity: u64,
}

impl MatchSelector {
    pub fn new(engine: Arc<MatchingEngine>, settings: SelectionSettings) -> Result<Self, ConfigurationError> {
        settings.validate()?;
        Ok(Self {
            engine,
            settings,
            cache_capacity: DEFAULT_TOKEN_CACHE_CAPACITY,
        })
    }

    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn settings(&self) -> &SelectionSettings {
        &self.settings
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    /// Score, filter, group and truncate in one run
    ///
    /// A fresh token cache is used for the run.
    pub fn select(
        &self,
        subjects: &[Subject],
        objectives: &[Objective],
        criteria: &MatchCriteria,
        as_of: DateTime<Utc>,
    ) -> SelectionOutcome {
        let cache = TokenCache::new(self.cache_capacity);
        self.select_with_cache(subjects, objectives, criteria, &cache, as_of)
    }

    /// Same as [`select`](Self::select) with a caller-provided token cache
    pub fn select_with_cache(
        &self,
        subjects: &[Subject],
        objectives: &[Objective],
        criteria: &MatchCriteria,
        cache: &TokenCache,
        as_of: DateTime<Utc>,
    ) -> SelectionOutcome {
        tracing::info!(
            "Generating matches for {} subjects and {} objectives",
            subjects.len(),
            objectives.len()
        );

        let scored = self.engine.batch_score_matches(
            subjects,
            objectives,
            self.settings.min_score_threshold,
            cache,
            as_of,
        );

        tracing::debug!("Token cache holds {} objectives", cache.stats().entry_count);

        if !criteria.is_empty() {
            tracing::debug!("Applying match criteria: {:?}", criteria);
        }

        let today = as_of.date_naive();
        let qualifying = scored
            .into_iter()
            .filter(|pair| criteria.accepts(&pair.score, pair.objective, today));

        let matches = self.group_and_truncate(qualifying, as_of);

        let outcome = SelectionOutcome {
            matches,
            subjects_evaluated: subjects.len(),
            objectives_evaluated: objectives.len(),
            pairs_evaluated: subjects.len() * objectives.len(),
            run_at: as_of,
        };

        tracing::info!(
            "Generated {} matches for {} subjects above threshold {}",
            outcome.total_matches(),
            outcome.matches.len(),
            self.settings.min_score_threshold
        );

        outcome
    }

    fn group_and_truncate<'a, I>(&self, pairs: I, run_at: DateTime<Utc>) -> BTreeMap<String, Vec<MatchRecord>>
    where
        I: Iterator<Item = ScoredPair<'a>>,
    {
        let mut groups: BTreeMap<&'a str, Vec<ScoredPair<'a>>> = BTreeMap::new();
        for pair in pairs {
            groups.entry(pair.subject.id.as_str()).or_default().push(pair);
        }

        groups
            .into_iter()
            .map(|(subject_id, mut group)| {
                group.sort_by(rank_order);
                group.truncate(self.settings.max_matches_per_subject);

                tracing::debug!("Subject {} keeps {} matches", subject_id, group.len());

                let records = group
                    .into_iter()
                    .map(|pair| MatchRecord::new(subject_id, &pair.objective.id, pair.score, run_at))
                    .collect();
                (subject_id.to_string(), records)
            })
            .collect()
    }
}
