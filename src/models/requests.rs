use crate::core::MatchCriteria;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Request to match a batch of subjects against a batch of objectives
///
/// Entities are kept as raw JSON so that one malformed entry is reported and
/// skipped instead of failing the whole request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BatchMatchRequest {
    #[serde(default)]
    pub subjects: Vec<Value>,
    #[serde(default)]
    pub objectives: Vec<Value>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub min_score_threshold: Option<f64>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub max_matches_per_subject: Option<usize>,
    #[validate(nested)]
    #[serde(default)]
    pub criteria: MatchCriteria,
}

/// Request to score a single subject/objective pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePairRequest {
    pub subject: Value,
    pub objective: Value,
}
