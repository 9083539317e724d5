use crate::core::{MalformedEntity, MatchStatistics};
use crate::models::domain::MatchRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response for the batch match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchMatchResponse {
    pub matches: BTreeMap<String, Vec<MatchRecord>>,
    pub skipped: Vec<MalformedEntity>,
    pub statistics: MatchStatistics,
    pub subjects_evaluated: usize,
    pub objectives_evaluated: usize,
    pub pairs_evaluated: usize,
    pub run_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub algorithm: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
