//! Fundmatch - Matching engine for research faculty and funding opportunities
//!
//! This library scores every subject (a faculty member) against every
//! objective (a funding opportunity) on five weighted components and selects
//! the best matches per subject above a threshold.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    ConfigurationError, MalformedEntity, MatchCriteria, MatchSelector, MatchStatistics, MatchingEngine,
    ScoringConfiguration, SelectionOutcome, SelectionSettings, ALGORITHM_VERSION,
};
pub use models::{CareerStage, MatchRecord, MatchScore, Methodology, Objective, Publication, ScoringWeights, Subject};
pub use services::TokenCache;
