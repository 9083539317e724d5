use crate::core::text::objective_token_set;
use crate::models::Objective;
use moka::sync::{Cache, CacheBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Default number of objectives whose token sets are kept
pub const DEFAULT_TOKEN_CACHE_CAPACITY: u64 = 10_000;

/// Compute-once cache of objective token sets
///
/// Objectives are scored against every subject, so their tokens are derived
/// once and shared. The cache is an explicit value handed to the engine;
/// nothing is stored globally, so engines with different configurations never
/// see each other's entries. Keys carry the objective's text as well as its
/// identifier, so a reused cache never serves tokens for stale content and
/// duplicate identifiers with different text get separate entries.
pub struct TokenCache {
    tokens: Cache<String, Arc<HashSet<String>>>,
}

impl TokenCache {
    pub fn new(capacity: u64) -> Self {
        let tokens = CacheBuilder::new(capacity).build();
        Self { tokens }
    }

    /// Token set for an objective, computed on first request
    ///
    /// Concurrent callers asking for the same key wait for a single computation.
    pub fn get_or_compute(&self, objective: &Objective) -> Arc<HashSet<String>> {
        let key = CacheKey::objective_tokens(objective);
        self.tokens.get_with(key, || {
            tracing::trace!("Token cache miss: {}", objective.id);
            Arc::new(objective_token_set(objective))
        })
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.tokens.run_pending_tasks();
        CacheStats {
            entry_count: self.tokens.entry_count(),
        }
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_CACHE_CAPACITY)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entry_count: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for an objective's token set
    ///
    /// Every field is length-prefixed so distinct inputs never share a key.
    pub fn objective_tokens(objective: &Objective) -> String {
        let mut key = format!("tokens:objective:{}:{}", objective.id.len(), objective.id);
        for (section, phrases) in [("areas", &objective.research_areas), ("keywords", &objective.keywords)] {
            key.push_str(&format!("|{}={}", section, phrases.len()));
            for phrase in phrases {
                key.push_str(&format!(";{}:{}", phrase.len(), phrase));
            }
        }
        key
    }
}
