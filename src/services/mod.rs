// Service exports
pub mod cache;

pub use cache::{CacheKey, CacheStats, TokenCache, DEFAULT_TOKEN_CACHE_CAPACITY};
