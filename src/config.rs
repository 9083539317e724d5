use crate::core::{
    deadline::DEFAULT_MIN_DEADLINE_DAYS,
    selector::{DEFAULT_MAX_MATCHES_PER_SUBJECT, DEFAULT_MIN_SCORE_THRESHOLD},
    ScoringConfiguration, SelectionSettings,
};
use crate::models::ScoringWeights;
use crate::services::DEFAULT_TOKEN_CACHE_CAPACITY;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_score_threshold")]
    pub min_score_threshold: f64,
    #[serde(default = "default_max_matches_per_subject")]
    pub max_matches_per_subject: usize,
    #[serde(default = "default_min_deadline_days")]
    pub min_deadline_days: i64,
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_score_threshold: default_min_score_threshold(),
            max_matches_per_subject: default_max_matches_per_subject(),
            min_deadline_days: default_min_deadline_days(),
            batch_timeout_secs: default_batch_timeout_secs(),
        }
    }
}

fn default_min_score_threshold() -> f64 { DEFAULT_MIN_SCORE_THRESHOLD }
fn default_max_matches_per_subject() -> usize { DEFAULT_MAX_MATCHES_PER_SUBJECT }
fn default_min_deadline_days() -> i64 { DEFAULT_MIN_DEADLINE_DAYS }
fn default_batch_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_research_alignment_weight")]
    pub research_alignment: f64,
    #[serde(default = "default_methodology_match_weight")]
    pub methodology_match: f64,
    #[serde(default = "default_career_stage_fit_weight")]
    pub career_stage_fit: f64,
    #[serde(default = "default_deadline_urgency_weight")]
    pub deadline_urgency: f64,
    #[serde(default = "default_budget_alignment_weight")]
    pub budget_alignment: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            research_alignment: default_research_alignment_weight(),
            methodology_match: default_methodology_match_weight(),
            career_stage_fit: default_career_stage_fit_weight(),
            deadline_urgency: default_deadline_urgency_weight(),
            budget_alignment: default_budget_alignment_weight(),
        }
    }
}

fn default_research_alignment_weight() -> f64 { 0.35 }
fn default_methodology_match_weight() -> f64 { 0.25 }
fn default_career_stage_fit_weight() -> f64 { 0.20 }
fn default_deadline_urgency_weight() -> f64 { 0.15 }
fn default_budget_alignment_weight() -> f64 { 0.05 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(weights: &WeightsConfig) -> Self {
        Self {
            research_alignment: weights.research_alignment,
            methodology_match: weights.methodology_match,
            career_stage_fit: weights.career_stage_fit,
            deadline_urgency: weights.deadline_urgency,
            budget_alignment: weights.budget_alignment,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_token_cache_capacity")]
    pub token_cache_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            token_cache_capacity: default_token_cache_capacity(),
        }
    }
}

fn default_token_cache_capacity() -> u64 { DEFAULT_TOKEN_CACHE_CAPACITY }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    /// Unknown names fall back to JSON
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}

impl LoggingSettings {
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.format)
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FUNDMATCH)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FUNDMATCH__MATCHING__MIN_SCORE_THRESHOLD -> matching.min_score_threshold
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Scoring configuration for the engine; validated when the engine is built
    pub fn scoring_configuration(&self) -> ScoringConfiguration {
        ScoringConfiguration::new((&self.scoring.weights).into(), self.matching.min_deadline_days)
    }

    pub fn selection_settings(&self) -> SelectionSettings {
        SelectionSettings {
            min_score_threshold: self.matching.min_score_threshold,
            max_matches_per_subject: self.matching.max_matches_per_subject,
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("FUNDMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.research_alignment, 0.35);
        assert_eq!(weights.methodology_match, 0.25);
        assert_eq!(weights.career_stage_fit, 0.20);
        assert_eq!(weights.deadline_urgency, 0.15);
        assert_eq!(weights.budget_alignment, 0.05);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
        assert_eq!(LoggingSettings::default().log_format(), LogFormat::Json);
    }

    #[test]
    fn test_log_format_names() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("Pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(" compact "), LogFormat::Compact);
        assert_eq!(LogFormat::parse("xml"), LogFormat::Json);

        let settings = Settings::from_toml_str("[logging]\nformat = \"pretty\"").unwrap();
        assert_eq!(settings.logging.log_format(), LogFormat::Pretty);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.selection_settings(), SelectionSettings::default());
        assert_eq!(settings.scoring_configuration(), ScoringConfiguration::default());
    }

    #[test]
    fn test_toml_overrides() {
        let settings = Settings::from_toml_str(
            r#"
            [matching]
            min_score_threshold = 0.5
            max_matches_per_subject = 3
            min_deadline_days = 45

            [scoring.weights]
            research_alignment = 0.5
            methodology_match = 0.2
            career_stage_fit = 0.1
            deadline_urgency = 0.15
            budget_alignment = 0.05
            "#,
        )
        .unwrap();

        let selection = settings.selection_settings();
        assert_eq!(selection.min_score_threshold, 0.5);
        assert_eq!(selection.max_matches_per_subject, 3);

        let scoring = settings.scoring_configuration();
        assert_eq!(scoring.min_deadline_days, 45);
        assert_eq!(scoring.weights.research_alignment, 0.5);
        assert!(scoring.validate().is_ok());
    }

    #[test]
    fn test_unbalanced_weights_fail_validation() {
        let settings = Settings::from_toml_str(
            r#"
            [scoring.weights]
            research_alignment = 0.9
            "#,
        )
        .unwrap();

        assert!(settings.scoring_configuration().validate().is_err());
    }
}
