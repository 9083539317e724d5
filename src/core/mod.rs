// Core algorithm exports
pub mod budget;
pub mod career;
pub mod deadline;
pub mod filters;
pub mod intake;
pub mod matcher;
pub mod methodology;
pub mod scoring;
pub mod selector;
pub mod stats;
pub mod text;

pub use filters::MatchCriteria;
pub use intake::{parse_objectives, parse_subjects, EntityKind, Intake, MalformedEntity};
pub use matcher::{MatchingEngine, ScoredPair};
pub use scoring::{ConfigurationError, ScoringConfiguration, ALGORITHM_VERSION};
pub use selector::{MatchSelector, SelectionOutcome, SelectionSettings};
pub use stats::MatchStatistics;
