// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CareerStage, MatchRecord, MatchScore, Methodology, Objective, Publication, ScoringWeights, Subject};
pub use requests::{BatchMatchRequest, ScorePairRequest};
pub use responses::{BatchMatchResponse, ErrorResponse, HealthResponse};
