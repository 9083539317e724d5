use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::Settings;
use crate::core::{
    intake::parse_entity, parse_objectives, parse_subjects, ConfigurationError, MatchSelector,
    MatchStatistics, MatchingEngine, SelectionSettings, ALGORITHM_VERSION,
};
use crate::models::{
    BatchMatchRequest, BatchMatchResponse, ErrorResponse, HealthResponse, Objective,
    ScorePairRequest, Subject,
};
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchingEngine>,
    pub selection: SelectionSettings,
    pub cache_capacity: u64,
    pub batch_timeout: Duration,
}

impl AppState {
    /// Build the shared state, rejecting an invalid scoring or selection setup
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigurationError> {
        let engine = MatchingEngine::new(settings.scoring_configuration())?;
        let selection = settings.selection_settings();
        selection.validate()?;

        Ok(Self {
            engine: Arc::new(engine),
            selection,
            cache_capacity: settings.cache.token_cache_capacity,
            batch_timeout: Duration::from_secs(settings.matching.batch_timeout_secs),
        })
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/batch", web::post().to(batch_matches))
        .route("/matches/score", web::post().to(score_pair));
}

fn error_body(error: &str, message: String, status_code: u16) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        message,
        status_code,
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        algorithm: ALGORITHM_VERSION.to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Batch match endpoint
///
/// POST /api/v1/matches/batch
///
/// Request body:
/// ```json
/// {
///   "subjects": [{ "id": "string", ... }],
///   "objectives": [{ "id": "string", ... }],
///   "min_score_threshold": 0.3,
///   "max_matches_per_subject": 10,
///   "criteria": { "exclude_past_deadlines": true }
/// }
/// ```
async fn batch_matches(
    state: web::Data<AppState>,
    req: web::Json<BatchMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for batch request: {:?}", errors);
        return HttpResponse::BadRequest().json(error_body("Validation failed", errors.to_string(), 400));
    }

    let request = req.into_inner();

    let settings = SelectionSettings {
        min_score_threshold: request
            .min_score_threshold
            .unwrap_or(state.selection.min_score_threshold),
        max_matches_per_subject: request
            .max_matches_per_subject
            .unwrap_or(state.selection.max_matches_per_subject),
    };

    let selector = match MatchSelector::new(state.engine.clone(), settings) {
        Ok(selector) => selector.with_cache_capacity(state.cache_capacity),
        Err(e) => {
            return HttpResponse::BadRequest().json(error_body("Invalid selection settings", e.to_string(), 400));
        }
    };

    let subjects = parse_subjects(request.subjects);
    let objectives = parse_objectives(request.objectives);
    let criteria = request.criteria;

    let accepted_subjects = subjects.accepted;
    let accepted_objectives = objectives.accepted;
    let run_at = chrono::Utc::now();

    // Scoring is CPU-bound, keep it off the async workers
    let work = web::block(move || {
        selector.select(&accepted_subjects, &accepted_objectives, &criteria, run_at)
    });

    let outcome = match tokio::time::timeout(state.batch_timeout, work).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            tracing::error!("Batch scoring failed: {}", e);
            return HttpResponse::InternalServerError().json(error_body("Batch scoring failed", e.to_string(), 500));
        }
        Err(_) => {
            tracing::error!("Batch scoring exceeded {:?}", state.batch_timeout);
            return HttpResponse::GatewayTimeout().json(error_body(
                "Batch scoring timed out",
                format!("scoring did not finish within {}s", state.batch_timeout.as_secs()),
                504,
            ));
        }
    };

    let mut skipped = subjects.skipped;
    skipped.extend(objectives.skipped);

    let statistics = MatchStatistics::from_records(outcome.records());

    tracing::info!(
        "Returning {} matches for {} subjects ({} entities skipped)",
        statistics.total_matches,
        outcome.matches.len(),
        skipped.len()
    );

    HttpResponse::Ok().json(BatchMatchResponse {
        matches: outcome.matches,
        skipped,
        statistics,
        subjects_evaluated: outcome.subjects_evaluated,
        objectives_evaluated: outcome.objectives_evaluated,
        pairs_evaluated: outcome.pairs_evaluated,
        run_at: outcome.run_at,
    })
}

/// Score a single pair
///
/// POST /api/v1/matches/score
async fn score_pair(
    state: web::Data<AppState>,
    req: web::Json<ScorePairRequest>,
) -> impl Responder {
    let request = req.into_inner();

    let subject = match parse_entity::<Subject>(request.subject, 0) {
        Ok(subject) => subject,
        Err(e) => {
            return HttpResponse::BadRequest().json(error_body("Malformed entity", e.to_string(), 400));
        }
    };

    let objective = match parse_entity::<Objective>(request.objective, 0) {
        Ok(objective) => objective,
        Err(e) => {
            return HttpResponse::BadRequest().json(error_body("Malformed entity", e.to_string(), 400));
        }
    };

    let score = state
        .engine
        .calculate_match_score(&subject, &objective, chrono::Utc::now());

    tracing::debug!(
        "Scored {} against {}: {:.4}",
        subject.id,
        objective.id,
        score.total_score
    );

    HttpResponse::Ok().json(score)
}
