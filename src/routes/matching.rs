use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{ExplicitPreferences, MatchResult, Matcher, SurveyProfile};
use crate::error::MatchingError;
use crate::models::{
    ErrorResponse, ExplicitMatchingRequest, HealthResponse, MatchingResponse, Participant,
    RunMatchingRequest, SurveyMatchingRequest,
};
use crate::services::dataset::{load_dataset, load_explicit, DatasetError};
use std::path::PathBuf;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub dataset_dir: Option<PathBuf>,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matching/run", web::post().to(run_matching))
        .route("/matching/explicit", web::post().to(run_explicit))
        .route("/matching/survey", web::post().to(run_survey))
        .route("/matching/dataset", web::post().to(run_dataset));
}

fn error_response(status: u16, error: &str, message: String) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status,
    };
    match status {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn invalid_input(err: MatchingError) -> HttpResponse {
    tracing::info!("Rejected matching input: {}", err);
    error_response(400, "Invalid input", err.to_string())
}

fn respond(result: Result<MatchResult, MatchingError>) -> HttpResponse {
    match result {
        Ok(result) => {
            if !result.is_stable() {
                tracing::error!(
                    "Matcher produced an unstable matching ({} violations)",
                    result.report.violations.len()
                );
            }
            let response = MatchingResponse::from_result(result);
            tracing::info!(
                "Run {}: {} pairs, {} unmatched, {} proposals",
                response.run_id,
                response.pairs.len(),
                response.unmatched.len(),
                response.proposals
            );
            HttpResponse::Ok().json(response)
        }
        Err(err) => invalid_input(err),
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run matching from scores and gender attributes
///
/// POST /api/v1/matching/run
///
/// Request body:
/// ```json
/// {
///   "scores": [[0.0, 0.8], [0.8, 0.0]],
///   "genders": ["Male", "Female"],
///   "preferences": ["Women", "Men"],
///   "seed": 42,
///   "roles": ["proposer", "receiver"]
/// }
/// ```
async fn run_matching(
    state: web::Data<AppState>,
    req: web::Json<RunMatchingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    tracing::info!("Running matching for {} participants", req.scores.len());

    respond(run_request(&state.matcher, req))
}

fn run_request(matcher: &Matcher, req: RunMatchingRequest) -> Result<MatchResult, MatchingError> {
    let matrix = matcher.matrix(req.scores)?;
    let participants = Participant::from_attributes(&req.genders, &req.preferences)?;
    let strategy = matcher.strategy(req.seed, req.roles);
    matcher.run(&matrix, &participants, &strategy)
}

/// Run matching from explicitly ranked preferences
///
/// POST /api/v1/matching/explicit
///
/// Request body:
/// ```json
/// {
///   "proposers": { "0": [2, 3], "1": [2, 3] },
///   "receivers": { "2": [1, 0], "3": [0, 1] }
/// }
/// ```
async fn run_explicit(
    state: web::Data<AppState>,
    req: web::Json<ExplicitMatchingRequest>,
) -> impl Responder {
    let preferences = ExplicitPreferences::from(req.into_inner());
    tracing::info!(
        "Running explicit matching for {} proposers and {} receivers",
        preferences.proposers.len(),
        preferences.receivers.len()
    );

    respond(state.matcher.run_explicit(&preferences))
}

/// Score survey answers, then run matching
///
/// POST /api/v1/matching/survey
async fn run_survey(
    state: web::Data<AppState>,
    req: web::Json<SurveyMatchingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let profiles: Vec<SurveyProfile> = req
        .profiles
        .into_iter()
        .enumerate()
        .map(|(id, profile)| SurveyProfile {
            participant: Participant {
                id,
                gender: profile.gender,
                preference: profile.preference,
            },
            grad_year: profile.grad_year,
            responses: profile.responses,
        })
        .collect();

    tracing::info!("Running survey matching for {} profiles", profiles.len());

    let strategy = state.matcher.strategy(req.seed, None);
    respond(state.matcher.run_survey(&profiles, &strategy))
}

/// Run matching over the configured dataset directory
///
/// Uses `preferences.json` when present, otherwise the score and gender files.
///
/// POST /api/v1/matching/dataset
async fn run_dataset(state: web::Data<AppState>) -> impl Responder {
    let Some(dir) = state.dataset_dir.clone() else {
        return error_response(404, "Dataset not configured", "dataset.dir is not set".to_string());
    };

    let matcher = state.matcher.clone();
    let loaded = web::block(move || -> Result<Result<MatchResult, MatchingError>, DatasetError> {
        if let Some(preferences) = load_explicit(&dir)? {
            return Ok(matcher.run_explicit(&preferences));
        }
        let dataset = load_dataset(&dir)?;
        let result = matcher.matrix(dataset.scores).and_then(|matrix| {
            let strategy = matcher.strategy(None, None);
            matcher.run(&matrix, &dataset.participants, &strategy)
        });
        Ok(result)
    })
    .await;

    match loaded {
        Ok(Ok(result)) => respond(result),
        Ok(Err(err)) => {
            tracing::error!("Failed to load dataset: {}", err);
            error_response(500, "Failed to load dataset", err.to_string())
        }
        Err(err) => {
            tracing::error!("Dataset task failed: {}", err);
            error_response(500, "Internal error", err.to_string())
        }
    }
}
