// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CompatibilityMatrix, GenderIdentity, GenderPreference, MatchedPair, Matching, Participant,
    Role, ScoringWeights, DEFAULT_SYMMETRY_TOLERANCE,
};
pub use requests::{ExplicitMatchingRequest, RunMatchingRequest, SurveyMatchingRequest, SurveyResponse};
pub use responses::{ErrorResponse, HealthResponse, MatchingResponse};
