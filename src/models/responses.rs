use crate::core::matcher::MatchResult;
use crate::core::stability::Violation;
use crate::models::domain::MatchedPair;
use serde::{Deserialize, Serialize};

/// Response for every matching endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingResponse {
    pub run_id: String,
    pub pairs: Vec<MatchedPair>,
    pub unmatched: Vec<usize>,
    pub proposers: Vec<usize>,
    pub receivers: Vec<usize>,
    pub proposals: usize,
    pub stable: bool,
    pub violations: Vec<Violation>,
}

impl MatchingResponse {
    pub fn from_result(result: MatchResult) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            stable: result.is_stable(),
            pairs: result.matching.pairs().to_vec(),
            unmatched: result.unmatched,
            proposers: result.proposers,
            receivers: result.receivers,
            proposals: result.proposals,
            violations: result.report.violations,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
