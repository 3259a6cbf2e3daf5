use crate::core::ranking::ExplicitPreferences;
use crate::models::domain::{GenderIdentity, GenderPreference, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Request to match participants from a score matrix and gender attributes
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RunMatchingRequest {
    #[validate(length(min = 1))]
    pub scores: Vec<Vec<f64>>,
    pub genders: Vec<GenderIdentity>,
    #[serde(alias = "genderPreferences")]
    pub preferences: Vec<GenderPreference>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub roles: Option<Vec<Role>>,
}

/// Request to match from explicitly ranked preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitMatchingRequest {
    pub proposers: BTreeMap<usize, Vec<usize>>,
    pub receivers: BTreeMap<usize, Vec<usize>>,
}

impl From<ExplicitMatchingRequest> for ExplicitPreferences {
    fn from(req: ExplicitMatchingRequest) -> Self {
        Self {
            proposers: req.proposers,
            receivers: req.receivers,
        }
    }
}

/// One participant's survey answers; the id is its position in the request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub gender: GenderIdentity,
    pub preference: GenderPreference,
    #[validate(range(min = 1900, max = 2200))]
    pub grad_year: i32,
    #[serde(default)]
    pub responses: Vec<String>,
}

/// Request to score survey answers and match the result
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SurveyMatchingRequest {
    #[validate(length(min = 1), nested)]
    pub profiles: Vec<SurveyResponse>,
    #[serde(default)]
    pub seed: Option<u64>,
}
