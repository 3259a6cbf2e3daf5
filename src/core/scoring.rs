use crate::core::compatibility::is_compatible;
use crate::models::{CompatibilityMatrix, Participant, ScoringWeights};
use serde::{Deserialize, Serialize};

/// Survey answers used to derive raw compatibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyProfile {
    pub participant: Participant,
    #[serde(rename = "gradYear")]
    pub grad_year: i32,
    #[serde(default)]
    pub responses: Vec<String>,
}

/// Calculate a compatibility score in `[0, 1]` for two survey profiles
///
/// Scoring formula:
/// score = (
///     year_score * grad_year +     # 1.0 for the same year, 0 at max_grad_year_gap
///     answer_score * responses     # share of identical answers at the same position
/// )
///
/// Pairs that fail the gender predicate score 0.
pub fn compute_score(a: &SurveyProfile, b: &SurveyProfile, weights: &ScoringWeights) -> f64 {
    if !is_compatible(&a.participant, &b.participant) {
        return 0.0;
    }

    let year_score = calculate_year_score(a.grad_year, b.grad_year, weights.max_grad_year_gap);
    let answer_score = calculate_answer_score(&a.responses, &b.responses);

    let total = year_score * weights.grad_year + answer_score * weights.responses;
    total.clamp(0.0, 1.0)
}

/// Year score (0-1), linear in the graduation year gap
#[inline]
fn calculate_year_score(a: i32, b: i32, max_gap: u32) -> f64 {
    if max_gap == 0 {
        return if a == b { 1.0 } else { 0.0 };
    }
    let gap = a.abs_diff(b).min(max_gap);
    f64::from(max_gap - gap) / f64::from(max_gap)
}

/// Share of matching answers (0-1); extra answers on the longer side count as misses
#[inline]
fn calculate_answer_score(a: &[String], b: &[String]) -> f64 {
    let total = a.len().max(b.len());
    if total == 0 {
        return 0.0;
    }
    let common = a.iter().zip(b).filter(|(x, y)| x == y).count();
    common as f64 / total as f64
}

/// Score every pair of profiles into a symmetric matrix
///
/// Profiles must be ordered by participant id.
pub fn score_matrix(profiles: &[SurveyProfile], weights: &ScoringWeights) -> CompatibilityMatrix {
    let mut matrix = CompatibilityMatrix::zeros(profiles.len());
    for (i, a) in profiles.iter().enumerate() {
        for (j, b) in profiles.iter().enumerate().skip(i + 1) {
            matrix.set_pair(i, j, compute_score(a, b, weights));
        }
    }
    matrix
}
