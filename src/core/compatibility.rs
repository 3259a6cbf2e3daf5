use crate::error::{MatchingError, MatchingResult};
use crate::models::{CompatibilityMatrix, GenderIdentity, GenderPreference, Participant};

/// Check whether a preference accepts a counterpart's gender identity
///
/// Nonbinary participants satisfy both `Men` and `Women` preferences.
#[inline]
pub fn preference_accepts(preference: GenderPreference, identity: GenderIdentity) -> bool {
    match preference {
        GenderPreference::Men => {
            matches!(identity, GenderIdentity::Male | GenderIdentity::Nonbinary)
        }
        GenderPreference::Women => {
            matches!(identity, GenderIdentity::Female | GenderIdentity::Nonbinary)
        }
        GenderPreference::Bisexual => true,
    }
}

/// Symmetric compatibility predicate: both sides must accept each other
#[inline]
pub fn is_compatible(a: &Participant, b: &Participant) -> bool {
    preference_accepts(a.preference, b.gender) && preference_accepts(b.preference, a.gender)
}

/// Zero every disqualified pair in place
///
/// Returns the number of pairs (unordered) that were zeroed. Self-pairs are
/// never evaluated.
pub fn apply_gender_filter(
    matrix: &mut CompatibilityMatrix,
    participants: &[Participant],
) -> MatchingResult<usize> {
    if participants.len() != matrix.len() {
        return Err(MatchingError::LengthMismatch {
            field: "participants",
            expected: matrix.len(),
            actual: participants.len(),
        });
    }

    let mut zeroed = 0;
    for (i, a) in participants.iter().enumerate() {
        for (j, b) in participants.iter().enumerate().skip(i + 1) {
            if !is_compatible(a, b) {
                if matrix.get(i, j) != 0.0 {
                    zeroed += 1;
                }
                matrix.set_pair(i, j, 0.0);
            }
        }
    }

    tracing::debug!("Gender filter zeroed {} of {} pairs", zeroed, matrix.len() * matrix.len().saturating_sub(1) / 2);
    Ok(zeroed)
}

/// Filtered copy of the matrix, leaving the input untouched
pub fn filtered(
    matrix: &CompatibilityMatrix,
    participants: &[Participant],
) -> MatchingResult<CompatibilityMatrix> {
    let mut copy = matrix.clone();
    apply_gender_filter(&mut copy, participants)?;
    Ok(copy)
}
