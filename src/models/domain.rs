use crate::error::{MatchingError, MatchingResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender identity of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum GenderIdentity {
    Male,
    Female,
    Nonbinary,
}

impl FromStr for GenderIdentity {
    type Err = MatchingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "man" => Ok(Self::Male),
            "female" | "woman" => Ok(Self::Female),
            "nonbinary" | "non-binary" | "non_binary" => Ok(Self::Nonbinary),
            _ => Err(MatchingError::UnknownGender(s.to_string())),
        }
    }
}

impl TryFrom<String> for GenderIdentity {
    type Error = MatchingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for GenderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Nonbinary => "Nonbinary",
        };
        f.write_str(s)
    }
}

/// Which gender identities a participant wants to be matched with
///
/// `Bisexual` accepts every identity; `Both`, `Any` and an empty value parse to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum GenderPreference {
    Men,
    Women,
    Bisexual,
}

impl FromStr for GenderPreference {
    type Err = MatchingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "bisexual" | "both" | "any" | "" => Ok(Self::Bisexual),
            _ => Err(MatchingError::UnknownPreference(s.to_string())),
        }
    }
}

impl TryFrom<String> for GenderPreference {
    type Error = MatchingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for GenderPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Men => "Men",
            Self::Women => "Women",
            Self::Bisexual => "Bisexual",
        };
        f.write_str(s)
    }
}

/// A participant in one matching run, identified by its index in the score matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: usize,
    pub gender: GenderIdentity,
    pub preference: GenderPreference,
}

impl Participant {
    /// Zip index-aligned attribute arrays into participants
    pub fn from_attributes(
        genders: &[GenderIdentity],
        preferences: &[GenderPreference],
    ) -> MatchingResult<Vec<Participant>> {
        if genders.len() != preferences.len() {
            return Err(MatchingError::LengthMismatch {
                field: "preferences",
                expected: genders.len(),
                actual: preferences.len(),
            });
        }

        Ok(genders
            .iter()
            .zip(preferences)
            .enumerate()
            .map(|(id, (&gender, &preference))| Participant { id, gender, preference })
            .collect())
    }

    /// Parse raw attribute strings, failing on the first unrecognized value
    pub fn parse_attributes<S: AsRef<str>>(
        genders: &[S],
        preferences: &[S],
    ) -> MatchingResult<Vec<Participant>> {
        let genders = genders
            .iter()
            .map(|g| g.as_ref().parse())
            .collect::<MatchingResult<Vec<GenderIdentity>>>()?;
        let preferences = preferences
            .iter()
            .map(|p| p.as_ref().parse())
            .collect::<MatchingResult<Vec<GenderPreference>>>()?;

        Self::from_attributes(&genders, &preferences)
    }
}

/// Square, symmetric matrix of non-negative compatibility scores
///
/// A zero entry means the pair is disqualified and must never be matched.
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityMatrix {
    size: usize,
    scores: Vec<f64>,
}

/// Default tolerance used when checking symmetry
pub const DEFAULT_SYMMETRY_TOLERANCE: f64 = 1e-9;

impl CompatibilityMatrix {
    /// Build a matrix from rows, validating shape, values and symmetry
    pub fn from_rows(rows: Vec<Vec<f64>>, tolerance: f64) -> MatchingResult<Self> {
        let size = rows.len();
        let mut scores = Vec::with_capacity(size * size);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(MatchingError::NotSquare {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            for (col, value) in values.into_iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(MatchingError::InvalidScore { row, col, value });
                }
                scores.push(value);
            }
        }

        let matrix = Self { size, scores };
        matrix.check_symmetry(tolerance)?;
        Ok(matrix)
    }

    /// All-zero matrix of the given size
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            scores: vec![0.0; size * size],
        }
    }

    fn check_symmetry(&self, tolerance: f64) -> MatchingResult<()> {
        for row in 0..self.size {
            for col in (row + 1)..self.size {
                let forward = self.get(row, col);
                let backward = self.get(col, row);
                if (forward - backward).abs() > tolerance {
                    return Err(MatchingError::Asymmetric { row, col, forward, backward });
                }
            }
        }
        Ok(())
    }

    /// Number of participants covered by the matrix
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.scores[row * self.size + col]
    }

    /// Set both `(a, b)` and `(b, a)`, keeping the matrix symmetric
    #[inline]
    pub fn set_pair(&mut self, a: usize, b: usize, value: f64) {
        self.scores[a * self.size + b] = value;
        self.scores[b * self.size + a] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.scores[row * self.size..(row + 1) * self.size]
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.scores.chunks(self.size.max(1)).map(<[f64]>::to_vec).take(self.size).collect()
    }
}

/// Algorithmic role of a participant for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Proposer,
    Receiver,
}

/// One matched (proposer, receiver) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchedPair {
    pub proposer: usize,
    pub receiver: usize,
}

/// Final output of a run: pairs ordered by proposer id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matching {
    pairs: Vec<MatchedPair>,
}

impl Matching {
    pub fn new(mut pairs: Vec<MatchedPair>) -> Self {
        pairs.sort();
        Self { pairs }
    }

    pub fn pairs(&self) -> &[MatchedPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Partner of `id` on either side, if matched
    pub fn partner_of(&self, id: usize) -> Option<usize> {
        self.pairs.iter().find_map(|pair| {
            if pair.proposer == id {
                Some(pair.receiver)
            } else if pair.receiver == id {
                Some(pair.proposer)
            } else {
                None
            }
        })
    }

    pub fn contains(&self, proposer: usize, receiver: usize) -> bool {
        self.pairs.contains(&MatchedPair { proposer, receiver })
    }
}

/// Scoring weights for survey-derived compatibility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub grad_year: f64,
    pub responses: f64,
    pub max_grad_year_gap: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            grad_year: 0.4,
            responses: 0.6,
            max_grad_year_gap: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parsing() {
        assert_eq!("Male".parse::<GenderIdentity>().unwrap(), GenderIdentity::Male);
        assert_eq!("non-binary".parse::<GenderIdentity>().unwrap(), GenderIdentity::Nonbinary);
        assert_eq!("Nonbinary".parse::<GenderIdentity>().unwrap(), GenderIdentity::Nonbinary);
        assert!(matches!(
            "robot".parse::<GenderIdentity>(),
            Err(MatchingError::UnknownGender(_))
        ));
    }

    #[test]
    fn test_preference_parsing() {
        assert_eq!("Women".parse::<GenderPreference>().unwrap(), GenderPreference::Women);
        assert_eq!("Both".parse::<GenderPreference>().unwrap(), GenderPreference::Bisexual);
        assert_eq!("".parse::<GenderPreference>().unwrap(), GenderPreference::Bisexual);
        assert!(matches!(
            "Aliens".parse::<GenderPreference>(),
            Err(MatchingError::UnknownPreference(_))
        ));
    }

    #[test]
    fn test_gender_deserializes_from_string() {
        let parsed: Vec<GenderIdentity> = serde_json::from_str(r#"["Female", "Non-binary"]"#).unwrap();
        assert_eq!(parsed, vec![GenderIdentity::Female, GenderIdentity::Nonbinary]);
        assert!(serde_json::from_str::<GenderIdentity>(r#""alien""#).is_err());
    }

    #[test]
    fn test_attribute_length_mismatch() {
        let err = Participant::from_attributes(
            &[GenderIdentity::Male, GenderIdentity::Female],
            &[GenderPreference::Women],
        )
        .unwrap_err();
        assert!(matches!(err, MatchingError::LengthMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_matrix_rejects_non_square() {
        let err = CompatibilityMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]], 1e-9).unwrap_err();
        assert!(matches!(err, MatchingError::NotSquare { row: 1, .. }));
    }

    #[test]
    fn test_matrix_rejects_asymmetric() {
        let err = CompatibilityMatrix::from_rows(vec![vec![0.0, 0.5], vec![0.4, 0.0]], 1e-9)
            .unwrap_err();
        assert!(matches!(err, MatchingError::Asymmetric { row: 0, col: 1, .. }));
    }

    #[test]
    fn test_matrix_rejects_negative() {
        let err = CompatibilityMatrix::from_rows(vec![vec![0.0, -0.5], vec![-0.5, 0.0]], 1e-9)
            .unwrap_err();
        assert!(matches!(err, MatchingError::InvalidScore { .. }));
    }

    #[test]
    fn test_matrix_tolerance() {
        let matrix = CompatibilityMatrix::from_rows(vec![vec![0.0, 0.5], vec![0.5000001, 0.0]], 1e-3);
        assert!(matrix.is_ok());
    }

    #[test]
    fn test_set_pair_keeps_symmetry() {
        let mut matrix = CompatibilityMatrix::zeros(3);
        matrix.set_pair(0, 2, 0.7);
        assert_eq!(matrix.get(0, 2), 0.7);
        assert_eq!(matrix.get(2, 0), 0.7);
        assert_eq!(matrix.to_rows()[2], vec![0.7, 0.0, 0.0]);
    }

    #[test]
    fn test_matching_partner_lookup() {
        let matching = Matching::new(vec![
            MatchedPair { proposer: 3, receiver: 0 },
            MatchedPair { proposer: 1, receiver: 2 },
        ]);
        assert_eq!(matching.pairs()[0].proposer, 1);
        assert_eq!(matching.partner_of(0), Some(3));
        assert_eq!(matching.partner_of(1), Some(2));
        assert_eq!(matching.partner_of(4), None);
    }
}
