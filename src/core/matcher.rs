use crate::core::{
    compatibility::filtered,
    gale_shapley::stable_match,
    ranking::{rank_preferences, ExplicitPreferences, PreferenceTable},
    roles::{RolePartition, RoleStrategy},
    scoring::{score_matrix, SurveyProfile},
    stability::{verify_stability, StabilityReport},
};
use crate::error::{MatchingError, MatchingResult};
use crate::models::{
    CompatibilityMatrix, Matching, Participant, Role, ScoringWeights, DEFAULT_SYMMETRY_TOLERANCE,
};

/// Result of the matching process
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub matching: Matching,
    pub report: StabilityReport,
    pub proposals: usize,
    pub unmatched: Vec<usize>,
    pub proposers: Vec<usize>,
    pub receivers: Vec<usize>,
}

impl MatchResult {
    pub fn is_stable(&self) -> bool {
        self.report.is_stable()
    }
}

/// Matcher settings
#[derive(Debug, Clone, Copy)]
pub struct MatcherConfig {
    pub symmetry_tolerance: f64,
    pub max_participants: Option<usize>,
    /// Seed used when a run supplies neither roles nor its own seed
    pub default_seed: Option<u64>,
    pub weights: ScoringWeights,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            symmetry_tolerance: DEFAULT_SYMMETRY_TOLERANCE,
            max_participants: None,
            default_seed: None,
            weights: ScoringWeights::default(),
        }
    }
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Input validation
/// 2. Gender compatibility filtering
/// 3. Role assignment
/// 4. Preference ranking
/// 5. Deferred acceptance
/// 6. Stability verification
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Pick the role strategy for a run
    ///
    /// Explicit roles win over a per-run seed, which wins over the configured
    /// seed; with none of them the split is `Balanced`.
    pub fn strategy(&self, seed: Option<u64>, roles: Option<Vec<Role>>) -> RoleStrategy {
        match (roles, seed.or(self.config.default_seed)) {
            (Some(roles), _) => RoleStrategy::Explicit(roles),
            (None, Some(seed)) => RoleStrategy::Seeded(seed),
            (None, None) => RoleStrategy::Balanced,
        }
    }

    fn check_size(&self, n: usize) -> MatchingResult<()> {
        match self.config.max_participants {
            Some(max) if n > max => Err(MatchingError::TooManyParticipants { actual: n, max }),
            _ => Ok(()),
        }
    }

    /// Build and validate a matrix from raw rows using the configured tolerance
    pub fn matrix(&self, rows: Vec<Vec<f64>>) -> MatchingResult<CompatibilityMatrix> {
        self.check_size(rows.len())?;
        CompatibilityMatrix::from_rows(rows, self.config.symmetry_tolerance)
    }

    /// Run the full pipeline over scores and participant attributes
    pub fn run(
        &self,
        matrix: &CompatibilityMatrix,
        participants: &[Participant],
        strategy: &RoleStrategy,
    ) -> MatchingResult<MatchResult> {
        self.check_size(matrix.len())?;

        // Stage 1-2: validation happens inside the filter
        let filtered = filtered(matrix, participants)?;

        // Stage 3: roles
        let partition = RolePartition::assign(matrix.len(), strategy)?;

        // Stage 4: preference lists against the opposite role
        let table = rank_preferences(&filtered, &partition)?;

        tracing::debug!(
            "Running matcher over {} participants ({} proposers, {} receivers)",
            matrix.len(),
            partition.proposers().len(),
            partition.receivers().len()
        );

        Ok(self.match_and_verify(&table))
    }

    /// Score survey profiles, then run the full pipeline
    pub fn run_survey(
        &self,
        profiles: &[SurveyProfile],
        strategy: &RoleStrategy,
    ) -> MatchingResult<MatchResult> {
        self.check_size(profiles.len())?;
        if let Some((position, profile)) = profiles
            .iter()
            .enumerate()
            .find(|(position, profile)| profile.participant.id != *position)
        {
            return Err(MatchingError::InvalidPreferences(format!(
                "profile at position {position} has id {}",
                profile.participant.id
            )));
        }

        let matrix = score_matrix(profiles, &self.config.weights);
        let participants: Vec<Participant> = profiles.iter().map(|p| p.participant).collect();
        self.run(&matrix, &participants, strategy)
    }

    /// Run over explicitly ranked preferences, skipping filtering and ranking
    pub fn run_explicit(&self, preferences: &ExplicitPreferences) -> MatchingResult<MatchResult> {
        self.check_size(preferences.proposers.len() + preferences.receivers.len())?;
        let table = PreferenceTable::from_explicit(preferences)?;
        Ok(self.match_and_verify(&table))
    }

    // Stages 5-6
    fn match_and_verify(&self, table: &PreferenceTable) -> MatchResult {
        let outcome = stable_match(table);
        let report = verify_stability(&outcome.matching, table);

        MatchResult {
            matching: outcome.matching,
            report,
            proposals: outcome.proposals,
            unmatched: outcome.unmatched,
            proposers: table.proposer_ids().collect(),
            receivers: table.receiver_ids().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenderIdentity, GenderPreference};

    fn participants(attrs: &[(GenderIdentity, GenderPreference)]) -> Vec<Participant> {
        attrs
            .iter()
            .enumerate()
            .map(|(id, &(gender, preference))| Participant { id, gender, preference })
            .collect()
    }

    #[test]
    fn test_run_basic() {
        use GenderIdentity::*;
        use GenderPreference::*;

        let matcher = Matcher::default();
        let people = participants(&[(Male, Women), (Male, Women), (Female, Men), (Female, Men)]);
        let matrix = matcher
            .matrix(vec![
                vec![0.0, 0.9, 0.8, 0.4],
                vec![0.9, 0.0, 0.7, 0.6],
                vec![0.8, 0.7, 0.0, 0.9],
                vec![0.4, 0.6, 0.9, 0.0],
            ])
            .unwrap();

        let result = matcher.run(&matrix, &people, &RoleStrategy::Balanced).unwrap();

        assert!(result.is_stable());
        assert_eq!(result.proposers, vec![0, 1]);
        assert!(result.matching.contains(0, 2));
        assert!(result.matching.contains(1, 3));
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_strategy_precedence() {
        let matcher = Matcher::new(MatcherConfig {
            default_seed: Some(9),
            ..MatcherConfig::default()
        });
        assert_eq!(matcher.strategy(None, None), RoleStrategy::Seeded(9));
        assert_eq!(matcher.strategy(Some(3), None), RoleStrategy::Seeded(3));
        assert_eq!(
            matcher.strategy(Some(3), Some(vec![Role::Receiver])),
            RoleStrategy::Explicit(vec![Role::Receiver])
        );
        assert_eq!(Matcher::default().strategy(None, None), RoleStrategy::Balanced);
    }

    #[test]
    fn test_participant_cap() {
        let matcher = Matcher::new(MatcherConfig {
            max_participants: Some(2),
            ..MatcherConfig::default()
        });
        let err = matcher.matrix(vec![vec![0.0; 3]; 3]).unwrap_err();
        assert!(matches!(err, MatchingError::TooManyParticipants { actual: 3, max: 2 }));
    }

    #[test]
    fn test_run_survey_rejects_misaligned_ids() {
        let profile = SurveyProfile {
            participant: Participant {
                id: 4,
                gender: GenderIdentity::Male,
                preference: GenderPreference::Bisexual,
            },
            grad_year: 2026,
            responses: vec![],
        };
        assert!(Matcher::default()
            .run_survey(&[profile], &RoleStrategy::Balanced)
            .is_err());
    }
}
