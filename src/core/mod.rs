// Core algorithm exports
pub mod compatibility;
pub mod gale_shapley;
pub mod matcher;
pub mod ranking;
pub mod roles;
pub mod scoring;
pub mod stability;

pub use compatibility::{apply_gender_filter, filtered, is_compatible, preference_accepts};
pub use gale_shapley::{stable_match, DeferredAcceptance, MatchOutcome, MatchingState, Transition};
pub use matcher::{MatchResult, Matcher, MatcherConfig};
pub use ranking::{rank_preferences, ExplicitPreferences, PreferenceList, PreferenceTable};
pub use roles::{RolePartition, RoleStrategy};
pub use scoring::{compute_score, score_matrix, SurveyProfile};
pub use stability::{verify_stability, StabilityReport, Violation};
