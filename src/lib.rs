//! Stable Match - gender-aware stable matching service
//!
//! This library provides the deferred-acceptance (Gale-Shapley) matching core:
//! compatibility filtering, preference ranking, role assignment, matching and
//! an independent stability check, plus the HTTP layer that serves it.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatcherConfig, MatchResult, RoleStrategy, StabilityReport};
pub use error::{MatchingError, MatchingResult};
pub use models::{CompatibilityMatrix, GenderIdentity, GenderPreference, Matching, Participant, Role};
