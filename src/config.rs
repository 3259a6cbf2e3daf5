use crate::core::MatcherConfig;
use crate::models::{ScoringWeights, DEFAULT_SYMMETRY_TOLERANCE};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Role-assignment seed used when a request brings none
    pub seed: Option<u64>,
    #[serde(default = "default_symmetry_tolerance")]
    pub symmetry_tolerance: f64,
    pub max_participants: Option<usize>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            seed: None,
            symmetry_tolerance: default_symmetry_tolerance(),
            max_participants: None,
        }
    }
}

fn default_symmetry_tolerance() -> f64 { DEFAULT_SYMMETRY_TOLERANCE }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_grad_year_weight")]
    pub grad_year: f64,
    #[serde(default = "default_responses_weight")]
    pub responses: f64,
    #[serde(default = "default_max_grad_year_gap")]
    pub max_grad_year_gap: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            grad_year: default_grad_year_weight(),
            responses: default_responses_weight(),
            max_grad_year_gap: default_max_grad_year_gap(),
        }
    }
}

fn default_grad_year_weight() -> f64 { 0.4 }
fn default_responses_weight() -> f64 { 0.6 }
fn default_max_grad_year_gap() -> u32 { 4 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(weights: &WeightsConfig) -> Self {
        Self {
            grad_year: weights.grad_year,
            responses: weights.responses,
            max_grad_year_gap: weights.max_grad_year_gap,
        }
    }
}

/// Location of an on-disk dataset served by the dataset endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetSettings {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with STABLE_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., STABLE_MATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Matcher settings derived from the `matching` and `scoring` sections
    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig {
            symmetry_tolerance: self.matching.symmetry_tolerance,
            max_participants: self.matching.max_participants,
            default_seed: self.matching.seed,
            weights: ScoringWeights::from(&self.scoring.weights),
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("STABLE_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.grad_year, 0.4);
        assert_eq!(weights.responses, 0.6);
        assert_eq!(weights.max_grad_year_gap, 4);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
host = "0.0.0.0"
port = 9000

[matching]
seed = 17
max_participants = 500

[scoring.weights]
grad_year = 0.5
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        let matcher = settings.matcher_config();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(matcher.default_seed, Some(17));
        assert_eq!(matcher.max_participants, Some(500));
        assert_eq!(matcher.symmetry_tolerance, DEFAULT_SYMMETRY_TOLERANCE);
        assert_eq!(matcher.weights.grad_year, 0.5);
        assert_eq!(matcher.weights.responses, 0.6);
        assert!(settings.dataset.dir.is_none());
    }
}
