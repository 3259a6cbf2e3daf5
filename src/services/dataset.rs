use crate::core::ranking::ExplicitPreferences;
use crate::error::MatchingError;
use crate::models::Participant;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SCORES_FILE: &str = "raw_scores.txt";
pub const GENDERS_FILE: &str = "genders.txt";
pub const GENDER_PREFERENCES_FILE: &str = "gender_preferences.txt";
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Errors that can occur while loading a dataset from disk
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid number on line {line} of {}: {value}", path.display())]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid dataset: {0}")]
    Invalid(#[from] MatchingError),
}

/// Raw scores plus index-aligned participant attributes
#[derive(Debug, Clone)]
pub struct Dataset {
    pub scores: Vec<Vec<f64>>,
    pub participants: Vec<Participant>,
}

fn read(path: &Path) -> Result<String, DatasetError> {
    fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a whitespace-separated score matrix, one row per non-blank line
pub fn parse_scores(text: &str, path: &Path) -> Result<Vec<Vec<f64>>, DatasetError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.split_whitespace()
                .map(|value| {
                    value.parse::<f64>().map_err(|_| DatasetError::InvalidNumber {
                        path: path.to_path_buf(),
                        line: index + 1,
                        value: value.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, DatasetError>>()
        })
        .collect()
}

/// One value per line; trailing blank lines are ignored
pub fn parse_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Load `raw_scores.txt`, `genders.txt` and `gender_preferences.txt` from `dir`
pub fn load_dataset<P: AsRef<Path>>(dir: P) -> Result<Dataset, DatasetError> {
    let dir = dir.as_ref();

    let scores_path = dir.join(SCORES_FILE);
    let scores = parse_scores(&read(&scores_path)?, &scores_path)?;

    let genders_text = read(&dir.join(GENDERS_FILE))?;
    let preferences_text = read(&dir.join(GENDER_PREFERENCES_FILE))?;
    let genders = parse_lines(&genders_text);
    let preferences = parse_lines(&preferences_text);

    if genders.len() != scores.len() {
        return Err(MatchingError::LengthMismatch {
            field: "genders",
            expected: scores.len(),
            actual: genders.len(),
        }
        .into());
    }

    let participants = Participant::parse_attributes(&genders, &preferences)?;

    tracing::info!("Loaded dataset from {} ({} participants)", dir.display(), participants.len());

    Ok(Dataset { scores, participants })
}

/// Load explicitly ranked preferences from `preferences.json` in `dir`, if present
pub fn load_explicit<P: AsRef<Path>>(dir: P) -> Result<Option<ExplicitPreferences>, DatasetError> {
    let path = dir.as_ref().join(PREFERENCES_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let preferences = serde_json::from_str(&read(&path)?)?;
    Ok(Some(preferences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenderIdentity, GenderPreference};

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_parse_scores() {
        let scores = parse_scores("0 0.5\n\n0.5 0\n", Path::new("x")).unwrap();
        assert_eq!(scores, vec![vec![0.0, 0.5], vec![0.5, 0.0]]);
    }

    #[test]
    fn test_parse_scores_reports_line() {
        let err = parse_scores("0 0.5\n0.5 abc\n", Path::new("x")).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidNumber { line: 2, .. }));
    }

    #[test]
    fn test_parse_lines_drops_trailing_blanks() {
        assert_eq!(parse_lines("Male\nFemale\n\n"), vec!["Male", "Female"]);
    }

    #[test]
    fn test_load_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), SCORES_FILE, "0 0.8\n0.8 0\n");
        write(dir.path(), GENDERS_FILE, "Male\nFemale\n");
        write(dir.path(), GENDER_PREFERENCES_FILE, "Women\nMen\n");

        let dataset = load_dataset(dir.path()).unwrap();

        assert_eq!(dataset.scores.len(), 2);
        assert_eq!(dataset.participants[1].gender, GenderIdentity::Female);
        assert_eq!(dataset.participants[1].preference, GenderPreference::Men);
        assert!(load_explicit(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_dataset_unknown_gender() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), SCORES_FILE, "0\n");
        write(dir.path(), GENDERS_FILE, "Robot\n");
        write(dir.path(), GENDER_PREFERENCES_FILE, "Women\n");

        let err = load_dataset(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Invalid(MatchingError::UnknownGender(_))));
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_dataset(dir.path()), Err(DatasetError::Io { .. })));
    }

    #[test]
    fn test_load_explicit() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            PREFERENCES_FILE,
            r#"{"proposers": {"0": [2, 3]}, "receivers": {"2": [0], "3": [0]}}"#,
        );

        let prefs = load_explicit(dir.path()).unwrap().unwrap();
        assert_eq!(prefs.proposers[&0], vec![2, 3]);
        assert_eq!(prefs.receivers.len(), 2);
    }
}
