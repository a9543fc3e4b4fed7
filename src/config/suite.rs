//! Benchmark suite definitions and selection.
//!
//! A suite is a JSON array of test cases. The runner executes a single
//! case, one difficulty tier, or the full suite.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Suite loading and selection errors.
#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("failed to read suite file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse suite file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("test '{0}' not found in suite")]
    UnknownTest(String),
    #[error("no tests matched difficulty '{0}'")]
    EmptyDifficulty(String),
}

fn default_max_steps() -> u32 {
    15
}

/// One benchmark test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub test_id: String,
    pub instruction: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
}

/// Which part of the suite to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A single test case by id.
    Single(String),
    /// Every case of one difficulty tier.
    Difficulty(String),
    /// The whole suite, in file order.
    Full,
}

/// Load a suite file.
pub fn load_suite(path: impl AsRef<Path>) -> Result<Vec<TestCase>, SuiteError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| SuiteError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| SuiteError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Filter a suite down to the selected cases, preserving file order.
pub fn select(cases: &[TestCase], selection: &Selection) -> Result<Vec<TestCase>, SuiteError> {
    match selection {
        Selection::Single(id) => {
            let case = cases
                .iter()
                .find(|c| c.test_id == *id)
                .cloned()
                .ok_or_else(|| SuiteError::UnknownTest(id.clone()))?;
            Ok(vec![case])
        }
        Selection::Difficulty(tier) => {
            let matched: Vec<TestCase> = cases
                .iter()
                .filter(|c| c.difficulty.as_deref() == Some(tier.as_str()))
                .cloned()
                .collect();
            if matched.is_empty() {
                return Err(SuiteError::EmptyDifficulty(tier.clone()));
            }
            Ok(matched)
        }
        Selection::Full => Ok(cases.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_suite() -> Vec<TestCase> {
        serde_json::from_str(
            r#"[
              {"test_id": "osworld_001", "instruction": "Open the calculator", "difficulty": "easy"},
              {"test_id": "osworld_002", "instruction": "Rename the file", "difficulty": "medium", "max_steps": 25},
              {"test_id": "osworld_003", "instruction": "Configure the proxy", "difficulty": "hard"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_max_steps_defaulted() {
        let cases = sample_suite();
        assert_eq!(cases[0].max_steps, 15);
        assert_eq!(cases[1].max_steps, 25);
    }

    #[test]
    fn test_select_single() {
        let cases = sample_suite();
        let picked = select(&cases, &Selection::Single("osworld_002".to_string())).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].test_id, "osworld_002");
    }

    #[test]
    fn test_select_unknown_test() {
        let cases = sample_suite();
        let err = select(&cases, &Selection::Single("osworld_999".to_string())).unwrap_err();
        assert!(matches!(err, SuiteError::UnknownTest(_)));
    }

    #[test]
    fn test_select_difficulty() {
        let cases = sample_suite();
        let picked = select(&cases, &Selection::Difficulty("easy".to_string())).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].test_id, "osworld_001");

        let err = select(&cases, &Selection::Difficulty("extreme".to_string())).unwrap_err();
        assert!(matches!(err, SuiteError::EmptyDifficulty(_)));
    }

    #[test]
    fn test_select_full_preserves_order() {
        let cases = sample_suite();
        let picked = select(&cases, &Selection::Full).unwrap();
        let ids: Vec<&str> = picked.iter().map(|c| c.test_id.as_str()).collect();
        assert_eq!(ids, vec!["osworld_001", "osworld_002", "osworld_003"]);
    }
}
