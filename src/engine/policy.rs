//! Tunable knobs for the suggestion search.
//!
//! Every weight, candidate axis and budget lives here so deployments can
//! reshape the search without touching engine code. A policy loads from a
//! TOML file named by `SCHEDULER_POLICY_FILE`, with every field optional
//! and falling back to the built-in defaults.

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::pattern::WeekdayPattern;
use crate::models::time::OperatingWindow;

/// Environment variable naming the policy TOML file.
pub const POLICY_FILE_ENV: &str = "SCHEDULER_POLICY_FILE";

/// Weights, candidate axes and budgets for `suggest_alternatives`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestPolicy {
    /// Hours a suggested session must fit inside.
    pub operating_window: OperatingWindow,
    /// Start-time offsets tried on the time axis, in minutes.
    pub time_offsets_minutes: Vec<i64>,
    /// Patterns tried on the pattern axis, same session count as the request.
    pub alternate_patterns: Vec<WeekdayPattern>,
    /// Cost per minute of start-time shift.
    pub time_weight: f64,
    /// Cost per weekday of pattern distance.
    pub pattern_weight: f64,
    /// Flat cost of moving to another room.
    pub room_penalty: f64,
    /// Flat cost of moving to another lecturer.
    pub lecturer_penalty: f64,
    /// How many suggestions a response carries at most.
    pub max_suggestions: usize,
    /// How many candidates the search examines before giving up.
    pub max_candidates: usize,
    /// Wall-clock budget for one search, in milliseconds.
    pub search_timeout_ms: u64,
}

impl Default for SuggestPolicy {
    fn default() -> Self {
        SuggestPolicy {
            operating_window: OperatingWindow::default(),
            time_offsets_minutes: vec![-30, 30, -60, 60],
            alternate_patterns: default_patterns(),
            time_weight: 1.0,
            pattern_weight: 40.0,
            room_penalty: 150.0,
            lecturer_penalty: 200.0,
            max_suggestions: 5,
            max_candidates: 160,
            search_timeout_ms: 250,
        }
    }
}

fn default_patterns() -> Vec<WeekdayPattern> {
    ["2-4-6", "3-5-7", "2-4", "3-5", "4-6", "7-CN"]
        .iter()
        .filter_map(|p| WeekdayPattern::parse(p).ok())
        .collect()
}

impl SuggestPolicy {
    /// Load the policy named by `SCHEDULER_POLICY_FILE`, or the defaults
    /// when the variable is unset.
    pub fn from_env() -> Result<Self> {
        match env::var(POLICY_FILE_ENV) {
            Ok(path) => Self::from_file(&path),
            Err(_) => Ok(SuggestPolicy::default()),
        }
    }

    /// Load a policy from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy file {}", path.display()))?;
        let policy: SuggestPolicy = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse policy file {}", path.display()))?;
        Ok(policy)
    }
}
