//! Scenario loading and validation.
//!
//! A scenario gathers the run options, the search configuration and the
//! comparison presets. Every field has a default, so an empty YAML document
//! describes the reference setup.

use std::path::Path;

use ht_sim::SimOptions;
use serde::{Deserialize, Serialize};

use crate::compare::{Preset, default_presets};
use crate::error::{AppError, AppResult};
use crate::search::SearchConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub run: SimOptions,
    pub search: SearchConfig,
    pub presets: Vec<Preset>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            run: SimOptions::default(),
            search: SearchConfig::default(),
            presets: default_presets(),
        }
    }
}

/// Load a scenario from a YAML file and validate it.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ScenarioFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_scenario(&content)
}

/// Parse and validate a scenario from YAML text.
pub fn parse_scenario(content: &str) -> AppResult<Scenario> {
    // An empty document deserializes to unit; treat it as all defaults.
    let scenario: Scenario = if content.trim().is_empty() {
        Scenario::default()
    } else {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Scenario(format!("Failed to parse scenario YAML: {}", e)))?
    };
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn scenario_to_yaml(scenario: &Scenario) -> AppResult<String> {
    serde_yaml::to_string(scenario)
        .map_err(|e| AppError::Scenario(format!("Failed to serialize scenario: {}", e)))
}

/// Validate run options, search configuration and presets.
pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    scenario.run.validate()?;
    scenario.search.initial_guess.validate()?;
    scenario.search.bounds.validate()?;

    for preset in &scenario.presets {
        preset.gains().validate().map_err(|e| {
            AppError::Scenario(format!("Preset '{}' is invalid: {}", preset.label, e))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse_scenario("").unwrap(), Scenario::default());
        assert_eq!(parse_scenario("{}").unwrap(), Scenario::default());
    }

    #[test]
    fn partial_override() {
        let yaml = "run:\n  dt: 0.1\n  setpoint: 50.0\n";
        let scenario = parse_scenario(yaml).unwrap();
        assert_eq!(scenario.run.dt, 0.1);
        assert_eq!(scenario.run.setpoint, 50.0);
        assert_eq!(scenario.run.duration, 60.0);
        assert_eq!(scenario.presets.len(), 7);
    }

    #[test]
    fn invalid_dt_rejected() {
        let err = parse_scenario("run:\n  dt: -0.3\n").unwrap_err();
        assert!(matches!(err, AppError::InvalidParameter(_)), "{err}");
    }

    #[test]
    fn malformed_yaml_rejected() {
        let err = parse_scenario("run: [1, 2").unwrap_err();
        assert!(matches!(err, AppError::Scenario(_)));
    }

    #[test]
    fn missing_file() {
        let err = load_scenario(Path::new("/nonexistent/scenario.yaml")).unwrap_err();
        assert!(matches!(err, AppError::ScenarioFileRead { .. }));
    }
}
