use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{ChangePlanError, Result};

/// The full project map for one resolution run
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub projects: HashMap<String, Project>,
}

/// A single build/publish unit with change-detection patterns and declared dependencies
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Project location; opaque except for the packaging-format suffix check
    pub path: String,
    /// Glob patterns that claim changed files for this project
    #[serde(default)]
    pub patterns: Vec<String>,
    /// IDs of projects this one depends on (unknown IDs are tolerated)
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Config {
    /// Load the project map from a file (TOML by extension, JSON otherwise)
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ChangePlanError::configuration(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config = if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };

        config.validate()?;

        Ok(config)
    }

    /// Parse the bare JSON mapping used as the CI action input:
    /// `{"id": {"path": ..., "patterns": [...], "dependencies": [...]}}`
    pub fn from_json_str(content: &str) -> Result<Self> {
        let projects: HashMap<String, Project> = serde_json::from_str(content)
            .map_err(|e| ChangePlanError::configuration(format!("invalid projects JSON: {}", e)))?;

        Ok(Self { projects })
    }

    /// Parse the on-disk TOML variant with `[projects.<id>]` tables
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ChangePlanError::configuration(format!("invalid projects TOML: {}", e)))
    }

    /// Resolve the `--projects` argument: inline JSON if it looks like a
    /// JSON object, otherwise a path to a config file.
    pub fn from_arg(value: &str) -> Result<Self> {
        if value.trim_start().starts_with('{') {
            let config = Self::from_json_str(value)?;
            config.validate()?;
            Ok(config)
        } else {
            Self::load(Path::new(value))
        }
    }

    fn validate(&self) -> Result<()> {
        // Dependency IDs are deliberately not checked for existence: dangling
        // references are tolerated and never followed during resolution.
        for id in self.projects.keys() {
            if id.is_empty() {
                return Err(ChangePlanError::configuration(
                    "project IDs must be non-empty",
                ));
            }
        }

        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn project_ids(&self) -> Vec<&String> {
        let mut ids: Vec<&String> = self.projects.keys().collect();
        ids.sort();
        ids
    }
}
