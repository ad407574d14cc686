use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Settings file shared by all conversions of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// XML file names skipped in search mode
    #[serde(rename = "FilesToIgnore")]
    pub files_to_ignore: Vec<String>,
    /// Members whose identifier contains one of these are not documented
    #[serde(rename = "NameSpacesToRemove")]
    pub namespaces_to_remove: Vec<String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load the settings file, writing a default one first if it does not
    /// exist. Failures are logged and yield the defaults.
    pub fn load_or_create(path: &Path) -> Self {
        info!(path = %path.display(), "loading settings");

        if !path.exists() {
            info!(path = %path.display(), "settings file does not exist, creating it");
            if let Err(e) = Self::default().save(path) {
                warn!(path = %path.display(), error = %e, "failed to create settings file");
                return Self::default();
            }
        }

        Self::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "failed to load settings file");
            Self::default()
        })
    }

    pub fn ignores(&self, file_name: &str) -> bool {
        self.files_to_ignore.iter().any(|ignored| ignored == file_name)
    }
}
