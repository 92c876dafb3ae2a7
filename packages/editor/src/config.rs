use crate::errors::Result;
use pagewright_history::HistoryOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "pagewright.config.json";

fn default_id_seed() -> String {
    "pagewright".to_string()
}

/// Store configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Undo depth and recorded paths
    #[serde(default)]
    pub history: HistoryOptions,

    /// Namespace new node ids are derived from
    #[serde(default = "default_id_seed")]
    pub id_seed: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history: HistoryOptions::default(),
            id_seed: default_id_seed(),
        }
    }
}

impl EditorConfig {
    /// Load config from a directory; defaults when no config file exists
    pub fn load(cwd: impl AsRef<Path>) -> Result<Self> {
        let config_path = cwd.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
