use pagesmith_editor::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagesmith.config.json";

/// Pagesmith configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Page document used when a command is given no path
    #[serde(default = "default_document")]
    pub document: String,

    /// Editor policy knobs
    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_document() -> String {
    "page.json".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Resolve a document argument against the working directory, falling
    /// back to the configured document
    pub fn document_path(&self, cwd: &str, arg: Option<&Path>) -> PathBuf {
        let path = arg.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(&self.document));
        if path.is_absolute() {
            path
        } else {
            PathBuf::from(cwd).join(path)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: default_document(),
            editor: EditorConfig::default(),
        }
    }
}
