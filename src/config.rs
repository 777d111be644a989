use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CoreConfig {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub logbook: LogbookConfig,
}

impl CoreConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("config.toml");
        let mut cfg = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str::<CoreConfig>(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        } else {
            tracing::info!(
                "No config file found at {}. Using CoreConfig::default().",
                path.display()
            );
            CoreConfig::default()
        };
        cfg.resolve_paths(root);
        Ok(cfg)
    }

    fn resolve_paths(&mut self, root: &Path) {
        self.store.db_path = absolutize(root, &self.store.db_path);
        self.logbook.path = absolutize(root, &self.logbook.path);
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "SystemConfig::default_name")]
    pub name: String,
    #[serde(default = "SystemConfig::default_version")]
    pub version: String,
}

impl SystemConfig {
    fn default_name() -> String {
        "codex".to_string()
    }

    fn default_version() -> String {
        "0.1.0".to_string()
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            version: Self::default_version(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "StoreConfig::default_db_path")]
    pub db_path: PathBuf,
}

impl StoreConfig {
    fn default_db_path() -> PathBuf {
        PathBuf::from("cache/entries.db")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: Self::default_db_path(),
        }
    }
}

/// Thresholds for the deterministic classifier and the selectors. The rule
/// tables themselves are fixed in code; only the numeric knobs live here.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Below this length the chat flow never captures a reflection.
    #[serde(default = "AnalysisConfig::default_reflection_min_len")]
    pub reflection_min_len: usize,
    /// At or above this length the chat flow captures regardless of
    /// trigger words.
    #[serde(default = "AnalysisConfig::default_reflection_long_len")]
    pub reflection_long_len: usize,
    /// Motif suggestions are cut off after this many labels.
    #[serde(default = "AnalysisConfig::default_motif_suggestion_cap")]
    pub motif_suggestion_cap: usize,
    /// How many recent entries the next-move and mantra selectors inspect.
    #[serde(default = "AnalysisConfig::default_recent_window")]
    pub recent_window: usize,
}

impl AnalysisConfig {
    fn default_reflection_min_len() -> usize {
        20
    }

    fn default_reflection_long_len() -> usize {
        120
    }

    fn default_motif_suggestion_cap() -> usize {
        4
    }

    fn default_recent_window() -> usize {
        5
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reflection_min_len: Self::default_reflection_min_len(),
            reflection_long_len: Self::default_reflection_long_len(),
            motif_suggestion_cap: Self::default_motif_suggestion_cap(),
            recent_window: Self::default_recent_window(),
        }
    }
}

/// Remote analysis service. Disabled by default; when disabled the
/// deterministic classifier handles everything locally.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "OracleConfig::default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// How many prior entries ride along as classification context.
    #[serde(default = "OracleConfig::default_context_entries")]
    pub context_entries: usize,
}

impl OracleConfig {
    fn default_api_base() -> String {
        "http://localhost:54321/functions/v1".to_string()
    }

    fn default_context_entries() -> usize {
        5
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: Self::default_api_base(),
            api_key: None,
            context_entries: Self::default_context_entries(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogbookConfig {
    #[serde(default = "LogbookConfig::default_path")]
    pub path: PathBuf,
}

impl LogbookConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("logbook")
    }
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

fn absolutize(root: &Path, value: &Path) -> PathBuf {
    if value.is_absolute() {
        value.to_path_buf()
    } else {
        root.join(value)
    }
}
