use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project configuration, loaded from `.tally/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Dashboard aggregation settings.
///
/// The user roster is an explicit configuration input: the engine never
/// discovers users from the task data, and a roster user with zero tasks
/// still receives a full (all-zero) snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Users the dashboard is computed for.
    #[serde(default)]
    pub users: Vec<String>,
    /// Snapshot cache time-to-live, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

const fn default_cache_ttl_secs() -> u64 {
    60
}

/// User-level configuration (`~/.config/tally/config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Preferred output mode: `pretty`, `text`, or `json`.
    #[serde(default)]
    pub output: Option<String>,
}

/// Load the project config, defaulting when the file is missing.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(project_root: &Path) -> Result<TallyConfig> {
    let path = project_root.join(".tally/config.toml");
    if !path.exists() {
        return Ok(TallyConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<TallyConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user config, defaulting when missing or when no config dir exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("tally/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
