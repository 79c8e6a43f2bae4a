use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_COMPLETION_DELAY_SECS: u64 = 5;

/// Top-level config (wird.toml + WIRD_* env overrides).
///
/// Reminder times are not configurable; only where state lives and how the
/// host timer behaves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WirdConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite file holding the key-value store.
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Whether the host timer reports the power-saving-bypass capability.
    /// Override with env var: WIRD_TIMER__ALLOW_WHILE_IDLE=false
    #[serde(default = "bool_true")]
    pub allow_while_idle: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            allow_while_idle: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Seconds between a completion request and its notice firing.
    #[serde(default = "default_completion_delay")]
    pub delay_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            delay_secs: DEFAULT_COMPLETION_DELAY_SECS,
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_completion_delay() -> u64 {
    DEFAULT_COMPLETION_DELAY_SECS
}
fn default_store_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.wird/wird.db", home)
}

impl WirdConfig {
    /// Load config from a TOML file with WIRD_* env var overrides.
    ///
    /// Nested keys use a double underscore: `WIRD_STORE__PATH=/tmp/wird.db`.
    /// A missing file is not an error; every key has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        debug!(%path, "loading config");

        Self::figment(&path)
            .extract()
            .map_err(|e| crate::error::WirdError::Config(e.to_string()))
    }

    fn figment(path: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("WIRD_").split("__"))
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.wird/wird.toml", home)
}
