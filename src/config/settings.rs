use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::config::columns::ColumnMap;

/// Lower bound for the poll interval (milliseconds)
pub const MIN_POLL_INTERVAL_MS: u64 = 60_000;

/// Upper bound for the poll interval (milliseconds)
pub const MAX_POLL_INTERVAL_MS: u64 = 3_600_000;

/// 15 minutes, the production default
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 900_000;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub monday: MondaySettings,
    pub watch: WatchSettings,
    #[serde(default)]
    pub monitor: MonitorSettings,
    pub claude: Option<ClaudeSettings>,
    /// Candidate column ids per semantic field, across board generations
    #[serde(default)]
    pub columns: ColumnMap,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MondaySettings {
    pub api_token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WatchSettings {
    /// Person whose tasks get announced
    pub user_id: String,
    /// When set, watch a single board (strict same-day deadlines)
    /// instead of every visible board
    pub board_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonitorSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Pause between utterances, letting the audio tail clear
    #[serde(default = "default_pause_ms")]
    pub utterance_pause_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClaudeSettings {
    pub enabled: bool,
    /// Reminder generation proxy endpoint
    pub endpoint: String,
    pub api_key: Option<String>,
    #[serde(default = "default_claude_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    monday::client::DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_pause_ms() -> u64 {
    500
}

fn default_claude_timeout() -> u64 {
    5
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            utterance_pause_ms: default_pause_ms(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Secrets come from the environment, never from files
        if let Ok(token) = std::env::var("MONDAY_API_TOKEN") {
            builder = builder.set_override("monday.api_token", token)?;
        }
        if let Ok(user_id) = std::env::var("WATCH_USER_ID") {
            builder = builder.set_override("watch.user_id", user_id)?;
        }
        if let Ok(key) = std::env::var("CLAUDE_API_KEY") {
            builder = builder.set_override("claude.api_key", key)?;
        }

        builder = builder.add_source(Environment::with_prefix("TASKPURGE"));

        let s = builder.build()?;

        s.try_deserialize()
    }

    /// Checks the invariants the monitor depends on before starting
    pub fn validate(&self) -> Result<(), String> {
        if self.monday.api_token.trim().is_empty() {
            return Err("monday.api_token is required".to_string());
        }
        if self.watch.user_id.trim().is_empty() {
            return Err("watch.user_id is required".to_string());
        }

        let interval = self.monitor.poll_interval_ms;
        if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&interval) {
            return Err(format!(
                "monitor.poll_interval_ms must be within {}..={} (got {})",
                MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS, interval
            ));
        }

        Ok(())
    }
}
