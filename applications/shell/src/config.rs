/// Shell configuration
use crate::error::{Result, ShellError};
use cadence_playback::ControlsConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShellConfig {
    #[serde(default)]
    pub controls: ControlsConfig,

    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub log: LogSettings,
}

/// Timing of the stand-in engine
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_seek_settle_ms")]
    pub seek_settle_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogSettings {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl EngineSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn seek_settle(&self) -> Duration {
        Duration::from_millis(self.seek_settle_ms)
    }
}

impl ShellConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `cadence.toml` in the working directory. An explicit
    /// path must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ShellError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (CADENCE_ENGINE__TICK_MS=...)
        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.engine.tick_ms == 0 {
            return Err(ShellError::Config(
                "engine.tick_ms must be greater than zero".to_string(),
            ));
        }

        self.controls.validate()?;

        Ok(())
    }
}

// Default values
impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            seek_settle_ms: default_seek_settle_ms(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn default_tick_ms() -> u64 {
    100
}

fn default_seek_settle_ms() -> u64 {
    50
}

fn default_log_file() -> PathBuf {
    PathBuf::from("cadence.log")
}

fn default_log_filter() -> String {
    "cadence_shell=info,cadence_playback=info,cadence_core=info".to_string()
}
