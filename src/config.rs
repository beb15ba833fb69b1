use std::{collections::HashMap, time::Duration};

use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the built frontend, served for non-API paths.
    #[serde(default)]
    pub static_dir: Option<String>,
}

/// Gameplay tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seconds on the clock at the start of a run, and the cap for bonuses.
    pub max_time: u32,
    /// Seconds added for a correct judgment.
    pub correct_bonus: u32,
    /// Seconds removed for a wrong judgment.
    pub wrong_penalty: u32,
    pub tick_millis: u64,
    pub idle_timeout_secs: u64,
    pub sweep_interval_secs: u64,
    /// Upper bound on how long a restart waits for the previous countdown.
    pub stop_timeout_millis: u64,
}

impl GameConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_millis)
    }

    /// Rejects values the timers and scoring cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_time == 0 {
            return Err("game.max_time must be greater than 0".to_string());
        }
        if self.tick_millis == 0 {
            return Err("game.tick_millis must be greater than 0".to_string());
        }
        if self.sweep_interval_secs == 0 {
            return Err("game.sweep_interval_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_time: 40,
            correct_bonus: 5,
            wrong_penalty: 10,
            tick_millis: 1000,
            idle_timeout_secs: 600,
            sweep_interval_secs: 600,
            stop_timeout_millis: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let game = GameConfig::default();
        let mut builder = ConfigLib::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 10000)?
            .set_default("game.max_time", game.max_time)?
            .set_default("game.correct_bonus", game.correct_bonus)?
            .set_default("game.wrong_penalty", game.wrong_penalty)?
            .set_default("game.tick_millis", game.tick_millis)?
            .set_default("game.idle_timeout_secs", game.idle_timeout_secs)?
            .set_default("game.sweep_interval_secs", game.sweep_interval_secs)?
            .set_default("game.stop_timeout_millis", game.stop_timeout_millis)?
            .set_default("cors.allowed_origins", vec!["*"])?
            .add_source(File::with_name("config/settings").required(false));

        // Explicit overrides keep tests isolated from the process environment
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // e.g. APP_SERVER__PORT or APP_GAME__MAX_TIME
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            );
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.game.validate().map_err(ConfigError::Message)?;
        Ok(config)
    }
}
