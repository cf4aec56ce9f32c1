use std::io::ErrorKind;

use serde::{Deserialize, Serialize};

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub board_width: u32,
    pub board_height: u32,
    pub tick_interval_ms: u32,
    pub min_tick_interval_ms: u32,
    pub speed_step_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 20,
            board_height: 20,
            tick_interval_ms: 300,
            min_tick_interval_ms: 100,
            speed_step_ms: 20,
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.board_width < 5 || self.board_width > 100 {
            return Err("board_width must be between 5 and 100".to_string());
        }
        if self.board_height < 5 || self.board_height > 100 {
            return Err("board_height must be between 5 and 100".to_string());
        }
        if self.tick_interval_ms < 50 || self.tick_interval_ms > 5000 {
            return Err("tick_interval_ms must be between 50 and 5000".to_string());
        }
        if self.min_tick_interval_ms < 50 {
            return Err("min_tick_interval_ms must be at least 50".to_string());
        }
        if self.min_tick_interval_ms > self.tick_interval_ms {
            return Err("min_tick_interval_ms must not exceed tick_interval_ms".to_string());
        }
        if self.speed_step_ms == 0 {
            return Err("speed_step_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// A missing file is not an error; the defaults apply until the host first
/// saves a config.
pub fn load_config(file_path: &str) -> Result<GameConfig, String> {
    let content = match std::fs::read_to_string(file_path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(GameConfig::default()),
        Err(err) => return Err(format!("Failed to read config file: {}", err)),
    };

    let config: GameConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("Failed to deserialize config: {}", e))?;

    config
        .validate()
        .map_err(|e| format!("Config validation error: {}", e))?;

    Ok(config)
}

pub fn save_config(file_path: &str, config: &GameConfig) -> Result<(), String> {
    config
        .validate()
        .map_err(|e| format!("Config validation error: {}", e))?;

    let content = serde_yaml_ng::to_string(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(file_path, content).map_err(|e| format!("Failed to write config file: {}", e))
}
