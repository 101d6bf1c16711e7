// Configuration module for reading Autopilot.toml
// This module provides OOP-style configuration management for the autopilot

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::GridBounds;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub grid: GridConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
    pub survival: SurvivalConfig,
    pub game: GameConfig,
    pub debug: DebugConfig,
}

/// Grid dimensions
#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
}

impl GridConfig {
    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.width, self.height)
    }
}

/// Route search limits
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Expansion cap per search; hitting it means "no route"
    pub max_iterations: usize,
}

/// Route reuse between ticks
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
}

/// Survival fallback tuning
#[derive(Debug, Deserialize, Clone)]
pub struct SurvivalConfig {
    /// Reject food routes that leave less room than the grown snake needs
    pub check_after_eating: bool,
}

/// Rules of the headless game used by the simulator
#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    pub initial_length: usize,
    pub food_score: u32,
    pub max_ticks: u32,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Autopilot.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Autopilot.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Autopilot.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Autopilot.toml
    pub fn default_hardcoded() -> Self {
        Config {
            grid: GridConfig {
                width: 20,
                height: 30,
            },
            search: SearchConfig {
                max_iterations: 1000,
            },
            cache: CacheConfig { enabled: true },
            survival: SurvivalConfig {
                check_after_eating: false,
            },
            game: GameConfig {
                initial_length: 3,
                food_score: 10,
                max_ticks: 5000,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "autopilot_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not load Autopilot.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }

    /// Rejects values the engine cannot work with
    fn validate(&self) -> Result<(), String> {
        if self.grid.width <= 0 || self.grid.height <= 0 {
            return Err(format!(
                "Grid must be non-empty, got {}x{}",
                self.grid.width, self.grid.height
            ));
        }
        if self.search.max_iterations == 0 {
            return Err("search.max_iterations must be at least 1".to_string());
        }
        if self.game.initial_length == 0 {
            return Err("game.initial_length must be at least 1".to_string());
        }
        if self.game.initial_length as i32 > self.grid.width {
            return Err(format!(
                "game.initial_length {} does not fit in grid width {}",
                self.game.initial_length, self.grid.width
            ));
        }
        Ok(())
    }
}
