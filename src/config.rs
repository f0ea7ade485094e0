// Configuration module for reading Snake.toml
// Thresholds and weights used by the planner live here instead of as literals.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub destination: DestinationConfig,
    pub cost: CostConfig,
    pub debug: DebugConfig,
}

/// Per-turn time budget
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Thresholds for picking the turn's goal
#[derive(Debug, Deserialize, Clone)]
pub struct DestinationConfig {
    /// Below this health the snake goes for food
    pub hungry_health: i32,
    /// At or below this health the nearest food wins over the central one
    pub urgent_health: i32,
    /// Bodies shorter than this keep eating regardless of health
    pub min_length: usize,
    /// Health required before ambushing the last opponent
    pub ambush_health: i32,
    pub ambush_snake_count: usize,
    /// How many cells ahead of the opponent's head the ambush point is
    pub ambush_lead: i32,
}

/// Weights of the step cost function
#[derive(Debug, Deserialize, Clone)]
pub struct CostConfig {
    pub center_weight: i64,
    pub food_adjacent_bonus: i64,
    /// The edge band is `width / frame_divisor` cells wide
    pub frame_divisor: i32,
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
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads the configuration named by `SNAKE_CONFIG`, or Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        let path = std::env::var("SNAKE_CONFIG").unwrap_or_else(|_| "Snake.toml".to_string());
        Self::from_file(path)
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
            },
            destination: DestinationConfig {
                hungry_health: 75,
                urgent_health: 30,
                min_length: 20,
                ambush_health: 90,
                ambush_snake_count: 2,
                ambush_lead: 2,
            },
            cost: CostConfig {
                center_weight: 10,
                food_adjacent_bonus: 1,
                frame_divisor: 4,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
