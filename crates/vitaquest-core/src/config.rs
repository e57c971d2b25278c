//! TOML-based application configuration.
//!
//! Stores:
//! - Analysis service endpoint and credentials
//! - Daily nutrient goal thresholds
//!
//! Configuration is stored at `~/.config/vitaquest/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::nutrition::NutrientGoals;
use crate::storage::data_dir;

/// Remote analysis service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token for the analysis service (optional).
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Daily macro thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionConfig {
    #[serde(default = "default_protein")]
    pub protein_goal: f64,
    #[serde(default = "default_calories")]
    pub calories_goal: f64,
    #[serde(default = "default_carbohydrates")]
    pub carbohydrates_goal: f64,
    #[serde(default = "default_fat")]
    pub fat_goal: f64,
    #[serde(default = "default_fiber")]
    pub fiber_goal: f64,
}

impl NutritionConfig {
    pub fn goals(&self) -> NutrientGoals {
        NutrientGoals {
            protein: self.protein_goal,
            calories: self.calories_goal,
            carbohydrates: self.carbohydrates_goal,
            fat: self.fat_goal,
            fiber: self.fiber_goal,
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/vitaquest/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub nutrition: NutritionConfig,
}

// Default functions
fn default_base_url() -> String {
    "https://api.vitaquest.app/v1".into()
}
fn default_protein() -> f64 {
    50.0
}
fn default_calories() -> f64 {
    2000.0
}
fn default_carbohydrates() -> f64 {
    130.0
}
fn default_fat() -> f64 {
    70.0
}
fn default_fiber() -> f64 {
    25.0
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            protein_goal: default_protein(),
            calories_goal: default_calories(),
            carbohydrates_goal: default_carbohydrates(),
            fat_goal: default_fat(),
            fiber_goal: default_fiber(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            nutrition: NutritionConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.analysis.base_url, cfg.analysis.base_url);
        assert_eq!(parsed.nutrition.protein_goal, 50.0);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.nutrition.calories_goal, 2000.0);
        assert!(parsed.analysis.api_key.is_none());
    }

    #[test]
    fn nutrition_config_maps_to_goals() {
        let cfg = NutritionConfig {
            protein_goal: 80.0,
            ..NutritionConfig::default()
        };
        let goals = cfg.goals();
        assert_eq!(goals.protein, 80.0);
        assert_eq!(goals.fiber, 25.0);
    }
}
