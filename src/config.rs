use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::lookup::{DEFAULT_GEOCODE_ENDPOINT, DEFAULT_TIMEZONE_ENDPOINT};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub grammar: GrammarConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Remote calendar to write to.
    pub calendar_id: String,
    pub default_duration_minutes: i64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { calendar_id: "primary".to_string(), default_duration_minutes: 60 }
    }
}

/// Which input grammar reads user lines. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GrammarVariant {
    #[default]
    Strict,
    Flexible,
    Geocoded,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GrammarConfig {
    #[serde(default)]
    pub variant: GrammarVariant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    pub geocode_endpoint: String,
    pub timezone_endpoint: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            geocode_endpoint: DEFAULT_GEOCODE_ENDPOINT.to_string(),
            timezone_endpoint: DEFAULT_TIMEZONE_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        // If config doesn't exist, create default
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "slated", "slated")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.calendar.calendar_id, "primary");
        assert_eq!(config.calendar.default_duration_minutes, 60);
        assert_eq!(config.grammar.variant, GrammarVariant::Strict);
        assert!(config.lookup.geocode_endpoint.starts_with("https://"));
    }

    #[test]
    fn test_config_round_trip() -> Result<()> {
        let mut config = Config::default();
        config.grammar.variant = GrammarVariant::Geocoded;
        config.calendar.default_duration_minutes = 30;

        let serialized = toml::to_string_pretty(&config)?;
        let parsed: Config = toml::from_str(&serialized)?;

        assert_eq!(parsed.grammar.variant, GrammarVariant::Geocoded);
        assert_eq!(parsed.calendar.default_duration_minutes, 30);
        Ok(())
    }

    #[test]
    fn test_grammar_variant_names() -> Result<()> {
        let parsed: Config = toml::from_str("[grammar]\nvariant = \"geocoded\"\n")?;
        assert_eq!(parsed.grammar.variant, GrammarVariant::Geocoded);
        Ok(())
    }
}
