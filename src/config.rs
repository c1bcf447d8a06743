use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dark_mode: bool,
    pub history_limit: usize,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dark_mode: true,
            history_limit: 50,
            log_file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scicalc").join("config.toml"))
    }

    /// Loads an explicitly requested file; any failure is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Explicit path if given, else the default location. A missing or broken
    /// default file falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let Some(path) = Self::default_path().filter(|p| p.exists()) else {
            return Ok(Config::default());
        };
        match Self::from_file(&path) {
            Ok(config) => Ok(config),
            Err(err) => {
                warn!("ignoring config: {:#}", err);
                Ok(Config::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::parse("history_limit = 5").unwrap();
        assert_eq!(config.history_limit, 5);
        assert!(config.dark_mode);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn full_file() {
        let config = Config::parse(
            "dark_mode = false\nhistory_limit = 10\nlog_file = \"/tmp/scicalc.log\"\n",
        )
        .unwrap();
        assert!(!config.dark_mode);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/scicalc.log")));
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::parse("dark_mode = maybe").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/scicalc.toml"))).is_err());
    }
}
