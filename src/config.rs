//! Dashboard settings loaded from a TOML file.
//!
//! Every key is optional; a missing key keeps the default the dashboard
//! ships with.
//!
//! ```toml
//! data_path = "dataset/zomato.csv"
//! top_n = 10
//! default_countries = ["Brazil", "England"]
//! default_cuisines = ["Italian"]
//! log_level = "debug"
//! ```

use crate::ForkcastError;
use crate::logging::LogLevel;
use crate::views::ViewParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Largest top-N the restaurant slider offers.
pub const MAX_TOP_N: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_path: PathBuf,
    pub top_n: usize,
    pub default_countries: Vec<String>,
    pub default_cuisines: Vec<String>,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("dataset/zomato.csv"),
            top_n: 10,
            default_countries: [
                "Brazil",
                "England",
                "Qatar",
                "South Africa",
                "Canada",
                "Australia",
            ]
            .map(String::from)
            .to_vec(),
            default_cuisines: [
                "Home-made",
                "BBQ",
                "Japanese",
                "Brazilian",
                "Arabian",
                "American",
                "Italian",
            ]
            .map(String::from)
            .to_vec(),
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ForkcastError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ForkcastError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ForkcastError> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| ForkcastError::Config(e.to_string()))?;
        if config.top_n > MAX_TOP_N {
            warn!(top_n = config.top_n, max = MAX_TOP_N, "top_n above slider range, clamping");
            config.top_n = MAX_TOP_N;
        }
        Ok(config)
    }

    pub fn view_params(&self) -> ViewParams {
        ViewParams {
            countries: self.default_countries.clone(),
            top_n: self.top_n,
            cuisines: self.default_cuisines.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.default_countries.len(), 6);
        assert_eq!(config.default_cuisines[0], "Home-made");
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("top_n = 5\nlog_level = \"debug\"\n").unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.data_path, PathBuf::from("dataset/zomato.csv"));
    }

    #[test]
    fn test_top_n_clamped() {
        let config = Config::from_toml_str("top_n = 99").unwrap();
        assert_eq!(config.top_n, MAX_TOP_N);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml_str("top_n = \"many\""),
            Err(ForkcastError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("log_level = \"loud\""),
            Err(ForkcastError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_path = \"/data/listing.csv\"").unwrap();
        writeln!(file, "default_countries = [\"India\"]").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/data/listing.csv"));
        let params = config.view_params();
        assert_eq!(params.countries, vec!["India".to_string()]);
        assert_eq!(params.top_n, 10);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/forkcast.toml"),
            Err(ForkcastError::Config(_))
        ));
    }
}
