//! Server configuration from environment variables

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{name} must be between 1 and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        max: u64,
    },
}

/// Runtime settings for the API server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding `<league>.json` statistics files
    pub data_dir: PathBuf,
    /// Trials for a single matchup request
    pub simulations: u64,
    /// Trials per game in a slate sweep
    pub slate_simulations: u64,
    /// Largest per-request trial override accepted
    pub max_simulations: u64,
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            simulations: 500_000,
            slate_simulations: 5_000,
            max_simulations: 5_000_000,
            seed: None,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            simulations: parse_var(&lookup, "SIMULATIONS")?.unwrap_or(defaults.simulations),
            slate_simulations: parse_var(&lookup, "SLATE_SIMULATIONS")?
                .unwrap_or(defaults.slate_simulations),
            max_simulations: parse_var(&lookup, "MAX_SIMULATIONS")?
                .unwrap_or(defaults.max_simulations),
            seed: parse_var(&lookup, "SIM_SEED")?,
        };

        for (name, value) in [
            ("SIMULATIONS", config.simulations),
            ("SLATE_SIMULATIONS", config.slate_simulations),
        ] {
            if value == 0 || value > config.max_simulations {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    max: config.max_simulations,
                });
            }
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
