//! Application configuration
//!
//! Loaded from a TOML file, by default `~/.config/parking-service/config.toml`.
//! A missing file is created with the defaults so operators have something
//! to edit. Every section and key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ReservationPolicy;
use crate::domain::BillingPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub billing: BillingSection,
    pub reservations: ReservationSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerSection {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SeaORM connection URL. Empty means `parking.db` in the data directory.
    pub url: String,
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        let url = self.url.trim();
        if !url.is_empty() {
            return url.to_string();
        }
        let path = dirs_next::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("parking-service")
            .join("parking.db");
        format!("sqlite://{}?mode=rwc", path.display())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingSection {
    pub minimum_hours: u32,
    pub currency: String,
}

impl Default for BillingSection {
    fn default() -> Self {
        Self {
            minimum_hours: 1,
            currency: "INR".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationSection {
    /// Minutes a reserved slot is held past the reservation time. 0 keeps
    /// reservations until they are cancelled or checked in.
    pub hold_minutes: u32,
    pub expiry_check_interval_secs: u64,
}

impl Default for ReservationSection {
    fn default() -> Self {
        Self {
            hold_minutes: 30,
            expiry_check_interval_secs: 60,
        }
    }
}

impl AppConfig {
    /// Read the config at `path`, writing the defaults there first if the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(io_err)?;
            }
        }
        let body = toml::to_string_pretty(self)?;
        std::fs::write(path, body).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.billing.minimum_hours == 0 {
            return Err(ConfigError::Invalid(
                "billing.minimum_hours must be at least 1".into(),
            ));
        }
        if self.billing.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("billing.currency must not be empty".into()));
        }
        if self.reservations.hold_minutes > 0 && self.reservations.expiry_check_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "reservations.expiry_check_interval_secs must be positive".into(),
            ));
        }
        match self.logging.format.to_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                other
            ))),
        }
    }

    pub fn billing_policy(&self) -> BillingPolicy {
        BillingPolicy {
            minimum_hours: self.billing.minimum_hours,
        }
    }

    pub fn reservation_policy(&self) -> ReservationPolicy {
        ReservationPolicy {
            hold_minutes: self.reservations.hold_minutes,
        }
    }
}

/// `<config dir>/parking-service/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parking-service")
        .join("config.toml")
}
