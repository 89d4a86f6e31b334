use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; anything omitted falls back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub defaults: Defaults,
    pub display: DisplaySettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Checks values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let target = self.defaults.target_net_profit_pct;
        if target < Decimal::ZERO || target >= Decimal::ONE_HUNDRED {
            return Err(ConfigError::ValidationError(format!(
                "defaults.target_net_profit_pct must be at least 0 and below 100, got {}",
                target
            )));
        }
        for (name, pct) in [
            ("division_overhead_pct", self.defaults.division_overhead_pct),
            ("company_overhead_pct", self.defaults.company_overhead_pct),
            ("royalty_pct", self.defaults.royalty_pct),
        ] {
            if let Some(pct) = pct {
                if pct < Decimal::ZERO {
                    return Err(ConfigError::ValidationError(format!(
                        "defaults.{} cannot be negative, got {}",
                        name, pct
                    )));
                }
            }
        }
        if self.display.decimal_places > 10 {
            return Err(ConfigError::ValidationError(format!(
                "display.decimal_places must be 10 or less, got {}",
                self.display.decimal_places
            )));
        }
        if self.storage.backend == StorageBackend::Sqlite && self.storage.database_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.database_url must be set for the sqlite backend".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where saved jobs live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// A SQLite database file (or `sqlite::memory:`).
    Sqlite,
    /// Process memory only; everything is gone on exit.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// e.g. `sqlite://jobmargin.db`.
    pub database_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            database_url: "sqlite://jobmargin.db".to_string(),
        }
    }
}

/// Values used to prefill the form when the user leaves a field out.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub target_net_profit_pct: Decimal,
    pub division_overhead_pct: Option<Decimal>,
    pub company_overhead_pct: Option<Decimal>,
    pub royalty_pct: Option<Decimal>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            target_net_profit_pct: dec!(20),
            division_overhead_pct: None,
            company_overhead_pct: None,
            royalty_pct: None,
        }
    }
}

/// How numbers are rendered in tables, reports and CSV files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub decimal_places: u32,
    pub currency_symbol: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            currency_symbol: "$".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
