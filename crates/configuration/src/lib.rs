use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
#[cfg(feature = "clap")]
pub mod cli;
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
#[cfg(feature = "clap")]
pub use cli::ConfigArgs;
pub use settings::{
    Defaults, DisplaySettings, LoggingSettings, Settings, StorageBackend, StorageSettings,
};

/// File looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "jobmargin.toml";

/// Prefix for environment overrides, e.g. `JOBMARGIN__STORAGE__BACKEND=memory`.
pub const ENV_PREFIX: &str = "JOBMARGIN";

/// Loads the application configuration.
///
/// Sources are layered: built-in defaults, then the TOML file (`path` when
/// given and required to exist, otherwise an optional `jobmargin.toml`), then
/// `JOBMARGIN__SECTION__KEY` environment variables. The result is validated
/// before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.storage.backend, StorageBackend::Sqlite);
        assert_eq!(settings.defaults.target_net_profit_pct, dec!(20));
        assert_eq!(settings.display.decimal_places, 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn loads_partial_file_over_defaults() {
        let file = write_config(
            r#"
            [storage]
            backend = "memory"

            [defaults]
            target_net_profit_pct = 25.5
            royalty_pct = 5

            [display]
            currency_symbol = "€"
            "#,
        );

        let settings = load_config(Some(file.path())).unwrap();

        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.storage.database_url, "sqlite://jobmargin.db");
        assert_eq!(settings.defaults.target_net_profit_pct, dec!(25.5));
        assert_eq!(settings.defaults.royalty_pct, Some(dec!(5)));
        assert_eq!(settings.defaults.division_overhead_pct, None);
        assert_eq!(settings.display.currency_symbol, "€");
        assert_eq!(settings.display.decimal_places, 2);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = load_config(Some(Path::new("/definitely/not/here/jobmargin.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn rejects_target_of_one_hundred() {
        let file = write_config("[defaults]\ntarget_net_profit_pct = 100\n");
        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_negative_default_overhead() {
        let mut settings = Settings::default();
        settings.defaults.company_overhead_pct = Some(dec!(-1));
        assert!(matches!(settings.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_excessive_precision() {
        let mut settings = Settings::default();
        settings.display.decimal_places = 11;
        assert!(settings.validate().is_err());
    }
}
