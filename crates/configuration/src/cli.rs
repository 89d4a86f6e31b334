use crate::error::ConfigError;
use crate::settings::Settings;
use std::path::PathBuf;

/// Command-line flags shared by every subcommand for locating configuration.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Path to a TOML configuration file. Without it, `jobmargin.toml` in the
    /// working directory is used when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Settings, ConfigError> {
        crate::load_config(self.config.as_deref())
    }
}
