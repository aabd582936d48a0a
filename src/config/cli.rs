use crate::config::toml_config::TomlConfig;
use crate::config::{resolve_install_dir, InstallerSettings};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "wikijs-install")]
#[command(about = "Install or upgrade Wiki.js from its release archive")]
pub struct CliConfig {
    /// Directory holding the package manifest (package.json)
    #[arg(long, default_value = ".")]
    pub package_dir: PathBuf,

    /// Install directory [default: parent of the package directory]
    #[arg(long)]
    pub install_dir: Option<PathBuf>,

    /// Installer TOML config file with overrides
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip the configuration wizard even on a terminal
    #[arg(long)]
    pub non_interactive: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Builds validated settings. `attached_to_terminal` reflects stdout.
    pub fn resolve(&self, attached_to_terminal: bool) -> Result<InstallerSettings> {
        let install_dir = resolve_install_dir(&self.package_dir, self.install_dir.as_deref())?;
        let mut settings = InstallerSettings::new(&self.package_dir, install_dir);

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading installer config from: {}", path.display());
            let overrides = TomlConfig::from_file(path)?;
            overrides.validate()?;
            settings.apply_overrides(&overrides);
        }

        settings.interactive = attached_to_terminal && !self.non_interactive;
        settings.validate()?;
        Ok(settings)
    }
}
