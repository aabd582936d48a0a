pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::config::InstallerSettings;
pub use crate::core::{fetch::ReleaseFetcher, installer::Installer};
pub use crate::domain::model::{InstallMode, InstallReport, ReleaseVersion, WizardOutcome};
pub use crate::utils::error::{InstallerError, Result};
