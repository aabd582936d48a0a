pub mod bootstrap;
pub mod fetch;
pub mod installer;
pub mod version;
pub mod wizard;

#[cfg(test)]
pub(crate) mod fakes;

pub use crate::domain::model::{InstallMode, InstallReport, ReleaseVersion, WizardOutcome};
pub use crate::domain::ports::{CommandRunner, ConfigProvider, Prompter, Supervisor};
pub use crate::utils::error::Result;
