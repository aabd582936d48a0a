use serde::{Deserialize, Serialize};
use std::fmt;

/// Release version derived from the manifest, at most four dot-separated segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    pub const MAX_SEGMENTS: usize = 4;

    pub fn from_manifest_version(raw: &str) -> Self {
        let truncated: Vec<&str> = raw.split('.').take(Self::MAX_SEGMENTS).collect();
        Self(truncated.join("."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallMode {
    FreshInstall,
    Upgrade,
}

impl InstallMode {
    pub fn success_message(&self) -> &'static str {
        match self {
            InstallMode::FreshInstall => "Installation succeeded.",
            InstallMode::Upgrade => "Upgrade completed.",
        }
    }
}

/// Operator's answer to the wizard prompt. A custom port keeps the text as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    DefaultPort,
    CustomPort(String),
    Exit,
}

/// Choice presented in the wizard list prompt, before any port is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardChoice {
    DefaultPort,
    CustomPort,
    Exit,
}

impl WizardChoice {
    pub const ALL: [WizardChoice; 3] = [
        WizardChoice::DefaultPort,
        WizardChoice::CustomPort,
        WizardChoice::Exit,
    ];

    pub fn label(&self, default_port: u16) -> String {
        match self {
            WizardChoice::DefaultPort => format!(
                "Yes, run configuration wizard on port {} (recommended)",
                default_port
            ),
            WizardChoice::CustomPort => {
                "Yes, run configuration wizard on a custom port...".to_string()
            }
            WizardChoice::Exit => "No, I'll configure the config file manually".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardOutcome {
    /// The configure subcommand ran to completion on the given port.
    Configured { port: String },
    /// Operator chose to edit the config file by hand.
    ManualExit,
    /// No terminal attached; nothing was asked.
    NonInteractive,
}

/// Entry from the supervisor's process list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDescription {
    pub name: String,
    pub pm_id: Option<u64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReport {
    pub version: ReleaseVersion,
    pub download_url: String,
    pub mode: InstallMode,
    pub stopped_existing: bool,
    pub wizard: WizardOutcome,
}
