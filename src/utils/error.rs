use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Prompt failed: {0}")]
    PromptError(#[from] dialoguer::Error),

    #[error("Failed to parse manifest '{path}': {message}")]
    ManifestParseError { path: String, message: String },

    #[error("Manifest '{path}' has no version field")]
    MissingVersionError { path: String },

    #[error("Remote file not found (HTTP {status}): {url}")]
    RemoteNotFoundError { url: String, status: u16 },

    #[error("Archive extraction failed: {message}")]
    ExtractionError { message: String },

    #[error("Failed to spawn '{command}': {source}")]
    CommandSpawnError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' exited with {}: {stderr}", exit_code_label(.code))]
    CommandFailedError {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Process supervisor error: {message}")]
    SupervisorError { message: String },

    #[error("Cannot access '{path}': {source}")]
    ConfigAccessError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Manifest,
    Network,
    Filesystem,
    Subprocess,
    Supervisor,
    Interaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InstallerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) | Self::ExtractionError { .. } | Self::ConfigAccessError { .. } => {
                ErrorCategory::Filesystem
            }
            Self::HttpError(_) | Self::RemoteNotFoundError { .. } => ErrorCategory::Network,
            Self::PromptError(_) => ErrorCategory::Interaction,
            Self::ManifestParseError { .. } | Self::MissingVersionError { .. } => {
                ErrorCategory::Manifest
            }
            Self::CommandSpawnError { .. } | Self::CommandFailedError { .. } => {
                ErrorCategory::Subprocess
            }
            Self::SupervisorError { .. } => ErrorCategory::Supervisor,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路問題通常重跑即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Interaction => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Manifest => ErrorSeverity::High,
            ErrorCategory::Subprocess | ErrorCategory::Supervisor => ErrorSeverity::High,
            ErrorCategory::Filesystem => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::RemoteNotFoundError { url, .. } => {
                format!("Remote file not found: the release archive {} is unavailable", url)
            }
            Self::ManifestParseError { path, .. } | Self::MissingVersionError { path } => {
                format!("Could not determine the Wiki.js version from {}", path)
            }
            Self::CommandSpawnError { command, .. } => {
                format!("Could not start '{}'. Is it installed and on PATH?", command)
            }
            Self::CommandFailedError { command, .. } => {
                format!("'{}' did not complete successfully", command)
            }
            Self::SupervisorError { .. } => {
                "Could not talk to the pm2 process manager".to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check your internet connection and that this version has a published release"
            }
            ErrorCategory::Manifest => "Make sure package.json is valid JSON with a version field",
            ErrorCategory::Filesystem => {
                "Check that the install directory exists and is writable by the current user"
            }
            ErrorCategory::Subprocess => "Make sure node and npm are installed and on PATH",
            ErrorCategory::Supervisor => "Make sure pm2 is installed (npm install -g pm2)",
            ErrorCategory::Configuration => "Review the command line flags and installer config file",
            ErrorCategory::Interaction => "Re-run the installer from an interactive terminal",
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallerError>;
