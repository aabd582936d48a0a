#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::bootstrap::{CONFIG_FILE, SAMPLE_CONFIG_FILE};
use crate::core::version::DEFAULT_URL_TEMPLATE;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{InstallerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use toml_config::TomlConfig;

pub const DEFAULT_PROCESS_NAME: &str = "wiki";
pub const DEFAULT_SUPERVISOR_COMMAND: &str = "pm2";
pub const DEFAULT_PORT: u16 = 3000;
pub const MANIFEST_FILE: &str = "package.json";

/// Settings the pipeline runs with, resolved once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallerSettings {
    pub install_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub url_template: String,
    pub process_name: String,
    pub supervisor_command: String,
    pub dependency_program: String,
    pub dependency_args: Vec<String>,
    pub wizard_program: String,
    pub wizard_args: Vec<String>,
    pub default_port: u16,
    pub config_file: String,
    pub sample_config_file: String,
    pub interactive: bool,
}

impl InstallerSettings {
    /// Built-in defaults for a package checked out in `package_dir`, installing into `install_dir`.
    pub fn new(package_dir: &Path, install_dir: PathBuf) -> Self {
        Self {
            install_dir,
            manifest_path: package_dir.join(MANIFEST_FILE),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            supervisor_command: DEFAULT_SUPERVISOR_COMMAND.to_string(),
            dependency_program: "npm".to_string(),
            dependency_args: vec![
                "install".to_string(),
                "--only=production".to_string(),
                "--no-optional".to_string(),
            ],
            wizard_program: "node".to_string(),
            wizard_args: vec!["wiki".to_string(), "configure".to_string()],
            default_port: DEFAULT_PORT,
            config_file: CONFIG_FILE.to_string(),
            sample_config_file: SAMPLE_CONFIG_FILE.to_string(),
            interactive: false,
        }
    }

    pub fn apply_overrides(&mut self, overrides: &TomlConfig) {
        if let Some(template) = overrides.url_template() {
            self.url_template = template.to_string();
        }
        if let Some(supervisor) = &overrides.supervisor {
            if let Some(name) = &supervisor.process_name {
                self.process_name = name.clone();
            }
            if let Some(command) = &supervisor.command {
                self.supervisor_command = command.clone();
            }
        }
        if let Some(deps) = &overrides.dependencies {
            if let Some(command) = &deps.command {
                self.dependency_program = command.clone();
            }
            if let Some(args) = &deps.args {
                self.dependency_args = args.clone();
            }
        }
        if let Some(wizard) = &overrides.wizard {
            if let Some(command) = &wizard.command {
                self.wizard_program = command.clone();
            }
            if let Some(args) = &wizard.args {
                self.wizard_args = args.clone();
            }
            if let Some(port) = wizard.default_port {
                self.default_port = port;
            }
        }
        if let Some(files) = &overrides.files {
            if let Some(config) = &files.config {
                self.config_file = config.clone();
            }
            if let Some(sample) = &files.sample {
                self.sample_config_file = sample.clone();
            }
        }
    }
}

/// The install directory is the parent of the package directory unless given explicitly.
pub fn resolve_install_dir(package_dir: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(std::fs::canonicalize(dir)?);
    }

    let package_dir = std::fs::canonicalize(package_dir)?;
    package_dir
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| InstallerError::MissingConfigError {
            field: "install_dir (package directory has no parent)".to_string(),
        })
}

impl ConfigProvider for InstallerSettings {
    fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    fn url_template(&self) -> &str {
        &self.url_template
    }

    fn process_name(&self) -> &str {
        &self.process_name
    }

    fn dependency_command(&self) -> (&str, &[String]) {
        (&self.dependency_program, &self.dependency_args)
    }

    fn wizard_command(&self) -> (&str, &[String]) {
        (&self.wizard_program, &self.wizard_args)
    }

    fn default_port(&self) -> u16 {
        self.default_port
    }

    fn config_file(&self) -> &str {
        &self.config_file
    }

    fn sample_config_file(&self) -> &str {
        &self.sample_config_file
    }

    fn interactive(&self) -> bool {
        self.interactive
    }
}

impl Validate for InstallerSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("install_dir", &self.install_dir.to_string_lossy())?;
        validation::validate_path("manifest_path", &self.manifest_path.to_string_lossy())?;
        validation::validate_url_template("url_template", &self.url_template)?;
        validation::validate_non_empty_string("process_name", &self.process_name)?;
        validation::validate_non_empty_string("supervisor_command", &self.supervisor_command)?;
        validation::validate_non_empty_string("dependency_program", &self.dependency_program)?;
        validation::validate_non_empty_string("wizard_program", &self.wizard_program)?;
        validation::validate_range("default_port", self.default_port, 1, u16::MAX)?;
        validation::validate_path("config_file", &self.config_file)?;
        validation::validate_path("sample_config_file", &self.sample_config_file)?;
        Ok(())
    }
}
