use crate::utils::error::{InstallerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional installer config file. Every field overrides a built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub release: Option<ReleaseConfig>,
    pub supervisor: Option<SupervisorConfig>,
    pub dependencies: Option<CommandConfig>,
    pub wizard: Option<WizardConfig>,
    pub files: Option<FilesConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseConfig {
    pub url_template: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupervisorConfig {
    pub process_name: Option<String>,
    pub command: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandConfig {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WizardConfig {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
    pub default_port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilesConfig {
    pub config: Option<String>,
    pub sample: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(InstallerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InstallerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WIKI_RELEASE_HOST})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| InstallerError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let mut missing = Vec::new();
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.push(var_name.to_string());
                String::new()
            })
        });

        if let Some(var_name) = missing.into_iter().next() {
            return Err(InstallerError::MissingConfigError {
                field: format!("environment variable {}", var_name),
            });
        }

        Ok(result.to_string())
    }

    pub fn url_template(&self) -> Option<&str> {
        self.release.as_ref()?.url_template.as_deref()
    }

    pub fn default_port(&self) -> Option<u16> {
        self.wizard.as_ref()?.default_port
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(template) = self.url_template() {
            validation::validate_url_template("release.url_template", template)?;
        }
        if let Some(port) = self.default_port() {
            validation::validate_range("wizard.default_port", port, 1, u16::MAX)?;
        }
        if let Some(supervisor) = &self.supervisor {
            if let Some(name) = &supervisor.process_name {
                validation::validate_non_empty_string("supervisor.process_name", name)?;
            }
        }
        if let Some(files) = &self.files {
            if let Some(config) = &files.config {
                validation::validate_path("files.config", config)?;
            }
            if let Some(sample) = &files.sample {
                validation::validate_path("files.sample", sample)?;
            }
        }
        Ok(())
    }
}
