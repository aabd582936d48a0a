use crate::domain::model::{CommandOutput, ProcessDescription, WizardChoice};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Background process manager holding the running application.
#[async_trait]
pub trait Supervisor: Send + Sync {
    async fn connect(&self) -> Result<()>;
    /// Fails when no process with this name is registered.
    async fn describe(&self, name: &str) -> Result<ProcessDescription>;
    async fn delete(&self, name: &str) -> Result<()>;
    async fn disconnect(&self);
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` to completion in `cwd`. A non-zero exit is an error.
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput>;
}

/// Interactive questions asked by the wizard stage.
pub trait Prompter: Send + Sync {
    fn choose_action(&self, choices: &[WizardChoice], default_port: u16) -> Result<WizardChoice>;
    fn ask_port(&self, default_port: u16) -> Result<String>;
    fn report_invalid(&self, message: &str);
}

pub trait ConfigProvider: Send + Sync {
    fn install_dir(&self) -> &Path;
    fn manifest_path(&self) -> &Path;
    fn url_template(&self) -> &str;
    fn process_name(&self) -> &str;
    fn dependency_command(&self) -> (&str, &[String]);
    fn wizard_command(&self) -> (&str, &[String]);
    fn default_port(&self) -> u16;
    fn config_file(&self) -> &str;
    fn sample_config_file(&self) -> &str;
    fn interactive(&self) -> bool;
}
