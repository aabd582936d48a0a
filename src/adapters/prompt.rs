use crate::domain::model::WizardChoice;
use crate::domain::ports::Prompter;
use crate::utils::error::{InstallerError, Result};
use dialoguer::console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

/// Terminal prompts for the wizard stage.
#[derive(Debug, Clone, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn choose_action(&self, choices: &[WizardChoice], default_port: u16) -> Result<WizardChoice> {
        let labels: Vec<String> = choices.iter().map(|c| c.label(default_port)).collect();
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Continue with configuration wizard?")
            .items(&labels)
            .default(0)
            .interact()?;

        choices
            .get(selection)
            .copied()
            .ok_or_else(|| InstallerError::ConfigValidationError {
                field: "wizard.action".to_string(),
                message: format!("selection {} out of range", selection),
            })
    }

    fn ask_port(&self, default_port: u16) -> Result<String> {
        let input = Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Custom port to use:")
            .default(default_port.to_string())
            .interact_text()?;
        Ok(input)
    }

    fn report_invalid(&self, message: &str) {
        let _ = Term::stderr().write_line(&format!(">> {}", style(message).red()));
    }
}
