use crate::config::DEFAULT_PORT;
use crate::domain::model::{WizardAction, WizardChoice, WizardOutcome};
use crate::domain::ports::{CommandRunner, ConfigProvider, Prompter};
use crate::utils::error::Result;
use crate::utils::progress::{Progress, SpinnerKind};
use dialoguer::console::style;

pub const INVALID_PORT: &str = "Invalid Port!";

const MANUAL_HINT: &str =
    "> Open config.yml in your favorite editor. Then start Wiki.js using: node wiki start";
const NON_INTERACTIVE_HINT: &str = "[!] Non-interactive terminal detected. You may now manually edit config.yml and start Wiki.js by running: node wiki start";

/// Accepts any positive number and returns it as typed, minus surrounding whitespace.
/// Range checks are left to `configure` itself.
pub fn validate_port_input(input: &str) -> std::result::Result<String, &'static str> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(port) if port.is_finite() && port > 0.0 => Ok(trimmed.to_string()),
        _ => Err(INVALID_PORT),
    }
}

/// Asks the list question, then the port question only for a custom port.
/// Invalid ports are reported and asked again.
pub fn ask_wizard_action(prompter: &dyn Prompter, default_port: u16) -> Result<WizardAction> {
    let choice = prompter.choose_action(&WizardChoice::ALL, default_port)?;
    match choice {
        WizardChoice::DefaultPort => Ok(WizardAction::DefaultPort),
        WizardChoice::Exit => Ok(WizardAction::Exit),
        WizardChoice::CustomPort => loop {
            let input = prompter.ask_port(default_port)?;
            match validate_port_input(&input) {
                Ok(port) => break Ok(WizardAction::CustomPort(port)),
                Err(message) => {
                    tracing::debug!("Rejected custom port input: {:?}", input);
                    prompter.report_invalid(message);
                }
            }
        },
    }
}

/// Runs the configuration wizard stage.
///
/// The progress handle in use afterwards is always handed back, also on failure,
/// so the caller reports errors on the spinner the operator is looking at.
pub async fn run_wizard(
    config: &dyn ConfigProvider,
    prompter: &dyn Prompter,
    runner: &dyn CommandRunner,
    progress: Progress,
) -> (Progress, Result<WizardOutcome>) {
    if !config.interactive() {
        progress.println(NON_INTERACTIVE_HINT);
        return (progress, Ok(WizardOutcome::NonInteractive));
    }

    let default_port = config.default_port();
    let (program, base_args) = config.wizard_command();
    let mut args = base_args.to_vec();

    let action = match ask_wizard_action(prompter, default_port) {
        Ok(action) => action,
        Err(e) => return (progress, Err(e)),
    };

    let port = match action {
        WizardAction::DefaultPort => {
            // configure 本身預設 3000，其他預設埠要明確傳入
            if default_port != DEFAULT_PORT {
                args.push(default_port.to_string());
            }
            default_port.to_string()
        }
        WizardAction::CustomPort(port) => {
            args.push(port.clone());
            port
        }
        WizardAction::Exit => {
            progress.println(&style(MANUAL_HINT).bold().cyan().to_string());
            return (progress, Ok(WizardOutcome::ManualExit));
        }
    };

    progress.println(
        &style(format!(
            "> Browse to http://your-server:{}/ to configure your wiki!",
            port
        ))
        .bold()
        .cyan()
        .to_string(),
    );

    let progress = progress.restart("I'll wait until you're done ;)", SpinnerKind::Pong);
    tracing::info!("Starting configuration wizard on port {}", port);

    let result = runner
        .run(program, &args, config.install_dir())
        .await
        .map(|_| {
            progress.succeed("Wiki.js has been configured and is now running!");
            WizardOutcome::Configured { port }
        });
    (progress, result)
}
