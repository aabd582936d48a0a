use clap::Parser;
use dialoguer::console::style;
use std::io::IsTerminal;
use wikijs_installer::adapters::{DialoguerPrompter, Pm2Supervisor, TokioCommandRunner};
use wikijs_installer::utils::error::ErrorSeverity;
use wikijs_installer::utils::logger;
use wikijs_installer::utils::progress::{Progress, SpinnerKind};
use wikijs_installer::{CliConfig, Installer, WizardOutcome};

const BANNER: &str = r" __    __ _ _    _    _
/ / /\ \ (_) | _(_)  (_)___
\ \/  \/ / | |/ / |  | / __|
 \  /\  /| |   <| |_ | \__ \
  \/  \/ |_|_|\_\_(_)/ |___/
                   |__/
";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    let attached = std::io::stdout().is_terminal();
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let settings = match config.resolve(attached) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    println!("{}", style(BANNER).yellow());

    let progress = if attached {
        Progress::start("Initializing...", SpinnerKind::Dots)
    } else {
        Progress::hidden()
    };

    let supervisor = Pm2Supervisor::new(
        TokioCommandRunner::new(),
        settings.supervisor_command.clone(),
        settings.install_dir.clone(),
    );
    let installer = Installer::new(
        settings,
        supervisor,
        TokioCommandRunner::new(),
        DialoguerPrompter::new(),
    );

    match installer.run(progress).await {
        Ok(report) => {
            tracing::info!(
                "✅ Wiki.js {} ready ({:?}, wizard: {:?})",
                report.version,
                report.mode,
                report.wizard
            );
            if report.wizard == WizardOutcome::ManualExit {
                tracing::debug!("Operator will configure manually");
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Installation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
