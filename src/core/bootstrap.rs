use crate::domain::model::InstallMode;
use crate::utils::error::{InstallerError, Result};
use crate::utils::progress::Progress;
use std::io::ErrorKind;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.yml";
pub const SAMPLE_CONFIG_FILE: &str = "config.sample.yml";

/// Creates the config file from the sample on a first install.
///
/// An existing config file is left untouched and the run counts as an upgrade.
/// Access errors other than "not found" fail the stage.
pub async fn bootstrap_config(
    install_dir: &Path,
    config_file: &str,
    sample_file: &str,
    progress: &Progress,
) -> Result<InstallMode> {
    let config_path = install_dir.join(config_file);

    match tokio::fs::metadata(&config_path).await {
        Ok(_) => {
            tracing::info!("Existing {} found, upgrade mode", config_file);
            Ok(InstallMode::Upgrade)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            progress.set_text(&format!(
                "First-time install, creating a new {}...",
                config_file
            ));
            let sample_path = install_dir.join(sample_file);
            tokio::fs::copy(&sample_path, &config_path)
                .await
                .map_err(|e| InstallerError::ConfigAccessError {
                    path: sample_path.display().to_string(),
                    source: e,
                })?;
            tracing::info!("Created {} from {}", config_file, sample_file);
            Ok(InstallMode::FreshInstall)
        }
        Err(e) => Err(InstallerError::ConfigAccessError {
            path: config_path.display().to_string(),
            source: e,
        }),
    }
}
