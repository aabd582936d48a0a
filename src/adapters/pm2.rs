use crate::domain::model::ProcessDescription;
use crate::domain::ports::{CommandRunner, Supervisor};
use crate::utils::error::{InstallerError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// `Supervisor` backed by the pm2 command line client.
///
/// Each call is a separate pm2 invocation. `connect` pings the daemon, which
/// starts it when it is not running yet.
pub struct Pm2Supervisor<R: CommandRunner> {
    runner: R,
    command: String,
    cwd: PathBuf,
    connected: AtomicBool,
}

#[derive(Debug, Deserialize)]
struct JlistEntry {
    name: String,
    pm_id: Option<u64>,
    pm2_env: Option<JlistEnv>,
}

#[derive(Debug, Deserialize)]
struct JlistEnv {
    status: Option<String>,
}

impl<R: CommandRunner> Pm2Supervisor<R> {
    pub fn new(runner: R, command: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            command: command.into(),
            cwd: cwd.into(),
            connected: AtomicBool::new(false),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn pm2(&self, args: &[&str]) -> Result<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner
            .run(&self.command, &args, &self.cwd)
            .await
            .map(|output| output.stdout)
            .map_err(|e| InstallerError::SupervisorError {
                message: e.to_string(),
            })
    }
}

/// Parses `pm2 jlist` output and looks up `name`.
///
/// pm2 may print warnings ahead of the JSON array, so parsing starts at the first `[`.
pub fn find_in_jlist(output: &str, name: &str) -> Result<ProcessDescription> {
    let json = output
        .find('[')
        .map(|start| &output[start..])
        .ok_or_else(|| InstallerError::SupervisorError {
            message: "pm2 jlist returned no process list".to_string(),
        })?;

    let entries: Vec<JlistEntry> =
        serde_json::from_str(json.trim_end()).map_err(|e| InstallerError::SupervisorError {
            message: format!("unreadable pm2 jlist output: {}", e),
        })?;

    entries
        .into_iter()
        .find(|entry| entry.name == name)
        .map(|entry| ProcessDescription {
            name: entry.name,
            pm_id: entry.pm_id,
            status: entry.pm2_env.and_then(|env| env.status),
        })
        .ok_or_else(|| InstallerError::SupervisorError {
            message: format!("process '{}' not found", name),
        })
}

#[async_trait]
impl<R: CommandRunner> Supervisor for Pm2Supervisor<R> {
    async fn connect(&self) -> Result<()> {
        self.pm2(&["ping"]).await?;
        self.connected.store(true, Ordering::SeqCst);
        tracing::debug!("Connected to pm2 daemon");
        Ok(())
    }

    async fn describe(&self, name: &str) -> Result<ProcessDescription> {
        let output = self.pm2(&["jlist"]).await?;
        find_in_jlist(&output, name)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.pm2(&["delete", name]).await?;
        tracing::info!("Deleted pm2 process '{}'", name);
        Ok(())
    }

    async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            tracing::debug!("Disconnected from pm2 daemon");
        }
    }
}
