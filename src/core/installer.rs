use crate::core::bootstrap::bootstrap_config;
use crate::core::fetch::ReleaseFetcher;
use crate::core::version::{read_manifest_version, release_url};
use crate::core::wizard::run_wizard;
use crate::domain::model::InstallReport;
use crate::domain::ports::{CommandRunner, ConfigProvider, Prompter, Supervisor};
use crate::utils::error::Result;
use crate::utils::progress::Progress;

/// Drives the install/upgrade stages in order.
///
/// The first failing stage ends the run. The failure is reported on the
/// progress handle and the supervisor is disconnected on every path.
pub struct Installer<C, S, R, P>
where
    C: ConfigProvider,
    S: Supervisor,
    R: CommandRunner,
    P: Prompter,
{
    config: C,
    supervisor: S,
    runner: R,
    prompter: P,
    fetcher: ReleaseFetcher,
}

impl<C, S, R, P> Installer<C, S, R, P>
where
    C: ConfigProvider,
    S: Supervisor,
    R: CommandRunner,
    P: Prompter,
{
    pub fn new(config: C, supervisor: S, runner: R, prompter: P) -> Self {
        Self {
            config,
            supervisor,
            runner,
            prompter,
            fetcher: ReleaseFetcher::new(),
        }
    }

    pub fn with_fetcher(mut self, fetcher: ReleaseFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn supervisor(&self) -> &S {
        &self.supervisor
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub async fn run(&self, mut progress: Progress) -> Result<InstallReport> {
        let result = self.run_stages(&mut progress).await;

        if let Err(e) = &result {
            progress.fail(e);
        }

        // 不論成功失敗都要斷開 supervisor
        self.supervisor.disconnect().await;
        result
    }

    async fn run_stages(&self, progress: &mut Progress) -> Result<InstallReport> {
        let install_dir = self.config.install_dir();

        progress.set_text("Looking for running instances...");
        self.supervisor.connect().await?;
        let stopped_existing = self.stop_existing(progress).await;

        let version = read_manifest_version(self.config.manifest_path()).await?;
        let download_url = release_url(self.config.url_template(), &version);
        tracing::info!("📦 Installing Wiki.js {} into {}", version, install_dir.display());

        self.fetcher
            .fetch_and_extract(&download_url, install_dir, progress)
            .await?;

        progress.set_text("Installing Wiki.js npm dependencies...");
        let (program, args) = self.config.dependency_command();
        self.runner.run(program, args, install_dir).await?;
        progress.set_text("Wiki.js npm dependencies installed successfully.");

        let mode = bootstrap_config(
            install_dir,
            self.config.config_file(),
            self.config.sample_config_file(),
            progress,
        )
        .await?;
        progress.succeed(mode.success_message());

        let (next, wizard) =
            run_wizard(&self.config, &self.prompter, &self.runner, progress.clone()).await;
        *progress = next;
        let wizard = wizard?;

        Ok(InstallReport {
            version,
            download_url,
            mode,
            stopped_existing,
            wizard,
        })
    }

    /// Removes a registered instance. A lookup miss means nothing is running.
    async fn stop_existing(&self, progress: &Progress) -> bool {
        let name = self.config.process_name();

        match self.supervisor.describe(name).await {
            Ok(description) => {
                tracing::debug!("Found running instance: {:?}", description);
                progress.set_text("Stopping and deleting process from pm2...");
                match self.supervisor.delete(name).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!("⚠️ Could not delete process '{}': {}", name, e);
                        false
                    }
                }
            }
            Err(e) => {
                tracing::debug!("No running instance '{}': {}", name, e);
                false
            }
        }
    }
}
