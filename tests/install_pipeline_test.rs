use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use httpmock::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use wikijs_installer::domain::model::{CommandOutput, ProcessDescription, WizardChoice};
use wikijs_installer::domain::ports::{Prompter, Supervisor};
use wikijs_installer::utils::progress::Progress;
use wikijs_installer::{
    InstallMode, Installer, InstallerError, InstallerSettings, Result, WizardOutcome,
};

fn release_tarball() -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in [
        ("config.sample.yml", "title: Wiki\nport: 3000\n"),
        ("wiki.js", "// cli entry"),
        ("server/index.js", "// server"),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Lays out `<root>/node_modules/wiki.js/package.json` the way npm does.
fn package_layout(version: &str) -> (TempDir, PathBuf) {
    let root = TempDir::new().unwrap();
    let package_dir = root.path().join("node_modules").join("wiki.js");
    std::fs::create_dir_all(&package_dir).unwrap();
    std::fs::write(
        package_dir.join("package.json"),
        format!(r#"{{"name":"wiki.js","version":"{}"}}"#, version),
    )
    .unwrap();
    (root, package_dir)
}

#[derive(Default)]
struct MockSupervisor {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl Supervisor for MockSupervisor {
    async fn connect(&self) -> Result<()> {
        self.calls.lock().unwrap().push("connect".to_string());
        Ok(())
    }

    async fn describe(&self, name: &str) -> Result<ProcessDescription> {
        self.calls.lock().unwrap().push("describe".to_string());
        Err(InstallerError::SupervisorError {
            message: format!("process '{}' not found", name),
        })
    }

    async fn delete(&self, _name: &str) -> Result<()> {
        self.calls.lock().unwrap().push("delete".to_string());
        Ok(())
    }

    async fn disconnect(&self) {
        self.calls.lock().unwrap().push("disconnect".to_string());
    }
}

struct NeverPrompted;

impl Prompter for NeverPrompted {
    fn choose_action(&self, _choices: &[WizardChoice], _default_port: u16) -> Result<WizardChoice> {
        panic!("non-interactive runs must not prompt");
    }

    fn ask_port(&self, _default_port: u16) -> Result<String> {
        panic!("non-interactive runs must not prompt");
    }

    fn report_invalid(&self, _message: &str) {}
}

struct RecordingRunner {
    calls: Mutex<Vec<(String, Vec<String>, PathBuf)>>,
}

#[async_trait]
impl wikijs_installer::domain::ports::CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec(), cwd.to_path_buf()));
        Ok(CommandOutput::default())
    }
}

#[tokio::test]
async fn test_end_to_end_fresh_install() {
    let (root, package_dir) = package_layout("2.5.1.0.3");
    let server = MockServer::start();
    let release = server.mock(|when, then| {
        when.method(GET).path("/Requarks/wiki/releases/download/v2.5.1.0/wiki-js.tar.gz");
        then.status(200)
            .header("Content-Type", "application/gzip")
            .body(release_tarball());
    });

    let install_dir = std::fs::canonicalize(root.path()).unwrap();
    let mut settings = InstallerSettings::new(&package_dir, install_dir.clone());
    settings.url_template = server.url("/Requarks/wiki/releases/download/v{0}/wiki-js.tar.gz");

    let runner = RecordingRunner {
        calls: Mutex::new(Vec::new()),
    };
    let installer = Installer::new(settings, MockSupervisor::default(), runner, NeverPrompted);
    let report = installer.run(Progress::hidden()).await.unwrap();

    release.assert();
    assert_eq!(report.version.as_str(), "2.5.1.0");
    assert_eq!(report.mode, InstallMode::FreshInstall);
    assert_eq!(report.wizard, WizardOutcome::NonInteractive);

    assert!(install_dir.join("server/index.js").exists());
    assert_eq!(
        std::fs::read(install_dir.join("config.yml")).unwrap(),
        std::fs::read(install_dir.join("config.sample.yml")).unwrap()
    );

    let calls = installer.runner().calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "npm");
    assert_eq!(
        calls[0].1,
        vec!["install", "--only=production", "--no-optional"]
    );
    assert_eq!(calls[0].2, install_dir);

    let supervisor_calls = installer.supervisor().calls.lock().unwrap().clone();
    assert_eq!(supervisor_calls, vec!["connect", "describe", "disconnect"]);
}

#[tokio::test]
async fn test_end_to_end_missing_release() {
    let (root, package_dir) = package_layout("9.9.9");
    let server = MockServer::start();
    let release = server.mock(|when, then| {
        when.method(GET).path("/v9.9.9/wiki-js.tar.gz");
        then.status(404);
    });

    let mut settings = InstallerSettings::new(&package_dir, root.path().to_path_buf());
    settings.url_template = server.url("/v{0}/wiki-js.tar.gz");

    let runner = RecordingRunner {
        calls: Mutex::new(Vec::new()),
    };
    let installer = Installer::new(settings, MockSupervisor::default(), runner, NeverPrompted);
    let err = installer.run(Progress::hidden()).await.unwrap_err();

    release.assert();
    assert!(err.to_string().contains("Remote file not found"));
    assert!(installer.runner().calls.lock().unwrap().is_empty());
    assert!(!root.path().join("config.yml").exists());
    assert_eq!(
        installer.supervisor().calls.lock().unwrap().last().map(String::as_str),
        Some("disconnect")
    );
}

#[cfg(unix)]
mod with_real_processes {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use wikijs_installer::adapters::{Pm2Supervisor, TokioCommandRunner};

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_upgrade_stops_running_instance() {
        let (root, package_dir) = package_layout("2.5.1");
        let bin = TempDir::new().unwrap();
        let pm2_log = bin.path().join("pm2.log");
        let pm2 = script(
            bin.path(),
            "pm2",
            &format!(
                r#"echo "$@" >> {log}
case "$1" in
  jlist) echo '[{{"name":"wiki","pm_id":3,"pm2_env":{{"status":"online"}}}}]' ;;
esac"#,
                log = pm2_log.display()
            ),
        );
        let npm = script(bin.path(), "npm", "touch deps-installed");

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2.5.1/wiki-js.tar.gz");
            then.status(200).body(release_tarball());
        });

        let install_dir = std::fs::canonicalize(root.path()).unwrap();
        std::fs::write(install_dir.join("config.yml"), "port: 8080\n").unwrap();

        let mut settings = InstallerSettings::new(&package_dir, install_dir.clone());
        settings.url_template = server.url("/v{0}/wiki-js.tar.gz");
        settings.dependency_program = npm.to_string_lossy().into_owned();

        let supervisor = Pm2Supervisor::new(
            TokioCommandRunner::new(),
            pm2.to_string_lossy().into_owned(),
            install_dir.clone(),
        );
        let installer = Installer::new(settings, supervisor, TokioCommandRunner::new(), NeverPrompted);
        let report = installer.run(Progress::hidden()).await.unwrap();

        assert!(report.stopped_existing);
        assert_eq!(report.mode, InstallMode::Upgrade);
        assert!(install_dir.join("deps-installed").exists());
        assert_eq!(
            std::fs::read_to_string(install_dir.join("config.yml")).unwrap(),
            "port: 8080\n"
        );
        assert!(!installer.supervisor().is_connected());

        let pm2_calls = std::fs::read_to_string(&pm2_log).unwrap();
        assert_eq!(pm2_calls.lines().collect::<Vec<_>>(), vec!["ping", "jlist", "delete wiki"]);
    }

    #[tokio::test]
    async fn test_failing_dependency_install() {
        let (root, package_dir) = package_layout("2.5.1");
        let bin = TempDir::new().unwrap();
        let pm2 = script(bin.path(), "pm2", "[ \"$1\" = jlist ] && echo '[]'; exit 0");
        let npm = script(bin.path(), "npm", "echo 'npm ERR! network' >&2; exit 1");

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2.5.1/wiki-js.tar.gz");
            then.status(200).body(release_tarball());
        });

        let mut settings = InstallerSettings::new(&package_dir, root.path().to_path_buf());
        settings.url_template = server.url("/v{0}/wiki-js.tar.gz");
        settings.dependency_program = npm.to_string_lossy().into_owned();

        let supervisor = Pm2Supervisor::new(
            TokioCommandRunner::new(),
            pm2.to_string_lossy().into_owned(),
            root.path(),
        );
        let installer = Installer::new(settings, supervisor, TokioCommandRunner::new(), NeverPrompted);
        let err = installer.run(Progress::hidden()).await.unwrap_err();

        match err {
            InstallerError::CommandFailedError { code, stderr, .. } => {
                assert_eq!(code, Some(1));
                assert!(stderr.contains("npm ERR!"));
            }
            other => panic!("expected CommandFailedError, got {:?}", other),
        }
        assert!(!root.path().join("config.yml").exists());
    }
}
