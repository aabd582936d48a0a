use crate::domain::model::{CommandOutput, ProcessDescription, WizardChoice};
use crate::domain::ports::{CommandRunner, Prompter, Supervisor};
use crate::utils::error::{InstallerError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Shared call log so tests can compare ordering across fakes.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub struct FakeSupervisor {
    pub log: CallLog,
    pub running: bool,
    pub fail_connect: bool,
    pub fail_delete: bool,
}

impl FakeSupervisor {
    pub fn new(log: CallLog, running: bool) -> Self {
        Self {
            log,
            running,
            fail_connect: false,
            fail_delete: false,
        }
    }
}

#[async_trait]
impl Supervisor for FakeSupervisor {
    async fn connect(&self) -> Result<()> {
        self.log.lock().unwrap().push("supervisor.connect".to_string());
        if self.fail_connect {
            return Err(InstallerError::SupervisorError {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    async fn describe(&self, name: &str) -> Result<ProcessDescription> {
        self.log.lock().unwrap().push(format!("supervisor.describe {}", name));
        if self.running {
            Ok(ProcessDescription {
                name: name.to_string(),
                pm_id: Some(0),
                status: Some("online".to_string()),
            })
        } else {
            Err(InstallerError::SupervisorError {
                message: format!("process '{}' not found", name),
            })
        }
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.log.lock().unwrap().push(format!("supervisor.delete {}", name));
        if self.fail_delete {
            return Err(InstallerError::SupervisorError {
                message: "delete failed".to_string(),
            });
        }
        Ok(())
    }

    async fn disconnect(&self) {
        self.log.lock().unwrap().push("supervisor.disconnect".to_string());
    }
}

pub struct FakeRunner {
    pub log: CallLog,
    pub invocations: Mutex<Vec<(String, Vec<String>, PathBuf)>>,
    /// Program name whose invocation fails with a non-zero exit.
    pub fail_program: Option<String>,
}

impl FakeRunner {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            invocations: Mutex::new(Vec::new()),
            fail_program: None,
        }
    }

    pub fn invocations(&self) -> Vec<(String, Vec<String>, PathBuf)> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput> {
        self.log
            .lock()
            .unwrap()
            .push(format!("run {} {}", program, args.join(" ")).trim_end().to_string());
        self.invocations
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec(), cwd.to_path_buf()));

        if self.fail_program.as_deref() == Some(program) {
            return Err(InstallerError::CommandFailedError {
                command: program.to_string(),
                code: Some(1),
                stderr: "failed".to_string(),
            });
        }
        Ok(CommandOutput::default())
    }
}

pub struct FakePrompter {
    pub choice: WizardChoice,
    pub port_answers: Mutex<VecDeque<String>>,
    pub rejections: Mutex<Vec<String>>,
}

impl FakePrompter {
    pub fn new(choice: WizardChoice, port_answers: &[&str]) -> Self {
        Self {
            choice,
            port_answers: Mutex::new(port_answers.iter().map(|s| s.to_string()).collect()),
            rejections: Mutex::new(Vec::new()),
        }
    }

    pub fn rejections(&self) -> Vec<String> {
        self.rejections.lock().unwrap().clone()
    }

    pub fn remaining_answers(&self) -> usize {
        self.port_answers.lock().unwrap().len()
    }
}

impl Prompter for FakePrompter {
    fn choose_action(&self, choices: &[WizardChoice], _default_port: u16) -> Result<WizardChoice> {
        assert_eq!(choices, &WizardChoice::ALL);
        Ok(self.choice)
    }

    fn ask_port(&self, _default_port: u16) -> Result<String> {
        self.port_answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| InstallerError::ConfigValidationError {
                field: "customport".to_string(),
                message: "no scripted answer left".to_string(),
            })
    }

    fn report_invalid(&self, message: &str) {
        self.rejections.lock().unwrap().push(message.to_string());
    }
}

/// Builds a gzip-compressed tarball in memory.
pub fn tarball(files: &[(&str, &str)]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in files {
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
