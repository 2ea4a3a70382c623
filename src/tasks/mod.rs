//! Task implementations
//!
//! A task is a sequence of steps run through a [`TaskContext`], which owns the
//! project configuration, the process runner and the report being built.

pub mod clean;
pub mod container;
pub mod launch;
pub mod provision;
pub mod quality;
pub mod report;
pub mod settings;

pub use report::{StepOutcome, StepStatus, TaskReport};

use std::io;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::{ProjectConfig, VENV_IN_PROJECT};
use crate::error::{Result, TaskError};
use crate::process::{ProcessRunner, ToolCommand};

/// Runtime state of one task invocation
pub struct TaskContext<'a> {
    pub config: ProjectConfig,
    pub report: TaskReport,
    runner: &'a mut dyn ProcessRunner,
}

impl<'a> TaskContext<'a> {
    pub fn new(task: &str, config: ProjectConfig, runner: &'a mut dyn ProcessRunner) -> Self {
        let dry_run = runner.is_dry_run();
        Self {
            config,
            report: TaskReport::new(task, dry_run),
            runner,
        }
    }

    pub fn dry_run(&self) -> bool {
        self.report.dry_run
    }

    /// `pipenv` invocation rooted at the project, environment kept in-project
    pub fn pipenv(&self) -> ToolCommand {
        ToolCommand::new("pipenv")
            .env(VENV_IN_PROJECT.0, VENV_IN_PROJECT.1)
            .current_dir(&self.config.root)
    }

    /// `docker` invocation rooted at the project
    pub fn docker(&self) -> ToolCommand {
        ToolCommand::new("docker").current_dir(&self.config.root)
    }

    /// Run a step; a non-zero exit aborts the task
    pub fn step(&mut self, name: &str, cmd: ToolCommand) -> Result<()> {
        info!(step = name, "{}", cmd.display());
        let code = match self.runner.run(&cmd) {
            Ok(code) => code,
            Err(e) => return Err(self.spawn_failed(name, &cmd, e)),
        };
        self.record(name, &cmd, code)
    }

    /// Run a step whose failure is expected and ignored
    pub fn tolerate(&mut self, name: &str, cmd: ToolCommand) {
        let status = match self.runner.probe(&cmd) {
            Ok(0) if self.dry_run() => StepStatus::Planned,
            Ok(0) => StepStatus::Succeeded,
            Ok(code) => {
                warn!(step = name, code, "ignored failure of `{}`", cmd.display());
                StepStatus::Tolerated { code }
            }
            Err(e) => {
                warn!(step = name, "ignored failure of `{}`: {}", cmd.display(), e);
                StepStatus::Tolerated { code: 127 }
            }
        };
        self.report.push(name, cmd.display(), status);
    }

    /// Silently ask a yes/no question of an external tool
    pub fn query(&mut self, name: &str, cmd: ToolCommand) -> Result<bool> {
        let code = match self.runner.probe(&cmd) {
            Ok(code) => code,
            Err(e) => return Err(self.spawn_failed(name, &cmd, e)),
        };
        let status = match code {
            0 if self.dry_run() => StepStatus::Planned,
            0 => StepStatus::Succeeded,
            code => StepStatus::Failed { code },
        };
        self.report.push(name, cmd.display(), status);
        Ok(code == 0)
    }

    /// Fail with [`TaskError::ToolMissing`] unless `<program> --version` runs
    pub fn require_tool(&mut self, program: &str) -> Result<()> {
        let cmd = ToolCommand::new(program).arg("--version");
        let available = matches!(self.runner.probe(&cmd), Ok(0));
        if available {
            let status = if self.dry_run() { StepStatus::Planned } else { StepStatus::Succeeded };
            self.report.push("require", cmd.display(), status);
            Ok(())
        } else {
            self.report.push("require", cmd.display(), StepStatus::Failed { code: 127 });
            Err(TaskError::ToolMissing(program.to_string()))
        }
    }

    /// Record steps that will not run because an earlier one failed
    pub fn skip(&mut self, name: &str, cmd: &ToolCommand) {
        self.report.push(name, cmd.display(), StepStatus::Skipped);
    }

    pub fn detail(&mut self, line: impl Into<String>) {
        self.report.details.push(line.into());
    }

    pub fn message(&mut self, msg: impl Into<String>) {
        self.report.message = Some(msg.into());
    }

    /// Close the report with the task's result
    pub fn finish(self, result: &Result<()>) -> TaskReport {
        let mut report = self.report;
        report.finished_at = Some(Utc::now());
        match result {
            Ok(()) => report.success = true,
            Err(e) => {
                report.success = false;
                report.error = Some(e.to_string());
            }
        }
        report
    }

    fn record(&mut self, name: &str, cmd: &ToolCommand, code: i32) -> Result<()> {
        if code == 0 {
            let status = if self.dry_run() { StepStatus::Planned } else { StepStatus::Succeeded };
            self.report.push(name, cmd.display(), status);
            Ok(())
        } else {
            self.report.push(name, cmd.display(), StepStatus::Failed { code });
            Err(TaskError::ToolFailed {
                step: name.to_string(),
                code,
            })
        }
    }

    fn spawn_failed(&mut self, name: &str, cmd: &ToolCommand, err: TaskError) -> TaskError {
        self.report.push(name, cmd.display(), StepStatus::Failed { code: 127 });
        match err {
            TaskError::IoError(e) if e.kind() == io::ErrorKind::NotFound => {
                TaskError::ToolMissing(cmd.program.clone())
            }
            other => other,
        }
    }
}
