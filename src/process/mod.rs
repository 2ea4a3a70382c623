//! External process execution
//!
//! Every task is a sequence of [`ToolCommand`]s handed to a [`ProcessRunner`].
//! The system runner spawns real processes, the dry-run runner only logs what
//! would happen.

mod dry_run;
mod system;

#[cfg(test)]
pub(crate) mod recording;

pub use dry_run::DryRunner;
pub use system::SystemRunner;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// A single external tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
    pub stdin: Option<String>,
    /// Long-running interactive process (server, shell) owning the terminal
    pub foreground: bool,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            cwd: None,
            stdin: None,
            foreground: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn foreground(mut self) -> Self {
        self.foreground = true;
        self
    }

    /// Shell-like rendering used in reports and logs
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = self
            .envs
            .iter()
            .map(|(k, v)| format!("{}={}", k, quote(v)))
            .collect();
        parts.push(quote(&self.program));
        parts.extend(self.args.iter().map(|a| quote(a)));
        let mut line = parts.join(" ");
        if self.stdin.is_some() {
            line.push_str(" <<stdin");
        }
        line
    }
}

fn quote(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c)) {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

/// Executes tool commands and reports their exit codes
pub trait ProcessRunner {
    /// Run with inherited stdio and wait for the exit code
    fn run(&mut self, cmd: &ToolCommand) -> Result<i32>;

    /// Run silently (no output reaches the operator) and wait for the exit code
    fn probe(&mut self, cmd: &ToolCommand) -> Result<i32>;

    /// True when nothing is actually executed
    fn is_dry_run(&self) -> bool {
        false
    }
}
