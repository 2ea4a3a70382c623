//! Scripted runner for unit tests

use std::collections::HashSet;
use std::io;

use super::{ProcessRunner, ToolCommand};
use crate::error::Result;

/// Records every command and answers with scripted exit codes.
///
/// A command fails with the code of the first rule whose prefix matches its
/// rendered form (program and arguments, no env); otherwise it exits 0.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Vec<ToolCommand>,
    rules: Vec<(String, i32)>,
    missing: HashSet<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(mut self, prefix: &str, code: i32) -> Self {
        self.rules.push((prefix.to_string(), code));
        self
    }

    pub fn missing(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Program and arguments of every call, joined by spaces
    pub fn lines(&self) -> Vec<String> {
        self.calls.iter().map(line).collect()
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.lines().iter().any(|l| l.starts_with(prefix))
    }

    fn answer(&mut self, cmd: &ToolCommand) -> Result<i32> {
        self.calls.push(cmd.clone());
        if self.missing.contains(&cmd.program) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "not found").into());
        }
        let rendered = line(cmd);
        Ok(self
            .rules
            .iter()
            .find(|(prefix, _)| rendered.starts_with(prefix.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0))
    }
}

fn line(cmd: &ToolCommand) -> String {
    std::iter::once(cmd.program.as_str())
        .chain(cmd.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

impl ProcessRunner for RecordingRunner {
    fn run(&mut self, cmd: &ToolCommand) -> Result<i32> {
        self.answer(cmd)
    }

    fn probe(&mut self, cmd: &ToolCommand) -> Result<i32> {
        self.answer(cmd)
    }
}
