//! Runner that executes nothing

use tracing::info;

use super::{ProcessRunner, ToolCommand};
use crate::error::Result;

/// Records the commands that would run; every command "succeeds"
#[derive(Debug, Default)]
pub struct DryRunner {
    #[cfg_attr(not(test), allow(dead_code))]
    planned: Vec<String>,
}

impl DryRunner {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn planned(&self) -> &[String] {
        &self.planned
    }
}

impl ProcessRunner for DryRunner {
    fn run(&mut self, cmd: &ToolCommand) -> Result<i32> {
        info!("[dry-run] {}", cmd.display());
        self.planned.push(cmd.display());
        Ok(0)
    }

    fn probe(&mut self, cmd: &ToolCommand) -> Result<i32> {
        self.run(cmd)
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_never_fails() {
        let mut runner = DryRunner::new();
        let code = runner
            .run(&ToolCommand::new("docker").args(["stop", "app"]))
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(runner.planned(), ["docker stop app"]);
        assert!(runner.is_dry_run());
    }
}
