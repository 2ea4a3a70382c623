//! Runner that spawns real processes

use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Once;

use tracing::{debug, warn};

use super::{ProcessRunner, ToolCommand};
use crate::error::Result;

static INTERRUPT_GUARD: Once = Once::new();

#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn build(cmd: &ToolCommand) -> Command {
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        for (key, value) in &cmd.envs {
            command.env(key, value);
        }
        if let Some(ref dir) = cmd.cwd {
            command.current_dir(dir);
        }
        command
    }

    fn wait(mut command: Command, stdin: Option<&str>) -> Result<ExitStatus> {
        if stdin.is_some() {
            command.stdin(Stdio::piped());
        }
        let mut child = command.spawn()?;
        let mut write_error = None;
        if let Some(input) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                // a child may exit before reading all of its input
                if let Err(e) = pipe.write_all(input.as_bytes()) {
                    if e.kind() == io::ErrorKind::BrokenPipe {
                        debug!("child closed stdin early");
                    } else {
                        write_error = Some(e);
                    }
                }
            }
        }
        let status = child.wait()?;
        match write_error {
            Some(e) if status.success() => Err(e.into()),
            _ => Ok(status),
        }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&mut self, cmd: &ToolCommand) -> Result<i32> {
        debug!(command = %cmd.display(), "spawning");
        if cmd.foreground {
            guard_interrupts();
        }
        let status = Self::wait(Self::build(cmd), cmd.stdin.as_deref())?;
        Ok(exit_code(status))
    }

    fn probe(&mut self, cmd: &ToolCommand) -> Result<i32> {
        debug!(command = %cmd.display(), "probing");
        let mut command = Self::build(cmd);
        command.stdout(Stdio::null()).stderr(Stdio::null());
        if cmd.stdin.is_none() {
            command.stdin(Stdio::null());
        }
        let status = Self::wait(command, cmd.stdin.as_deref())?;
        Ok(exit_code(status))
    }
}

/// The terminal delivers Ctrl-C to the whole process group. The child decides how
/// to shut down; this process keeps waiting so the child's status is reported.
fn guard_interrupts() {
    INTERRUPT_GUARD.call_once(|| {
        if let Err(e) = ctrlc::set_handler(|| {
            debug!("interrupt received, waiting for child to exit");
        }) {
            warn!("could not install interrupt handler: {}", e);
        }
    });
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt as _;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
