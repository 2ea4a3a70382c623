//! Foreground sessions inside the project environment (`run`, `shell`)

use tracing::warn;

use super::TaskContext;
use crate::config::{BIND_HOST, ENTRY_POINT, SOURCE_DIR};
use crate::environment;
use crate::error::{Result, TaskError};
use crate::process::ToolCommand;

/// Start the development server with auto-reload.
///
/// Nothing is started unless pipenv reports an existing environment for the
/// project. The server runs in the foreground and its exit status is the task's.
pub fn run(ctx: &mut TaskContext<'_>) -> Result<()> {
    ensure_environment(ctx)?;

    match environment::resolve(&ctx.config.environments_dir(), &ctx.config.env) {
        Ok(resolved) => ctx.detail(resolved.summary()),
        Err(e) => warn!("{}", e),
    }

    let port = ctx.config.port.to_string();
    let server = ctx
        .pipenv()
        .args(["run", "uvicorn", ENTRY_POINT, "--host", BIND_HOST, "--port"])
        .arg(port)
        .args(["--reload", "--reload-dir", SOURCE_DIR])
        .env("ENV", ctx.config.env.clone())
        .foreground();

    ctx.detail(format!("Serving {} on {}", ENTRY_POINT, ctx.config.local_url()));
    ctx.step("serve", server)
}

/// Open an interactive shell in the project environment
pub fn shell(ctx: &mut TaskContext<'_>) -> Result<()> {
    let cmd = ctx.pipenv().arg("shell").foreground();
    ctx.step("shell", cmd)
}

fn ensure_environment(ctx: &mut TaskContext<'_>) -> Result<()> {
    let query: ToolCommand = ctx.pipenv().arg("--venv");
    if ctx.query("venv-check", query)? {
        Ok(())
    } else {
        Err(TaskError::EnvironmentMissing)
    }
}
