//! Dependency provisioning (`install`)

use std::fs;

use tracing::info;

use super::{StepStatus, TaskContext};
use crate::error::Result;
use crate::process::ToolCommand;

/// Reset and recreate the project-local environment.
///
/// Steps run strictly in order: probe for pipenv, drop any existing `.venv`,
/// install the pinned interpreter, create the environment, install dependencies.
/// `production` installs the locked non-dev set and fails on lock drift.
pub fn install(ctx: &mut TaskContext<'_>, production: bool) -> Result<()> {
    ctx.require_tool("pipenv")?;

    remove_venv(ctx)?;

    let version = ctx.config.python_version()?;
    ctx.detail(format!("Python version: {}", version));

    let pyenv = ToolCommand::new("pyenv")
        .args(["install", "--skip-existing", version.as_str()])
        .current_dir(&ctx.config.root);
    ctx.step("pyenv-install", pyenv)?;

    let create = ctx.pipenv().args(["--python", version.as_str()]);
    ctx.step("create-venv", create)?;

    let deps = if production {
        ctx.pipenv().args(["install", "--deploy"])
    } else {
        ctx.pipenv().args(["install", "--dev"])
    };
    ctx.step("install-deps", deps)?;

    ctx.message(format!(
        "Environment ready at {} ({} dependencies)",
        ctx.config.venv_dir().display(),
        if production { "production" } else { "development" }
    ));
    Ok(())
}

fn remove_venv(ctx: &mut TaskContext<'_>) -> Result<()> {
    let venv = ctx.config.venv_dir();
    let command = format!("rm -rf {}", venv.display());
    if !venv.exists() {
        ctx.report.push("reset-venv", command, StepStatus::Skipped);
        return Ok(());
    }
    if ctx.dry_run() {
        ctx.report.push("reset-venv", command, StepStatus::Planned);
        return Ok(());
    }
    info!("removing existing environment {}", venv.display());
    fs::remove_dir_all(&venv)?;
    ctx.report.push("reset-venv", command, StepStatus::Succeeded);
    Ok(())
}
