//! Environment file inspection (`env`)

use super::{StepStatus, TaskContext};
use crate::environment;
use crate::error::Result;

/// Report which file the selected environment resolves to and the keys it
/// defines. Values are never printed.
pub fn show(ctx: &mut TaskContext<'_>) -> Result<()> {
    let dir = ctx.config.environments_dir();
    let resolved = environment::resolve(&dir, &ctx.config.env)?;
    let vars = environment::load(&resolved.path)?;

    ctx.report.push(
        "resolve",
        format!("read {}", resolved.path.display()),
        StepStatus::Succeeded,
    );
    ctx.detail(format!("ENV={}", ctx.config.env));
    ctx.detail(resolved.summary());
    for (key, _) in &vars {
        ctx.detail(format!("  {}", key));
    }
    ctx.message(format!("{} variables defined", vars.len()));
    Ok(())
}
