//! Code-quality tasks: `format`, `lint`, `typecheck`, `check`

use super::TaskContext;
use crate::config::SOURCE_DIR;
use crate::error::Result;
use crate::process::ToolCommand;

/// One quality step: a tool run through `pipenv run` against the source tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityStep {
    SortImports,
    Format,
    Lint,
    Typecheck,
}

impl QualityStep {
    pub fn name(&self) -> &'static str {
        match self {
            QualityStep::SortImports => "isort",
            QualityStep::Format => "black",
            QualityStep::Lint => "flake8",
            QualityStep::Typecheck => "mypy",
        }
    }

    fn command(&self, ctx: &TaskContext<'_>) -> ToolCommand {
        ctx.pipenv().args(["run", self.name(), SOURCE_DIR])
    }
}

/// `check` order: format (isort + black), lint, typecheck
pub const CHECK_SEQUENCE: [QualityStep; 4] = [
    QualityStep::SortImports,
    QualityStep::Format,
    QualityStep::Lint,
    QualityStep::Typecheck,
];

fn run_steps(ctx: &mut TaskContext<'_>, steps: &[QualityStep]) -> Result<()> {
    for (i, step) in steps.iter().enumerate() {
        let cmd = step.command(ctx);
        if let Err(e) = ctx.step(step.name(), cmd) {
            for rest in &steps[i + 1..] {
                let cmd = rest.command(ctx);
                ctx.skip(rest.name(), &cmd);
            }
            return Err(e);
        }
    }
    Ok(())
}

/// Sort imports, then format, in place
pub fn format(ctx: &mut TaskContext<'_>) -> Result<()> {
    run_steps(ctx, &[QualityStep::SortImports, QualityStep::Format])
}

pub fn lint(ctx: &mut TaskContext<'_>) -> Result<()> {
    run_steps(ctx, &[QualityStep::Lint])
}

pub fn typecheck(ctx: &mut TaskContext<'_>) -> Result<()> {
    run_steps(ctx, &[QualityStep::Typecheck])
}

/// Format, lint and typecheck; the first failure ends the run
pub fn check(ctx: &mut TaskContext<'_>) -> Result<()> {
    run_steps(ctx, &CHECK_SEQUENCE)?;
    ctx.message("All checks passed");
    Ok(())
}
