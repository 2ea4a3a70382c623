//! Container image build and the single named container (`docker-run`, `dockerfile`)

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use super::{StepStatus, TaskContext};
use crate::environment;
use crate::error::Result;
use crate::image;

/// Stop and remove the named container; both steps tolerate its absence
pub fn remove_instance(ctx: &mut TaskContext<'_>) {
    let name = ctx.config.app_name.clone();
    let stop = ctx.docker().args(["stop", name.as_str()]);
    ctx.tolerate("docker-stop", stop);
    let rm = ctx.docker().args(["rm", name.as_str()]);
    ctx.tolerate("docker-rm", rm);
}

/// Build `<app>:<stage>` from the project's Dockerfile, or from the generated
/// definition piped on stdin when the project has none
pub fn build_image(ctx: &mut TaskContext<'_>) -> Result<()> {
    let tag = ctx.config.image_tag();
    let stage = ctx.config.stage.as_str();
    let root = ctx.config.root.display().to_string();
    let dockerfile = ctx.config.dockerfile();

    let mut build = ctx
        .docker()
        .args(["build", "--target", stage, "-t", tag.as_str(), "-f"]);
    if dockerfile.is_file() {
        build = build.arg(dockerfile.display().to_string()).arg(root);
    } else {
        let version = ctx.config.python_version()?;
        info!("no Dockerfile in project, using generated definition");
        ctx.detail("Using generated image definition");
        let text = image::definition(&version, ctx.config.port).render();
        build = build.arg("-").arg(root).stdin(text);
    }
    ctx.step("docker-build", build)
}

/// Replace any running instance with a fresh one built for the configured stage
pub fn docker_run(ctx: &mut TaskContext<'_>) -> Result<()> {
    if let Err(e) = environment::resolve(&ctx.config.environments_dir(), &ctx.config.env) {
        warn!("{}", e);
    }

    remove_instance(ctx);
    build_image(ctx)?;

    let name = ctx.config.app_name.clone();
    let tag = ctx.config.image_tag();
    let publish = format!("{}:{}", ctx.config.port, ctx.config.port);
    let env = format!("ENV={}", ctx.config.env);
    let start = ctx.docker().args([
        "run",
        "-d",
        "--rm",
        "--name",
        name.as_str(),
        "-p",
        publish.as_str(),
        "-e",
        env.as_str(),
        tag.as_str(),
    ]);
    ctx.step("docker-run", start)?;

    ctx.message(format!("{} is running at {}", name, ctx.config.local_url()));
    Ok(())
}

/// Render the image definition; print it, or write it when `target` is set
pub fn dockerfile(ctx: &mut TaskContext<'_>, target: Option<Option<PathBuf>>) -> Result<()> {
    let version = ctx.config.python_version()?;
    let text = image::definition(&version, ctx.config.port).render();

    match target {
        None => {
            ctx.report.output = Some(text);
        }
        Some(path) => {
            let path = path.unwrap_or_else(|| ctx.config.dockerfile());
            let command = format!("write {}", path.display());
            if ctx.dry_run() {
                ctx.report.push("write", command, StepStatus::Planned);
            } else {
                fs::write(&path, &text)?;
                ctx.report.push("write", command, StepStatus::Succeeded);
            }
            ctx.message(format!("Wrote {}", path.display()));
        }
    }
    Ok(())
}
