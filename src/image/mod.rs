//! Container image definition
//!
//! Both stages build on a shared `base` stage (runtime image, compiler
//! toolchain, pipenv, manifests). They differ in how dependencies are installed
//! and whether the server reloads on source changes.

pub mod dockerfile;

pub use dockerfile::{BuildStage, Dockerfile, Instruction};

use crate::config::{Stage, BIND_HOST, ENTRY_POINT, ENVIRONMENTS_DIR, SOURCE_DIR, VENV_IN_PROJECT};

pub const BASE_STAGE: &str = "base";
pub const APP_DIR: &str = "/app";

const BUILD_PREREQUISITES: &str = "apt-get update \
    && apt-get install -y --no-install-recommends build-essential gcc \
    && rm -rf /var/lib/apt/lists/*";

/// Dependency install command for a stage
pub fn install_command(stage: Stage) -> &'static str {
    match stage {
        Stage::Development => "pipenv install --dev",
        // fails when Pipfile.lock is out of date with Pipfile
        Stage::Production => "pipenv install --deploy --system",
    }
}

/// Server command line baked into a stage
pub fn server_command(stage: Stage, port: u16) -> Vec<String> {
    let mut argv: Vec<String> = Vec::new();
    if stage == Stage::Development {
        argv.extend(["pipenv", "run"].map(String::from));
    }
    argv.extend(["uvicorn", ENTRY_POINT, "--host", BIND_HOST, "--port"].map(String::from));
    argv.push(port.to_string());
    if stage.reloads() {
        argv.push("--reload".to_string());
    }
    argv
}

/// Two-stage image definition for the given runtime version and port
pub fn definition(python_version: &str, port: u16) -> Dockerfile {
    let base = BuildStage::from(&format!("python:{}-slim", python_version), BASE_STAGE)
        .env("PYTHONDONTWRITEBYTECODE", "1")
        .env("PYTHONUNBUFFERED", "1")
        .push(Instruction::Workdir(APP_DIR.to_string()))
        .run(BUILD_PREREQUISITES)
        .copy(&["Pipfile", "Pipfile.lock"], "./")
        .run("pip install --no-cache-dir pipenv");

    let mut stages = vec![base];
    for stage in [Stage::Development, Stage::Production] {
        let mut build = BuildStage::from(BASE_STAGE, stage.as_str());
        if stage == Stage::Development {
            build = build.env(VENV_IN_PROJECT.0, VENV_IN_PROJECT.1);
        }
        let argv = server_command(stage, port);
        let argv: Vec<&str> = argv.iter().map(String::as_str).collect();
        build = build
            .run(install_command(stage))
            .copy(&[SOURCE_DIR], &format!("./{}", SOURCE_DIR))
            .copy(&[ENVIRONMENTS_DIR], &format!("./{}", ENVIRONMENTS_DIR))
            .push(Instruction::Expose(port))
            .cmd(&argv);
        stages.push(build);
    }

    Dockerfile { stages }
}
