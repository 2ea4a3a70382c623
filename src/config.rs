//! Project configuration
//!
//! Everything a task needs to know about the project checkout is resolved once,
//! from CLI flags and their environment variables, into a [`ProjectConfig`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::error::{Result, TaskError};

pub const DEFAULT_ENV: &str = "dev";
pub const DEFAULT_APP_NAME: &str = "fastapi-app";
pub const DEFAULT_PORT: u16 = 8000;

/// ASGI entry point served by uvicorn
pub const ENTRY_POINT: &str = "src.main:app";

/// Address the server binds to, locally and in containers
pub const BIND_HOST: &str = "0.0.0.0";

/// Environment variable that keeps pipenv's virtualenv inside the project
pub const VENV_IN_PROJECT: (&str, &str) = ("PIPENV_VENV_IN_PROJECT", "1");

pub const SOURCE_DIR: &str = "src";
pub const ENVIRONMENTS_DIR: &str = "environments";
pub const VERSION_FILE: &str = ".python-version";
pub const VENV_DIR: &str = ".venv";
pub const DOCKERFILE: &str = "Dockerfile";

/// Container image build stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Development,
    Production,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Development => "development",
            Stage::Production => "production",
        }
    }

    /// Whether the served process restarts on source changes
    pub fn reloads(&self) -> bool {
        matches!(self, Stage::Development)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Stage::Development),
            "production" | "prod" => Ok(Stage::Production),
            other => Err(TaskError::Config(format!(
                "Unknown build stage '{}' (expected development or production)",
                other
            ))),
        }
    }
}

/// Resolved configuration for one invocation
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub root: PathBuf,
    pub app_name: String,
    pub port: u16,
    pub env: String,
    pub stage: Stage,
}

impl ProjectConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            app_name: DEFAULT_APP_NAME.to_string(),
            port: DEFAULT_PORT,
            env: DEFAULT_ENV.to_string(),
            stage: Stage::Development,
        }
    }

    pub fn from_args(args: &Args, stage: Option<&str>) -> Result<Self> {
        let root = match &args.project_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        if !root.is_dir() {
            return Err(TaskError::Config(format!(
                "Project directory does not exist: {}",
                root.display()
            )));
        }

        let app_name = args.app_name.trim().to_string();
        validate_app_name(&app_name)?;

        let env = args.env.trim().to_string();
        validate_env_selector(&env)?;
        if args.port == 0 {
            return Err(TaskError::Config("PORT must be between 1 and 65535".to_string()));
        }

        let stage = match stage {
            Some(s) => s.parse()?,
            None => Stage::Development,
        };

        Ok(Self {
            root,
            app_name,
            port: args.port,
            env,
            stage,
        })
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join(SOURCE_DIR)
    }

    pub fn environments_dir(&self) -> PathBuf {
        self.root.join(ENVIRONMENTS_DIR)
    }

    pub fn version_file(&self) -> PathBuf {
        self.root.join(VERSION_FILE)
    }

    pub fn venv_dir(&self) -> PathBuf {
        self.root.join(VENV_DIR)
    }

    pub fn dockerfile(&self) -> PathBuf {
        self.root.join(DOCKERFILE)
    }

    /// Image tag for the configured stage, e.g. `fastapi-app:development`
    pub fn image_tag(&self) -> String {
        format!("{}:{}", self.app_name, self.stage)
    }

    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Read the pinned runtime version
    pub fn python_version(&self) -> Result<String> {
        read_python_version(&self.version_file())
    }
}

/// Read the first non-empty line of a version pin file
pub fn read_python_version(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| {
        TaskError::Config(format!("Cannot read {}: {}", path.display(), e))
    })?;

    let version = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .ok_or_else(|| TaskError::Config(format!("{} is empty", path.display())))?;

    let pattern = Regex::new(r"^\d+\.\d+(\.\d+)?([a-z]+\d+)?$")
        .map_err(|e| TaskError::Config(e.to_string()))?;
    if !pattern.is_match(version) {
        return Err(TaskError::Config(format!(
            "Invalid runtime version '{}' in {}",
            version,
            path.display()
        )));
    }

    Ok(version.to_string())
}

/// The selector names a file inside `environments/`, so it must not be a path
fn validate_env_selector(env: &str) -> Result<()> {
    if env.is_empty() {
        return Err(TaskError::Config("ENV must not be empty".to_string()));
    }
    if env.contains('/') || env.contains('\\') || env.contains("..") {
        return Err(TaskError::Config(format!(
            "Invalid ENV '{}': must be a plain name such as dev or prod",
            env
        )));
    }
    Ok(())
}

fn validate_app_name(name: &str) -> Result<()> {
    // Docker container and image names share this alphabet
    let pattern = Regex::new(r"^[a-z0-9][a-z0-9_.-]*$").map_err(|e| TaskError::Config(e.to_string()))?;
    if pattern.is_match(name) {
        Ok(())
    } else {
        Err(TaskError::Config(format!(
            "Invalid APP_NAME '{}': use lowercase letters, digits, '.', '_' or '-'",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_stage_parse() {
        assert_eq!("development".parse::<Stage>().unwrap(), Stage::Development);
        assert_eq!("PROD".parse::<Stage>().unwrap(), Stage::Production);
        assert!("staging".parse::<Stage>().is_err());
    }

    #[test]
    fn test_image_tag() {
        let config = ProjectConfig::new("/tmp").with_stage(Stage::Production);
        assert_eq!(config.image_tag(), "fastapi-app:production");
        assert_eq!(config.local_url(), "http://localhost:8000");
    }

    #[test]
    fn test_read_python_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(VERSION_FILE);

        fs::write(&path, "\n3.12.4\n").unwrap();
        assert_eq!(read_python_version(&path).unwrap(), "3.12.4");

        fs::write(&path, "3.13.0rc1").unwrap();
        assert_eq!(read_python_version(&path).unwrap(), "3.13.0rc1");

        fs::write(&path, "latest").unwrap();
        assert!(read_python_version(&path).is_err());

        fs::write(&path, "   \n").unwrap();
        assert!(read_python_version(&path).is_err());
    }

    #[test]
    fn test_missing_version_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_python_version(&dir.path().join(VERSION_FILE)).unwrap_err();
        assert!(matches!(err, TaskError::Config(_)));
    }

    #[test]
    fn test_from_args_rejects_bad_app_name() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from([
            "taskwright",
            "run",
            "--app-name",
            "My App",
            "--project-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(ProjectConfig::from_args(&args, None).is_err());
    }

    #[test]
    fn test_env_selector_must_stay_in_environments_dir() {
        assert!(validate_env_selector("prod").is_ok());
        assert!(validate_env_selector("qa-eu.1").is_ok());
        assert!(validate_env_selector("").is_err());
        assert!(validate_env_selector("../secrets").is_err());
        assert!(validate_env_selector("nested/prod").is_err());
        assert!(validate_env_selector("..\\secrets").is_err());
    }

    #[test]
    fn test_from_args_rejects_path_like_env() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from([
            "taskwright",
            "env",
            "--env",
            "../secrets",
            "--project-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        let err = ProjectConfig::from_args(&args, None).unwrap_err();
        assert!(err.to_string().contains("Invalid ENV"));
    }

    #[test]
    fn test_from_args_with_stage() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from([
            "taskwright",
            "clean",
            "--project-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        let config = ProjectConfig::from_args(&args, Some("prod")).unwrap();
        assert_eq!(config.stage, Stage::Production);
        assert_eq!(config.venv_dir(), dir.path().join(".venv"));
    }
}
