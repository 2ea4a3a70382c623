//! Per-environment configuration files
//!
//! The application reads `environments/<ENV>.env`, falling back to `dev.env`
//! when the selected file does not exist.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;

use crate::error::{Result, TaskError};

/// Environment whose file is used when the selected one is missing
pub const FALLBACK_ENV: &str = "dev";

/// Outcome of resolving an environment selector to a file
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedEnvFile {
    pub requested: String,
    pub path: PathBuf,
    pub fell_back: bool,
}

impl ResolvedEnvFile {
    pub fn summary(&self) -> String {
        if self.fell_back {
            format!(
                "Environment '{}' has no file, using {}",
                self.requested,
                self.path.display()
            )
        } else {
            format!("Environment '{}' uses {}", self.requested, self.path.display())
        }
    }
}

/// Resolve `<dir>/<env>.env`, then `<dir>/dev.env`
pub fn resolve(dir: &Path, env: &str) -> Result<ResolvedEnvFile> {
    let selected = dir.join(format!("{}.env", env));
    if selected.is_file() {
        return Ok(ResolvedEnvFile {
            requested: env.to_string(),
            path: selected,
            fell_back: false,
        });
    }

    let fallback = dir.join(format!("{}.env", FALLBACK_ENV));
    if fallback.is_file() {
        return Ok(ResolvedEnvFile {
            requested: env.to_string(),
            path: fallback,
            fell_back: true,
        });
    }

    Err(TaskError::EnvFileNotFound {
        env: env.to_string(),
        fallback: fallback.display().to_string(),
    })
}

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped, an
/// `export ` prefix is allowed and matching outer quotes are stripped.
pub fn parse(content: &str) -> Result<Vec<(String, String)>> {
    let key_pattern =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").map_err(|e| TaskError::Config(e.to_string()))?;

    let mut vars = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let (key, value) = line.split_once('=').ok_or_else(|| {
            TaskError::Config(format!("line {}: expected KEY=VALUE", index + 1))
        })?;
        let key = key.trim();
        if !key_pattern.is_match(key) {
            return Err(TaskError::Config(format!(
                "line {}: invalid variable name '{}'",
                index + 1,
                key
            )));
        }

        vars.push((key.to_string(), unquote(value.trim()).to_string()));
    }
    Ok(vars)
}

/// Read and parse an environment file
pub fn load(path: &Path) -> Result<Vec<(String, String)>> {
    let content = fs::read_to_string(path)?;
    parse(&content).map_err(|e| match e {
        TaskError::Config(msg) => TaskError::Config(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
