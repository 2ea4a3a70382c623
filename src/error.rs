//! Error types for Taskwright

use thiserror::Error;

/// Exit code used when the isolated environment has not been provisioned
pub const EXIT_ENV_MISSING: i32 = 2;

/// Exit code used when a prerequisite tool is not installed (shell convention)
pub const EXIT_TOOL_MISSING: i32 = 127;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Required tool '{0}' was not found on PATH. Install it and try again")]
    ToolMissing(String),

    #[error("No isolated environment found for this project. Run `taskwright install` first")]
    EnvironmentMissing,

    #[error("Step '{step}' failed with exit code {code}")]
    ToolFailed { step: String, code: i32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No environment file found for '{env}' and no dev.env fallback at {fallback}")]
    EnvFileNotFound { env: String, fallback: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TaskError {
    /// Process exit code to report for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskError::ToolMissing(_) => EXIT_TOOL_MISSING,
            TaskError::EnvironmentMissing => EXIT_ENV_MISSING,
            TaskError::ToolFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;
