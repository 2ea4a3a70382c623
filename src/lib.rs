//! Taskwright - provision, run, check and containerize a Python web service
//!
//! Each task is a short, ordered sequence of external tool invocations
//! (pyenv, pipenv, isort, black, flake8, mypy, uvicorn, docker) whose outcome
//! is collected into a [`TaskReport`].
//!
//! # Example
//!
//! ```no_run
//! use taskwright::{format_output, OutputFormat, ProjectConfig, SystemRunner, TaskContext};
//! use taskwright::tasks::quality;
//!
//! let mut runner = SystemRunner::new();
//! let mut ctx = TaskContext::new("lint", ProjectConfig::new("."), &mut runner);
//! let result = quality::lint(&mut ctx);
//! let report = ctx.finish(&result);
//! println!("{}", format_output(&report, &OutputFormat::Human));
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod image;
pub mod logging;
pub mod output;
pub mod process;
pub mod tasks;

pub use config::{ProjectConfig, Stage};
pub use error::{Result, TaskError};
pub use output::{format_output, OutputFormat};
pub use process::{DryRunner, ProcessRunner, SystemRunner, ToolCommand};
pub use tasks::{StepStatus, TaskContext, TaskReport};
