//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_APP_NAME, DEFAULT_ENV, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "taskwright")]
#[command(author, version, about = "Provision, run, check and containerize a Python web service", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub project_dir: Option<PathBuf>,

    /// Show the external commands without executing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output the task report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Environment selector forwarded to the application
    #[arg(long = "env", global = true, env = "ENV", default_value = DEFAULT_ENV)]
    pub env: String,

    /// Application name, also used as image and container name
    #[arg(long, global = true, env = "APP_NAME", default_value = DEFAULT_APP_NAME)]
    pub app_name: String,

    /// Port the web server listens on
    #[arg(long, global = true, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Provision the pinned runtime and the project-local environment
    Install {
        /// Install only the locked production dependencies (deploy mode)
        #[arg(long)]
        prod: bool,
    },

    /// Start the development server with auto-reload
    Run,

    /// Sort imports and format the source directory in place
    Format,

    /// Lint the source directory
    Lint,

    /// Type-check the source directory
    Typecheck,

    /// Run format, lint and typecheck, stopping at the first failure
    Check,

    /// Open a shell inside the project environment
    Shell,

    /// Rebuild the image and (re)start the single named container
    DockerRun {
        /// Build stage (development or production)
        #[arg(long, env = "TARGET", default_value = "development")]
        stage: String,
    },

    /// Print the container image definition, or write it to a file
    Dockerfile {
        /// Write to PATH instead of stdout (defaults to <project>/Dockerfile)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        write: Option<Option<PathBuf>>,
    },

    /// Show which environment file the selected ENV resolves to
    Env,

    /// Remove caches, the local environment and the running container
    Clean,
}

impl SubCommand {
    /// Task name as exposed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            SubCommand::Install { .. } => "install",
            SubCommand::Run => "run",
            SubCommand::Format => "format",
            SubCommand::Lint => "lint",
            SubCommand::Typecheck => "typecheck",
            SubCommand::Check => "check",
            SubCommand::Shell => "shell",
            SubCommand::DockerRun { .. } => "docker-run",
            SubCommand::Dockerfile { .. } => "dockerfile",
            SubCommand::Env => "env",
            SubCommand::Clean => "clean",
        }
    }
}
