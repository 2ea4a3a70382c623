//! Taskwright CLI - operator commands for a Python web service project

use clap::Parser;
use taskwright::cli::{Args, SubCommand};
use taskwright::tasks::{clean, container, launch, provision, quality, settings};
use taskwright::{format_output, DryRunner, OutputFormat, ProcessRunner, ProjectConfig, SystemRunner, TaskContext};

fn main() {
    let args = Args::parse();

    if let Err(e) = taskwright::logging::init(args.verbose) {
        eprintln!("Warning: {}", e);
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(args: Args) -> taskwright::Result<()> {
    let stage = match &args.command {
        SubCommand::DockerRun { stage } => Some(stage.as_str()),
        _ => None,
    };
    let config = ProjectConfig::from_args(&args, stage)?;
    let output_format = if args.json { OutputFormat::Json } else { OutputFormat::Human };

    let mut system = SystemRunner::new();
    let mut dry = DryRunner::new();
    let runner: &mut dyn ProcessRunner = if args.dry_run { &mut dry } else { &mut system };

    let mut ctx = TaskContext::new(args.command.name(), config, runner);
    let result = match args.command {
        SubCommand::Install { prod } => provision::install(&mut ctx, prod),
        SubCommand::Run => launch::run(&mut ctx),
        SubCommand::Shell => launch::shell(&mut ctx),
        SubCommand::Format => quality::format(&mut ctx),
        SubCommand::Lint => quality::lint(&mut ctx),
        SubCommand::Typecheck => quality::typecheck(&mut ctx),
        SubCommand::Check => quality::check(&mut ctx),
        SubCommand::DockerRun { .. } => container::docker_run(&mut ctx),
        SubCommand::Dockerfile { write } => container::dockerfile(&mut ctx, write),
        SubCommand::Env => settings::show(&mut ctx),
        SubCommand::Clean => clean::clean(&mut ctx),
    };

    let report = ctx.finish(&result);
    println!("{}", format_output(&report, &output_format));
    result
}
