//! plantdx CLI - leaf photo disease diagnosis with treatment reports.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{diagnose::DiagnoseArgs, Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    if let Err(e) = cli.check_leading_options() {
        e.exit();
    }

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Diagnose(args)) => run_diagnose(args, &config),
        Some(Commands::Advice(ref args)) => report(commands::advice::run(args, &config)),
        Some(Commands::Models(ref args)) => report(commands::models::run(args, &config)),
        None => {
            // Default behavior: run diagnose with flattened args
            if cli.diagnose.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            run_diagnose(cli.diagnose, &config)
        }
    };

    exit_code.into()
}

fn run_diagnose(args: DiagnoseArgs, config: &AppConfig) -> ExitCode {
    let args = DiagnoseArgs::with_config(args, config);
    match commands::diagnose::run(&args) {
        Ok(result) => result.exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}

fn report(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
