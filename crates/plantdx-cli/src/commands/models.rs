//! Models command - inspect the classifier file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use plantdx_adapters::models::{model_fingerprint, resolve_model_path};
use plantdx_core::{load_model, Interpreter};

use crate::config::AppConfig;

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    /// Model file (overrides config and the default location)
    #[arg(long, value_name = "FILE", global = true)]
    pub model: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// Print the resolved model path
    Path,
    /// Load the model and print its tensor shapes and checksum
    Info,
}

/// Run the models command.
pub fn run(args: &ModelsArgs, config: &AppConfig) -> Result<()> {
    let path = resolve_model_path(args.model.as_deref(), config.model.path.as_deref());
    match args.command {
        ModelsCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ModelsCommand::Info => print_info(&path),
    }
}

fn print_info(path: &std::path::Path) -> Result<()> {
    let handle = load_model(path)?;
    let fingerprint = model_fingerprint(path)?;

    println!("Model:   {}", path.display());
    println!("Input:   {}", handle.input_spec());
    println!("Output:  {}", handle.output_spec());
    println!("SHA-256: {fingerprint}");
    Ok(())
}
