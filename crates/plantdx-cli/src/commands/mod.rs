//! CLI command definitions and handlers.

pub mod advice;
pub mod diagnose;
pub mod models;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

/// plantdx - Plant leaf disease diagnosis and treatment advice
#[derive(Parser)]
#[command(name = "plantdx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared diagnose arguments (paths, treatment, report flags).
    #[command(flatten)]
    pub diagnose: diagnose::DiagnoseArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Rejects diagnose options given before a subcommand.
    ///
    /// They belong to the implicit diagnose run and would otherwise be
    /// dropped silently, e.g. `plantdx --model X models info`.
    ///
    /// # Errors
    ///
    /// Returns a clap usage error naming the subcommand.
    pub fn check_leading_options(&self) -> Result<(), clap::Error> {
        match &self.command {
            Some(command) if self.diagnose.has_options() => Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                format!(
                    "options before `{}` are not passed to it; put them after the subcommand",
                    command.name()
                ),
            )),
            _ => Ok(()),
        }
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Diagnose leaf photos and write treatment reports
    Diagnose(diagnose::DiagnoseArgs),
    /// Print the treatment recommendation for a disease label
    Advice(advice::AdviceArgs),
    /// Inspect the classifier model
    Models(models::ModelsArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Diagnose(_) => "diagnose",
            Self::Advice(_) => "advice",
            Self::Models(_) => "models",
        }
    }
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every leaf was diagnosed healthy (or nothing to do).
    Success = 0,
    /// At least one leaf has a disease label.
    DiseaseFound = 1,
    /// Invalid usage, fatal model load failure, or I/O error.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_model_rejected_for_models() {
        let cli = Cli::try_parse_from(["plantdx", "--model", "a.tflite", "models", "info"]).unwrap();
        let err = cli.check_leading_options().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert!(err.to_string().contains("`models`"));
    }

    #[test]
    fn test_model_after_subcommand_accepted() {
        let cli = Cli::try_parse_from(["plantdx", "models", "info", "--model", "a.tflite"]).unwrap();
        assert!(cli.check_leading_options().is_ok());
    }

    #[test]
    fn test_verbose_before_subcommand_accepted() {
        let cli = Cli::try_parse_from(["plantdx", "-v", "advice", "Rust"]).unwrap();
        assert!(cli.check_leading_options().is_ok());
    }

    #[test]
    fn test_implicit_diagnose_keeps_options() {
        let cli = Cli::try_parse_from(["plantdx", "--model", "a.tflite", "leaf.png"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.check_leading_options().is_ok());
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success as u8, 0);
        assert_eq!(ExitCode::DiseaseFound as u8, 1);
        assert_eq!(ExitCode::Error as u8, 2);
    }
}
