//! Advice command - print the recommendation for a label without a photo.

use anyhow::Result;
use clap::Args;
use plantdx_core::recommend::NOT_FOUND_MESSAGE;
use plantdx_core::{Error, RecommendationTable, TreatmentKind};

use super::diagnose::parse_treatment;
use crate::config::AppConfig;

/// Arguments for the advice command
#[derive(Args)]
pub struct AdviceArgs {
    /// Disease label, e.g. Rust or Powdery
    pub label: String,

    /// Treatment kind (organic or chemical)
    #[arg(short, long, value_parser = parse_treatment)]
    pub treatment: Option<TreatmentKind>,
}

/// Run the advice command.
///
/// A missing recommendation is not an error: the fallback message is printed.
pub fn run(args: &AdviceArgs, config: &AppConfig) -> Result<()> {
    let kind = args
        .treatment
        .or_else(|| config.treatment_kind())
        .unwrap_or_default();
    let table = RecommendationTable::builtin();

    println!("{}", render(&table, &args.label, kind)?);
    Ok(())
}

fn render(table: &RecommendationTable, label: &str, kind: TreatmentKind) -> Result<String> {
    match table.resolve(label, kind) {
        Ok(rec) => Ok(format!(
            "{label} ({kind})\n{}\n\nProduct URL: {}",
            rec.text, rec.url
        )),
        Err(Error::NotFound { .. }) => Ok(NOT_FOUND_MESSAGE.to_string()),
        Err(e) => Err(e.into()),
    }
}
