//! Diagnose command - classify leaf photos and write treatment reports.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use plantdx_adapters::{resolve_model_path, FsImageSource};
use plantdx_core::{
    default_class_names, diagnose, load_model, DiagnoseOptions, Diagnosis, DiagnosisRecord,
    ImageSource, Interpreter, ProgressEvent, ProgressSink, QrOptions, RecommendationTable,
    ResultOutput, TreatmentKind, HEALTHY_LABEL,
};
use tracing::{debug, info};

use super::ExitCode;
use crate::config::{AppConfig, MAX_QR_SIZE, MIN_QR_SIZE};
use crate::output::{JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Hardcoded default values.
mod defaults {
    pub const QR_SIZE: u32 = 150;
}

/// File name used for the report when an image path has no usable stem.
const FALLBACK_REPORT_NAME: &str = "plant_disease_report.pdf";
/// File name used for the QR code when an image path has no usable stem.
const FALLBACK_QR_NAME: &str = "plant_disease_qr.png";

/// Parse a treatment kind, case-insensitively.
pub fn parse_treatment(s: &str) -> Result<TreatmentKind, String> {
    s.parse()
}

/// Parse and validate a QR code size in pixels.
fn parse_qr_size(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid pixel size"))?;
    if (MIN_QR_SIZE..=MAX_QR_SIZE).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in {MIN_QR_SIZE}..={MAX_QR_SIZE}"))
    }
}

/// Shared arguments for leaf diagnosis.
#[derive(Args, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DiagnoseArgs {
    /// Leaf photos (.jpg, .jpeg, .png) or directories of them
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Treatment kind for recommendations (organic or chemical)
    #[arg(short, long, value_parser = parse_treatment)]
    pub treatment: Option<TreatmentKind>,

    /// Model file (overrides config and the default location). Subcommands
    /// take their own --model after the subcommand name
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Directory for QR code and PDF report files
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Do not write QR code and PDF report files
    #[arg(long)]
    pub no_report: bool,

    /// Minimum QR code edge in pixels
    #[arg(long, value_parser = parse_qr_size)]
    pub qr_size: Option<u32>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Class labels in model output order (from config only).
    #[arg(skip)]
    labels: Option<Vec<String>>,
}

impl DiagnoseArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        args.treatment = args.treatment.or_else(|| config.treatment_kind());

        if args.model.is_none() {
            args.model.clone_from(&config.model.path);
        }
        args.labels.clone_from(&config.model.labels);

        // CLI --no-report wins; otherwise config may disable reports
        if !args.no_report {
            if let Some(enabled) = config.report.enabled {
                args.no_report = !enabled;
            }
        }
        args.qr_size = args.qr_size.or(config.report.qr_size);
        if args.out_dir.is_none() {
            args.out_dir.clone_from(&config.report.out_dir);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args
    }

    /// Get treatment kind with fallback to organic.
    fn treatment(&self) -> TreatmentKind {
        self.treatment.unwrap_or_default()
    }

    /// Get QR size with fallback to hardcoded default.
    fn qr_size(&self) -> u32 {
        self.qr_size.unwrap_or(defaults::QR_SIZE)
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Get the artifact directory with fallback to the working directory.
    fn out_dir(&self) -> PathBuf {
        self.out_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Whether any option or path was given on the command line.
    pub fn has_options(&self) -> bool {
        !self.paths.is_empty()
            || self.recursive
            || self.treatment.is_some()
            || self.model.is_some()
            || self.out_dir.is_some()
            || self.no_report
            || self.qr_size.is_some()
            || self.progress
            || self.quiet
            || self.format.is_some()
            || self.pretty
    }

    /// Get the class table with fallback to the bundled model's labels.
    fn class_names(&self) -> Vec<String> {
        self.labels.clone().unwrap_or_else(default_class_names)
    }

    fn options(&self) -> DiagnoseOptions {
        DiagnoseOptions {
            render_artifacts: !self.no_report,
            qr: QrOptions {
                min_size: self.qr_size(),
            },
        }
    }
}

/// Result of running the diagnose command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct DiagnoseResult {
    /// Number of images diagnosed.
    pub processed: usize,
    /// Number of images skipped.
    pub skipped: usize,
    /// Number of images with a non-healthy label.
    pub diseased: usize,
    /// Records held back for `--format json`.
    pub records: Vec<DiagnosisRecord>,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the diagnose command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
///
/// # Errors
///
/// Fails if no paths are given, the model cannot be loaded, or output and
/// artifact files cannot be written.
pub fn run(args: &DiagnoseArgs) -> Result<DiagnoseResult> {
    info!("Running diagnose command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let model_path = resolve_model_path(args.model.as_deref(), None);
    let handle = load_model(&model_path).with_context(|| {
        format!(
            "Cannot diagnose without a model. Place the classifier at {} or pass --model",
            model_path.display()
        )
    })?;

    let class_names = args.class_names();
    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);
    let output = JsonOutput::stdout();

    let result = process_images(&source, &handle, &class_names, &output, &progress_bar, args)?;

    if args.format() == OutputFormat::Json {
        output.write_array(&result.records, args.pretty)?;
    }
    output.flush()?;

    Ok(result)
}

/// Fails when the model's score vector and the class table disagree.
///
/// Every forward pass would be rejected otherwise, so the run stops
/// before touching any image.
fn check_class_table(handle: &dyn Interpreter, class_names: &[String]) -> Result<()> {
    let outputs = handle.output_spec().element_count();
    if outputs != class_names.len() {
        anyhow::bail!(
            "Model has {outputs} outputs but {} class labels are configured. \
             Set [model] labels in the config to match the model",
            class_names.len()
        );
    }
    Ok(())
}

/// Diagnose every image from `source`, writing records and artifacts.
fn process_images(
    source: &dyn ImageSource,
    handle: &dyn Interpreter,
    class_names: &[String],
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
    args: &DiagnoseArgs,
) -> Result<DiagnoseResult> {
    check_class_table(handle, class_names)?;

    let table = RecommendationTable::builtin();
    let options = args.options();
    let treatment = args.treatment();
    let out_dir = args.out_dir();

    let total = source.count_hint();
    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut diseased = 0usize;
    let mut records = Vec::new();

    for (index, image_result) in source.images().enumerate() {
        let leaf = match image_result {
            Ok(leaf) => leaf,
            Err(e) => {
                // The decode message already names the file
                progress.on_event(ProgressEvent::Skipped {
                    path: format!("image {index}"),
                    reason: e.to_string(),
                });
                skipped += 1;
                continue;
            }
        };

        progress.on_event(ProgressEvent::Started {
            path: leaf.path.clone(),
            index,
            total,
        });

        let diagnosis = match diagnose(&leaf, treatment, class_names, handle, &table, &options) {
            Ok(d) => d,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                progress.on_event(ProgressEvent::Skipped {
                    path: leaf.path.clone(),
                    reason: e.to_string(),
                });
                skipped += 1;
                continue;
            }
        };

        let mut record = DiagnosisRecord::new(&leaf, &diagnosis, iso_timestamp());
        (record.qr_path, record.report_path) = write_artifacts(&out_dir, &leaf.path, &diagnosis)?;

        if !diagnosis.prediction.is(HEALTHY_LABEL) {
            diseased += 1;
        }

        match args.format() {
            OutputFormat::Jsonl => output.write(&record)?,
            OutputFormat::Json => records.push(record.clone()),
        }
        progress.on_event(ProgressEvent::Completed { record });

        processed += 1;
    }

    progress.on_event(ProgressEvent::Finished { processed, skipped });

    let exit_code = if diseased > 0 {
        ExitCode::DiseaseFound
    } else {
        ExitCode::Success
    };

    Ok(DiagnoseResult {
        processed,
        skipped,
        diseased,
        records,
        exit_code,
    })
}

/// Writes the rendered QR code and report next to each other in `out_dir`.
///
/// Returns the written paths, `None` for artifacts that were not rendered.
fn write_artifacts(
    out_dir: &Path,
    image_path: &str,
    diagnosis: &Diagnosis,
) -> Result<(Option<String>, Option<String>)> {
    if diagnosis.qr_png.is_none() && diagnosis.report_pdf.is_none() {
        return Ok((None, None));
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let stem = Path::new(image_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty());
    let (qr_name, report_name) = stem.map_or_else(
        || (FALLBACK_QR_NAME.to_string(), FALLBACK_REPORT_NAME.to_string()),
        |s| (format!("{s}.qr.png"), format!("{s}.report.pdf")),
    );

    let qr_path = diagnosis
        .qr_png
        .as_deref()
        .map(|bytes| write_file(&out_dir.join(qr_name), bytes))
        .transpose()?;
    let report_path = diagnosis
        .report_pdf
        .as_deref()
        .map(|bytes| write_file(&out_dir.join(report_name), bytes))
        .transpose()?;

    Ok((qr_path, report_path))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<String> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(path.display().to_string())
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
