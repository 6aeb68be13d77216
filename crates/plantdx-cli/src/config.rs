//! Configuration file support for plantdx.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/plantdx/config.toml` (lowest priority)
//! - Project-local: `.plantdx.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use plantdx_core::TreatmentKind;
use serde::Deserialize;
use tracing::{debug, info};

/// Smallest QR code edge accepted from config or flags.
pub const MIN_QR_SIZE: u32 = 21;
/// Largest QR code edge accepted from config or flags.
pub const MAX_QR_SIZE: u32 = 2048;

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Model settings.
    pub model: ModelConfig,
    /// Treatment defaults.
    pub treatment: TreatmentConfig,
    /// QR code and PDF report settings.
    pub report: ReportConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the `.tflite` classifier.
    pub path: Option<PathBuf>,
    /// Class labels in model output order.
    pub labels: Option<Vec<String>>,
}

/// Treatment configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct TreatmentConfig {
    /// Default treatment kind: "organic" or "chemical".
    pub kind: Option<String>,
}

/// Report artifact configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Write QR code and PDF report files.
    pub enabled: Option<bool>,
    /// Minimum QR code edge in pixels.
    pub qr_size: Option<u32>,
    /// Directory for written artifacts.
    pub out_dir: Option<PathBuf>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/plantdx/config.toml`
    /// 2. Project-local: `.plantdx.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Returns the configured treatment kind, if it parses.
    pub fn treatment_kind(&self) -> Option<TreatmentKind> {
        self.treatment.kind.as_deref().and_then(|k| k.parse().ok())
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref kind) = self.treatment.kind {
            kind.parse::<TreatmentKind>()
                .map_err(|e| format!("treatment.kind: {e}"))?;
        }

        if let Some(size) = self.report.qr_size {
            if !(MIN_QR_SIZE..=MAX_QR_SIZE).contains(&size) {
                return Err(format!(
                    "report.qr_size must be {MIN_QR_SIZE}-{MAX_QR_SIZE}, got {size}"
                ));
            }
        }

        if let Some(ref labels) = self.model.labels {
            if labels.is_empty() {
                return Err("model.labels must not be empty".to_string());
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        self.model.path = other.model.path.or_else(|| self.model.path.take());
        self.model.labels = other.model.labels.or_else(|| self.model.labels.take());

        self.treatment.kind = other.treatment.kind.or_else(|| self.treatment.kind.take());

        self.report.enabled = other.report.enabled.or(self.report.enabled);
        self.report.qr_size = other.report.qr_size.or(self.report.qr_size);
        self.report.out_dir = other.report.out_dir.or_else(|| self.report.out_dir.take());

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("plantdx").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.plantdx.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".plantdx.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.model.path.is_none());
        assert!(config.treatment.kind.is_none());
        assert!(config.report.enabled.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r"
[general]
recursive = true

[model]
path = '/opt/models/leaf.tflite'
labels = ['Healthy', 'Blight']

[treatment]
kind = 'chemical'

[report]
enabled = false
qr_size = 300
out_dir = 'reports'

[output]
format = 'json'
pretty = true
progress = false
";
        let config: AppConfig = toml::from_str(toml).expect("parse full config");

        assert_eq!(config.general.recursive, Some(true));
        assert_eq!(
            config.model.path,
            Some(PathBuf::from("/opt/models/leaf.tflite"))
        );
        assert_eq!(
            config.model.labels,
            Some(vec!["Healthy".to_string(), "Blight".to_string()])
        );
        assert_eq!(config.treatment_kind(), Some(TreatmentKind::Chemical));
        assert_eq!(config.report.enabled, Some(false));
        assert_eq!(config.report.qr_size, Some(300));
        assert_eq!(config.report.out_dir, Some(PathBuf::from("reports")));
        assert_eq!(config.output.format, Some("json".to_string()));
        assert_eq!(config.output.pretty, Some(true));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_configs() {
        let mut base: AppConfig = toml::from_str(
            r"
[treatment]
kind = 'organic'

[report]
qr_size = 200
out_dir = 'base'
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[treatment]
kind = 'chemical'

[model]
path = 'project.tflite'
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.treatment_kind(), Some(TreatmentKind::Chemical));
        assert_eq!(base.model.path, Some(PathBuf::from("project.tflite")));
        assert_eq!(base.report.qr_size, Some(200));
        assert_eq!(base.report.out_dir, Some(PathBuf::from("base")));
    }

    #[test]
    fn test_merge_empty_override_preserves_base() {
        let mut base: AppConfig = toml::from_str(
            r"
[output]
format = 'jsonl'
pretty = true
",
        )
        .expect("parse base");

        base.merge(AppConfig::default());

        assert_eq!(base.output.format, Some("jsonl".to_string()));
        assert_eq!(base.output.pretty, Some(true));
    }

    #[test]
    fn test_treatment_kind_is_case_insensitive() {
        let config: AppConfig = toml::from_str("[treatment]\nkind = 'Chemical'\n").unwrap();
        assert_eq!(config.treatment_kind(), Some(TreatmentKind::Chemical));
    }

    #[test]
    fn test_invalid_toml_syntax_handled() {
        let toml = r"
[report
qr_size = 100
";
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "invalid TOML should return error");
    }

    #[test]
    fn test_invalid_field_type_handled() {
        let toml = r#"
[report]
qr_size = "large"
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "type mismatch should return error");
    }

    #[test]
    fn test_validate_unknown_treatment() {
        let mut config = AppConfig::default();
        config.treatment.kind = Some("biological".to_string());

        let err = config.validate().unwrap_err();
        assert!(err.contains("treatment.kind"));
        assert!(config.treatment_kind().is_none());
    }

    #[test]
    fn test_validate_qr_size_out_of_range() {
        let mut config = AppConfig::default();
        config.report.qr_size = Some(5);
        assert!(config.validate().unwrap_err().contains("report.qr_size"));

        config.report.qr_size = Some(10_000);
        assert!(config.validate().unwrap_err().contains("report.qr_size"));
    }

    #[test]
    fn test_validate_empty_labels() {
        let mut config = AppConfig::default();
        config.model.labels = Some(Vec::new());
        assert!(config.validate().unwrap_err().contains("model.labels"));
    }

    #[test]
    fn test_validate_output_format_invalid() {
        let mut config = AppConfig::default();
        config.output.format = Some("xml".to_string());
        assert!(config.validate().unwrap_err().contains("output.format"));
    }

    #[test]
    fn test_find_config_in_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".plantdx.toml"), "").unwrap();

        assert_eq!(
            find_config_in_parents(&nested),
            Some(dir.path().join(".plantdx.toml"))
        );
    }
}
