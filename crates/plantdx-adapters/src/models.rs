//! Model file location and fingerprinting.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

/// File name of the bundled 5-class leaf classifier.
pub const DEFAULT_MODEL_FILENAME: &str = "plant_model_5_class.tflite";

/// Returns the models directory path.
///
/// Uses `XDG_DATA_HOME/plantdx/models` or `~/.local/share/plantdx/models`.
#[must_use]
pub fn models_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plantdx")
        .join("models")
}

/// Returns the default model path inside [`models_dir`].
#[must_use]
pub fn default_model_path() -> PathBuf {
    models_dir().join(DEFAULT_MODEL_FILENAME)
}

/// Picks the model path: CLI override, then config, then the default.
#[must_use]
pub fn resolve_model_path(cli: Option<&Path>, config: Option<&Path>) -> PathBuf {
    let path = cli
        .or(config)
        .map_or_else(default_model_path, Path::to_path_buf);
    debug!("Using model path {}", path.display());
    path
}

/// Computes the hex SHA-256 of a model file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn model_fingerprint(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open model file: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read model file: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
