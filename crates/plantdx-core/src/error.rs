//! Error type shared by every stage of the diagnosis pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::TreatmentKind;

/// Errors raised while loading the model or diagnosing a leaf image.
#[derive(Error, Debug)]
pub enum Error {
    /// The model file is missing, corrupt, or not a compatible graph.
    ///
    /// Fatal: no prediction can run without a loaded model.
    #[error("failed to load model {}: {reason}", path.display())]
    ModelLoad {
        /// Path the model was loaded from.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// The input could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    /// Tensor construction or the forward pass failed, or the class table
    /// does not match the model output.
    #[error("inference failed: {0}")]
    Inference(String),

    /// No recommendation exists for the label and treatment kind.
    #[error("no {kind} recommendation for '{label}'")]
    NotFound {
        /// Predicted label that was looked up.
        label: String,
        /// Requested treatment kind.
        kind: TreatmentKind,
    },

    /// The product URL is empty or not an absolute http(s) URL.
    #[error("invalid product URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// QR or PDF encoding failed.
    #[error("report rendering failed: {0}")]
    Report(String),
}

impl Error {
    /// Returns true for errors that should abort the process rather than
    /// a single request.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ModelLoad { .. })
    }

    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::ImageDecode(err.to_string())
    }
}

impl From<candle_core::Error> for Error {
    fn from(err: candle_core::Error) -> Self {
        Self::Inference(err.to_string())
    }
}

/// Result alias for plantdx operations.
pub type Result<T> = std::result::Result<T, Error>;
