//! Per-request result types.

use serde::{Deserialize, Serialize};

use super::TreatmentKind;
use crate::recommend::Recommendation;

/// A decoded leaf photo ready for diagnosis.
#[derive(Debug, Clone)]
pub struct LeafImage {
    /// Where the image came from (file path or synthetic name).
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded image data.
    pub image: image::DynamicImage,
}

impl LeafImage {
    /// Wraps a decoded image, reading its dimensions.
    #[must_use]
    pub fn new(path: impl Into<String>, image: image::DynamicImage) -> Self {
        Self {
            path: path.into(),
            width: image.width(),
            height: image.height(),
            image,
        }
    }

    /// Returns the image dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }
}

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates a new dimensions value.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Outcome of one forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class label, always a member of the class table used.
    pub label: String,
    /// Index of the label in the class table.
    pub index: usize,
    /// Score of the predicted class (the maximum of `scores`).
    pub confidence: f32,
    /// Full per-class score vector in class table order.
    pub scores: Vec<f32>,
    /// Wall-clock time of preprocessing plus forward pass, in milliseconds.
    pub inference_ms: f64,
}

impl Prediction {
    /// Returns true if the label is the given class name.
    #[must_use]
    pub fn is(&self, label: &str) -> bool {
        self.label == label
    }
}

/// Everything produced for one leaf image.
#[derive(Debug, Clone)]
pub struct Diagnosis {
    /// Model output.
    pub prediction: Prediction,
    /// Treatment kind the advice was looked up for.
    pub treatment: TreatmentKind,
    /// Advice for the predicted label, if the table has an entry.
    pub recommendation: Option<Recommendation>,
    /// PNG-encoded QR code of the product URL.
    pub qr_png: Option<Vec<u8>>,
    /// One-page PDF report.
    pub report_pdf: Option<Vec<u8>>,
    /// User-facing messages about degraded output (missing advice, bad URL).
    pub notices: Vec<String>,
}

/// Serializable summary of one diagnosed image.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisRecord {
    /// Path to the diagnosed image.
    pub path: String,
    /// Timestamp of the diagnosis (RFC 3339).
    pub timestamp: String,
    /// Image dimensions.
    pub dimensions: ImageDimensions,
    /// Predicted label.
    pub label: String,
    /// Score of the predicted label.
    pub confidence: f32,
    /// Full score vector in class table order.
    pub scores: Vec<f32>,
    /// Preprocessing plus forward pass time in milliseconds.
    pub inference_ms: f64,
    /// Treatment kind used for the lookup.
    pub treatment: TreatmentKind,
    /// Advice, if the table had an entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    /// Where the QR code PNG was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_path: Option<String>,
    /// Where the PDF report was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
    /// Messages about degraded output.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

impl DiagnosisRecord {
    /// Builds a record from a diagnosis; artifact paths start empty.
    #[must_use]
    pub fn new(leaf: &LeafImage, diagnosis: &Diagnosis, timestamp: impl Into<String>) -> Self {
        Self {
            path: leaf.path.clone(),
            timestamp: timestamp.into(),
            dimensions: leaf.dimensions(),
            label: diagnosis.prediction.label.clone(),
            confidence: diagnosis.prediction.confidence,
            scores: diagnosis.prediction.scores.clone(),
            inference_ms: diagnosis.prediction.inference_ms,
            treatment: diagnosis.treatment,
            recommendation: diagnosis.recommendation.clone(),
            qr_path: None,
            report_path: None,
            notices: diagnosis.notices.clone(),
        }
    }
}
