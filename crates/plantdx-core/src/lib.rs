//! plantdx core - leaf disease diagnosis
//!
//! This crate contains the domain types, the image preprocessing and
//! inference pipeline, the recommendation table, and the QR/PDF report
//! renderers. It performs no filesystem writes.

pub mod domain;
pub mod error;
pub mod inference;
pub mod pipeline;
pub mod ports;
pub mod recommend;
pub mod report;

pub use domain::{
    default_class_names, Diagnosis, DiagnosisRecord, ImageDimensions, LeafImage, Prediction,
    TreatmentKind, CLASS_NAMES, HEALTHY_LABEL,
};
pub use error::{Error, Result};
pub use inference::{load_model, predict, preprocess, Interpreter, TensorSpec, TfliteInterpreter};
pub use pipeline::{diagnose, DiagnoseOptions};
pub use ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};
pub use recommend::{Recommendation, RecommendationTable};
pub use report::{render_qr, render_report, QrOptions};
