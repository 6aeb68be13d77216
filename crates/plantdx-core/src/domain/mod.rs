//! Core domain types for leaf diagnosis.

mod labels;
mod result;
mod treatment;

pub use labels::{default_class_names, CLASS_NAMES, HEALTHY_LABEL};
pub use result::{Diagnosis, DiagnosisRecord, ImageDimensions, LeafImage, Prediction};
pub use treatment::TreatmentKind;
