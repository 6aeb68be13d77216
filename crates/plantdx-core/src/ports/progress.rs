//! Progress reporting port.

use crate::domain::DiagnosisRecord;

/// Events emitted while diagnosing a set of images.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Diagnosis started for an image.
    Started {
        /// Path to the image.
        path: String,
        /// Index in the run (0-based).
        index: usize,
        /// Total images in the run, if known.
        total: Option<usize>,
    },
    /// Diagnosis completed for an image.
    Completed {
        /// The diagnosis record.
        record: DiagnosisRecord,
    },
    /// An image was skipped due to an error.
    Skipped {
        /// Path to the image.
        path: String,
        /// Reason for skipping.
        reason: String,
    },
    /// All images have been processed.
    Finished {
        /// Images diagnosed successfully.
        processed: usize,
        /// Images skipped.
        skipped: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
