//! Result output port for writing diagnosis records.

use crate::domain::DiagnosisRecord;

/// Port for outputting diagnosis records.
pub trait ResultOutput: Send + Sync {
    /// Writes a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, record: &DiagnosisRecord) -> std::io::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> std::io::Result<()>;
}
