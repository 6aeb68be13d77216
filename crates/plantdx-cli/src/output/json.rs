//! JSON output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use plantdx_core::{DiagnosisRecord, ResultOutput};

/// JSON Lines output adapter.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes a batch of records as a JSON array.
    pub fn write_array(&self, records: &[DiagnosisRecord], pretty: bool) -> io::Result<()> {
        let json = if pretty {
            serde_json::to_string_pretty(records)?
        } else {
            serde_json::to_string(records)?
        };
        self.write_line(&json)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::other(format!("Lock poisoned: {e}")))?;
        writeln!(writer, "{line}")
    }
}

impl ResultOutput for JsonOutput {
    fn write(&self, record: &DiagnosisRecord) -> io::Result<()> {
        let json = serde_json::to_string(record)?;
        self.write_line(&json)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::other(format!("Lock poisoned: {e}")))?;
        writer.flush()
    }
}
