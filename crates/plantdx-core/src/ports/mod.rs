//! Ports between the diagnosis core and the outside world.
//!
//! Adapters implement these to feed images in and get records and progress out.

mod image_source;
mod progress;
mod result_output;

pub use image_source::ImageSource;
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
