//! Test support utilities for plantdx.
//!
//! Provides synthetic leaf images, scripted interpreters, mock ports and
//! tiny tflite fixtures for testing the diagnosis pipeline.
//!
//! # Example
//!
//! ```
//! use plantdx_test_support::{FixedScoresInterpreter, SyntheticLeafBuilder};
//!
//! let leaf = SyntheticLeafBuilder::solid_rgba(512, 512, [0, 255, 0, 255]);
//! let handle = FixedScoresInterpreter::new(vec![0.0, 0.0, 0.0, 0.0, 1.0]);
//!
//! let prediction = plantdx_core::predict(&leaf.image, &plantdx_core::CLASS_NAMES, &handle)
//!     .unwrap();
//! assert_eq!(prediction.label, "Spot");
//! ```

mod builders;
mod mocks;
mod models;

pub use builders::SyntheticLeafBuilder;
pub use mocks::{
    FixedScoresInterpreter, FnInterpreter, MockImageSource, MockProgressSink, MockResultOutput,
};
pub use models::{write_channel_sum_model, write_rgb_classifier};
