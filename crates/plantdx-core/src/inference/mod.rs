//! Leaf classifier inference.
//!
//! Provides:
//! - fixed image preprocessing into an NHWC float tensor
//! - the `Interpreter` seam over a loaded model
//! - a tflite loader backed by tract
//! - the prediction runner (argmax over the score vector)

mod interpreter;
mod loader;
mod preprocess;
mod runner;

pub use interpreter::{Interpreter, TensorSpec};
pub use loader::{load_model, TfliteInterpreter};
pub use preprocess::{
    decode_image, preprocess, preprocess_default, INPUT_HEIGHT, INPUT_WIDTH, RESAMPLE_FILTER,
};
pub use runner::{argmax, predict};
