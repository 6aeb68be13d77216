//! The seam between the pipeline and a loaded model.

use std::fmt;

use candle_core::Tensor;
use serde::Serialize;

use crate::error::Result;

/// Shape and element type of a model input or output slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TensorSpec {
    /// Concrete dimensions.
    pub shape: Vec<usize>,
    /// Element type name, e.g. `F32`.
    pub dtype: String,
}

impl TensorSpec {
    /// An NHWC float32 image input with batch size 1 and 3 channels.
    #[must_use]
    pub fn image_f32(height: usize, width: usize) -> Self {
        Self {
            shape: vec![1, height, width, 3],
            dtype: "F32".to_string(),
        }
    }

    /// A float32 score vector with a leading batch dimension.
    #[must_use]
    pub fn scores_f32(classes: usize) -> Self {
        Self {
            shape: vec![1, classes],
            dtype: "F32".to_string(),
        }
    }

    /// Returns `(height, width)` for a rank-4 NHWC shape.
    #[must_use]
    pub fn spatial_dims(&self) -> Option<(usize, usize)> {
        match self.shape.as_slice() {
            [_, h, w, _] => Some((*h, *w)),
            _ => None,
        }
    }

    /// Total number of elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }
}

impl fmt::Display for TensorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.shape, self.dtype)
    }
}

/// A loaded model ready to run forward passes.
///
/// Implementations are created once per process and their slot
/// descriptions never change. `invoke` takes `&self` and may be called
/// repeatedly; backends that reuse buffers between calls keep them
/// thread-confined, so the trait does not require `Sync`.
pub trait Interpreter {
    /// Describes the single input slot.
    fn input_spec(&self) -> &TensorSpec;

    /// Describes the single output slot.
    fn output_spec(&self) -> &TensorSpec;

    /// Runs one forward pass and returns the flattened output scores.
    ///
    /// # Errors
    ///
    /// Returns `Error::Inference` if the input does not match
    /// `input_spec` or the backend fails.
    fn invoke(&self, input: &Tensor) -> Result<Vec<f32>>;
}
