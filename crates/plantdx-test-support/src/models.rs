//! Tiny tflite graphs for exercising the real model backend.

use std::fs::File;
use std::path::Path;

use tract_core::internal::AxisOp;
use tract_core::ops::nn::{Reduce, Reducer};
use tract_core::prelude::*;

/// Writes a graph that sums every channel over the spatial axes.
///
/// For an NHWC input `[1, H, W, C]` the output is `[1, C]`, so a solid
/// image whose channel `c` is 1.0 scores `H * W` for class `c` and zero
/// for the others. Only F32 `[1, H, W, 3]` inputs are accepted by the
/// loader; other shapes and datum types build invalid classifiers.
///
/// # Errors
///
/// Returns an error if the graph cannot be built or the file cannot be
/// written.
pub fn write_channel_sum_model(
    path: &Path,
    datum_type: DatumType,
    input_shape: [usize; 4],
) -> TractResult<()> {
    let mut model = TypedModel::default();
    let source = model.add_source("input", TypedFact::dt_shape(datum_type, input_shape))?;
    let sum = model.wire_node("sum", Reduce::new(tvec!(1, 2), Reducer::Sum), &[source])?;
    let sum = model.wire_node("squeeze_w", AxisOp::Rm(2), &sum)?;
    let sum = model.wire_node("squeeze_h", AxisOp::Rm(1), &sum)?;
    model.set_output_outlets(&sum)?;

    tract_tflite::tflite().write(&model, File::create(path)?)
}

/// Writes a valid 224x224 RGB classifier with three outputs.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_rgb_classifier(path: &Path) -> TractResult<()> {
    write_channel_sum_model(path, DatumType::F32, [1, 224, 224, 3])
}
