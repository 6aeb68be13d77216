//! Model loading for tflite flatbuffers using tract.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use candle_core::{CpuStorage, Storage, Tensor as CandleTensor};
use tract_core::internal::format_err;
use tract_core::prelude::*;
use tract_tflite::Tflite;
use tracing::{debug, info};

use super::{Interpreter, TensorSpec};
use crate::error::{Error, Result};

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;
type State = SimpleState<TypedFact, Box<dyn TypedOp>, TypedModel, Arc<Plan>>;

/// A tflite classifier compiled into a runnable tract plan.
///
/// Built once by [`load_model`]. The execution state and the input buffer
/// are allocated at load time and reused by every [`Interpreter::invoke`].
/// The handle is not `Sync`: calls on one handle never overlap.
pub struct TfliteInterpreter {
    path: PathBuf,
    input: TensorSpec,
    output: TensorSpec,
    session: RefCell<Session>,
}

/// Per-handle buffers reused across forward passes.
struct Session {
    state: State,
    buffer: Arc<Tensor>,
}

impl std::fmt::Debug for TfliteInterpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfliteInterpreter")
            .field("path", &self.path)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl TfliteInterpreter {
    /// Path the model was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Loads a tflite model and prepares it for inference.
///
/// # Arguments
///
/// * `path` - Path to the `.tflite` file
///
/// # Errors
///
/// Returns `Error::ModelLoad` if:
/// - The file does not exist or cannot be read
/// - The flatbuffer is invalid or uses unsupported operators
/// - The input is not a concrete NHWC float32 image with 3 channels
/// - The output shape is not concrete
pub fn load_model(path: impl AsRef<Path>) -> Result<TfliteInterpreter> {
    let path = path.as_ref();
    debug!("Loading tflite model from {}", path.display());

    if !path.is_file() {
        return Err(Error::model_load(path, "file not found"));
    }

    let model = Tflite::default()
        .model_for_path(path)
        .map_err(|e| Error::model_load(path, format!("{e:#}")))?;

    let input = input_spec(&model).map_err(|e| Error::model_load(path, format!("{e:#}")))?;
    let output = output_spec(&model).map_err(|e| Error::model_load(path, format!("{e:#}")))?;

    let plan = model
        .into_optimized()
        .and_then(|m| m.into_runnable())
        .map_err(|e| Error::model_load(path, format!("{e:#}")))?;
    let state = SimpleState::new(Arc::new(plan))
        .map_err(|e| Error::model_load(path, format!("{e:#}")))?;
    let buffer = Tensor::zero::<f32>(&input.shape)
        .map_err(|e| Error::model_load(path, format!("{e:#}")))?;

    info!(
        "Loaded model {} (input {input}, output {output})",
        path.display()
    );

    Ok(TfliteInterpreter {
        path: path.to_path_buf(),
        input,
        output,
        session: RefCell::new(Session {
            state,
            buffer: Arc::new(buffer),
        }),
    })
}

/// Reads and validates the input slot description.
fn input_spec(model: &TypedModel) -> TractResult<TensorSpec> {
    let fact = model.input_fact(0)?;
    let Some(shape) = fact.shape.as_concrete() else {
        return Err(format_err!("input shape {:?} is not concrete", fact.shape));
    };
    if shape.len() != 4 || shape[3] != 3 {
        return Err(format_err!("expected NHWC input with 3 channels, got {shape:?}"));
    }
    if fact.datum_type != DatumType::F32 {
        return Err(format_err!("expected F32 input, got {:?}", fact.datum_type));
    }
    Ok(TensorSpec {
        shape: shape.to_vec(),
        dtype: format!("{:?}", fact.datum_type),
    })
}

/// Reads the output slot description.
fn output_spec(model: &TypedModel) -> TractResult<TensorSpec> {
    let fact = model.output_fact(0)?;
    let Some(shape) = fact.shape.as_concrete() else {
        return Err(format_err!("output shape {:?} is not concrete", fact.shape));
    };
    Ok(TensorSpec {
        shape: shape.to_vec(),
        dtype: format!("{:?}", fact.datum_type),
    })
}

impl Interpreter for TfliteInterpreter {
    fn input_spec(&self) -> &TensorSpec {
        &self.input
    }

    fn output_spec(&self) -> &TensorSpec {
        &self.output
    }

    fn invoke(&self, input: &CandleTensor) -> Result<Vec<f32>> {
        let dims = input.dims();
        if dims != self.input.shape.as_slice() {
            return Err(Error::Inference(format!(
                "input tensor {dims:?} does not match model input {:?}",
                self.input.shape
            )));
        }

        let mut session = self
            .session
            .try_borrow_mut()
            .map_err(|_| Error::Inference("interpreter is already running".into()))?;
        let Session { state, buffer } = &mut *session;

        // Unshared after the previous run, so this writes in place
        copy_input(input, Arc::make_mut(buffer))?;

        let outputs = state.run(tvec!(TValue::Const(Arc::clone(buffer))));
        // The state keeps its input binding until the next run
        state.session_state.inputs.clear();
        let outputs = outputs.map_err(|e| {
            let _ = state.reset_turn();
            Error::Inference(format!("forward pass failed: {e:#}"))
        })?;

        let output = outputs
            .first()
            .ok_or_else(|| Error::Inference("model produced no outputs".into()))?;

        // Quantized outputs are dequantized by the cast
        let scores = output
            .cast_to::<f32>()
            .map_err(|e| Error::Inference(format!("{e:#}")))?;
        let scores = scores
            .as_slice::<f32>()
            .map_err(|e| Error::Inference(format!("{e:#}")))?;

        Ok(scores.to_vec())
    }
}

/// Copies a contiguous CPU f32 tensor into the model input buffer.
fn copy_input(src: &CandleTensor, dst: &mut Tensor) -> Result<()> {
    let (storage, layout) = src.storage_and_layout();
    let Storage::Cpu(CpuStorage::F32(data)) = &*storage else {
        return Err(Error::Inference(
            "input tensor must be F32 on the CPU".into(),
        ));
    };
    let (start, end) = layout
        .contiguous_offsets()
        .ok_or_else(|| Error::Inference("input tensor is not contiguous".into()))?;

    let dst = dst
        .as_slice_mut::<f32>()
        .map_err(|e| Error::Inference(format!("{e:#}")))?;
    let src = data
        .get(start..end)
        .filter(|src| src.len() == dst.len())
        .ok_or_else(|| Error::Inference("input tensor size does not match the model".into()))?;
    dst.copy_from_slice(src);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_model_missing_file() {
        let result = load_model("/nonexistent/plant_model_5_class.tflite");
        match result {
            Err(err @ Error::ModelLoad { .. }) => {
                assert!(err.is_fatal());
                assert!(err.to_string().contains("file not found"));
            }
            other => panic!("expected ModelLoad, got {other:?}"),
        }
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_load_model_corrupt_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"this is not a flatbuffer").expect("write");

        let result = load_model(file.path());
        assert!(matches!(result, Err(Error::ModelLoad { .. })));
    }

    #[test]
    fn test_load_model_directory_rejected() {
        let dir = std::env::temp_dir();
        assert!(matches!(load_model(dir), Err(Error::ModelLoad { .. })));
    }

    /// Writes a graph that sums each channel over the spatial axes.
    fn write_channel_sum(path: &Path) -> TractResult<()> {
        use tract_core::internal::AxisOp;
        use tract_core::ops::nn::{Reduce, Reducer};

        let mut model = TypedModel::default();
        let source = model.add_source("input", f32::fact([1usize, 224, 224, 3]))?;
        let sum = model.wire_node("sum", Reduce::new(tvec!(1, 2), Reducer::Sum), &[source])?;
        let sum = model.wire_node("squeeze_w", AxisOp::Rm(2), &sum)?;
        let sum = model.wire_node("squeeze_h", AxisOp::Rm(1), &sum)?;
        model.set_output_outlets(&sum)?;
        tract_tflite::tflite().write(&model, std::fs::File::create(path)?)
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_invoke_reuses_input_buffer() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sum.tflite");
        write_channel_sum(&path).expect("write model");
        let handle = load_model(&path).expect("load");

        let before = Arc::as_ptr(&handle.session.borrow().buffer);
        let green = CandleTensor::from_vec(
            [[0.0f32, 1.0, 0.0]].repeat(224 * 224).concat(),
            (1, 224, 224, 3),
            &candle_core::Device::Cpu,
        )
        .expect("tensor");
        let first = handle.invoke(&green).expect("first run");
        let second = handle.invoke(&green).expect("second run");

        assert_eq!(first, vec![0.0, 50176.0, 0.0]);
        assert_eq!(first, second);
        assert!(std::ptr::eq(before, Arc::as_ptr(&handle.session.borrow().buffer)));
        assert_eq!(Arc::strong_count(&handle.session.borrow().buffer), 1);
        assert!(handle.session.borrow().state.session_state.inputs.is_empty());
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_copy_input_rejects_size_mismatch() {
        let src = CandleTensor::zeros((1, 2, 2, 3), candle_core::DType::F32, &candle_core::Device::Cpu)
            .expect("tensor");
        let mut dst = Tensor::zero::<f32>(&[1, 4, 4, 3]).expect("buffer");
        assert!(matches!(copy_input(&src, &mut dst), Err(Error::Inference(_))));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_copy_input_rejects_non_f32() {
        let src = CandleTensor::zeros((1, 2, 2, 3), candle_core::DType::U8, &candle_core::Device::Cpu)
            .expect("tensor");
        let mut dst = Tensor::zero::<f32>(&[1, 2, 2, 3]).expect("buffer");
        assert!(matches!(copy_input(&src, &mut dst), Err(Error::Inference(_))));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_copy_input_copies_values() {
        let values: Vec<f32> = (0..12u8).map(f32::from).collect();
        let src = CandleTensor::from_vec(values.clone(), (1, 2, 2, 3), &candle_core::Device::Cpu)
            .expect("tensor");
        let mut dst = Tensor::zero::<f32>(&[1, 2, 2, 3]).expect("buffer");
        copy_input(&src, &mut dst).expect("copy");
        assert_eq!(dst.as_slice::<f32>().expect("slice"), values.as_slice());
    }
}
