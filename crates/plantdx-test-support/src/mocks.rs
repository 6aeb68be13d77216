//! Scripted interpreters and mock port implementations.

use std::sync::{Arc, Mutex, PoisonError};

use candle_core::Tensor;
use plantdx_core::{
    DiagnosisRecord, Error, ImageSource, Interpreter, LeafImage, ProgressEvent, ProgressSink,
    Result, ResultOutput, TensorSpec,
};

/// Interpreter that always returns the same score vector.
///
/// Checks the input tensor shape like a real model would and counts
/// invocations.
pub struct FixedScoresInterpreter {
    scores: Vec<f32>,
    input: TensorSpec,
    output: TensorSpec,
    calls: Mutex<usize>,
}

impl FixedScoresInterpreter {
    /// Creates an interpreter with a 224x224 input returning `scores`.
    #[must_use]
    pub fn new(scores: Vec<f32>) -> Self {
        Self::with_input(scores, 224, 224)
    }

    /// Creates an interpreter with a custom input size.
    #[must_use]
    pub fn with_input(scores: Vec<f32>, height: usize, width: usize) -> Self {
        Self {
            output: TensorSpec::scores_f32(scores.len()),
            input: TensorSpec::image_f32(height, width),
            scores,
            calls: Mutex::new(0),
        }
    }

    /// Returns the number of forward passes run.
    #[must_use]
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Interpreter for FixedScoresInterpreter {
    fn input_spec(&self) -> &TensorSpec {
        &self.input
    }

    fn output_spec(&self) -> &TensorSpec {
        &self.output
    }

    fn invoke(&self, input: &Tensor) -> Result<Vec<f32>> {
        if input.dims() != self.input.shape.as_slice() {
            return Err(Error::Inference(format!(
                "input tensor {:?} does not match model input {:?}",
                input.dims(),
                self.input.shape
            )));
        }
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(self.scores.clone())
    }
}

type ScoreFn = dyn Fn(&[f32]) -> Vec<f32> + Send + Sync;

/// Interpreter whose scores are computed from the input tensor values.
///
/// Useful for checking that identical inputs give identical outputs.
pub struct FnInterpreter {
    input: TensorSpec,
    output: TensorSpec,
    score: Box<ScoreFn>,
}

impl FnInterpreter {
    /// Creates an interpreter with a 224x224 input and `classes` outputs.
    #[must_use]
    pub fn new(
        classes: usize,
        score: impl Fn(&[f32]) -> Vec<f32> + Send + Sync + 'static,
    ) -> Self {
        Self {
            input: TensorSpec::image_f32(224, 224),
            output: TensorSpec::scores_f32(classes),
            score: Box::new(score),
        }
    }

    /// Scores each class by the mean of one color channel.
    ///
    /// Class `i` gets the mean of channel `i % 3`, scaled by `1 / (i + 1)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn channel_means(classes: usize) -> Self {
        Self::new(classes, move |data| {
            let pixels = (data.len() / 3).max(1) as f32;
            let mut sums = [0.0f32; 3];
            for px in data.chunks_exact(3) {
                for (sum, v) in sums.iter_mut().zip(px) {
                    *sum += v;
                }
            }
            (0..classes)
                .map(|i| sums[i % 3] / pixels / (i + 1) as f32)
                .collect()
        })
    }
}

impl Interpreter for FnInterpreter {
    fn input_spec(&self) -> &TensorSpec {
        &self.input
    }

    fn output_spec(&self) -> &TensorSpec {
        &self.output
    }

    fn invoke(&self, input: &Tensor) -> Result<Vec<f32>> {
        let data = input.flatten_all()?.to_vec1::<f32>()?;
        Ok((self.score)(&data))
    }
}

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images (or errors) and tracks iteration for assertions.
pub struct MockImageSource {
    images: Vec<std::result::Result<LeafImage, String>>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<LeafImage>) -> Self {
        Self {
            images: images.into_iter().map(Ok).collect(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Appends an entry that fails to decode with the given message.
    #[must_use]
    pub fn with_undecodable(mut self, message: impl Into<String>) -> Self {
        self.images.push(Err(message.into()));
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<LeafImage>> + Send + '_> {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Box::new(self.images.iter().map(|item| match item {
            Ok(leaf) => Ok(leaf.clone()),
            Err(msg) => Err(Error::ImageDecode(msg.clone())),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.images.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures records for later assertions.
#[derive(Default)]
pub struct MockResultOutput {
    records: Mutex<Vec<DiagnosisRecord>>,
    flush_count: Mutex<usize>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured records.
    #[must_use]
    pub fn records(&self) -> Vec<DiagnosisRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, record: &DiagnosisRecord) -> std::io::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn flush(&self) -> std::io::Result<()> {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Completed { .. }))
            .count()
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Skipped { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { processed, skipped } => Some((*processed, *skipped)),
            _ => None,
        })
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
