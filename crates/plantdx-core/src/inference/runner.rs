//! Prediction runner.

use std::time::Instant;

use image::DynamicImage;
use tracing::debug;

use super::{preprocess, Interpreter};
use crate::domain::Prediction;
use crate::error::{Error, Result};

/// Returns the index of the largest score.
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
#[must_use]
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Classifies a leaf image.
///
/// Preprocesses the image to the handle's input size, runs one forward
/// pass and maps the highest-scoring index into `class_names`.
///
/// # Arguments
///
/// * `image` - Decoded leaf photo of any size and color mode
/// * `class_names` - Labels in model output order
/// * `handle` - Loaded model
///
/// # Errors
///
/// Returns `Error::Inference` if:
/// - The handle's input is not an NHWC image slot
/// - The forward pass fails
/// - The score vector is empty or contains non-finite values
/// - The score vector length differs from `class_names.len()`
pub fn predict<S, I>(image: &DynamicImage, class_names: &[S], handle: &I) -> Result<Prediction>
where
    S: AsRef<str>,
    I: Interpreter + ?Sized,
{
    let start = Instant::now();

    let input = handle.input_spec();
    let (height, width) = input
        .spatial_dims()
        .ok_or_else(|| Error::Inference(format!("model input {input} is not an image")))?;
    let size = (
        u32::try_from(width).map_err(|e| Error::Inference(e.to_string()))?,
        u32::try_from(height).map_err(|e| Error::Inference(e.to_string()))?,
    );

    let tensor = preprocess(image, size)?;
    let scores = handle.invoke(&tensor)?;

    if scores.len() != class_names.len() {
        return Err(Error::Inference(format!(
            "model produced {} scores but the class table has {} labels",
            scores.len(),
            class_names.len()
        )));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(Error::Inference(format!(
            "model produced non-finite scores: {scores:?}"
        )));
    }
    let index = argmax(&scores)
        .ok_or_else(|| Error::Inference("model produced an empty score vector".into()))?;

    let inference_ms = start.elapsed().as_secs_f64() * 1000.0;
    let label = class_names[index].as_ref().to_string();
    let confidence = scores[index];
    debug!("Predicted {label} ({confidence:.4}) in {inference_ms:.2} ms");

    Ok(Prediction {
        label,
        index,
        confidence,
        scores,
        inference_ms,
    })
}
