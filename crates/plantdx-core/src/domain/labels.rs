//! Class label table of the bundled leaf classifier.

/// Label reported for leaves without visible disease.
pub const HEALTHY_LABEL: &str = "Healthy";

/// Class labels in model output order.
///
/// Index `i` of the model's score vector belongs to `CLASS_NAMES[i]`.
pub const CLASS_NAMES: [&str; 5] = [HEALTHY_LABEL, "Powdery", "Rust", "Slug", "Spot"];

/// Returns the default class table as owned strings.
#[must_use]
pub fn default_class_names() -> Vec<String> {
    CLASS_NAMES.iter().map(ToString::to_string).collect()
}
