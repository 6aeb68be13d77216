//! Static recommendation table.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::domain::TreatmentKind;
use crate::error::{Error, Result};

/// Message shown when the table has no entry for a diagnosis.
pub const NOT_FOUND_MESSAGE: &str =
    "No treatment recommendation found for this disease and option.";

/// Advice for one disease and treatment kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Multi-line advice, one step per line.
    pub text: String,
    /// Absolute URL of a suggested product.
    pub url: String,
}

/// A row of the built-in table.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationEntry {
    /// Disease label as produced by the classifier.
    pub label: &'static str,
    /// Treatment kind.
    pub kind: TreatmentKind,
    /// Advice text.
    pub text: &'static str,
    /// Product URL.
    pub url: &'static str,
}

/// Built-in advice for every class of the bundled model.
pub const RECOMMENDATIONS: &[RecommendationEntry] = &[
    RecommendationEntry {
        label: "Healthy",
        kind: TreatmentKind::Organic,
        text: "✅ Your plant looks healthy!\n- Continue regular watering\n- Use compost and neem spray weekly\n- Maintain airflow and hygiene",
        url: "https://example.com/organic-plant-tonic",
    },
    RecommendationEntry {
        label: "Healthy",
        kind: TreatmentKind::Chemical,
        text: "✅ No issues detected!\n- Maintain preventive schedule using balanced NPK fertilizers\n- Apply mild fungicide every 30 days if needed",
        url: "https://example.com/npk-fertilizer",
    },
    RecommendationEntry {
        label: "Powdery",
        kind: TreatmentKind::Organic,
        text: "🦠 **Powdery Mildew - Organic Treatment**\n- Spray neem oil weekly\n- Use baking soda + water + liquid soap\n- Improve plant spacing",
        url: "https://www.amazon.in/dp/B07KQJP5WV",
    },
    RecommendationEntry {
        label: "Powdery",
        kind: TreatmentKind::Chemical,
        text: "🦠 **Powdery Mildew - Chemical Treatment**\n- Use sulfur-based fungicide like **Thiovit Jet**\n- Apply potassium bicarbonate like **MilStop**",
        url: "https://www.amazon.in/dp/B07NQW7ZJ5",
    },
    RecommendationEntry {
        label: "Rust",
        kind: TreatmentKind::Organic,
        text: "🍂 **Rust - Organic Treatment**\n- Remove infected leaves\n- Spray compost tea or neem oil\n- Avoid overhead watering",
        url: "https://www.amazon.in/dp/B08X17LMQ6",
    },
    RecommendationEntry {
        label: "Rust",
        kind: TreatmentKind::Chemical,
        text: "🍂 **Rust - Chemical Treatment**\n- Apply **Indofil M-45** (Mancozeb)\n- Use **Kavach** (Chlorothalonil) every 7-10 days",
        url: "https://www.amazon.in/dp/B094DKXXSM",
    },
    RecommendationEntry {
        label: "Slug",
        kind: TreatmentKind::Organic,
        text: "🐌 **Slug Damage - Organic Treatment**\n- Use copper tape around pots\n- Sprinkle diatomaceous earth\n- Set beer traps at night",
        url: "https://www.amazon.in/dp/B08XZNXLSZ",
    },
    RecommendationEntry {
        label: "Slug",
        kind: TreatmentKind::Chemical,
        text: "🐌 **Slug Damage - Chemical Treatment**\n- Apply **Sluggo** (Ferric phosphate-based bait)\n- Place pellets in moist shaded areas",
        url: "https://www.amazon.in/dp/B000BX4GXS",
    },
    RecommendationEntry {
        label: "Spot",
        kind: TreatmentKind::Organic,
        text: "🔴 **Leaf Spot - Organic Treatment**\n- Spray neem oil or compost tea\n- Use diluted hydrogen peroxide (5%)\n- Remove infected foliage",
        url: "https://www.amazon.in/dp/B07KQJP5WV",
    },
    RecommendationEntry {
        label: "Spot",
        kind: TreatmentKind::Chemical,
        text: "🔴 **Leaf Spot - Chemical Treatment**\n- Use **Blitox 50** (copper-based fungicide)\n- Apply **Zineb** every 10 days during early stages",
        url: "https://www.amazon.in/dp/B07D1BL6JH",
    },
];

/// Read-only lookup from `(label, kind)` to advice.
#[derive(Debug, Clone, Default)]
pub struct RecommendationTable {
    entries: HashMap<(String, TreatmentKind), Recommendation>,
}

impl RecommendationTable {
    /// Builds the table from the built-in [`RECOMMENDATIONS`].
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(RECOMMENDATIONS)
    }

    /// Builds a table from explicit entries. Later duplicates win.
    #[must_use]
    pub fn from_entries(entries: &[RecommendationEntry]) -> Self {
        let entries = entries
            .iter()
            .map(|e| {
                (
                    (e.label.to_string(), e.kind),
                    Recommendation {
                        text: e.text.to_string(),
                        url: e.url.to_string(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Looks up the advice for a label and treatment kind.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the pair has no entry. Callers should
    /// show [`NOT_FOUND_MESSAGE`] and carry on.
    pub fn resolve(&self, label: &str, kind: TreatmentKind) -> Result<&Recommendation> {
        self.entries
            .get(&(label.to_string(), kind))
            .ok_or_else(|| {
                debug!("No {kind} recommendation for {label}");
                Error::NotFound {
                    label: label.to_string(),
                    kind,
                }
            })
    }

    /// Number of `(label, kind)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CLASS_NAMES;

    #[test]
    fn test_builtin_covers_every_class_and_kind() {
        let table = RecommendationTable::builtin();
        assert_eq!(table.len(), CLASS_NAMES.len() * TreatmentKind::ALL.len());

        for label in CLASS_NAMES {
            for kind in TreatmentKind::ALL {
                let rec = table
                    .resolve(label, kind)
                    .unwrap_or_else(|e| panic!("missing entry: {e}"));
                assert!(!rec.text.is_empty());
                assert!(rec.url.starts_with("https://"));
            }
        }
    }

    #[test]
    fn test_resolve_healthy_organic() {
        let table = RecommendationTable::builtin();
        let rec = table
            .resolve("Healthy", TreatmentKind::Organic)
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(rec.text.contains("Your plant looks healthy!"));
        assert_eq!(rec.url, "https://example.com/organic-plant-tonic");
    }

    #[test]
    fn test_resolve_unknown_is_not_found() {
        let table = RecommendationTable::builtin();
        let err = table.resolve("Unknown", TreatmentKind::Organic);
        assert!(matches!(
            err,
            Err(Error::NotFound { ref label, kind: TreatmentKind::Organic }) if label == "Unknown"
        ));
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let table = RecommendationTable::builtin();
        assert!(table.resolve("healthy", TreatmentKind::Organic).is_err());
    }

    #[test]
    fn test_from_entries_later_duplicate_wins() {
        let table = RecommendationTable::from_entries(&[
            RecommendationEntry {
                label: "Spot",
                kind: TreatmentKind::Organic,
                text: "first",
                url: "https://example.com/a",
            },
            RecommendationEntry {
                label: "Spot",
                kind: TreatmentKind::Organic,
                text: "second",
                url: "https://example.com/b",
            },
        ]);
        assert_eq!(table.len(), 1);
        let rec = table
            .resolve("Spot", TreatmentKind::Organic)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(rec.text, "second");
        assert!(table.resolve("Spot", TreatmentKind::Chemical).is_err());
    }
}
