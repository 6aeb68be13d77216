//! Treatment recommendations keyed by disease label and treatment kind.

mod table;

pub use table::{
    Recommendation, RecommendationEntry, RecommendationTable, NOT_FOUND_MESSAGE, RECOMMENDATIONS,
};
