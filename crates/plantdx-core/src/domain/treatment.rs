//! Treatment kind selected by the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which advice variant to show for a diagnosis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreatmentKind {
    /// Home remedies and organic products.
    #[default]
    Organic,
    /// Commercial fungicides, pesticides and fertilizers.
    Chemical,
}

impl TreatmentKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 2] = [Self::Organic, Self::Chemical];

    /// Display name as used in reports and the recommendation table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organic => "Organic",
            Self::Chemical => "Chemical",
        }
    }
}

impl fmt::Display for TreatmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreatmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "organic" => Ok(Self::Organic),
            "chemical" => Ok(Self::Chemical),
            other => Err(format!(
                "unknown treatment kind '{other}', expected 'organic' or 'chemical'"
            )),
        }
    }
}
