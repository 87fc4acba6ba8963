//! Smoothness normalization and quality bucket classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse four-way quality classification that drives styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBucket {
    Excellent,
    Good,
    Poor,
    Unknown,
}

impl QualityBucket {
    /// Every bucket, in display order.
    pub const ALL: [QualityBucket; 4] = [
        QualityBucket::Excellent,
        QualityBucket::Good,
        QualityBucket::Poor,
        QualityBucket::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityBucket::Excellent => "excellent",
            QualityBucket::Good => "good",
            QualityBucket::Poor => "poor",
            QualityBucket::Unknown => "unknown",
        }
    }
}

impl fmt::Display for QualityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excellent" => Ok(QualityBucket::Excellent),
            "good" => Ok(QualityBucket::Good),
            "poor" => Ok(QualityBucket::Poor),
            "unknown" => Ok(QualityBucket::Unknown),
            other => Err(format!(
                "unknown quality bucket '{}' (expected excellent, good, poor or unknown)",
                other
            )),
        }
    }
}

/// Map a smoothness value to its bucket.
///
/// Total over all inputs: absent or blank maps to `Unknown`, and any other
/// value that is not `excellent` or `good` falls into `Poor`.
pub fn bucket_for(smoothness: Option<&str>) -> QualityBucket {
    match smoothness {
        None => QualityBucket::Unknown,
        Some(s) if s.trim().is_empty() => QualityBucket::Unknown,
        Some("excellent") => QualityBucket::Excellent,
        Some("good") => QualityBucket::Good,
        Some(_) => QualityBucket::Poor,
    }
}

/// Canonical smoothness values accepted by the geodata store.
pub const SMOOTHNESS_VALUES: [&str; 8] = [
    "excellent",
    "good",
    "intermediate",
    "bad",
    "very_bad",
    "horrible",
    "very_horrible",
    "impassable",
];

/// Whether `value` is one of [`SMOOTHNESS_VALUES`].
pub fn is_valid_smoothness(value: &str) -> bool {
    SMOOTHNESS_VALUES.contains(&value)
}

/// Human labels (Polish, English) for a canonical smoothness value.
pub fn smoothness_label(value: &str) -> Option<(&'static str, &'static str)> {
    let labels = match value {
        "excellent" => ("Doskonała", "Excellent"),
        "good" => ("Dobra", "Good"),
        "intermediate" => ("Średnia", "Intermediate"),
        "bad" => ("Zła", "Bad"),
        "very_bad" => ("Bardzo zła", "Very bad"),
        "horrible" => ("Fatalna", "Horrible"),
        "very_horrible" => ("Bardzo fatalna", "Very horrible"),
        "impassable" => ("Nieprzejezdna", "Impassable"),
        _ => return None,
    };
    Some(labels)
}

/// Normalize a raw smoothness tag as it arrives from the remote source.
///
/// Lowercases and trims, then folds community synonyms onto canonical
/// values. Unmapped values pass through unchanged; an empty string means the
/// tag is effectively absent.
pub fn normalize_smoothness(raw: &str) -> Option<String> {
    let value = raw.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }

    let canonical = match value.as_str() {
        "very_good" | "perfect" => "excellent",
        "smooth" => "good",
        "rough" | "poor" => "bad",
        "very_rough" => "very_bad",
        _ => return Some(value),
    };
    Some(canonical.to_string())
}
