//! Error types for authorized edits.

use thiserror::Error;

/// Errors produced while submitting a smoothness edit.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EditError {
    /// No usable access token.
    #[error("Not authenticated with OpenStreetMap")]
    Unauthenticated,

    /// The road is not part of the displayed collection.
    #[error("Road {0} is not displayed")]
    UnknownFeature(u64),

    /// The road already carries the requested value.
    #[error("Road {way_id} already has smoothness '{value}'")]
    Unchanged { way_id: u64, value: String },

    /// The value is not a recognized smoothness level.
    #[error("Invalid smoothness value '{0}'")]
    InvalidValue(String),

    /// The API answered with a non-success status.
    #[error("OpenStreetMap API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with something that could not be interpreted.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl EditError {
    /// The way was modified by someone else since it was read (HTTP 409).
    pub fn is_conflict(&self) -> bool {
        matches!(self, EditError::Http { status: 409, .. })
    }
}

impl From<quick_xml::DeError> for EditError {
    fn from(e: quick_xml::DeError) -> Self {
        EditError::InvalidResponse(format!("XML error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_detection() {
        let conflict = EditError::Http {
            status: 409,
            body: "Version mismatch".to_string(),
        };
        assert!(conflict.is_conflict());
        assert!(!EditError::Unauthenticated.is_conflict());
    }

    #[test]
    fn test_display() {
        let err = EditError::Unchanged {
            way_id: 42,
            value: "good".to_string(),
        };
        assert_eq!(err.to_string(), "Road 42 already has smoothness 'good'");
    }
}
