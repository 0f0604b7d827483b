//! Trait-based conversions between external error types and
//! `MappedCollectionError`.

use figment::Error as FigmentError;

use super::MappedCollectionError;

/// Convert JSON decoding failures into [`MappedCollectionError::Options`].
impl From<serde_json::Error> for MappedCollectionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Options(Box::new(FigmentError::from(format!("JSON error: {e}"))))
    }
}

impl From<FigmentError> for MappedCollectionError {
    fn from(e: FigmentError) -> Self {
        Self::Options(Box::new(e))
    }
}
