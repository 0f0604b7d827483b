//! Extensions for mapping external errors into `CollectionResult` concisely.
//!
//! # Examples
//!
//! ```
//! use mapped_collection::{CollectionResult, CollectionResultExt};
//!
//! fn encode() -> CollectionResult<serde_json::Value> {
//!     serde_json::to_value(["bar", "baz"]).into_collection()
//! }
//! # assert!(encode().is_ok());
//! ```

use crate::{CollectionResult, MappedCollectionError};

/// Generic extension for mapping any `Result<T, E>` with
/// `E: Into<MappedCollectionError>` into a [`CollectionResult`].
pub trait CollectionResultExt<T> {
    /// Convert `Result<T, E>` into `CollectionResult<T>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion.
    fn into_collection(self) -> CollectionResult<T>;
}

impl<T, E> CollectionResultExt<T> for Result<T, E>
where
    E: Into<MappedCollectionError>,
{
    fn into_collection(self) -> CollectionResult<T> {
        self.map_err(Into::into)
    }
}
