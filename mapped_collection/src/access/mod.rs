//! Property access over element data.
//!
//! Two strategies read and write values along a [`PropertyPath`]:
//!
//! - [`NamedAccess`] follows named properties, succeeding only on existing
//!   object fields;
//! - [`IndexedAccess`] follows keys and positions, reading array slots and
//!   object keys, and may append or insert when writing.
//!
//! Both report a missing property with [`AccessError::NotFound`], which
//! [`with_fallback`] uses to switch from one strategy to the other.

mod path;
mod strategies;

use thiserror::Error;

pub use path::PropertyPath;
pub use strategies::{IndexedAccess, NamedAccess};

/// Failures reported by property accessors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    /// A segment of the path does not exist on the target.
    #[error("property \"{segment}\" of path \"{path}\" does not exist")]
    NotFound {
        /// Path being evaluated.
        path: String,
        /// First segment that could not be followed.
        segment: String,
    },

    /// The path is syntactically invalid.
    #[error("invalid property path \"{path}\": {reason}")]
    InvalidPath {
        /// Path as written.
        path: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl AccessError {
    pub(crate) fn not_found(path: &PropertyPath, segment: &str) -> Self {
        Self::NotFound {
            path: path.as_str().to_owned(),
            segment: segment.to_owned(),
        }
    }

    /// Not-found signal for the first segment of `path`.
    #[must_use]
    pub fn not_found_for(path: &PropertyPath) -> Self {
        let segment = path.segments().first().map_or("", String::as_str);
        Self::not_found(path, segment)
    }

    /// Returns `true` for the "property not found" signal.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Read and write capability over a target of type `T`.
pub trait PropertyAccessor<T: ?Sized> {
    /// Read the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotFound`] when a segment cannot be followed.
    fn read<'t>(
        &self,
        target: &'t T,
        path: &PropertyPath,
    ) -> Result<&'t serde_json::Value, AccessError>;

    /// Write `value` at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotFound`] when the strategy cannot place a
    /// value at `path`.
    fn write(
        &self,
        target: &mut T,
        path: &PropertyPath,
        value: serde_json::Value,
    ) -> Result<(), AccessError>;
}

/// Run `primary`, falling back to `fallback` only on a not-found signal.
///
/// Any other error from `primary` is returned unchanged.
///
/// ```rust
/// use mapped_collection::access::{AccessError, PropertyPath, with_fallback};
///
/// let path = PropertyPath::index("kind");
/// let value = with_fallback(|| Err(AccessError::not_found_for(&path)), || Ok(3))?;
/// assert_eq!(value, 3);
/// # Ok::<_, AccessError>(())
/// ```
///
/// # Errors
///
/// Returns the fallback's error, or the primary error when it is not a
/// not-found signal.
pub fn with_fallback<R, P, F>(primary: P, fallback: F) -> Result<R, AccessError>
where
    P: FnOnce() -> Result<R, AccessError>,
    F: FnOnce() -> Result<R, AccessError>,
{
    match primary() {
        Err(err) if err.is_not_found() => fallback(),
        outcome => outcome,
    }
}
