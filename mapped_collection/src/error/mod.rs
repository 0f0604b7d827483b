//! Error types produced while configuring and synchronising collections.

mod constructors;
mod conversions;
mod types;

pub use types::MappedCollectionError;

/// Result alias used throughout the crate.
pub type CollectionResult<T> = Result<T, MappedCollectionError>;
