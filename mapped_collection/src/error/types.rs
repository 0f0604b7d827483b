//! Primary error enum for collection synchronisation.

use figment::Error as FigmentError;
use thiserror::Error;

use crate::access::AccessError;
use crate::{ElementKey, LifecycleEvent};

/// Errors raised while building or synchronising a mapped collection.
///
/// None of these are recovered locally: each aborts the running lifecycle
/// event and propagates to the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MappedCollectionError {
    /// The collection data is neither a list nor a keyed map.
    #[error("expected an array or a keyed map during {event}, found {found}")]
    WrongShape {
        /// Lifecycle event that received the data.
        event: LifecycleEvent,
        /// JSON kind of the rejected value.
        found: &'static str,
    },

    /// The collection configuration cannot be used.
    #[error("invalid collection configuration: {message}")]
    InvalidConfiguration {
        /// Description of the configuration problem.
        message: String,
    },

    /// An element's discriminator could not be read.
    #[error("element \"{key}\" has no discriminator at \"{path}\"")]
    MissingDiscriminator {
        /// Key of the offending element.
        key: ElementKey,
        /// Configured discriminator path.
        path: String,
    },

    /// A discriminator value has no descriptor in the type map.
    #[error("Unexpected type value \"{value}\", valid value(s) are {}", .valid.join(", "))]
    UnmappedType {
        /// Offending discriminator value.
        value: String,
        /// Discriminator values present in the type map.
        valid: Vec<String>,
    },

    /// A descriptor refers to a form type the factory does not know.
    #[error("form type \"{name}\" is not registered with the form factory")]
    UnknownFormType {
        /// Name of the missing form type.
        name: String,
    },

    /// Element data could not be read or written.
    #[error("property access failed: {0}")]
    Access(#[from] AccessError),

    /// Options could not be extracted or deserialised.
    #[error("failed to load collection options: {0}")]
    Options(#[from] Box<FigmentError>),
}
