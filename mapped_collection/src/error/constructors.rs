//! Constructors for `MappedCollectionError`.

use serde_json::Value;

use super::MappedCollectionError;
use crate::{ElementKey, LifecycleEvent, TypeMap};

impl MappedCollectionError {
    /// Construct a wrong-shape error describing the rejected `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapped_collection::{LifecycleEvent, MappedCollectionError};
    /// use serde_json::json;
    ///
    /// let err = MappedCollectionError::wrong_shape(LifecycleEvent::AssignData, &json!(42));
    /// assert_eq!(
    ///     err.to_string(),
    ///     "expected an array or a keyed map during data assignment, found number",
    /// );
    /// ```
    #[must_use]
    pub const fn wrong_shape(event: LifecycleEvent, value: &Value) -> Self {
        Self::WrongShape {
            event,
            found: value_kind(value),
        }
    }

    /// Construct an invalid-configuration error.
    #[must_use]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Construct a missing-discriminator error for the element at `key`.
    #[must_use]
    pub fn missing_discriminator(key: &ElementKey, path: &str) -> Self {
        Self::MissingDiscriminator {
            key: key.clone(),
            path: path.to_owned(),
        }
    }

    /// Construct an unmapped-type error listing the keys of `types`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapped_collection::{MappedCollectionError, TypeDescriptor, TypeMap};
    ///
    /// let types = TypeMap::new([
    ///     ("bar", TypeDescriptor::new("bar_form")),
    ///     ("baz", TypeDescriptor::new("baz_form")),
    /// ])?;
    /// let err = MappedCollectionError::unmapped(&"qux".into(), &types);
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Unexpected type value \"qux\", valid value(s) are bar, baz",
    /// );
    /// # Ok::<_, MappedCollectionError>(())
    /// ```
    #[must_use]
    pub fn unmapped(value: &crate::Discriminator, types: &TypeMap) -> Self {
        Self::UnmappedType {
            value: value.as_str().to_owned(),
            valid: types.keys().map(ToOwned::to_owned).collect(),
        }
    }

    /// Construct an unknown-form-type error.
    #[must_use]
    pub fn unknown_form_type(name: impl Into<String>) -> Self {
        Self::UnknownFormType { name: name.into() }
    }
}

/// Returns the JSON kind of `value` for diagnostics.
pub(crate) const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
