//! Discriminator resolution over element data.

use std::fmt;

use serde_json::Value;

use crate::access::{IndexedAccess, NamedAccess, PropertyAccessor, PropertyPath, with_fallback};
use crate::{CollectionResult, ElementKey, MappedCollectionError};

/// Value read from an element that selects its form type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Discriminator(String);

impl Discriminator {
    /// Convert a JSON value into a discriminator.
    ///
    /// Strings are used verbatim, numbers and booleans are rendered, and
    /// `null` yields `None`. Arrays and objects are rendered as compact JSON
    /// so they surface in unmapped-type diagnostics.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(Self(text.clone())),
            Value::Bool(flag) => Some(Self(flag.to_string())),
            Value::Number(number) => Some(Self(number.to_string())),
            Value::Array(_) | Value::Object(_) => Some(Self(value.to_string())),
        }
    }

    /// The discriminator as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Discriminator {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Discriminator {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Reads the configured discriminator path from element data.
///
/// Resolution tries the path as named properties first (`meta.kind`) and,
/// when a property is missing, retries it as a single literal index
/// (`[meta.kind]`). The same try-then-fallback order applies to
/// [`DiscriminatorResolver::assign`].
#[derive(Clone, Debug)]
pub struct DiscriminatorResolver {
    named: PropertyPath,
    indexed: PropertyPath,
}

impl DiscriminatorResolver {
    /// Create a resolver for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MappedCollectionError::InvalidConfiguration`] when `path` is
    /// not a valid property path.
    pub fn new(path: &str) -> CollectionResult<Self> {
        let named = PropertyPath::parse(path).map_err(|err| {
            MappedCollectionError::invalid_configuration(format!("discriminator: {err}"))
        })?;
        Ok(Self {
            named,
            indexed: PropertyPath::index(path),
        })
    }

    /// The configured discriminator path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.named.as_str()
    }

    /// Resolve the discriminator of `value`, if it has one.
    ///
    /// ```rust
    /// use mapped_collection::DiscriminatorResolver;
    /// use serde_json::json;
    ///
    /// let resolver = DiscriminatorResolver::new("kind")?;
    /// assert_eq!(
    ///     resolver.try_resolve(&json!({"kind": "bar"})).map(|d| d.to_string()),
    ///     Some("bar".to_owned()),
    /// );
    /// assert_eq!(resolver.try_resolve(&json!({"data": 1})), None);
    /// # Ok::<_, mapped_collection::MappedCollectionError>(())
    /// ```
    #[must_use]
    pub fn try_resolve(&self, value: &Value) -> Option<Discriminator> {
        with_fallback(
            || NamedAccess.read(value, &self.named),
            || IndexedAccess.read(value, &self.indexed),
        )
        .ok()
        .and_then(Discriminator::from_value)
    }

    /// Resolve the discriminator of the element stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MappedCollectionError::MissingDiscriminator`] when neither
    /// strategy finds a non-null value.
    pub fn resolve(&self, key: &ElementKey, value: &Value) -> CollectionResult<Discriminator> {
        self.try_resolve(value)
            .ok_or_else(|| MappedCollectionError::missing_discriminator(key, self.path()))
    }

    /// Replace the value stored under `key` in `container`.
    ///
    /// Named assignment is attempted first and indexed assignment is used
    /// when the container has no such named property.
    ///
    /// # Errors
    ///
    /// Returns [`MappedCollectionError::Access`] when neither strategy can
    /// place the value.
    pub fn assign<T>(
        &self,
        container: &mut T,
        key: &ElementKey,
        value: Value,
    ) -> CollectionResult<()>
    where
        T: ?Sized,
        NamedAccess: PropertyAccessor<T>,
        IndexedAccess: PropertyAccessor<T>,
    {
        let segment = key.to_string();
        let named =
            PropertyPath::parse(&segment).unwrap_or_else(|_| PropertyPath::index(segment.as_str()));
        match NamedAccess.write(container, &named, value.clone()) {
            Err(err) if err.is_not_found() => {
                IndexedAccess.write(container, &PropertyPath::index(segment), value)?;
            }
            outcome => outcome?,
        }
        Ok(())
    }
}
