//! Discriminator to form-type mapping.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{CollectionResult, Discriminator, FormTypeId, MappedCollectionError};

/// Form type and optional data class governing one discriminator value.
///
/// Deserialises from either a bare form type name or a table:
///
/// ```rust
/// use mapped_collection::TypeDescriptor;
/// use serde_json::json;
///
/// let bare: TypeDescriptor = serde_json::from_value(json!("bar_form"))?;
/// let full: TypeDescriptor =
///     serde_json::from_value(json!({"form_type": "bar_form", "data_class": "Bar"}))?;
/// assert_eq!(bare, TypeDescriptor::new("bar_form"));
/// assert_eq!(full, TypeDescriptor::new("bar_form").with_data_class("Bar"));
/// # Ok::<_, serde_json::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DescriptorRepr", into = "DescriptorRepr")]
pub struct TypeDescriptor {
    form_type: FormTypeId,
    data_class: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DescriptorRepr {
    Bare(FormTypeId),
    Full {
        form_type: FormTypeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data_class: Option<String>,
    },
}

impl From<DescriptorRepr> for TypeDescriptor {
    fn from(repr: DescriptorRepr) -> Self {
        match repr {
            DescriptorRepr::Bare(form_type) => Self {
                form_type,
                data_class: None,
            },
            DescriptorRepr::Full {
                form_type,
                data_class,
            } => Self {
                form_type,
                data_class,
            },
        }
    }
}

impl From<TypeDescriptor> for DescriptorRepr {
    fn from(descriptor: TypeDescriptor) -> Self {
        match descriptor.data_class {
            None => Self::Bare(descriptor.form_type),
            Some(data_class) => Self::Full {
                form_type: descriptor.form_type,
                data_class: Some(data_class),
            },
        }
    }
}

impl TypeDescriptor {
    /// Descriptor for `form_type` without an explicit data class.
    #[must_use]
    pub fn new(form_type: impl Into<FormTypeId>) -> Self {
        Self {
            form_type: form_type.into(),
            data_class: None,
        }
    }

    /// Attach an explicit data class.
    #[must_use]
    pub fn with_data_class(mut self, data_class: impl Into<String>) -> Self {
        self.data_class = Some(data_class.into());
        self
    }

    /// The form type identifier.
    #[must_use]
    pub const fn form_type(&self) -> &FormTypeId {
        &self.form_type
    }

    /// The explicit data class, if any.
    #[must_use]
    pub fn data_class(&self) -> Option<&str> {
        self.data_class.as_deref()
    }
}

/// Ordered, non-empty map from discriminator value to [`TypeDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMap {
    entries: IndexMap<Discriminator, TypeDescriptor>,
}

impl TypeMap {
    /// Build a map from `(discriminator, descriptor)` pairs.
    ///
    /// Later duplicates replace earlier ones while keeping the first
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`MappedCollectionError::InvalidConfiguration`] when no entries
    /// are supplied.
    pub fn new<I, K>(pairs: I) -> CollectionResult<Self>
    where
        I: IntoIterator<Item = (K, TypeDescriptor)>,
        K: Into<Discriminator>,
    {
        let entries: IndexMap<_, _> = pairs
            .into_iter()
            .map(|(key, descriptor)| (key.into(), descriptor))
            .collect();
        if entries.is_empty() {
            return Err(MappedCollectionError::invalid_configuration(
                "map cannot be empty",
            ));
        }
        Ok(Self { entries })
    }

    /// Build the map declared by a closed set of variants.
    ///
    /// # Errors
    ///
    /// Returns [`MappedCollectionError::InvalidConfiguration`] when `V`
    /// declares no variants.
    pub fn from_variants<V: MappedVariants>() -> CollectionResult<Self> {
        Self::new(
            V::VARIANTS
                .iter()
                .map(|variant| (variant.discriminator(), variant.descriptor())),
        )
    }

    /// Look up the descriptor for `discriminator`.
    ///
    /// # Errors
    ///
    /// Returns [`MappedCollectionError::UnmappedType`] carrying the offending
    /// value and every valid key.
    pub fn lookup(&self, discriminator: &Discriminator) -> CollectionResult<&TypeDescriptor> {
        self.entries
            .get(discriminator)
            .ok_or_else(|| MappedCollectionError::unmapped(discriminator, self))
    }

    /// Discriminator values in configuration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(Discriminator::as_str)
    }

    /// Descriptors in configuration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.entries.values()
    }

    /// Number of mapped discriminator values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; construction rejects empty maps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A closed set of element kinds known at compile time.
///
/// Derive it with `#[derive(MappedVariants)]` on a fieldless enum:
///
/// ```rust
/// use mapped_collection::{MappedVariants, TypeMap};
///
/// #[derive(Clone, Copy, Debug, PartialEq, MappedVariants)]
/// enum Block {
///     #[mapped(form_type = "text_block")]
///     Text,
///     #[mapped(discriminator = "img", form_type = "image_block", data_class = "Image")]
///     Image,
/// }
///
/// let types = TypeMap::from_variants::<Block>()?;
/// assert_eq!(types.keys().collect::<Vec<_>>(), ["text", "img"]);
/// assert_eq!(Block::from_discriminator("img"), Some(Block::Image));
/// # Ok::<_, mapped_collection::MappedCollectionError>(())
/// ```
pub trait MappedVariants: Sized + Copy + 'static {
    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// Discriminator value selecting this variant.
    fn discriminator(self) -> &'static str;

    /// Descriptor governing elements of this variant.
    fn descriptor(self) -> TypeDescriptor;

    /// Find the variant selected by `value`.
    #[must_use]
    fn from_discriminator(value: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.discriminator() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_maps_are_rejected() {
        let err = TypeMap::new(Vec::<(&str, TypeDescriptor)>::new()).expect_err("empty map");
        assert!(matches!(
            err,
            MappedCollectionError::InvalidConfiguration { ref message }
                if message == "map cannot be empty"
        ));
    }

    #[test]
    fn lookup_reports_unmapped_values_with_valid_keys() {
        let types = TypeMap::new([
            ("bar", TypeDescriptor::new("bar_form")),
            ("baz", TypeDescriptor::new("baz_form")),
        ])
        .expect("non-empty map");

        assert_eq!(
            types.lookup(&"baz".into()).map(TypeDescriptor::form_type).ok(),
            Some(&FormTypeId::from("baz_form"))
        );
        let err = types.lookup(&"qux".into()).expect_err("unmapped");
        assert_eq!(
            err.to_string(),
            "Unexpected type value \"qux\", valid value(s) are bar, baz"
        );
    }

    #[test]
    fn descriptors_serialise_compactly() {
        let bare = serde_json::to_value(TypeDescriptor::new("bar_form")).expect("serialises");
        assert_eq!(bare, json!("bar_form"));
        let full = serde_json::to_value(TypeDescriptor::new("bar_form").with_data_class("Bar"))
            .expect("serialises");
        assert_eq!(full, json!({"form_type": "bar_form", "data_class": "Bar"}));
    }
}
