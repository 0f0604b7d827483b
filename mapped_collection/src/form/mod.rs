//! Minimal form layer used by mapped collections.
//!
//! A [`FormFactory`] holds the registered [`FormType`]s and builds
//! [`ChildForm`]s from [`crate::TypeDescriptor`]s. Form types decide the
//! empty value of their elements, whether they need multipart submission, and
//! how submitted input merges into existing data.

mod child;
mod merge;
mod view;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use crate::access::PropertyPath;
use crate::{CollectionResult, ElementKey, MappedCollectionError, TypeDescriptor};

pub use child::{ChildForm, ChildForms};
pub use merge::merge_value;
pub use view::{CollectionView, FormView};

/// Identifier of a registered form type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormTypeId(String);

impl FormTypeId {
    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormTypeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for FormTypeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Behaviour shared by every child form of one type.
pub trait FormType: fmt::Debug + Send + Sync {
    /// Identifier under which the type is registered.
    fn name(&self) -> &str;

    /// Value an element of this type starts from when it has no data.
    fn empty_data(&self, _data_class: Option<&str>) -> Value {
        Value::Object(Map::new())
    }

    /// Whether forms of this type must be submitted as multipart.
    fn multipart(&self) -> bool {
        false
    }

    /// Options applied before the collection's own child options.
    fn default_options(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Merge submitted `input` into `current` data.
    ///
    /// The default overlays objects recursively with [`merge_value`].
    fn submit(&self, current: Value, input: Value) -> Value {
        let mut merged = current;
        merge_value(&mut merged, input);
        merged
    }
}

/// Configurable form type backed by plain JSON values.
///
/// ```rust
/// use mapped_collection::{FormType, JsonFormType};
/// use serde_json::json;
///
/// let bar = JsonFormType::new("bar_form")
///     .with_empty_data(json!({"type": "bar", "data": null}))
///     .with_multipart(true);
/// assert_eq!(bar.empty_data(None)["type"], "bar");
/// assert!(bar.multipart());
/// ```
#[derive(Clone, Debug)]
pub struct JsonFormType {
    name: String,
    empty_data: Value,
    multipart: bool,
    options: Map<String, Value>,
}

impl JsonFormType {
    /// A form type named `name` with an empty object as its empty value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            empty_data: Value::Object(Map::new()),
            multipart: false,
            options: Map::new(),
        }
    }

    /// Set the empty value of new elements.
    #[must_use]
    pub fn with_empty_data(mut self, empty_data: Value) -> Self {
        self.empty_data = empty_data;
        self
    }

    /// Mark the form type as requiring multipart submission.
    #[must_use]
    pub const fn with_multipart(mut self, multipart: bool) -> Self {
        self.multipart = multipart;
        self
    }

    /// Add a default option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

impl FormType for JsonFormType {
    fn name(&self) -> &str {
        &self.name
    }

    fn empty_data(&self, _data_class: Option<&str>) -> Value {
        self.empty_data.clone()
    }

    fn multipart(&self) -> bool {
        self.multipart
    }

    fn default_options(&self) -> Map<String, Value> {
        self.options.clone()
    }
}

/// Registry of form types and builder of child forms.
#[derive(Clone, Debug, Default)]
pub struct FormFactory {
    types: IndexMap<FormTypeId, Arc<dyn FormType>>,
}

impl FormFactory {
    /// Create an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `form_type` under its own name, replacing any previous type
    /// with that name.
    pub fn register<T: FormType + 'static>(&mut self, form_type: T) -> &mut Self {
        let id = FormTypeId::from(form_type.name());
        self.types.insert(id, Arc::new(form_type));
        self
    }

    /// Builder-style variant of [`FormFactory::register`].
    #[must_use]
    pub fn with_type<T: FormType + 'static>(mut self, form_type: T) -> Self {
        self.register(form_type);
        self
    }

    /// Returns `true` when a form type named `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &FormTypeId) -> bool {
        self.types.contains_key(id)
    }

    /// Look up a registered form type.
    ///
    /// # Errors
    ///
    /// Returns [`MappedCollectionError::UnknownFormType`] for unregistered
    /// identifiers.
    pub fn form_type(&self, id: &FormTypeId) -> CollectionResult<Arc<dyn FormType>> {
        self.types
            .get(id)
            .cloned()
            .ok_or_else(|| MappedCollectionError::unknown_form_type(id.as_str()))
    }

    /// Build the child form addressing element `key` of its parent.
    ///
    /// `options` replace the form type's default options key by key.
    ///
    /// # Errors
    ///
    /// Returns [`MappedCollectionError::UnknownFormType`] when the descriptor
    /// names an unregistered form type.
    pub fn create_child(
        &self,
        key: &ElementKey,
        descriptor: &TypeDescriptor,
        options: &Map<String, Value>,
    ) -> CollectionResult<ChildForm> {
        self.create(
            key.to_string(),
            Some(PropertyPath::element(key)),
            descriptor,
            options,
        )
    }

    /// Build a form named `name` that is not bound to any parent data.
    ///
    /// # Errors
    ///
    /// Returns [`MappedCollectionError::UnknownFormType`] when the descriptor
    /// names an unregistered form type.
    pub fn create_unbound(
        &self,
        name: &str,
        descriptor: &TypeDescriptor,
        options: &Map<String, Value>,
    ) -> CollectionResult<ChildForm> {
        self.create(name.to_owned(), None, descriptor, options)
    }

    fn create(
        &self,
        name: String,
        property_path: Option<PropertyPath>,
        descriptor: &TypeDescriptor,
        options: &Map<String, Value>,
    ) -> CollectionResult<ChildForm> {
        let form_type = self.form_type(descriptor.form_type())?;
        let mut merged = form_type.default_options();
        for (key, value) in options {
            merged.insert(key.clone(), value.clone());
        }
        trace!(
            name = %name,
            form_type = %descriptor.form_type(),
            bound = property_path.is_some(),
            "creating child form"
        );
        Ok(ChildForm::new(
            name,
            property_path,
            descriptor.clone(),
            form_type,
            merged,
        ))
    }
}
