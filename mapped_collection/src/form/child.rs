//! Live child forms and the ordered set that holds them.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{FormType, FormTypeId, FormView};
use crate::access::PropertyPath;
use crate::{ElementKey, TypeDescriptor};

/// One live sub-form built from a [`TypeDescriptor`].
#[derive(Clone, Debug)]
pub struct ChildForm {
    name: String,
    property_path: Option<PropertyPath>,
    descriptor: TypeDescriptor,
    form_type: Arc<dyn FormType>,
    options: Map<String, Value>,
    data: Value,
    submitted: bool,
}

impl ChildForm {
    pub(crate) const fn new(
        name: String,
        property_path: Option<PropertyPath>,
        descriptor: TypeDescriptor,
        form_type: Arc<dyn FormType>,
        options: Map<String, Value>,
    ) -> Self {
        Self {
            name,
            property_path,
            descriptor,
            form_type,
            options,
            data: Value::Null,
            submitted: false,
        }
    }

    /// Name of the form, which is the element key for bound children.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the element this form reads and writes, if bound.
    #[must_use]
    pub const fn property_path(&self) -> Option<&PropertyPath> {
        self.property_path.as_ref()
    }

    /// Returns `true` when the form maps onto parent data.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.property_path.is_some()
    }

    /// Descriptor the form was built from.
    #[must_use]
    pub const fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Identifier of the form's type.
    #[must_use]
    pub const fn form_type(&self) -> &FormTypeId {
        self.descriptor.form_type()
    }

    /// Resolved options of the form.
    #[must_use]
    pub const fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Look up a single option.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// The `label` option, when it is a string.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.option("label").and_then(Value::as_str)
    }

    /// Current data of the form.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }

    /// Replace the form's data.
    pub fn set_data(&mut self, data: Value) {
        self.data = data;
    }

    /// Value a fresh element of this form's type starts from.
    #[must_use]
    pub fn empty_data(&self) -> Value {
        self.form_type.empty_data(self.descriptor.data_class())
    }

    /// Whether the form's type requires multipart submission.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.form_type.multipart()
    }

    /// Submit `input` to the form.
    ///
    /// `null` input resets the form to its empty value. Any other input is
    /// merged by the form type into the current data, or into the empty value
    /// when the form holds no data yet.
    pub fn submit(&mut self, input: Value) {
        self.data = if input.is_null() {
            self.empty_data()
        } else {
            let current = if self.data.is_null() {
                self.empty_data()
            } else {
                std::mem::take(&mut self.data)
            };
            self.form_type.submit(current, input)
        };
        self.submitted = true;
    }

    /// Returns `true` once the form has been submitted.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Render metadata for view layers.
    #[must_use]
    pub fn create_view(&self) -> FormView {
        FormView {
            name: self.name.clone(),
            form_type: self.form_type().clone(),
            label: self.label().map(str::to_owned),
            block_name: self
                .option("block_name")
                .and_then(Value::as_str)
                .map(str::to_owned),
            multipart: self.is_multipart(),
            data: self.data.clone(),
        }
    }
}

/// Ordered set of live child forms keyed by element key.
#[derive(Clone, Debug, Default)]
pub struct ChildForms {
    forms: IndexMap<ElementKey, ChildForm>,
}

impl ChildForms {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the child at `key`.
    #[must_use]
    pub fn get(&self, key: &ElementKey) -> Option<&ChildForm> {
        self.forms.get(key)
    }

    /// Returns mutable access to the child at `key`.
    pub fn get_mut(&mut self, key: &ElementKey) -> Option<&mut ChildForm> {
        self.forms.get_mut(key)
    }

    /// Returns `true` when a child exists at `key`.
    #[must_use]
    pub fn contains_key(&self, key: &ElementKey) -> bool {
        self.forms.contains_key(key)
    }

    /// Insert `form` at `key`.
    ///
    /// Replacing an existing child keeps its position; new children are
    /// appended.
    pub fn insert(&mut self, key: ElementKey, form: ChildForm) -> Option<ChildForm> {
        self.forms.insert(key, form)
    }

    /// Remove the child at `key`, preserving the order of the rest.
    pub fn remove(&mut self, key: &ElementKey) -> Option<ChildForm> {
        self.forms.shift_remove(key)
    }

    /// Remove every child.
    pub fn clear(&mut self) {
        self.forms.clear();
    }

    /// Keep only the children for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&ElementKey, &ChildForm) -> bool,
    {
        self.forms.retain(|key, form| keep(key, form));
    }

    /// Iterate over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &ElementKey> {
        self.forms.keys()
    }

    /// Iterate over children in order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, ElementKey, ChildForm> {
        self.forms.iter()
    }

    /// Iterate mutably over children in order.
    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, ElementKey, ChildForm> {
        self.forms.iter_mut()
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// Returns `true` when there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChildForms {
    type Item = (&'a ElementKey, &'a ChildForm);
    type IntoIter = indexmap::map::Iter<'a, ElementKey, ChildForm>;

    fn into_iter(self) -> Self::IntoIter {
        self.forms.iter()
    }
}
