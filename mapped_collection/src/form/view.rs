//! Render metadata handed to view layers.

use serde::Serialize;
use serde_json::Value;

use super::FormTypeId;

/// View of a single child or prototype form.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormView {
    /// Form name; the element key for children, the placeholder for the
    /// prototype.
    pub name: String,
    /// Identifier of the form's type.
    pub form_type: FormTypeId,
    /// Display label, if configured.
    pub label: Option<String>,
    /// Template block used to render the form.
    pub block_name: Option<String>,
    /// Whether the form needs multipart submission.
    pub multipart: bool,
    /// Current form data.
    pub data: Value,
}

/// View of a whole mapped collection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollectionView {
    /// Whether new elements may be added on submission.
    pub allow_add: bool,
    /// Whether missing elements are removed on submission.
    pub allow_delete: bool,
    /// Whether any child or the prototype needs multipart submission.
    pub multipart: bool,
    /// Child views in collection order.
    pub children: Vec<FormView>,
    /// Template view for new elements.
    pub prototype: Option<FormView>,
}
