//! Template form rendered by views to add new elements.

use serde_json::{Map, Value};
use tracing::debug;

use crate::{ChildForm, CollectionResult, FormFactory, TypeDescriptor};

/// Build the unbound prototype form named `name`.
///
/// The label defaults to `<name>label__`; `options` replace it and any other
/// default key by key. The prototype never maps onto collection data.
///
/// ```rust
/// use mapped_collection::{FormFactory, JsonFormType, TypeDescriptor, build_prototype};
/// use serde_json::Map;
///
/// let factory = FormFactory::new().with_type(JsonFormType::new("bar_form"));
/// let prototype =
///     build_prototype(&factory, &TypeDescriptor::new("bar_form"), "__name__", &Map::new())?;
/// assert_eq!(prototype.name(), "__name__");
/// assert_eq!(prototype.label(), Some("__name__label__"));
/// assert!(!prototype.is_bound());
/// # Ok::<_, mapped_collection::MappedCollectionError>(())
/// ```
///
/// # Errors
///
/// Returns [`crate::MappedCollectionError::UnknownFormType`] when the
/// descriptor names an unregistered form type.
pub fn build_prototype(
    factory: &FormFactory,
    descriptor: &TypeDescriptor,
    name: &str,
    options: &Map<String, Value>,
) -> CollectionResult<ChildForm> {
    let mut prototype_options = Map::new();
    prototype_options.insert("label".to_owned(), Value::String(format!("{name}label__")));
    for (key, value) in options {
        prototype_options.insert(key.clone(), value.clone());
    }
    let prototype = factory.create_unbound(name, descriptor, &prototype_options)?;
    debug!(name, form_type = %prototype.form_type(), "built prototype form");
    Ok(prototype)
}
