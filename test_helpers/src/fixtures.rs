//! Fixture form types and element builders.
//!
//! Three element kinds are registered: `bar`, `baz`, and `qux`. Each kind is
//! handled by a `<kind>_form` type whose empty value is
//! `{"type": <kind>, "data": null}`. Only `bar_form` requires multipart
//! submission.

use std::sync::Arc;

use mapped_collection::{CollectionOptions, FormFactory, JsonFormType, TypeDescriptor};
use serde_json::{Value, json};

/// Element kinds known to [`factory`].
pub const KINDS: [&str; 3] = ["bar", "baz", "qux"];

/// Form type handling elements of `kind`.
#[must_use]
pub fn form_type(kind: &str) -> JsonFormType {
    JsonFormType::new(form_type_name(kind))
        .with_empty_data(empty(kind))
        .with_multipart(kind == "bar")
}

/// Name of the form type handling `kind`.
#[must_use]
pub fn form_type_name(kind: &str) -> String {
    format!("{kind}_form")
}

/// A factory with every fixture form type registered.
#[must_use]
pub fn factory() -> Arc<FormFactory> {
    let mut factory = FormFactory::new();
    for kind in KINDS {
        factory.register(form_type(kind));
    }
    Arc::new(factory)
}

/// Options mapping `bar` and `baz`; `qux` is left unmapped.
#[must_use]
pub fn options() -> CollectionOptions {
    CollectionOptions::new()
        .with_type("bar", TypeDescriptor::new(form_type_name("bar")))
        .with_type("baz", TypeDescriptor::new(form_type_name("baz")))
}

/// An element of `kind` carrying `data`.
#[must_use]
pub fn element(kind: &str, data: &str) -> Value {
    json!({"type": kind, "data": data})
}

/// The empty value of `kind`.
#[must_use]
pub fn empty(kind: &str) -> Value {
    json!({"type": kind, "data": null})
}
