//! Behavioural tests for the mapped collection facade.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]

use anyhow::Result;
use mapped_collection::{
    CollectionOptions, ElementKey, MappedCollection, MappedCollectionError, PrototypeOption,
    TypeDescriptor,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use test_helpers::fixtures::{element, empty, factory, options};

fn build(options: &CollectionOptions) -> MappedCollection {
    MappedCollection::build(factory(), options).expect("valid configuration")
}

#[fixture]
fn resizable() -> CollectionOptions {
    options().with_allow_add(true).with_allow_delete(true)
}

fn form_types(collection: &MappedCollection) -> Vec<(ElementKey, String)> {
    collection
        .children()
        .iter()
        .map(|(key, child)| (key.clone(), child.form_type().as_str().to_owned()))
        .collect()
}

#[test]
fn collections_start_empty() {
    let collection = build(&options());
    assert!(collection.is_empty());
    assert_eq!(collection.data(), json!([]));
    assert!(!collection.is_submitted());
}

#[test]
fn assignment_resizes_the_child_set() -> Result<()> {
    let mut collection = build(&options());
    collection.set_data(json!([element("bar", "A"), element("baz", "B")]))?;
    assert_eq!(
        form_types(&collection),
        [
            (ElementKey::Index(0), "bar_form".to_owned()),
            (ElementKey::Index(1), "baz_form".to_owned()),
        ]
    );

    collection.set_data(json!([element("baz", "C")]))?;
    assert_eq!(form_types(&collection), [(ElementKey::Index(0), "baz_form".to_owned())]);
    assert_eq!(
        collection.get(&ElementKey::Index(0)).map(|child| child.data().clone()),
        Some(element("baz", "C"))
    );
    Ok(())
}

#[test]
fn submission_does_not_shrink_without_delete() -> Result<()> {
    let mut collection = build(&options());
    collection.set_data(json!([element("bar", "A"), element("bar", "B")]))?;
    collection.submit(json!([element("bar", "C")]))?;

    assert_eq!(collection.len(), 2);
    assert_eq!(collection.data(), json!([element("bar", "C"), empty("bar")]));
    assert!(collection.is_submitted());
    Ok(())
}

#[test]
fn submission_deletes_missing_entries_with_delete() -> Result<()> {
    let mut collection = build(&options().with_allow_delete(true));
    collection.set_data(json!([element("bar", "A"), element("bar", "B")]))?;
    collection.submit(json!([element("bar", "C")]))?;

    assert_eq!(collection.len(), 1);
    assert!(!collection.has(&ElementKey::Index(1)));
    assert_eq!(collection.data(), json!([element("bar", "C")]));
    Ok(())
}

#[rstest]
#[case::allowed(true, json!([element("bar", "A"), element("baz", "B")]))]
#[case::ignored(false, json!([element("bar", "A")]))]
fn submission_adds_entries_only_with_add(
    #[case] allow_add: bool,
    #[case] expected: Value,
) -> Result<()> {
    let mut collection = build(&options().with_allow_add(allow_add));
    collection.set_data(json!([element("bar", "A")]))?;
    collection.submit(json!([element("bar", "A"), element("baz", "B")]))?;
    assert_eq!(collection.data(), expected);
    Ok(())
}

#[test]
fn type_changes_rebuild_from_the_new_empty_value() -> Result<()> {
    let mut collection = build(&options());
    collection.set_data(json!([element("bar", "A")]))?;
    collection.submit(json!([{"type": "baz"}]))?;

    assert_eq!(form_types(&collection), [(ElementKey::Index(0), "baz_form".to_owned())]);
    assert_eq!(collection.data(), json!([empty("baz")]));
    Ok(())
}

#[test]
fn type_changes_merge_submitted_fields() -> Result<()> {
    let mut collection = build(&options());
    collection.set_data(json!([element("bar", "A")]))?;
    collection.submit(json!([element("baz", "C")]))?;
    assert_eq!(collection.data(), json!([element("baz", "C")]));
    Ok(())
}

#[rstest]
#[case::assigned(true)]
#[case::submitted(false)]
fn unmapped_types_report_valid_values(#[case] assign: bool) {
    let mut collection = build(&options().with_allow_add(true));
    let value = json!([element("qux", "A")]);
    let err = if assign {
        collection.set_data(value)
    } else {
        collection.submit(value)
    }
    .expect_err("qux is not mapped");

    assert!(matches!(
        &err,
        MappedCollectionError::UnmappedType { value, valid }
            if value == "qux" && valid == &["bar", "baz"]
    ));
    assert_eq!(
        err.to_string(),
        "Unexpected type value \"qux\", valid value(s) are bar, baz"
    );
}

#[rstest]
#[case::number(json!(42))]
#[case::string(json!("bar"))]
#[case::boolean(json!(false))]
fn scalar_data_is_the_wrong_shape(#[case] value: Value) {
    let mut collection = build(&options());
    let err = collection.set_data(value).expect_err("scalars are rejected");
    assert!(matches!(err, MappedCollectionError::WrongShape { .. }));
}

#[rstest]
#[case::list(json!([element("bar", "A"), element("baz", "B")]))]
#[case::keyed(json!({"intro": element("baz", "A"), "body": element("bar", "B")}))]
#[case::sparse(json!({"3": element("bar", "A"), "1": element("baz", "B")}))]
fn assignment_round_trips(#[case] data: Value) -> Result<()> {
    let collection = build(&options()).with_data(data.clone())?;
    assert_eq!(collection.data(), data);
    Ok(())
}

#[rstest]
fn submission_round_trips_unchanged_input(resizable: CollectionOptions) -> Result<()> {
    let data = json!({"intro": element("baz", "A"), "body": element("bar", "B")});
    let mut collection = build(&resizable).with_data(data.clone())?;
    collection.submit(data.clone())?;
    assert_eq!(collection.data(), data);
    Ok(())
}

#[test]
fn empty_submissions_clear_deletable_collections() -> Result<()> {
    let mut collection = build(&options().with_allow_delete(true));
    collection.set_data(json!([element("bar", "A")]))?;
    collection.submit(json!(""))?;
    assert!(collection.is_empty());
    assert_eq!(collection.data(), json!([]));
    Ok(())
}

#[test]
fn empty_maps_are_invalid() {
    let err = MappedCollection::build(factory(), &CollectionOptions::new())
        .expect_err("map is required");
    assert!(matches!(err, MappedCollectionError::InvalidConfiguration { .. }));
}

#[test]
fn unregistered_form_types_fail_at_build() {
    let options = options().with_type("quux", TypeDescriptor::new("quux_form"));
    let err = MappedCollection::build(factory(), &options).expect_err("quux_form is unknown");
    assert!(matches!(
        err,
        MappedCollectionError::UnknownFormType { ref name } if name == "quux_form"
    ));
}

#[test]
fn custom_discriminator_paths_resolve_indexed_keys() -> Result<()> {
    let options = CollectionOptions::new()
        .with_discriminator("meta.kind")
        .with_type("bar", TypeDescriptor::new("bar_form"));
    let collection = build(&options).with_data(json!([
        {"meta": {"kind": "bar"}},
        {"meta.kind": "bar"},
    ]))?;
    assert_eq!(collection.len(), 2);
    Ok(())
}

#[test]
fn missing_discriminators_abort_submission() -> Result<()> {
    let mut collection = build(&options().with_allow_add(true));
    collection.set_data(json!([element("bar", "A")]))?;
    let err = collection
        .submit(json!([element("bar", "A"), {"data": "B"}]))
        .expect_err("second entry has no type");
    assert!(matches!(
        err,
        MappedCollectionError::MissingDiscriminator { ref key, .. } if *key == ElementKey::Index(1)
    ));
    assert!(!collection.is_submitted());
    Ok(())
}

mod prototype {
    use super::*;

    fn with_prototype(prototype: PrototypeOption) -> CollectionOptions {
        options().with_allow_add(true).with_prototype(prototype)
    }

    #[test]
    fn defaults_name_and_label() {
        let collection = build(&with_prototype(PrototypeOption::Enabled(TypeDescriptor::new(
            "baz_form",
        ))));
        let prototype = collection.prototype().expect("prototype is enabled");
        assert_eq!(prototype.name(), "__name__");
        assert_eq!(prototype.label(), Some("__name__label__"));
        assert!(!prototype.is_bound());
    }

    #[test]
    fn honours_custom_names_and_labels() {
        let options = with_prototype(PrototypeOption::Enabled(TypeDescriptor::new("baz_form")))
            .with_prototype_name("__block__")
            .with_option("label", json!("New block"));
        let view = build(&options).create_view();
        let prototype = view.prototype.expect("prototype is enabled");
        assert_eq!(prototype.name, "__block__");
        assert_eq!(prototype.label.as_deref(), Some("New block"));
        assert_eq!(prototype.block_name.as_deref(), Some("entry"));
    }

    #[rstest]
    #[case::disabled(options().with_allow_add(true))]
    #[case::without_add(
        options().with_prototype(PrototypeOption::Enabled(TypeDescriptor::new("bar_form")))
    )]
    fn is_only_built_when_adding(#[case] options: CollectionOptions) {
        assert!(build(&options).prototype().is_none());
    }

    #[rstest]
    #[case::multipart_prototype("bar_form", true)]
    #[case::plain_prototype("baz_form", false)]
    fn propagates_multipart(#[case] form_type: &str, #[case] multipart: bool) {
        let view = build(&with_prototype(PrototypeOption::Enabled(TypeDescriptor::new(
            form_type,
        ))))
        .create_view();
        assert_eq!(view.multipart, multipart);
        assert!(view.allow_add);
        assert!(!view.allow_delete);
    }

    #[test]
    fn never_leaks_into_data() -> Result<()> {
        let mut collection = build(&with_prototype(PrototypeOption::Enabled(
            TypeDescriptor::new("bar_form"),
        )));
        collection.set_data(json!([element("baz", "A")]))?;
        collection.submit(json!([element("baz", "A"), element("bar", "B")]))?;

        let data = collection.data();
        assert!(!data.to_string().contains("__name__"));
        assert_eq!(data, json!([element("baz", "A"), element("bar", "B")]));
        Ok(())
    }
}

#[test]
fn views_list_children_in_order() -> Result<()> {
    let collection = build(&options()).with_data(json!({
        "second": element("baz", "B"),
        "first": element("bar", "A"),
    }))?;
    let view = collection.create_view();
    let names: Vec<_> = view.children.iter().map(|child| child.name.as_str()).collect();
    assert_eq!(names, ["second", "first"]);
    assert!(view.multipart, "bar_form children are multipart");
    assert!(view.prototype.is_none());
    assert!(view.children.iter().all(|child| child.block_name.as_deref() == Some("entry")));
    Ok(())
}
