//! Unit tests for the three synchronisation events.

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::{JsonFormType, MappedCollectionError, TypeDescriptor};

fn kind(name: &str) -> JsonFormType {
    JsonFormType::new(format!("{name}_form")).with_empty_data(json!({"type": name, "data": null}))
}

fn options(allow_add: bool, allow_delete: bool) -> CollectionOptions {
    CollectionOptions::new()
        .with_type("bar", TypeDescriptor::new("bar_form"))
        .with_type("baz", TypeDescriptor::new("baz_form"))
        .with_allow_add(allow_add)
        .with_allow_delete(allow_delete)
}

#[fixture]
fn factory() -> Arc<FormFactory> {
    Arc::new(
        FormFactory::new()
            .with_type(kind("bar"))
            .with_type(kind("baz")),
    )
}

fn synchronizer(factory: Arc<FormFactory>, allow_add: bool, allow_delete: bool) -> Synchronizer {
    Synchronizer::new(factory, &options(allow_add, allow_delete)).expect("valid configuration")
}

fn element(kind: &str, data: &str) -> Value {
    json!({"type": kind, "data": data})
}

fn keys(children: &ChildForms) -> Vec<ElementKey> {
    children.keys().cloned().collect()
}

#[rstest]
fn unknown_form_types_fail_at_construction(factory: Arc<FormFactory>) {
    let options = options(false, false).with_type("qux", TypeDescriptor::new("qux_form"));
    let err = Synchronizer::new(factory, &options).expect_err("qux_form is unregistered");
    assert!(matches!(err, MappedCollectionError::UnknownFormType { .. }));
}

#[rstest]
fn assignment_replaces_every_child(factory: Arc<FormFactory>) {
    let sync = synchronizer(factory, false, false);
    let mut children = ChildForms::new();
    sync.assign_data(&mut children, json!([element("bar", "A"), element("baz", "B")]))
        .expect("valid data");
    assert_eq!(children.len(), 2);

    let data = sync
        .assign_data(&mut children, json!([element("baz", "C")]))
        .expect("valid data");
    assert_eq!(keys(&children), [ElementKey::Index(0)]);
    assert_eq!(
        children.get(&ElementKey::Index(0)).map(|child| child.form_type().as_str()),
        Some("baz_form")
    );
    assert_eq!(data.len(), 1);
}

#[rstest]
fn assignment_keeps_named_keys_in_order(factory: Arc<FormFactory>) {
    let sync = synchronizer(factory, false, false);
    let mut children = ChildForms::new();
    sync.assign_data(
        &mut children,
        json!({"outro": element("baz", "B"), "intro": element("bar", "A")}),
    )
    .expect("valid data");
    assert_eq!(
        keys(&children),
        [ElementKey::from("outro"), ElementKey::from("intro")]
    );
}

#[rstest]
#[case::null(Value::Null, 0)]
#[case::empty_list(json!([]), 0)]
#[case::empty_map(json!({}), 0)]
fn assignment_treats_null_as_empty(
    factory: Arc<FormFactory>,
    #[case] data: Value,
    #[case] expected: usize,
) {
    let sync = synchronizer(factory, false, false);
    let mut children = ChildForms::new();
    sync.assign_data(&mut children, data).expect("valid data");
    assert_eq!(children.len(), expected);
}

#[rstest]
#[case::number(LifecycleEvent::AssignData, json!(42))]
#[case::string(LifecycleEvent::AssignData, json!("bar"))]
#[case::submitted_number(LifecycleEvent::PreSubmit, json!(7))]
#[case::extracted_boolean(LifecycleEvent::PostSubmit, json!(true))]
fn scalar_data_is_rejected(
    factory: Arc<FormFactory>,
    #[case] event: LifecycleEvent,
    #[case] value: Value,
) {
    let sync = synchronizer(factory, true, true);
    let mut children = ChildForms::new();
    let err = match event {
        LifecycleEvent::AssignData => sync.assign_data(&mut children, value).map(drop),
        LifecycleEvent::PreSubmit => sync
            .pre_submit(&mut children, Collection::new(), value)
            .map(drop),
        _ => sync.post_submit(&children, value).map(drop),
    }
    .expect_err("scalars are not collections");
    assert!(matches!(
        err,
        MappedCollectionError::WrongShape { event: found, .. } if found == event
    ));
}

#[rstest]
fn empty_string_submissions_are_empty(factory: Arc<FormFactory>) {
    let sync = synchronizer(factory, false, true);
    let mut children = ChildForms::new();
    let data = sync
        .assign_data(&mut children, json!([element("bar", "A")]))
        .expect("valid data");
    let reconciled = sync
        .pre_submit(&mut children, data, json!(""))
        .expect("empty string is empty input");
    assert!(children.is_empty());
    assert_eq!(reconciled.removed, [ElementKey::Index(0)]);
}

#[rstest]
#[case::without_delete(false, 2)]
#[case::with_delete(true, 1)]
fn missing_entries_are_removed_only_with_delete(
    factory: Arc<FormFactory>,
    #[case] allow_delete: bool,
    #[case] expected: usize,
) {
    let sync = synchronizer(factory, false, allow_delete);
    let mut children = ChildForms::new();
    let data = sync
        .assign_data(&mut children, json!([element("bar", "A"), element("bar", "B")]))
        .expect("valid data");
    sync.pre_submit(&mut children, data, json!([element("bar", "C")]))
        .expect("valid input");
    assert_eq!(children.len(), expected);
}

#[rstest]
#[case::without_add(false, 1)]
#[case::with_add(true, 2)]
fn new_entries_are_added_only_with_add(
    factory: Arc<FormFactory>,
    #[case] allow_add: bool,
    #[case] expected: usize,
) {
    let sync = synchronizer(factory, allow_add, false);
    let mut children = ChildForms::new();
    let data = sync
        .assign_data(&mut children, json!([element("bar", "A")]))
        .expect("valid data");
    let reconciled = sync
        .pre_submit(
            &mut children,
            data,
            json!([element("bar", "A"), element("baz", "B")]),
        )
        .expect("valid input");
    assert_eq!(children.len(), expected);
    assert_eq!(reconciled.added.len(), expected - 1);
}

#[rstest]
fn type_changes_seed_the_new_empty_value(factory: Arc<FormFactory>) {
    let sync = synchronizer(factory, false, false);
    let mut children = ChildForms::new();
    let data = sync
        .assign_data(&mut children, json!([element("bar", "A"), element("bar", "B")]))
        .expect("valid data");
    let reconciled = sync
        .pre_submit(
            &mut children,
            data,
            json!([element("baz", "C"), element("bar", "B")]),
        )
        .expect("valid input");

    assert_eq!(reconciled.type_changed, [ElementKey::Index(0)]);
    assert_eq!(
        reconciled.data.into_value(),
        json!([{"type": "baz", "data": null}, element("bar", "B")])
    );
    assert_eq!(
        children.get(&ElementKey::Index(0)).map(|child| child.form_type().as_str()),
        Some("baz_form")
    );
}

#[rstest]
fn unchanged_types_still_rebuild_without_seeding(factory: Arc<FormFactory>) {
    let sync = synchronizer(factory, false, false);
    let mut children = ChildForms::new();
    let data = sync
        .assign_data(&mut children, json!([element("bar", "A")]))
        .expect("valid data");
    Synchronizer::bind(&mut children, &data);
    let reconciled = sync
        .pre_submit(&mut children, data, json!([element("bar", "C")]))
        .expect("valid input");

    assert!(reconciled.type_changed.is_empty());
    assert_eq!(reconciled.data.into_value(), json!([element("bar", "A")]));
    assert!(
        children
            .get(&ElementKey::Index(0))
            .is_some_and(|child| child.data().is_null()),
        "rebuilt children start unbound"
    );
}

#[rstest]
fn null_entries_are_pruned_before_typing_fails(factory: Arc<FormFactory>) {
    let sync = synchronizer(factory, false, true);
    let mut children = ChildForms::new();
    let data = sync
        .assign_data(&mut children, json!([element("bar", "A"), element("bar", "B")]))
        .expect("valid data");
    let err = sync
        .pre_submit(&mut children, data, json!([element("bar", "A"), null]))
        .expect_err("null entry has no discriminator");

    assert!(matches!(
        err,
        MappedCollectionError::MissingDiscriminator { ref key, .. } if *key == ElementKey::Index(1)
    ));
    assert_eq!(keys(&children), [ElementKey::Index(0)]);
}

#[rstest]
#[case::missing(json!([{"data": "A"}]))]
#[case::null(json!([{"type": null}]))]
fn submitted_entries_need_a_discriminator(factory: Arc<FormFactory>, #[case] input: Value) {
    let sync = synchronizer(factory, true, false);
    let mut children = ChildForms::new();
    let err = sync
        .pre_submit(&mut children, Collection::new(), input)
        .expect_err("entry is untyped");
    assert!(matches!(
        err,
        MappedCollectionError::MissingDiscriminator { ref key, .. } if *key == ElementKey::Index(0)
    ));
}

#[rstest]
fn unmapped_discriminators_list_valid_values(factory: Arc<FormFactory>) {
    let sync = synchronizer(factory, false, false);
    let mut children = ChildForms::new();
    let err = sync
        .assign_data(&mut children, json!([element("foo", "A")]))
        .expect_err("foo is unmapped");
    match err {
        MappedCollectionError::UnmappedType { value, valid } => {
            assert_eq!(value, "foo");
            assert_eq!(valid, ["bar", "baz"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
#[case::keeps_orphans(false, json!([element("bar", "A"), element("bar", "B")]))]
#[case::prunes_orphans(true, json!([element("bar", "A")]))]
fn extraction_prunes_only_with_delete(
    factory: Arc<FormFactory>,
    #[case] allow_delete: bool,
    #[case] expected: Value,
) {
    let sync = synchronizer(factory, false, allow_delete);
    let mut children = ChildForms::new();
    sync.assign_data(&mut children, json!([element("bar", "A")]))
        .expect("valid data");
    let data = sync
        .post_submit(
            &children,
            json!([element("bar", "A"), element("bar", "B")]),
        )
        .expect("valid data");
    assert_eq!(data.into_value(), expected);
}
