//! Child-set synchronisation at each lifecycle point.
//!
//! The [`Synchronizer`] never owns the backing collection: every event takes
//! it by value and hands it back, so the type-change mutation performed
//! during reconciliation is visible in the signature.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{
    ChildForm, ChildForms, Collection, CollectionOptions, CollectionResult, DiscriminatorResolver,
    ElementKey, FormFactory, LifecycleEvent, TypeMap,
};

/// Outcome of pre-submission reconciliation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciled {
    /// Backing collection, with empty values seeded for type changes.
    pub data: Collection,
    /// Normalised submitted input.
    pub input: Collection,
    /// Keys of children added for new entries.
    pub added: Vec<ElementKey>,
    /// Keys of children removed because their entry was not submitted.
    pub removed: Vec<ElementKey>,
    /// Keys whose discriminator changed.
    pub type_changed: Vec<ElementKey>,
}

/// Keeps a [`ChildForms`] set aligned with backing data and submissions.
#[derive(Clone, Debug)]
pub struct Synchronizer {
    factory: Arc<FormFactory>,
    types: TypeMap,
    resolver: DiscriminatorResolver,
    child_options: Map<String, Value>,
    allow_add: bool,
    allow_delete: bool,
}

impl Synchronizer {
    /// Validate `options` against `factory` and build a synchroniser.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MappedCollectionError::InvalidConfiguration`] for an
    /// empty map or an invalid discriminator path, and
    /// [`crate::MappedCollectionError::UnknownFormType`] when the map names a
    /// form type the factory does not know.
    pub fn new(factory: Arc<FormFactory>, options: &CollectionOptions) -> CollectionResult<Self> {
        let types = options.type_map()?;
        let resolver = DiscriminatorResolver::new(&options.discriminator)?;
        for descriptor in types.descriptors() {
            factory.form_type(descriptor.form_type())?;
        }
        Ok(Self {
            factory,
            types,
            resolver,
            child_options: options.child_options(),
            allow_add: options.allow_add,
            allow_delete: options.allow_delete,
        })
    }

    /// The configured type map.
    #[must_use]
    pub const fn types(&self) -> &TypeMap {
        &self.types
    }

    /// The configured discriminator resolver.
    #[must_use]
    pub const fn resolver(&self) -> &DiscriminatorResolver {
        &self.resolver
    }

    /// Whether submissions may add elements.
    #[must_use]
    pub const fn allow_add(&self) -> bool {
        self.allow_add
    }

    /// Whether submissions may remove elements.
    #[must_use]
    pub const fn allow_delete(&self) -> bool {
        self.allow_delete
    }

    /// Replace every child with one built for each entry of `data`.
    ///
    /// Afterwards the child set holds exactly the keys of the returned
    /// collection, in the same order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MappedCollectionError::WrongShape`] for scalar data,
    /// and a discriminator or lookup error for the first element that cannot
    /// be typed. Children built before the failure remain in place.
    pub fn assign_data(
        &self,
        children: &mut ChildForms,
        raw: Value,
    ) -> CollectionResult<Collection> {
        let data = Collection::from_value(raw, LifecycleEvent::AssignData)?;
        children.clear();
        for (key, value) in &data {
            let child = self.build_child(key, value)?;
            trace!(key = %key, form_type = %child.form_type(), "adding child");
            children.insert(key.clone(), child);
        }
        debug!(children = children.len(), "assigned collection data");
        Ok(data)
    }

    /// Reconcile the child set with raw submitted `input`.
    ///
    /// Children missing from the input, or whose entry is `null`, are removed
    /// when deletion is allowed.
    /// Every submitted entry with an existing child rebuilds that child from
    /// the entry's descriptor, and seeds the new descriptor's empty value into
    /// `data` when the stored element had a different discriminator. Entries
    /// without a child are added only when additions are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MappedCollectionError::WrongShape`] for scalar input,
    /// [`crate::MappedCollectionError::MissingDiscriminator`] or
    /// [`crate::MappedCollectionError::UnmappedType`] for an entry that cannot
    /// be typed.
    pub fn pre_submit(
        &self,
        children: &mut ChildForms,
        data: Collection,
        raw: Value,
    ) -> CollectionResult<Reconciled> {
        let input = Collection::from_submitted(raw, LifecycleEvent::PreSubmit)?;
        let mut reconciled = Reconciled {
            data,
            input: Collection::new(),
            added: Vec::new(),
            removed: Vec::new(),
            type_changed: Vec::new(),
        };

        if self.allow_delete {
            children.retain(|key, _| {
                let keep = input.get(key).is_some_and(|entry| !entry.is_null());
                if !keep {
                    trace!(key = %key, "removing child");
                    reconciled.removed.push(key.clone());
                }
                keep
            });
        }

        for (key, value) in &input {
            let discriminator = self.resolver.resolve(key, value)?;
            let descriptor = self.types.lookup(&discriminator)?;

            if children.contains_key(key) {
                let child = self
                    .factory
                    .create_child(key, descriptor, &self.child_options)?;
                trace!(key = %key, form_type = %child.form_type(), "rebuilding child");

                let previous = reconciled
                    .data
                    .get(key)
                    .and_then(|stored| self.resolver.try_resolve(stored));
                if previous.as_ref() != Some(&discriminator) {
                    trace!(key = %key, to = %discriminator, "element changed type");
                    self.resolver
                        .assign(&mut reconciled.data, key, child.empty_data())?;
                    reconciled.type_changed.push(key.clone());
                }
                children.insert(key.clone(), child);
            } else if self.allow_add {
                let child = self
                    .factory
                    .create_child(key, descriptor, &self.child_options)?;
                trace!(key = %key, form_type = %child.form_type(), "adding child");
                children.insert(key.clone(), child);
                reconciled.added.push(key.clone());
            } else {
                trace!(key = %key, "ignoring submitted entry without a child");
            }
        }

        debug!(
            children = children.len(),
            added = reconciled.added.len(),
            removed = reconciled.removed.len(),
            type_changed = reconciled.type_changed.len(),
            "reconciled submitted input"
        );
        reconciled.input = input;
        Ok(reconciled)
    }

    /// Drop data entries whose child no longer exists.
    ///
    /// Entries are only pruned when deletion is allowed; otherwise the data
    /// passes through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MappedCollectionError::WrongShape`] for scalar data.
    pub fn post_submit(&self, children: &ChildForms, raw: Value) -> CollectionResult<Collection> {
        let mut data = Collection::from_value(raw, LifecycleEvent::PostSubmit)?;
        if self.allow_delete {
            let before = data.len();
            data.retain(|key, _| children.contains_key(key));
            debug!(pruned = before - data.len(), "pruned submitted data");
        }
        Ok(data)
    }

    /// Bind each child to its entry in `data`, or to `null` when absent.
    pub fn bind(children: &mut ChildForms, data: &Collection) {
        for (key, child) in children.iter_mut() {
            child.set_data(data.get(key).cloned().unwrap_or(Value::Null));
        }
    }

    fn build_child(&self, key: &ElementKey, value: &Value) -> CollectionResult<ChildForm> {
        let discriminator = self.resolver.resolve(key, value)?;
        let descriptor = self.types.lookup(&discriminator)?;
        self.factory
            .create_child(key, descriptor, &self.child_options)
    }
}

#[cfg(test)]
mod tests;
