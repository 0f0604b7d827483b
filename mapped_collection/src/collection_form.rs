//! The collection form facade.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    ChildForm, ChildForms, Collection, CollectionOptions, CollectionResult, CollectionView,
    ElementKey, FormFactory, SubmitStage, Synchronizer, build_prototype,
};

/// A resizable collection of child forms whose types follow each element's
/// discriminator.
///
/// The facade owns the child set, the backing collection, and the optional
/// prototype. Lifecycle methods delegate to a [`Synchronizer`]; errors abort
/// the running stage and leave whatever state it reached in place.
#[derive(Clone, Debug)]
pub struct MappedCollection {
    synchronizer: Synchronizer,
    children: ChildForms,
    data: Collection,
    prototype: Option<ChildForm>,
    submitted: bool,
}

impl MappedCollection {
    /// Validate `options` and build an empty collection form.
    ///
    /// The prototype is only built when additions are allowed and a
    /// prototype descriptor is configured.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MappedCollectionError::InvalidConfiguration`] for an
    /// empty map or invalid discriminator path, and
    /// [`crate::MappedCollectionError::UnknownFormType`] when the map or the
    /// prototype names an unregistered form type.
    pub fn build(factory: Arc<FormFactory>, options: &CollectionOptions) -> CollectionResult<Self> {
        let prototype = match options.prototype.descriptor() {
            Some(descriptor) if options.allow_add => Some(build_prototype(
                &factory,
                descriptor,
                &options.prototype_name,
                &options.child_options(),
            )?),
            _ => None,
        };
        let synchronizer = Synchronizer::new(factory, options)?;
        debug!(
            types = synchronizer.types().len(),
            allow_add = options.allow_add,
            allow_delete = options.allow_delete,
            prototype = prototype.is_some(),
            "built mapped collection"
        );
        Ok(Self {
            synchronizer,
            children: ChildForms::new(),
            data: Collection::new(),
            prototype,
            submitted: false,
        })
    }

    /// Builder-style variant of [`MappedCollection::set_data`].
    ///
    /// # Errors
    ///
    /// Propagates any error from [`MappedCollection::set_data`].
    pub fn with_data(mut self, data: Value) -> CollectionResult<Self> {
        self.set_data(data)?;
        Ok(self)
    }

    /// Replace the backing collection and rebuild every child from it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MappedCollectionError::WrongShape`] for scalar data,
    /// [`crate::MappedCollectionError::MissingDiscriminator`] or
    /// [`crate::MappedCollectionError::UnmappedType`] for an element that
    /// cannot be typed.
    pub fn set_data(&mut self, data: Value) -> CollectionResult<()> {
        self.data = self.synchronizer.assign_data(&mut self.children, data)?;
        Synchronizer::bind(&mut self.children, &self.data);
        self.submitted = false;
        Ok(())
    }

    /// Submit raw `input` through every [`SubmitStage`] in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a stage; later stages do not run.
    pub fn submit(&mut self, input: Value) -> CollectionResult<()> {
        let mut raw = input;
        let mut submitted = Collection::new();
        for stage in SubmitStage::ORDER {
            trace!(%stage, "running submission stage");
            match stage {
                SubmitStage::PreSubmit => {
                    let reconciled = self.synchronizer.pre_submit(
                        &mut self.children,
                        self.data.clone(),
                        std::mem::take(&mut raw),
                    )?;
                    self.data = reconciled.data;
                    submitted = reconciled.input;
                    Synchronizer::bind(&mut self.children, &self.data);
                }
                SubmitStage::MergeFields => {
                    merge_fields(&mut self.children, &mut self.data, &submitted);
                }
                SubmitStage::PostSubmit => {
                    self.data = self
                        .synchronizer
                        .post_submit(&self.children, self.data.to_value())?;
                }
            }
        }
        self.submitted = true;
        debug!(children = self.children.len(), "submitted mapped collection");
        Ok(())
    }

    /// The backing collection as JSON.
    #[must_use]
    pub fn data(&self) -> Value {
        self.data.to_value()
    }

    /// The backing collection.
    #[must_use]
    pub const fn collection(&self) -> &Collection {
        &self.data
    }

    /// The live child forms.
    #[must_use]
    pub const fn children(&self) -> &ChildForms {
        &self.children
    }

    /// The child at `key`.
    #[must_use]
    pub fn get(&self, key: &ElementKey) -> Option<&ChildForm> {
        self.children.get(key)
    }

    /// Returns `true` when a child exists at `key`.
    #[must_use]
    pub fn has(&self, key: &ElementKey) -> bool {
        self.children.contains_key(key)
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` when there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` once a submission has completed.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// The prototype form, if one was built.
    #[must_use]
    pub const fn prototype(&self) -> Option<&ChildForm> {
        self.prototype.as_ref()
    }

    /// Whether submissions may add elements.
    #[must_use]
    pub const fn allow_add(&self) -> bool {
        self.synchronizer.allow_add()
    }

    /// Whether submissions may remove elements.
    #[must_use]
    pub const fn allow_delete(&self) -> bool {
        self.synchronizer.allow_delete()
    }

    /// Whether any child or the prototype needs multipart submission.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.children.iter().any(|(_, child)| child.is_multipart())
            || self.prototype.as_ref().is_some_and(ChildForm::is_multipart)
    }

    /// Render metadata for view layers.
    #[must_use]
    pub fn create_view(&self) -> CollectionView {
        CollectionView {
            allow_add: self.allow_add(),
            allow_delete: self.allow_delete(),
            multipart: self.is_multipart(),
            children: self
                .children
                .iter()
                .map(|(_, child)| child.create_view())
                .collect(),
            prototype: self.prototype.as_ref().map(ChildForm::create_view),
        }
    }
}

fn merge_fields(children: &mut ChildForms, data: &mut Collection, submitted: &Collection) {
    for (key, child) in children.iter_mut() {
        child.submit(submitted.get(key).cloned().unwrap_or(Value::Null));
        trace!(key = %key, "merged child data");
        data.insert(key.clone(), child.data().clone());
    }
}
