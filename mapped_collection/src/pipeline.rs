//! Lifecycle events and the ordered submission pipeline.

use std::fmt;

/// Synchronisation points at which the collection is reconciled.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum LifecycleEvent {
    /// The whole backing collection was replaced.
    AssignData,
    /// Raw submitted input arrived, before child forms absorb it.
    PreSubmit,
    /// Child forms absorbed the submission and wrote their data back.
    PostSubmit,
}

impl LifecycleEvent {
    /// Human-readable event name used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AssignData => "data assignment",
            Self::PreSubmit => "pre-submission",
            Self::PostSubmit => "post-submission",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stages run, in order, when a [`crate::MappedCollection`] is submitted.
///
/// [`SubmitStage::PostSubmit`] prunes stale keys, so it must follow
/// [`SubmitStage::MergeFields`], which only ever adds or overwrites entries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SubmitStage {
    /// Reconcile the child set against the raw input.
    PreSubmit,
    /// Submit every child and write its data back into the collection.
    MergeFields,
    /// Drop data entries that no longer have a child.
    PostSubmit,
}

impl SubmitStage {
    /// Every submission stage in execution order.
    pub const ORDER: [Self; 3] = [Self::PreSubmit, Self::MergeFields, Self::PostSubmit];

    /// Short stage name used in log events.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreSubmit => "pre_submit",
            Self::MergeFields => "merge_fields",
            Self::PostSubmit => "post_submit",
        }
    }
}

impl fmt::Display for SubmitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
