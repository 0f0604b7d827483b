//! Discriminated, resizable collection forms.
//!
//! A [`MappedCollection`] keeps an ordered set of child forms aligned with a
//! heterogeneous backing collection. The form type of each element is chosen
//! at runtime by reading a discriminator (for example `"type"`) from the
//! element's data and looking it up in a [`TypeMap`].
//!
//! Synchronisation happens at three lifecycle points, each implemented by the
//! [`Synchronizer`]:
//!
//! - assigning data replaces every child;
//! - pre-submission reconciliation adds, removes, and rebuilds children from
//!   the raw submitted input, seeding an empty value when an element changes
//!   type;
//! - post-submission extraction prunes data entries whose child was removed.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use mapped_collection::{
//!     CollectionOptions, FormFactory, JsonFormType, MappedCollection, TypeDescriptor,
//! };
//! use serde_json::json;
//!
//! let factory = Arc::new(
//!     FormFactory::new()
//!         .with_type(JsonFormType::new("text_block"))
//!         .with_type(JsonFormType::new("image_block")),
//! );
//! let options = CollectionOptions::new()
//!     .with_type("text", TypeDescriptor::new("text_block"))
//!     .with_type("image", TypeDescriptor::new("image_block"))
//!     .with_allow_add(true);
//!
//! let mut blocks = MappedCollection::build(factory, &options)?;
//! blocks.set_data(json!([{"type": "text", "body": "hello"}]))?;
//! blocks.submit(json!([
//!     {"type": "text", "body": "hello"},
//!     {"type": "image", "src": "cat.png"},
//! ]))?;
//!
//! assert_eq!(blocks.len(), 2);
//! assert_eq!(blocks.data()[1]["src"], "cat.png");
//! # Ok::<_, mapped_collection::MappedCollectionError>(())
//! ```

pub use mapped_collection_macros::MappedVariants;

pub mod access;
mod collection;
mod collection_form;
mod discriminator;
mod error;
pub mod form;
mod key;
mod options;
mod pipeline;
mod prototype;
mod result_ext;
mod sync;
mod type_map;

pub use collection::Collection;
pub use collection_form::MappedCollection;
pub use discriminator::{Discriminator, DiscriminatorResolver};
pub use error::{CollectionResult, MappedCollectionError};
pub use form::{
    ChildForm, ChildForms, CollectionView, FormFactory, FormType, FormTypeId, FormView,
    JsonFormType,
};
pub use key::ElementKey;
pub use options::{CollectionOptions, PrototypeOption};
pub use pipeline::{LifecycleEvent, SubmitStage};
pub use prototype::build_prototype;
pub use result_ext::CollectionResultExt;
pub use sync::{Reconciled, Synchronizer};
pub use type_map::{MappedVariants, TypeDescriptor, TypeMap};
