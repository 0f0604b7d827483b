//! Procedural macros for `mapped_collection`.
//!
//! The [`MappedVariants`](derive_mapped_variants) derive turns a fieldless
//! enum into a closed set of element kinds. Each variant contributes one
//! discriminator value and the form type that handles it. Discriminators
//! default to the `snake_case` variant name and form types default to the
//! discriminator.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `mapped_collection::MappedVariants`.
///
/// Recognised attributes:
///
/// - `#[mapped(crate = "path")]` on the enum overrides the path used to
///   reach `mapped_collection` when the dependency is renamed.
/// - `#[mapped(discriminator = "...", form_type = "...", data_class = "...")]`
///   on a variant overrides its discriminator, selects its form type, and
///   attaches a data class.
#[proc_macro_derive(MappedVariants, attributes(mapped))]
pub fn derive_mapped_variants(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
