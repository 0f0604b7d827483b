//! Crate path resolution for dependency aliasing support.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed enum attribute.
///
/// Defaults to `mapped_collection` when no `#[mapped(crate = "...")]`
/// override is present.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { mapped_collection }, |path| quote! { #path })
}
