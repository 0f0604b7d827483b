//! Code generation for `#[derive(MappedVariants)]`.

use proc_macro2::TokenStream;
use quote::quote;

use super::crate_path;
use super::parse::{VariantSpec, VariantsInput};

fn descriptor_tokens(krate: &TokenStream, variant: &VariantSpec) -> TokenStream {
    let form_type = &variant.form_type;
    variant.data_class.as_ref().map_or_else(
        || quote! { #krate::TypeDescriptor::new(#form_type) },
        |data_class| {
            quote! { #krate::TypeDescriptor::new(#form_type).with_data_class(#data_class) }
        },
    )
}

/// Generate the `MappedVariants` implementation for `input`.
pub(crate) fn generate(input: &VariantsInput) -> TokenStream {
    let krate = crate_path::resolve(input.crate_path.as_ref());
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let variant_idents: Vec<_> = input.variants.iter().map(|v| &v.ident).collect();
    let discriminators = input.variants.iter().map(|v| v.discriminator.as_str());
    let descriptors = input
        .variants
        .iter()
        .map(|variant| descriptor_tokens(&krate, variant));

    quote! {
        impl #impl_generics #krate::MappedVariants for #ident #ty_generics #where_clause {
            const VARIANTS: &'static [Self] = &[#(Self::#variant_idents),*];

            fn discriminator(self) -> &'static str {
                match self {
                    #(Self::#variant_idents => #discriminators,)*
                }
            }

            fn descriptor(self) -> #krate::TypeDescriptor {
                match self {
                    #(Self::#variant_idents => #descriptors,)*
                }
            }
        }
    }
}
