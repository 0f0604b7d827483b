//! Attribute parsing for `#[derive(MappedVariants)]`.

use std::collections::HashSet;

use heck::ToSnakeCase;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DeriveInput, Fields, Generics, Ident, LitStr};

/// Enum-level data needed by code generation.
pub(crate) struct VariantsInput {
    pub ident: Ident,
    pub generics: Generics,
    pub crate_path: Option<syn::Path>,
    pub variants: Vec<VariantSpec>,
}

/// One variant together with its resolved mapping.
pub(crate) struct VariantSpec {
    pub ident: Ident,
    pub discriminator: String,
    pub form_type: String,
    pub data_class: Option<String>,
}

#[derive(Default)]
struct VariantAttrs {
    discriminator: Option<String>,
    form_type: Option<String>,
    data_class: Option<String>,
}

/// Iterate all `#[mapped(...)]` attributes once and apply a callback.
fn parse_mapped<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("mapped")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let value = meta.value()?;
    value
        .parse::<LitStr>()
        .map_err(|err| syn::Error::new(err.span(), format!("{key} must be a string")))
}

fn non_empty(meta: &ParseNestedMeta, key: &str) -> syn::Result<String> {
    let lit = lit_str(meta, key)?;
    let value = lit.value();
    if value.is_empty() {
        return Err(syn::Error::new(lit.span(), format!("{key} cannot be empty")));
    }
    Ok(value)
}

fn parse_enum_attrs(attrs: &[Attribute]) -> syn::Result<Option<syn::Path>> {
    let mut crate_path = None;
    parse_mapped(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let lit = lit_str(meta, "crate")?;
            let path: syn::Path =
                syn::parse_str(&lit.value()).map_err(|e| syn::Error::new(lit.span(), e))?;
            crate_path = Some(path);
            Ok(())
        } else {
            Err(meta.error("unknown mapped attribute; expected `crate`"))
        }
    })?;
    Ok(crate_path)
}

fn parse_variant_attrs(attrs: &[Attribute]) -> syn::Result<VariantAttrs> {
    let mut out = VariantAttrs::default();
    parse_mapped(attrs, |meta| {
        match meta.path.get_ident().map(ToString::to_string).as_deref() {
            Some("discriminator") => {
                out.discriminator = Some(non_empty(meta, "discriminator")?);
                Ok(())
            }
            Some("form_type") => {
                out.form_type = Some(non_empty(meta, "form_type")?);
                Ok(())
            }
            Some("data_class") => {
                out.data_class = Some(non_empty(meta, "data_class")?);
                Ok(())
            }
            _ => Err(meta.error(
                "unknown mapped attribute; expected `discriminator`, `form_type`, or `data_class`",
            )),
        }
    })?;
    Ok(out)
}

/// Validate the derive input and resolve every variant's mapping.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<VariantsInput> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "MappedVariants can only be derived for enums",
        ));
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "MappedVariants requires at least one variant",
        ));
    }

    let crate_path = parse_enum_attrs(&input.attrs)?;
    let mut seen = HashSet::new();
    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.fields,
                "MappedVariants variants cannot carry fields",
            ));
        }
        let attrs = parse_variant_attrs(&variant.attrs)?;
        let discriminator = attrs
            .discriminator
            .unwrap_or_else(|| variant.ident.to_string().to_snake_case());
        if !seen.insert(discriminator.clone()) {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                format!("duplicate discriminator \"{discriminator}\""),
            ));
        }
        let form_type = attrs.form_type.unwrap_or_else(|| discriminator.clone());
        variants.push(VariantSpec {
            ident: variant.ident.clone(),
            discriminator,
            form_type,
            data_class: attrs.data_class,
        });
    }

    Ok(VariantsInput {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        crate_path,
        variants,
    })
}
