//! Derive macros for gencraft.
//!
//! This crate provides procedural macros to automatically derive
//! generators for custom types.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Derive macro for automatically building a `Gen<T>` for a type.
///
/// Structs draw each field from its type's `Arbitrary` generator, in
/// declaration order, from one advancing seed. Enums pick a variant
/// uniformly and then draw that variant's fields the same way, so a
/// fieldless enum becomes a uniform choice among its constants.
///
/// # Example
///
/// ```rust,ignore
/// use gencraft::*;
///
/// #[derive(Generate, Debug, Clone, PartialEq)]
/// enum Country {
///     Germany,
///     Austria,
/// }
///
/// #[derive(Generate, Debug, Clone, PartialEq)]
/// struct Customer {
///     name: String,
///     country: Country,
/// }
///
/// let customers = Customer::generate();
/// ```
#[proc_macro_derive(Generate)]
pub fn derive_generate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate the `Arbitrary` impl and the inherent `generate()`.
fn generate_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let draw_body = match &input.data {
        Data::Struct(data) => draw_fields(quote! { Self }, &data.fields),
        Data::Enum(data) => generate_enum_impl(input, data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Generate derive macro does not support unions",
            ));
        }
    };

    let expanded = quote! {
        impl #impl_generics ::gencraft::Arbitrary for #name #ty_generics #where_clause {
            fn arbitrary() -> ::gencraft::Gen<Self> {
                ::gencraft::Gen::new(|seed: ::gencraft::Seed| {
                    #draw_body
                })
            }
        }

        impl #impl_generics #name #ty_generics #where_clause {
            /// Generator for this type.
            pub fn generate() -> ::gencraft::Gen<Self> {
                <Self as ::gencraft::Arbitrary>::arbitrary()
            }
        }
    };

    Ok(expanded)
}

/// Statements drawing every field in order, then building `constructor`.
///
/// Evaluates to `Ok((value, seed))` inside a draw closure whose seed is
/// bound to `seed`.
fn draw_fields(constructor: TokenStream2, fields: &Fields) -> TokenStream2 {
    let draw = |var: &syn::Ident, ty: &syn::Type| {
        quote! {
            let (#var, seed) = <#ty as ::gencraft::Arbitrary>::arbitrary().generate(seed)?;
        }
    };

    match fields {
        Fields::Named(fields) => {
            let vars: Vec<_> = (0..fields.named.len())
                .map(|i| format_ident!("field_{}", i))
                .collect();
            let draws = fields
                .named
                .iter()
                .zip(&vars)
                .map(|(field, var)| draw(var, &field.ty));
            let names = fields.named.iter().map(|field| &field.ident);

            quote! {
                #(#draws)*
                Ok((#constructor { #(#names: #vars),* }, seed))
            }
        }
        Fields::Unnamed(fields) => {
            let vars: Vec<_> = (0..fields.unnamed.len())
                .map(|i| format_ident!("field_{}", i))
                .collect();
            let draws = fields
                .unnamed
                .iter()
                .zip(&vars)
                .map(|(field, var)| draw(var, &field.ty));

            quote! {
                #(#draws)*
                Ok((#constructor(#(#vars),*), seed))
            }
        }
        Fields::Unit => quote! {
            Ok((#constructor, seed))
        },
    }
}

/// Generate the draw body for enums: a uniform selector, then the fields.
fn generate_enum_impl(
    input: &DeriveInput,
    data: &syn::DataEnum,
) -> Result<TokenStream2, syn::Error> {
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "Generate derive macro needs at least one variant",
        ));
    }

    let count = data.variants.len() as u64;
    let arms = data.variants.iter().enumerate().map(|(index, variant)| {
        let variant_name = &variant.ident;
        let index = index as u64;
        let body = draw_fields(quote! { Self::#variant_name }, &variant.fields);
        quote! {
            #index => { #body }
        }
    });

    Ok(quote! {
        let (selector, seed) = seed.next_bounded(#count);
        match selector {
            #(#arms)*
            _ => Err(::gencraft::GencraftError::NoAlternatives),
        }
    })
}
