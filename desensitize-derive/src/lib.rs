//! Derive macro for `desensitize`.
//!
//! This crate generates the code behind `#[derive(Desensitize)]`. It:
//! - reads `#[desensitize(...)]` field attributes
//! - emits a `serde::Serialize` impl that writes masked output for
//!   annotated fields
//! - emits a `DesensitizeFields` impl for validating field configurations
//!
//! It does **not** implement any strategy. Those live in the main
//! `desensitize` crate and run when a value is serialized.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::needless_ifs,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::future_not_send,
    clippy::option_if_let_else,
    clippy::from_over_into,
    clippy::manual_inspect
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Fields, FieldsNamed, LitStr, Result, parse_macro_input, spanned::Spanned,
};

mod field;
mod generics;
use field::{FieldOptions, parse_field_options};
use generics::{field_bound, uses_type_params, with_predicates};

/// Derives `serde::Serialize` and `desensitize::DesensitizeFields` for
/// structs with named fields.
///
/// # Field Attributes
///
/// - **No annotation**: the field is serialized as-is and must implement
///   `serde::Serialize`.
///
/// - `#[desensitize(strategy = Email)]`: the field is serialized as the
///   strategy's output. The field must be textual (`String`, `&str`,
///   `Cow<str>`, `Option<String>`, ...). Absent values serialize as `none`.
///
/// Options, all but `strategy` optional:
///
/// | Option        | Meaning                                               |
/// |---------------|-------------------------------------------------------|
/// | `strategy`    | `All`, `Address`, `Email`, `Regex`, `Strip`, `Custom` |
/// | `value`       | regex for `Regex`, signed length for `Strip`          |
/// | `replacement` | replacement symbol, default `"*"`                     |
/// | `repeat`      | repeat a one-character replacement, default `true`    |
/// | `handler`     | `Default`-constructible handler type for `Custom`     |
/// | `rename`      | output key, default the field name                    |
///
/// Strategy names and STRIP lengths are checked at compile time. Each
/// field's configuration is resolved once, on first use, and cached for the
/// life of the program; an invalid regex fails serialization with a
/// field-scoped error. Call `DesensitizeFields::validate_fields()` at
/// startup to surface such errors early.
///
/// Enums, unions, and tuple structs are rejected at compile time.
#[proc_macro_derive(Desensitize, attributes(desensitize))]
pub fn derive_desensitize(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

struct AnnotatedField {
    member: syn::Ident,
    index: usize,
    name: String,
    key: LitStr,
    config: Option<(syn::Ident, FieldOptions)>,
    ty: syn::Type,
}

fn named_fields(input: &DeriveInput) -> Result<&FieldsNamed> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields),
            Fields::Unnamed(fields) => Err(syn::Error::new(
                fields.span(),
                "`Desensitize` requires named fields",
            )),
            Fields::Unit => Err(syn::Error::new(
                input.ident.span(),
                "`Desensitize` cannot be derived for unit structs",
            )),
        },
        Data::Enum(data) => Err(syn::Error::new(
            data.enum_token.span(),
            "`Desensitize` cannot be derived for enums",
        )),
        Data::Union(data) => Err(syn::Error::new(
            data.union_token.span(),
            "`Desensitize` cannot be derived for unions",
        )),
    }
}

fn collect_fields(fields: &FieldsNamed) -> Result<Vec<AnnotatedField>> {
    let mut collected = Vec::with_capacity(fields.named.len());
    for (index, field) in fields.named.iter().enumerate() {
        let Some(member) = field.ident.clone() else {
            return Err(syn::Error::new(field.span(), "expected a named field"));
        };
        let options = parse_field_options(&field.attrs)?;
        let raw = member.to_string();
        let name = raw.strip_prefix("r#").unwrap_or(&raw).to_owned();
        let key = options
            .as_ref()
            .and_then(|options| options.rename.clone())
            .unwrap_or_else(|| LitStr::new(&name, member.span()));
        let config =
            options.map(|options| (format_ident!("__DESENSITIZE_FIELD_{}", index), options));
        collected.push(AnnotatedField {
            member,
            index,
            name,
            key,
            config,
            ty: field.ty.clone(),
        });
    }
    Ok(collected)
}

/// Tokens building the `Config` of one annotated field.
fn config_builder(root: &TokenStream, options: &FieldOptions) -> TokenStream {
    let variant = options.strategy.variant(options.strategy_span);
    let value = options.value.as_ref().map(|value| quote! { .value(#value) });
    let replacement = options
        .replacement
        .as_ref()
        .map(|replacement| quote! { .replacement(#replacement) });
    let repeat = options.repeat.as_ref().map(|repeat| quote! { .repeat(#repeat) });
    let handler = options.handler.as_ref().map(|handler| {
        quote! { .handler(<#handler as ::core::default::Default>::default()) }
    });
    quote! {
        #root::Config::builder(#root::Strategy::#variant)
            #value
            #replacement
            #repeat
            #handler
            .build()
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    for attr in &input.attrs {
        if attr.path().is_ident("desensitize") {
            return Err(syn::Error::new(
                attr.span(),
                "#[desensitize] is only supported on fields",
            ));
        }
    }

    let fields = collect_fields(named_fields(&input)?)?;
    let root = crate_root();
    let ident = &input.ident;
    let type_name = LitStr::new(&ident.to_string(), ident.span());
    let field_count = fields.len();

    let serde_bound = quote! { #root::__private::serde::Serialize };
    let text_bound = quote! { #root::DesensitizeText };
    let predicates = fields
        .iter()
        .filter(|field| uses_type_params(&field.ty, &input.generics))
        .map(|field| match field.config {
            Some(_) => field_bound(&field.ty, &text_bound),
            None => field_bound(&field.ty, &serde_bound),
        })
        .collect::<Vec<_>>();
    let serialize_generics = with_predicates(&input.generics, predicates);
    let (impl_generics, ty_generics, where_clause) = serialize_generics.split_for_impl();
    let (plain_impl_generics, plain_ty_generics, plain_where_clause) =
        input.generics.split_for_impl();

    let statics = fields.iter().filter_map(|field| {
        let (static_ident, options) = field.config.as_ref()?;
        let init = format_ident!("__desensitize_field_{}_config", field.index);
        let name = &field.name;
        let builder = config_builder(&root, options);
        Some(quote! {
            fn #init() -> ::core::result::Result<#root::Config, #root::Error> {
                #builder
            }
            static #static_ident: #root::__private::FieldConfig =
                #root::__private::FieldConfig::new(#name, #init);
        })
    });

    let serialize_fields = fields.iter().map(|field| {
        let member = &field.member;
        let key = &field.key;
        match &field.config {
            Some((static_ident, _)) => quote! {
                {
                    let __config = #static_ident
                        .get()
                        .map_err(<__S::Error as _serde::ser::Error>::custom)?;
                    _serde::ser::SerializeStruct::serialize_field(
                        &mut __state,
                        #key,
                        &#root::Desensitized::of(&self.#member, __config),
                    )?;
                }
            },
            None => quote! {
                _serde::ser::SerializeStruct::serialize_field(&mut __state, #key, &self.#member)?;
            },
        }
    });

    let validations = fields.iter().filter_map(|field| {
        let (static_ident, _) = field.config.as_ref()?;
        Some(quote! { #static_ident.get()?; })
    });

    Ok(quote! {
        const _: () = {
            use #root::__private::serde as _serde;

            #(#statics)*

            impl #impl_generics _serde::Serialize for #ident #ty_generics #where_clause {
                fn serialize<__S>(
                    &self,
                    __serializer: __S,
                ) -> ::core::result::Result<__S::Ok, __S::Error>
                where
                    __S: _serde::Serializer,
                {
                    let mut __state =
                        _serde::Serializer::serialize_struct(__serializer, #type_name, #field_count)?;
                    #(#serialize_fields)*
                    _serde::ser::SerializeStruct::end(__state)
                }
            }

            impl #plain_impl_generics #root::DesensitizeFields
                for #ident #plain_ty_generics #plain_where_clause
            {
                fn validate_fields() -> ::core::result::Result<(), #root::Error> {
                    #(#validations)*
                    ::core::result::Result::Ok(())
                }
            }
        };
    })
}

/// Returns the token stream to reference the desensitize crate root.
///
/// Handles crate renaming (e.g., `my_desensitize = { package = "desensitize" }`).
fn crate_root() -> TokenStream {
    match crate_name("desensitize") {
        Ok(FoundCrate::Itself) => quote! { crate },
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Err(_) => quote! { ::desensitize },
    }
}
