//! Trait bounds for generic field types.
//!
//! Bounds are added per field type, and only for types that mention one of
//! the container's type parameters. Concrete field types are checked at
//! their use site, where the compiler reports them against the field.

use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens;
use syn::{Generics, Ident, Type, WherePredicate, parse_quote};

fn tokens_mention(tokens: TokenStream, params: &[&Ident]) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Ident(ident) => params.iter().any(|param| **param == ident),
        TokenTree::Group(group) => tokens_mention(group.stream(), params),
        TokenTree::Punct(_) | TokenTree::Literal(_) => false,
    })
}

/// Returns `true` if `ty` mentions any type parameter of `generics`.
pub(crate) fn uses_type_params(ty: &Type, generics: &Generics) -> bool {
    let params: Vec<&Ident> = generics.type_params().map(|param| &param.ident).collect();
    !params.is_empty() && tokens_mention(ty.to_token_stream(), &params)
}

/// Adds `predicates` to the where clause of a copy of `generics`.
pub(crate) fn with_predicates(
    generics: &Generics,
    predicates: impl IntoIterator<Item = WherePredicate>,
) -> Generics {
    let mut generics = generics.clone();
    let where_clause = generics.make_where_clause();
    where_clause.predicates.extend(predicates);
    generics
}

/// `ty: bound`, for generic field types.
pub(crate) fn field_bound(ty: &Type, bound: &TokenStream) -> WherePredicate {
    parse_quote! { #ty: #bound }
}
