//! Parsing of `#[desensitize(...)]` field attributes.
//!
//! Everything that can be checked without running the engine is checked
//! here: strategy names, STRIP lengths, and whether a handler is present
//! exactly when the strategy is CUSTOM. Regex patterns are validated by the
//! runtime crate when the field's configuration is first resolved.

use proc_macro2::Span;
use syn::{Attribute, Ident, LitBool, LitStr, Path, Result, meta::ParseNestedMeta, spanned::Spanned};

/// Strategy catalog as seen by the derive. Mirrors `desensitize::Strategy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StrategyName {
    All,
    Address,
    Email,
    Regex,
    Strip,
    Custom,
}

impl StrategyName {
    fn parse(ident: &Ident) -> Result<Self> {
        let name = ident.to_string();
        let strategy = match name.to_ascii_uppercase().as_str() {
            "ALL" => Self::All,
            "ADDRESS" => Self::Address,
            "EMAIL" => Self::Email,
            "REGEX" => Self::Regex,
            "STRIP" => Self::Strip,
            "CUSTOM" => Self::Custom,
            _ => {
                return Err(syn::Error::new(
                    ident.span(),
                    format!(
                        "unknown strategy `{name}`: expected one of \
                         All, Address, Email, Regex, Strip, Custom"
                    ),
                ));
            }
        };
        Ok(strategy)
    }

    /// Variant name on `desensitize::Strategy`.
    pub(crate) fn variant(self, span: Span) -> Ident {
        let name = match self {
            Self::All => "All",
            Self::Address => "Address",
            Self::Email => "Email",
            Self::Regex => "Regex",
            Self::Strip => "Strip",
            Self::Custom => "Custom",
        };
        Ident::new(name, span)
    }
}

/// A parsed `#[desensitize(...)]` attribute.
#[derive(Clone, Debug)]
pub(crate) struct FieldOptions {
    pub(crate) strategy: StrategyName,
    pub(crate) strategy_span: Span,
    pub(crate) value: Option<LitStr>,
    pub(crate) replacement: Option<LitStr>,
    pub(crate) repeat: Option<LitBool>,
    pub(crate) handler: Option<Path>,
    pub(crate) rename: Option<LitStr>,
}

#[derive(Default)]
struct RawOptions {
    strategy: Option<(StrategyName, Span)>,
    value: Option<LitStr>,
    replacement: Option<LitStr>,
    repeat: Option<LitBool>,
    handler: Option<Path>,
    rename: Option<LitStr>,
}

fn set_once<T>(slot: &mut Option<T>, next: T, meta: &ParseNestedMeta<'_>) -> Result<()> {
    if slot.is_some() {
        let key = meta
            .path
            .get_ident()
            .map_or_else(String::new, ToString::to_string);
        return Err(meta.error(format!("duplicate `{key}` option")));
    }
    *slot = Some(next);
    Ok(())
}

fn parse_attr(attr: &Attribute) -> Result<RawOptions> {
    let mut raw = RawOptions::default();
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("strategy") {
            let ident: Ident = meta.value()?.parse()?;
            let strategy = StrategyName::parse(&ident)?;
            set_once(&mut raw.strategy, (strategy, ident.span()), &meta)
        } else if meta.path.is_ident("value") {
            let lit: LitStr = meta.value()?.parse()?;
            set_once(&mut raw.value, lit, &meta)
        } else if meta.path.is_ident("replacement") {
            let lit: LitStr = meta.value()?.parse()?;
            set_once(&mut raw.replacement, lit, &meta)
        } else if meta.path.is_ident("repeat") {
            let lit: LitBool = meta.value()?.parse()?;
            set_once(&mut raw.repeat, lit, &meta)
        } else if meta.path.is_ident("handler") {
            let path: Path = meta.value()?.parse()?;
            set_once(&mut raw.handler, path, &meta)
        } else if meta.path.is_ident("rename") {
            let lit: LitStr = meta.value()?.parse()?;
            set_once(&mut raw.rename, lit, &meta)
        } else {
            Err(meta.error(
                "unknown option: expected one of \
                 strategy, value, replacement, repeat, handler, rename",
            ))
        }
    })?;
    Ok(raw)
}

fn validate(raw: RawOptions, span: Span) -> Result<FieldOptions> {
    let Some((strategy, strategy_span)) = raw.strategy else {
        return Err(syn::Error::new(
            span,
            "missing strategy: use #[desensitize(strategy = Email)]",
        ));
    };

    if strategy == StrategyName::Strip {
        let Some(value) = &raw.value else {
            return Err(syn::Error::new(
                span,
                "strategy Strip requires `value`, a signed length such as \"-4\"",
            ));
        };
        if value.value().parse::<i64>().is_err() {
            return Err(syn::Error::new(
                value.span(),
                format!("strip length `{}` is not a valid signed integer", value.value()),
            ));
        }
    }

    match (strategy, &raw.handler) {
        (StrategyName::Custom, None) => {
            return Err(syn::Error::new(
                strategy_span,
                "strategy Custom requires `handler = path::ToHandler`",
            ));
        }
        (StrategyName::Custom, Some(_)) | (_, None) => {}
        (_, Some(handler)) => {
            return Err(syn::Error::new(
                handler.span(),
                "`handler` is only allowed with strategy Custom",
            ));
        }
    }

    Ok(FieldOptions {
        strategy,
        strategy_span,
        value: raw.value,
        replacement: raw.replacement,
        repeat: raw.repeat,
        handler: raw.handler,
        rename: raw.rename,
    })
}

/// Reads the `#[desensitize(...)]` attribute of a field, if any.
pub(crate) fn parse_field_options(attrs: &[Attribute]) -> Result<Option<FieldOptions>> {
    let mut options = None;
    for attr in attrs {
        if !attr.path().is_ident("desensitize") {
            continue;
        }
        if options.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "multiple #[desensitize] attributes on the same field",
            ));
        }
        let raw = parse_attr(attr)?;
        options = Some(validate(raw, attr.span())?);
    }
    Ok(options)
}
