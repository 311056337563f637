//! Field-name driven masking of `serde_json::Value` trees.
//!
//! [`FieldPolicies`] is a host for services that configure sensitive fields
//! from data rather than in code: each field name maps to a [`Config`], and
//! every object key with that name anywhere in the tree is masked.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{
    config::{Config, ConfigOptions},
    error::Error,
    registry::HandlerRegistry,
};

/// Masking configuration keyed by field name.
///
/// ```rust
/// use desensitize::{FieldPolicies, HandlerRegistry};
/// use serde_json::json;
///
/// let policies = FieldPolicies::from_json_str(
///     r#"{ "email": { "strategy": "EMAIL" }, "address": { "strategy": "ADDRESS" } }"#,
///     &HandlerRegistry::new(),
/// )?;
///
/// let mut user = json!({ "name": "hs", "email": "huanghs@ihason.com" });
/// policies.desensitize_value(&mut user)?;
/// assert_eq!(user, json!({ "name": "hs", "email": "h******@ihason.com" }));
/// # Ok::<(), desensitize::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct FieldPolicies {
    fields: BTreeMap<String, Config>,
}

impl FieldPolicies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every field's options, failing on the first invalid one.
    pub fn from_options<I, K>(options: I, registry: &HandlerRegistry) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, ConfigOptions)>,
        K: Into<String>,
    {
        let mut policies = Self::new();
        for (field, options) in options {
            let field = field.into();
            let config = options.resolve(registry)?;
            policies.insert(field, config);
        }
        Ok(policies)
    }

    /// Parses a JSON object of field name → options and resolves it.
    pub fn from_json_str(json: &str, registry: &HandlerRegistry) -> Result<Self, Error> {
        let options: BTreeMap<String, ConfigOptions> = serde_json::from_str(json)?;
        Self::from_options(options, registry)
    }

    /// Sets the configuration for `field`, returning the previous one.
    pub fn insert(&mut self, field: impl Into<String>, config: Config) -> Option<Config> {
        self.fields.insert(field.into(), config)
    }

    pub fn get(&self, field: &str) -> Option<&Config> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Masks every configured field in `value`, recursing through objects
    /// and arrays.
    ///
    /// `null` values under a configured key are absent and left alone; any
    /// other non-string value fails with [`Error::UnsupportedField`].
    pub fn desensitize_value(&self, value: &mut JsonValue) -> Result<(), Error> {
        match value {
            JsonValue::Object(map) => {
                for (key, entry) in map.iter_mut() {
                    match self.fields.get(key) {
                        Some(config) => mask_entry(key, entry, config)?,
                        None => self.desensitize_value(entry)?,
                    }
                }
                Ok(())
            }
            JsonValue::Array(items) => items
                .iter_mut()
                .try_for_each(|item| self.desensitize_value(item)),
            _ => Ok(()),
        }
    }

    /// Serializes `value` to JSON and masks the configured fields.
    pub fn to_desensitized_value<T>(&self, value: &T) -> Result<JsonValue, Error>
    where
        T: Serialize + ?Sized,
    {
        let mut json = serde_json::to_value(value)?;
        self.desensitize_value(&mut json)?;
        Ok(json)
    }
}

fn mask_entry(key: &str, entry: &mut JsonValue, config: &Config) -> Result<(), Error> {
    match entry {
        JsonValue::String(text) => {
            *text = config.apply_str(text)?;
            Ok(())
        }
        JsonValue::Null => Ok(()),
        _ => Err(Error::UnsupportedField {
            field: key.to_owned(),
        }),
    }
}
