//! Resolved, immutable masking configuration.
//!
//! A [`Config`] is built once per field and reused for every value of that
//! field. Building validates everything a strategy needs up front: REGEX
//! patterns are compiled, STRIP lengths are parsed, and CUSTOM handlers are
//! resolved. Masking calls never revalidate.
//!
//! Hosts that read configuration from data use [`ConfigOptions`], the flat
//! set of named options, and resolve it against a [`HandlerRegistry`].

use std::{fmt, sync::Arc};

use regex::Regex;

use crate::{
    desensitizer::Desensitizer,
    error::Error,
    registry::HandlerRegistry,
    strategy::{
        Strategy,
        replace::{replace_each, replace_once},
    },
};

/// Default replacement symbol.
pub const DEFAULT_REPLACEMENT: &str = "*";

/// How a masked region is replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Replacement {
    /// Each masked character becomes this character.
    Repeat(char),
    /// The whole masked region becomes one copy of this string.
    Once(String),
}

impl Replacement {
    /// Picks the replacement form for a `replacement` string and `repeat` flag.
    ///
    /// Only a single-character replacement with `repeat` set is repeated;
    /// anything else collapses the region into one copy.
    pub fn resolve(replacement: &str, repeat: bool) -> Self {
        let mut chars = replacement.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if repeat => Self::Repeat(ch),
            _ => Self::Once(replacement.to_owned()),
        }
    }

    /// Replaces the character region `[start, end)` of `text`.
    #[must_use]
    pub fn mask(&self, text: &str, start: usize, end: usize) -> String {
        match self {
            Self::Repeat(ch) => replace_each(text, start, end, *ch),
            Self::Once(replacement) => replace_once(text, start, end, replacement),
        }
    }
}

#[derive(Clone)]
struct Handler {
    id: Option<String>,
    desensitizer: Arc<dyn Desensitizer>,
}

/// Strategy selection plus its parameters, validated and ready to apply.
///
/// ```rust
/// use desensitize::{Config, Strategy};
///
/// let config = Config::builder(Strategy::Strip).value("-3").build()?;
/// assert_eq!(config.apply(Some("smile"))?, Some("sm***".to_string()));
/// assert_eq!(config.apply(None)?, None);
/// # Ok::<(), desensitize::Error>(())
/// ```
#[derive(Clone)]
pub struct Config {
    strategy: Strategy,
    value: String,
    replacement: String,
    repeat: bool,
    policy: Replacement,
    pattern: Option<Regex>,
    expansion: Option<String>,
    strip_length: Option<i64>,
    handler: Option<Handler>,
}

impl Config {
    /// Starts building a configuration for `strategy`.
    pub fn builder(strategy: Strategy) -> ConfigBuilder {
        ConfigBuilder::new(strategy)
    }

    /// Builds a configuration for `strategy` with default options.
    pub fn new(strategy: Strategy) -> Result<Self, Error> {
        Self::builder(strategy).build()
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The raw strategy value: a pattern for REGEX, a length for STRIP.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// The replacement form derived from `replacement` and `repeat`.
    pub fn replacement_policy(&self) -> &Replacement {
        &self.policy
    }

    /// The compiled pattern of a REGEX configuration.
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// The replacement of a REGEX configuration in `regex` crate syntax.
    ///
    /// See [`expand_group_refs`] for how `replacement` is translated.
    pub fn expansion(&self) -> Option<&str> {
        self.expansion.as_deref()
    }

    /// The parsed length of a STRIP configuration.
    pub fn strip_length(&self) -> Option<i64> {
        self.strip_length
    }

    /// The handler of a CUSTOM configuration.
    pub fn handler(&self) -> Option<&dyn Desensitizer> {
        self.handler
            .as_ref()
            .map(|handler| handler.desensitizer.as_ref())
    }

    /// The registry id the handler was resolved from, if any.
    pub fn handler_id(&self) -> Option<&str> {
        self.handler.as_ref().and_then(|handler| handler.id.as_deref())
    }

    /// Masks `value`. Absent values stay absent.
    pub fn apply(&self, value: Option<&str>) -> Result<Option<String>, Error> {
        value.map(|text| self.apply_str(text)).transpose()
    }

    /// Masks a present value with the configured strategy.
    pub fn apply_str(&self, text: &str) -> Result<String, Error> {
        self.strategy.apply(text, self)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("strategy", &self.strategy)
            .field("value", &self.value)
            .field("replacement", &self.replacement)
            .field("repeat", &self.repeat)
            .field(
                "handler",
                &self.handler.as_ref().map(|handler| {
                    handler.id.as_deref().unwrap_or("<instance>")
                }),
            )
            .finish()
    }
}

#[derive(Clone)]
enum HandlerSource {
    Instance(Arc<dyn Desensitizer>),
    Id(String),
}

/// Builder for [`Config`].
#[derive(Clone)]
#[must_use]
pub struct ConfigBuilder {
    strategy: Strategy,
    value: String,
    replacement: String,
    repeat: bool,
    handler: Option<HandlerSource>,
}

impl ConfigBuilder {
    fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            value: String::new(),
            replacement: DEFAULT_REPLACEMENT.to_owned(),
            repeat: true,
            handler: None,
        }
    }

    /// Sets the strategy value: a regex for REGEX, a signed length for STRIP.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Sets the replacement symbol (default `"*"`).
    pub fn replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = replacement.into();
        self
    }

    /// Sets whether a single-character replacement is repeated per masked
    /// character (default `true`).
    pub fn repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Uses `handler` for a CUSTOM configuration.
    pub fn handler<H>(self, handler: H) -> Self
    where
        H: Desensitizer + 'static,
    {
        self.shared_handler(Arc::new(handler))
    }

    /// Uses an already shared handler for a CUSTOM configuration.
    pub fn shared_handler(mut self, handler: Arc<dyn Desensitizer>) -> Self {
        self.handler = Some(HandlerSource::Instance(handler));
        self
    }

    /// Resolves the CUSTOM handler from a registry id at build time.
    ///
    /// Use [`ConfigBuilder::build_with`] to supply the registry.
    pub fn handler_id(mut self, id: impl Into<String>) -> Self {
        self.handler = Some(HandlerSource::Id(id.into()));
        self
    }

    /// Validates and builds the configuration.
    ///
    /// Handler ids resolve against an empty registry, so a CUSTOM
    /// configuration built this way needs [`ConfigBuilder::handler`].
    pub fn build(self) -> Result<Config, Error> {
        self.build_with(&HandlerRegistry::new())
    }

    /// Validates and builds the configuration, resolving handler ids
    /// against `registry`.
    pub fn build_with(self, registry: &HandlerRegistry) -> Result<Config, Error> {
        let strategy = self.strategy;
        match self.resolve(registry) {
            Ok(config) => {
                tracing::debug!(%strategy, handler = ?config.handler_id(), "resolved desensitize configuration");
                Ok(config)
            }
            Err(err) => {
                tracing::warn!(%strategy, error = %err, "failed to resolve desensitize configuration");
                Err(err)
            }
        }
    }

    fn resolve(self, registry: &HandlerRegistry) -> Result<Config, Error> {
        let pattern = match self.strategy {
            Strategy::Regex => Some(compile_pattern(&self.value)?),
            _ => None,
        };
        let expansion = pattern.as_ref().map(|pattern| {
            expand_group_refs(&self.replacement, pattern.captures_len().saturating_sub(1))
        });
        let strip_length = match self.strategy {
            Strategy::Strip => Some(parse_strip_length(&self.value)?),
            _ => None,
        };
        let handler = match (self.strategy, self.handler) {
            (Strategy::Custom, None) => return Err(Error::MissingHandler),
            (Strategy::Custom, Some(HandlerSource::Instance(desensitizer))) => Some(Handler {
                id: None,
                desensitizer,
            }),
            (Strategy::Custom, Some(HandlerSource::Id(id))) => Some(Handler {
                desensitizer: registry.resolve(&id)?,
                id: Some(id),
            }),
            // Handlers only apply to CUSTOM.
            (_, _) => None,
        };
        if handler
            .as_ref()
            .is_some_and(|handler| handler.desensitizer.delegates_to_handler())
        {
            return Err(Error::RecursiveHandler);
        }

        Ok(Config {
            strategy: self.strategy,
            policy: Replacement::resolve(&self.replacement, self.repeat),
            value: self.value,
            replacement: self.replacement,
            repeat: self.repeat,
            pattern,
            expansion,
            strip_length,
            handler,
        })
    }
}

/// The flat set of named options a host supplies for a field.
///
/// With the `serde` feature this deserializes from data, filling in the
/// defaults for omitted keys:
///
/// ```json
/// { "strategy": "STRIP", "value": "-4", "replacement": "#" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct ConfigOptions {
    pub strategy: Strategy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: String,
    #[cfg_attr(feature = "serde", serde(default = "default_replacement"))]
    pub replacement: String,
    #[cfg_attr(feature = "serde", serde(default = "default_repeat"))]
    pub repeat: bool,
    /// Registry id of the handler, required when `strategy` is CUSTOM.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub handler: Option<String>,
}

#[cfg(feature = "serde")]
fn default_replacement() -> String {
    DEFAULT_REPLACEMENT.to_owned()
}

#[cfg(feature = "serde")]
fn default_repeat() -> bool {
    true
}

impl ConfigOptions {
    /// Options for `strategy` with every other option at its default.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            value: String::new(),
            replacement: DEFAULT_REPLACEMENT.to_owned(),
            repeat: true,
            handler: None,
        }
    }

    /// Validates the options into a [`Config`].
    pub fn resolve(&self, registry: &HandlerRegistry) -> Result<Config, Error> {
        let mut builder = Config::builder(self.strategy)
            .value(self.value.clone())
            .replacement(self.replacement.clone())
            .repeat(self.repeat);
        if let Some(id) = &self.handler {
            builder = builder.handler_id(id.clone());
        }
        builder.build_with(registry)
    }
}

pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}

/// Translates a REGEX replacement into `regex` crate syntax.
///
/// Group references follow `java.util.regex.Matcher`: `$` followed by
/// digits takes the longest number that names an existing group, so with
/// one group `$1xxx` is group 1 then `xxx`, and `$12` is group 1 then `2`.
/// A backslash escapes the next character (`\$` is a literal `$`).
/// Everything else keeps its `regex` crate meaning: `${name}`, `$name` and
/// `$$`.
///
/// ```rust
/// use desensitize::expand_group_refs;
///
/// assert_eq!(expand_group_refs("$1xxx@", 1), "${1}xxx@");
/// assert_eq!(expand_group_refs("$12", 1), "${1}2");
/// assert_eq!(expand_group_refs("$12", 12), "${12}");
/// assert_eq!(expand_group_refs(r"\$1", 1), "$$1");
/// ```
pub fn expand_group_refs(replacement: &str, group_count: usize) -> String {
    let mut expanded = String::with_capacity(replacement.len() + 2);
    let mut chars = replacement.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('$') => expanded.push_str("$$"),
                Some(escaped) => expanded.push(escaped),
                None => expanded.push('\\'),
            },
            '$' => match chars.peek().and_then(|next| next.to_digit(10)) {
                Some(first) => {
                    chars.next();
                    let mut group = u64::from(first);
                    while let Some(digit) = chars.peek().and_then(|next| next.to_digit(10)) {
                        let candidate = group.saturating_mul(10).saturating_add(u64::from(digit));
                        if !usize::try_from(candidate).is_ok_and(|candidate| candidate <= group_count) {
                            break;
                        }
                        group = candidate;
                        chars.next();
                    }
                    expanded.push_str("${");
                    expanded.push_str(&group.to_string());
                    expanded.push('}');
                }
                None => {
                    expanded.push('$');
                    if let Some(next) = chars.next() {
                        expanded.push(next);
                    }
                }
            },
            _ => expanded.push(ch),
        }
    }
    expanded
}

pub(crate) fn parse_strip_length(value: &str) -> Result<i64, Error> {
    value
        .parse::<i64>()
        .map_err(|source| Error::InvalidStripLength {
            value: value.to_owned(),
            source,
        })
}
