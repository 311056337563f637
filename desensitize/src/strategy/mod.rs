//! The catalog of named masking strategies.
//!
//! Each [`Strategy`] selects the region of a value that is considered
//! sensitive and hands it to the replacement primitives in [`replace`] using
//! the replacement policy of the [`Config`]. CUSTOM is the exception: it
//! delegates the whole value to the handler resolved into the `Config`.
//!
//! # Example
//!
//! ```rust
//! use desensitize::{Config, Strategy};
//!
//! let config = Config::new(Strategy::Email)?;
//! assert_eq!(config.apply_str("huanghs@ihason.com")?, "h******@ihason.com");
//! # Ok::<(), desensitize::Error>(())
//! ```

pub mod replace;

use std::{fmt, str::FromStr};

use crate::{
    config::{Config, compile_pattern, expand_group_refs, parse_strip_length},
    desensitizer::Desensitizer,
    error::Error,
};

/// Number of trailing characters masked by [`Strategy::Address`].
pub const ADDRESS_MASK_LEN: usize = 8;

/// A named masking strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Strategy {
    /// Masks the whole value.
    ///
    /// `"smile"` → `"*****"`
    #[cfg_attr(feature = "serde", serde(alias = "all"))]
    All,
    /// Masks the last 8 characters, or the whole value when it is shorter.
    ///
    /// `"广东省深圳市南山区高新园万象天地"` → `"广东省深圳市南山********"`
    #[cfg_attr(feature = "serde", serde(alias = "address"))]
    Address,
    /// Masks the local part of an email address, keeping its first character.
    ///
    /// `"huanghs@ihason.com"` → `"h******@ihason.com"`, `"h@ihason.com"` is
    /// left unchanged.
    #[cfg_attr(feature = "serde", serde(alias = "email"))]
    Email,
    /// Replaces every match of the configured pattern.
    ///
    /// The replacement supports group references (`$1`, `${name}`); use `$$`
    /// for a literal `$`.
    #[cfg_attr(feature = "serde", serde(alias = "regex"))]
    Regex,
    /// Masks a configured number of characters: a positive count from the
    /// start, a negative count from the end.
    ///
    /// For `"smile"`: `3` → `"***le"`, `-3` → `"sm***"`, `0` → `"smile"`.
    #[cfg_attr(feature = "serde", serde(alias = "strip"))]
    Strip,
    /// Delegates to the handler resolved into the configuration.
    #[cfg_attr(feature = "serde", serde(alias = "custom"))]
    Custom,
}

impl Strategy {
    /// Every catalog entry, in declaration order.
    pub const VARIANTS: [Strategy; 6] = [
        Strategy::All,
        Strategy::Address,
        Strategy::Email,
        Strategy::Regex,
        Strategy::Strip,
        Strategy::Custom,
    ];

    /// Returns the upper-case name of the strategy.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::All => "ALL",
            Strategy::Address => "ADDRESS",
            Strategy::Email => "EMAIL",
            Strategy::Regex => "REGEX",
            Strategy::Strip => "STRIP",
            Strategy::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    /// Parses a strategy name, ignoring ASCII case.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::VARIANTS
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownStrategy {
                name: name.to_owned(),
            })
    }
}

impl Desensitizer for Strategy {
    fn apply(&self, text: &str, config: &Config) -> Result<String, Error> {
        match self {
            Strategy::All => Ok(all(text, config)),
            Strategy::Address => Ok(address(text, config)),
            Strategy::Email => Ok(email(text, config)),
            Strategy::Regex => regex(text, config),
            Strategy::Strip => strip(text, config),
            Strategy::Custom => config
                .handler()
                .ok_or(Error::MissingHandler)?
                .apply(text, config),
        }
    }

    fn delegates_to_handler(&self) -> bool {
        matches!(self, Strategy::Custom)
    }
}

fn all(text: &str, config: &Config) -> String {
    if text.is_empty() {
        return String::new();
    }
    let len = text.chars().count();
    config.replacement_policy().mask(text, 0, len)
}

fn address(text: &str, config: &Config) -> String {
    if text.is_empty() {
        return String::new();
    }
    let len = text.chars().count();
    let start = len.saturating_sub(ADDRESS_MASK_LEN);
    config.replacement_policy().mask(text, start, len)
}

fn email(text: &str, config: &Config) -> String {
    // No `@`, or nothing between the first character and the `@`.
    match text.chars().position(|ch| ch == '@') {
        Some(at) if at > 1 => config.replacement_policy().mask(text, 1, at),
        _ => text.to_owned(),
    }
}

fn regex(text: &str, config: &Config) -> Result<String, Error> {
    if text.is_empty() {
        return Ok(String::new());
    }
    let masked = match (config.pattern(), config.expansion()) {
        (Some(pattern), Some(expansion)) => pattern.replace_all(text, expansion).into_owned(),
        _ => {
            let pattern = compile_pattern(config.value())?;
            let expansion = expand_group_refs(
                config.replacement(),
                pattern.captures_len().saturating_sub(1),
            );
            pattern.replace_all(text, expansion.as_str()).into_owned()
        }
    };
    Ok(masked)
}

fn strip(text: &str, config: &Config) -> Result<String, Error> {
    if text.is_empty() {
        return Ok(String::new());
    }
    let length = match config.strip_length() {
        Some(length) => length,
        None => parse_strip_length(config.value())?,
    };
    let len = text.chars().count();
    let count = usize::try_from(length.unsigned_abs()).unwrap_or(usize::MAX);
    let (start, end) = if length >= 0 {
        (0, count.min(len))
    } else {
        (len.saturating_sub(count), len)
    };
    Ok(config.replacement_policy().mask(text, start, end))
}
