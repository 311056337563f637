//! Textual field values and the output wrapper used by hosts.
//!
//! [`DesensitizeText`] is implemented for the string-like types a field can
//! hold. Binding the engine to any other type fails to compile, which is the
//! Rust form of rejecting a non-textual field once, at binding time.
//!
//! [`Desensitized`] pairs a borrowed value with its [`Config`] and produces
//! the masked output on demand. It is what serializers and log adapters
//! write in place of the raw value.

use std::{borrow::Cow, fmt, rc::Rc, sync::Arc};

use crate::{config::Config, error::Error};

/// Placeholder emitted by log adapters when masking fails.
///
/// Logging APIs cannot propagate errors, so a failed masking call is logged
/// as this string rather than as the raw value.
pub const DESENSITIZE_FAILED: &str = "[DESENSITIZE FAILED]";

/// A field value that can be desensitized.
///
/// `None` means the value is absent; absent values are never masked.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a textual type and cannot be desensitized",
    label = "only text fields can carry `#[desensitize]`",
    note = "supported types are `String`, `&str`, `Cow<str>`, `Box<str>`, `Arc<str>`, `Rc<str>` and `Option`s of them"
)]
pub trait DesensitizeText {
    fn as_text(&self) -> Option<&str>;
}

impl DesensitizeText for str {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl DesensitizeText for String {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl DesensitizeText for Cow<'_, str> {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl DesensitizeText for Box<str> {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl DesensitizeText for Arc<str> {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl DesensitizeText for Rc<str> {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl<T> DesensitizeText for &T
where
    T: DesensitizeText + ?Sized,
{
    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

impl<T> DesensitizeText for Option<T>
where
    T: DesensitizeText,
{
    fn as_text(&self) -> Option<&str> {
        self.as_ref().and_then(|value| value.as_text())
    }
}

/// A value paired with the configuration that masks it.
///
/// `Debug` shows the masked output, never the wrapped value.
#[derive(Clone, Copy)]
pub struct Desensitized<'a> {
    value: Option<&'a str>,
    config: &'a Config,
}

impl<'a> Desensitized<'a> {
    pub fn new(value: Option<&'a str>, config: &'a Config) -> Self {
        Self { value, config }
    }

    /// Wraps any textual value.
    pub fn of<T>(value: &'a T, config: &'a Config) -> Self
    where
        T: DesensitizeText + ?Sized,
    {
        Self::new(value.as_text(), config)
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Runs the engine. Absent values stay absent.
    pub fn output(&self) -> Result<Option<String>, Error> {
        self.config.apply(self.value)
    }

    /// The masked text for log sinks, with [`DESENSITIZE_FAILED`] standing in
    /// for a failed masking call.
    pub(crate) fn log_output(&self) -> Option<String> {
        match self.output() {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(
                    strategy = %self.config.strategy(),
                    error = %err,
                    "desensitize failed while logging"
                );
                Some(DESENSITIZE_FAILED.to_owned())
            }
        }
    }
}

impl fmt::Debug for Desensitized<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Desensitized")
            .field("output", &self.log_output())
            .field("config", self.config)
            .finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Desensitized<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self
            .output()
            .map_err(<S::Error as serde::ser::Error>::custom)?
        {
            Some(masked) => serializer.serialize_str(&masked),
            None => serializer.serialize_none(),
        }
    }
}

/// Extension trait to pair a textual value with a [`Config`].
///
/// ```rust
/// use desensitize::{Config, DesensitizeExt, Strategy};
///
/// let config = Config::new(Strategy::Address)?;
/// let address = String::from("广东省深圳市南山区高新园万象天地");
/// assert_eq!(
///     address.desensitized(&config).output()?.as_deref(),
///     Some("广东省深圳市南山********")
/// );
/// # Ok::<(), desensitize::Error>(())
/// ```
pub trait DesensitizeExt: DesensitizeText {
    fn desensitized<'a>(&'a self, config: &'a Config) -> Desensitized<'a> {
        Desensitized::of(self, config)
    }
}

impl<T> DesensitizeExt for T where T: DesensitizeText + ?Sized {}
