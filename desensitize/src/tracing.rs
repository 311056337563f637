//! Adapters for emitting desensitized values through `tracing`.
//!
//! Values are recorded as display strings holding the masked output. An
//! absent value records as the empty string, and a failed masking call
//! records as [`DESENSITIZE_FAILED`](crate::DESENSITIZE_FAILED).
//!
//! ```rust
//! use desensitize::{Config, Strategy, tracing::TracingDesensitizedExt};
//!
//! let config = Config::new(Strategy::Email)?;
//! tracing::info!(email = "huanghs@ihason.com".tracing_desensitized(&config), "login");
//! # Ok::<(), desensitize::Error>(())
//! ```

use std::fmt;

use tracing::field::{DisplayValue, display};

use crate::{
    config::Config,
    text::{DesensitizeText, Desensitized},
};

/// Extension trait for logging textual values as masked display strings.
pub trait TracingDesensitizedExt: DesensitizeText {
    /// Masks `self` and wraps the output for a `tracing` field.
    fn tracing_desensitized(&self, config: &Config) -> DisplayValue<String> {
        display(
            Desensitized::of(self, config)
                .log_output()
                .unwrap_or_default(),
        )
    }
}

impl<T> TracingDesensitizedExt for T where T: DesensitizeText + ?Sized {}

/// Formats the masked output, so a [`Desensitized`] can be recorded with
/// `%value` directly.
impl fmt::Display for Desensitized<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.log_output() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}
