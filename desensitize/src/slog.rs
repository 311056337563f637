//! Adapters for emitting desensitized values through `slog`.
//!
//! The logged representation is always the engine's output, never the raw
//! value. Logging APIs are infallible from the caller's side, so a failed
//! masking call is emitted as
//! [`DESENSITIZE_FAILED`](crate::DESENSITIZE_FAILED).
//!
//! ```rust
//! use desensitize::{Config, DesensitizeExt, Strategy, slog::SlogDesensitizedExt};
//! use slog::{Discard, Logger, info, o};
//!
//! let config = Config::new(Strategy::Email)?;
//! let logger = Logger::root(Discard, o!());
//! let email = "huanghs@ihason.com";
//!
//! info!(logger, "login"; "email" => email.desensitized(&config));
//! let child = logger.new(o!("email" => email.slog_desensitized(&config)));
//! info!(child, "session started");
//! # Ok::<(), desensitize::Error>(())
//! ```

use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{
    config::Config,
    text::{DesensitizeText, Desensitized},
};

fn emit(output: Option<&str>, key: Key, serializer: &mut dyn Serializer) -> SlogResult {
    match output {
        Some(text) => serializer.emit_str(key, text),
        None => serializer.emit_none(key),
    }
}

impl SlogValue for Desensitized<'_> {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        emit(self.log_output().as_deref(), key, serializer)
    }
}

/// Masked output computed up front, for logger contexts that need owned,
/// `'static` values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesensitizedValue(Option<String>);

impl DesensitizedValue {
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl SlogValue for DesensitizedValue {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        emit(self.as_str(), key, serializer)
    }
}

/// Extension trait producing owned slog values from textual fields.
pub trait SlogDesensitizedExt: DesensitizeText {
    /// Masks `self` now and returns the result as an owned slog value.
    fn slog_desensitized(&self, config: &Config) -> DesensitizedValue {
        DesensitizedValue(Desensitized::of(self, config).log_output())
    }
}

impl<T> SlogDesensitizedExt for T where T: DesensitizeText + ?Sized {}
