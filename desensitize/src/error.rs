//! Error taxonomy for configuration resolution and masking.
//!
//! Configuration errors are raised once, when a [`Config`](crate::Config) is
//! built or a handler is registered. The only error a masking call can
//! produce is a failure raised by a user-supplied handler, which is carried
//! through [`Error::Handler`] unmodified.

use std::{num::ParseIntError, sync::Arc};

/// Boxed error type used for custom handler failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while resolving a configuration or masking a value.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The `value` of a REGEX configuration does not compile.
    #[error("`{pattern}` is not a valid regular expression")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The `value` of a STRIP configuration is not a signed integer literal.
    #[error("strip length `{value}` is not a valid signed integer")]
    InvalidStripLength {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A CUSTOM configuration was built without a handler.
    #[error("strategy CUSTOM requires a handler")]
    MissingHandler,

    /// A CUSTOM handler delegates back to the CUSTOM strategy.
    #[error("a CUSTOM handler cannot delegate to the CUSTOM strategy")]
    RecursiveHandler,

    /// No handler is registered under the requested id.
    #[error("no desensitizer is registered under `{id}`")]
    UnknownHandler { id: String },

    /// A handler id was registered twice.
    #[error("a desensitizer is already registered under `{id}`")]
    DuplicateHandler { id: String },

    /// A registered factory failed to construct its handler.
    #[error("failed to construct desensitizer `{id}`")]
    HandlerConstruction {
        id: String,
        #[source]
        source: BoxError,
    },

    /// A strategy name did not match any catalog entry.
    #[error("unknown desensitize strategy `{name}`")]
    UnknownStrategy { name: String },

    /// A configured field does not hold text.
    #[error("field `{field}` is not textual and cannot be desensitized")]
    UnsupportedField { field: String },

    /// The configuration of a derived field failed to resolve.
    #[error("invalid desensitize configuration on field `{field}`")]
    Field {
        field: &'static str,
        #[source]
        source: Arc<Error>,
    },

    /// Field options could not be parsed.
    #[cfg(feature = "json")]
    #[error("invalid desensitize options")]
    Options(#[from] serde_json::Error),

    /// A custom handler failed while masking.
    #[error(transparent)]
    Handler(BoxError),
}

impl Error {
    /// Wraps a failure raised by a custom handler.
    pub fn handler<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Handler(err.into())
    }

    /// Returns `true` for errors raised while resolving configuration, as
    /// opposed to failures raised by a handler during masking.
    pub fn is_config_error(&self) -> bool {
        !matches!(self, Self::Handler(_))
    }
}
