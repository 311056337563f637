//! Configurable masking of sensitive text fields.
//!
//! This crate separates:
//! - **Strategies**: the masking algorithms (`ALL`, `ADDRESS`, `EMAIL`,
//!   `REGEX`, `STRIP`, `CUSTOM`).
//! - **Configurations**: a strategy plus its parameters, validated once and
//!   reused for every value of a field.
//!
//! Hosts bind a [`Config`] to a field and call it with the field's value at
//! the boundary: when serializing (the `Desensitize` derive), when logging
//! (the `slog` and [`tracing`] adapters), or when masking JSON trees by
//! field name (`FieldPolicies`, behind the `json` feature).
//!
//! What this crate does:
//! - implements the built-in strategies and the replacement rules they share
//! - validates configurations and resolves custom handlers
//! - composes desensitizers into pipelines
//!
//! What it does not do:
//! - decide which fields are sensitive
//! - mask anything but text
//!
//! ```rust
//! use desensitize::{Config, Strategy};
//!
//! let email = Config::new(Strategy::Email)?;
//! assert_eq!(email.apply_str("huanghs@ihason.com")?, "h******@ihason.com");
//!
//! let card = Config::builder(Strategy::Regex)
//!     .value(r"(\d{4})\d{8}(\d{4})")
//!     .replacement("$1********$2")
//!     .build()?;
//! assert_eq!(card.apply_str("6222021234567890")?, "6222********7890");
//! # Ok::<(), desensitize::Error>(())
//! ```

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

#[cfg(feature = "derive")]
pub use desensitize_derive::Desensitize;

#[allow(unused_extern_crates)]
extern crate self as desensitize;

// Module declarations
mod config;
mod desensitizer;
mod error;
#[cfg(feature = "json")]
mod json;
mod registry;
#[cfg(feature = "slog")]
pub mod slog;
mod strategy;
mod text;
pub mod tracing;

pub use config::{
    Config, ConfigBuilder, ConfigOptions, DEFAULT_REPLACEMENT, Replacement, expand_group_refs,
};
pub use desensitizer::{Chain, Desensitizer, FnDesensitizer, from_fn};
pub use error::{BoxError, Error};
#[cfg(feature = "json")]
pub use json::FieldPolicies;
pub use registry::HandlerRegistry;
#[cfg(feature = "slog")]
pub use crate::slog::{DesensitizedValue, SlogDesensitizedExt};
pub use strategy::{ADDRESS_MASK_LEN, Strategy, replace};
pub use text::{DESENSITIZE_FAILED, DesensitizeExt, DesensitizeText, Desensitized};
pub use crate::tracing::TracingDesensitizedExt;

/// Types whose desensitized fields carry validated configurations.
///
/// Implemented by `#[derive(Desensitize)]`. Field configurations are resolved
/// lazily, once per field for the life of the program; calling this at
/// startup surfaces a bad pattern or handler before the first value is
/// serialized.
///
/// Only textual fields can be annotated:
#[cfg_attr(
    feature = "derive",
    doc = r#"
```compile_fail,E0277
use desensitize::Desensitize;

#[derive(Desensitize)]
struct Person {
    #[desensitize(strategy = All)]
    age: u32,
}
```
"#
)]
///
/// and a CUSTOM handler is built with `Default`:
#[cfg_attr(
    feature = "derive",
    doc = r#"
```compile_fail,E0277
use desensitize::{Config, Desensitize, Desensitizer, Error};

struct Suffix(char);

impl Desensitizer for Suffix {
    fn apply(&self, text: &str, _config: &Config) -> Result<String, Error> {
        Ok(format!("{text}{}", self.0))
    }
}

#[derive(Desensitize)]
struct Account {
    #[desensitize(strategy = Custom, handler = Suffix)]
    nickname: String,
}
```
"#
)]
pub trait DesensitizeFields {
    /// Resolves every field configuration, failing on the first invalid one
    /// with [`Error::Field`].
    fn validate_fields() -> Result<(), Error>;
}

#[doc(hidden)]
pub mod __private {
    use std::sync::{Arc, OnceLock};

    #[cfg(feature = "serde")]
    pub use serde;

    use crate::{Config, Error};

    /// A field configuration resolved on first use and cached.
    pub struct FieldConfig {
        field: &'static str,
        cell: OnceLock<Result<Config, Arc<Error>>>,
        init: fn() -> Result<Config, Error>,
    }

    impl FieldConfig {
        pub const fn new(field: &'static str, init: fn() -> Result<Config, Error>) -> Self {
            Self {
                field,
                cell: OnceLock::new(),
                init,
            }
        }

        /// The resolved configuration, or the error that prevented it.
        pub fn get(&self) -> Result<&Config, Error> {
            self.cell
                .get_or_init(|| (self.init)().map_err(Arc::new))
                .as_ref()
                .map_err(|source| Error::Field {
                    field: self.field,
                    source: Arc::clone(source),
                })
        }
    }
}
