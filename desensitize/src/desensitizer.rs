//! The `Desensitizer` capability and its combinators.
//!
//! A desensitizer is a stateless function from `(text, config)` to masked
//! text. Every [`Strategy`](crate::Strategy) is one, and so is any
//! user-supplied handler used with `Strategy::Custom`.
//!
//! # Composition
//!
//! [`Desensitizer::then`] runs the receiver first; [`Desensitizer::compose`]
//! runs its argument first. Both pass the same [`Config`] to each stage, and
//! `a.then(b)` behaves exactly like `b.compose(a)`.
//!
//! ```rust
//! use desensitize::{Config, Desensitizer, Strategy};
//!
//! let config = Config::builder(Strategy::Strip).value("-3").build()?;
//! let chained = Strategy::Strip.then(Strategy::Email);
//! assert_eq!(chained.apply("huanghs@ihason.com", &config)?, "h******@ihason.***");
//! # Ok::<(), desensitize::Error>(())
//! ```

use std::{fmt, sync::Arc};

use crate::{config::Config, error::Error};

/// Masks a piece of text according to a configuration.
///
/// Implementations must be free of side effects: hosts may construct a
/// handler once and share it across threads, or construct it per call.
pub trait Desensitizer: Send + Sync {
    /// Returns the masked form of `text`.
    fn apply(&self, text: &str, config: &Config) -> Result<String, Error>;

    /// Returns `true` if applying `self` hands the text to the CUSTOM
    /// handler of the config.
    ///
    /// Such a desensitizer cannot itself be that handler: it would call
    /// itself forever. Configurations reject it at build time.
    fn delegates_to_handler(&self) -> bool {
        false
    }

    /// Returns a desensitizer that applies `self`, then `after` to the result.
    fn then<D>(self, after: D) -> Chain<Self, D>
    where
        Self: Sized,
        D: Desensitizer,
    {
        Chain::new(self, after)
    }

    /// Returns a desensitizer that applies `before`, then `self` to the result.
    fn compose<D>(self, before: D) -> Chain<D, Self>
    where
        Self: Sized,
        D: Desensitizer,
    {
        Chain::new(before, self)
    }
}

impl<T> Desensitizer for &T
where
    T: Desensitizer + ?Sized,
{
    fn apply(&self, text: &str, config: &Config) -> Result<String, Error> {
        (**self).apply(text, config)
    }

    fn delegates_to_handler(&self) -> bool {
        (**self).delegates_to_handler()
    }
}

impl<T> Desensitizer for Box<T>
where
    T: Desensitizer + ?Sized,
{
    fn apply(&self, text: &str, config: &Config) -> Result<String, Error> {
        (**self).apply(text, config)
    }

    fn delegates_to_handler(&self) -> bool {
        (**self).delegates_to_handler()
    }
}

impl<T> Desensitizer for Arc<T>
where
    T: Desensitizer + ?Sized,
{
    fn apply(&self, text: &str, config: &Config) -> Result<String, Error> {
        (**self).apply(text, config)
    }

    fn delegates_to_handler(&self) -> bool {
        (**self).delegates_to_handler()
    }
}

/// Two desensitizers applied in sequence.
///
/// Built by [`Desensitizer::then`] and [`Desensitizer::compose`].
#[derive(Clone, Copy, Debug)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B> {
    fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// The stage applied first.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// The stage applied to the output of [`Chain::first`].
    pub fn second(&self) -> &B {
        &self.second
    }
}

impl<A, B> Desensitizer for Chain<A, B>
where
    A: Desensitizer,
    B: Desensitizer,
{
    fn apply(&self, text: &str, config: &Config) -> Result<String, Error> {
        let intermediate = self.first.apply(text, config)?;
        self.second.apply(&intermediate, config)
    }

    fn delegates_to_handler(&self) -> bool {
        self.first.delegates_to_handler() || self.second.delegates_to_handler()
    }
}

/// A desensitizer backed by a closure. See [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnDesensitizer<F>(F);

impl<F> fmt::Debug for FnDesensitizer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnDesensitizer").finish_non_exhaustive()
    }
}

impl<F> Desensitizer for FnDesensitizer<F>
where
    F: Fn(&str, &Config) -> Result<String, Error> + Send + Sync,
{
    fn apply(&self, text: &str, config: &Config) -> Result<String, Error> {
        (self.0)(text, config)
    }
}

/// Lifts a closure into a [`Desensitizer`].
///
/// ```rust
/// use desensitize::{Config, Desensitizer, Strategy, from_fn};
///
/// let upper = from_fn(|text, _config| Ok(text.to_uppercase()));
/// let config = Config::new(Strategy::Email)?;
/// let masked = Strategy::Email.then(upper).apply("alice@example.com", &config)?;
/// assert_eq!(masked, "A****@EXAMPLE.COM");
/// # Ok::<(), desensitize::Error>(())
/// ```
///
/// A closure cannot report [`Desensitizer::delegates_to_handler`], so one
/// that calls [`Strategy::Custom`](crate::Strategy::Custom) and is used as a
/// CUSTOM handler is not rejected at build time and recurses without bound.
pub fn from_fn<F>(f: F) -> FnDesensitizer<F>
where
    F: Fn(&str, &Config) -> Result<String, Error> + Send + Sync,
{
    FnDesensitizer(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Strategy;

    fn suffix(tag: &'static str) -> impl Desensitizer {
        from_fn(move |text, _config| Ok(format!("{text}{tag}")))
    }

    #[test]
    fn then_applies_receiver_first() {
        let config = Config::new(Strategy::All).unwrap();
        let chained = suffix("-a").then(suffix("-b"));
        assert_eq!(chained.apply("x", &config).unwrap(), "x-a-b");
    }

    #[test]
    fn compose_applies_argument_first() {
        let config = Config::new(Strategy::All).unwrap();
        let composed = suffix("-a").compose(suffix("-b"));
        assert_eq!(composed.apply("x", &config).unwrap(), "x-b-a");
    }

    #[test]
    fn then_matches_reversed_compose() {
        let config = Config::builder(Strategy::Strip).value("2").build().unwrap();
        let pairs = [
            (Strategy::Strip, Strategy::Email),
            (Strategy::Email, Strategy::Address),
            (Strategy::Address, Strategy::Strip),
            (Strategy::All, Strategy::Email),
        ];
        for input in ["huanghs@ihason.com", "smile", "", "深圳市南山区高新园万象天地"] {
            for (a, b) in pairs {
                let sequential = b.apply(&a.apply(input, &config).unwrap(), &config).unwrap();
                assert_eq!(a.then(b).apply(input, &config).unwrap(), sequential);
                assert_eq!(b.compose(a).apply(input, &config).unwrap(), sequential);
            }
        }
    }

    #[test]
    fn composition_borrows_operands() {
        let config = Config::new(Strategy::All).unwrap();
        let first = suffix("-a");
        let second = suffix("-b");
        let chained = (&first).then(&second);
        assert_eq!(chained.apply("x", &config).unwrap(), "x-a-b");
        // Operands are still usable on their own.
        assert_eq!(first.apply("x", &config).unwrap(), "x-a");
        assert_eq!(second.apply("x", &config).unwrap(), "x-b");
    }

    #[test]
    fn first_stage_errors_short_circuit() {
        let config = Config::new(Strategy::All).unwrap();
        let failing = from_fn(|_text, _config| Err(Error::handler("boom")));
        let chained = failing.then(suffix("-never"));
        let err = chained.apply("x", &config).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn boxed_and_shared_handlers_are_desensitizers() {
        let config = Config::new(Strategy::All).unwrap();
        let boxed: Box<dyn Desensitizer> = Box::new(Strategy::All);
        let shared: Arc<dyn Desensitizer> = Arc::new(Strategy::All);
        assert_eq!(boxed.apply("abc", &config).unwrap(), "***");
        assert_eq!(shared.apply("abc", &config).unwrap(), "***");
    }

    #[test]
    fn delegation_is_visible_through_wrappers() {
        assert!(Strategy::Custom.delegates_to_handler());
        assert!(!Strategy::Email.delegates_to_handler());
        assert!(Strategy::Email.then(Strategy::Custom).delegates_to_handler());
        assert!((&Strategy::Custom).delegates_to_handler());
        let boxed: Box<dyn Desensitizer> = Box::new(Strategy::All.compose(Strategy::Custom));
        assert!(boxed.delegates_to_handler());
        assert!(!suffix("-a").then(Strategy::Strip).delegates_to_handler());
    }

    #[test]
    fn chains_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        let chained = Strategy::All.then(Strategy::Email).compose(suffix("-x"));
        assert_send_sync(&chained);
    }
}
