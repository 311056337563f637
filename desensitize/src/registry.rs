//! Registry of custom handlers addressable by id.
//!
//! Hosts that configure fields from data (see
//! [`ConfigOptions`](crate::ConfigOptions)) refer to CUSTOM handlers by a
//! string id. The registry maps each id to a factory, and resolution builds a
//! fresh handler that is then shared by every masking call made through the
//! resulting [`Config`](crate::Config).

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    desensitizer::Desensitizer,
    error::{BoxError, Error},
};

type Factory = Arc<dyn Fn() -> Result<Arc<dyn Desensitizer>, BoxError> + Send + Sync>;

/// Maps handler ids to handler factories.
///
/// ```rust
/// use desensitize::{Config, Desensitizer, Error, HandlerRegistry, Strategy};
///
/// #[derive(Default)]
/// struct Stub;
///
/// impl Desensitizer for Stub {
///     fn apply(&self, _text: &str, _config: &Config) -> Result<String, Error> {
///         Ok("mock".to_string())
///     }
/// }
///
/// let mut registry = HandlerRegistry::new();
/// registry.register::<Stub>("stub")?;
///
/// let config = Config::builder(Strategy::Custom)
///     .handler_id("stub")
///     .build_with(&registry)?;
/// assert_eq!(config.apply_str("hs@ihason.com")?, "mock");
/// # Ok::<(), desensitize::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    factories: BTreeMap<String, Factory>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler constructed with `H::default()`.
    pub fn register<H>(&mut self, id: impl Into<String>) -> Result<(), Error>
    where
        H: Desensitizer + Default + 'static,
    {
        let factory: Factory = Arc::new(|| -> Result<Arc<dyn Desensitizer>, BoxError> {
            Ok(Arc::new(H::default()))
        });
        self.insert(id.into(), factory)
    }

    /// Registers a fallible factory. Its errors surface at resolution time as
    /// [`Error::HandlerConstruction`].
    pub fn register_factory<F, H, E>(
        &mut self,
        id: impl Into<String>,
        factory: F,
    ) -> Result<(), Error>
    where
        F: Fn() -> Result<H, E> + Send + Sync + 'static,
        H: Desensitizer + 'static,
        E: Into<BoxError>,
    {
        let factory: Factory = Arc::new(move || -> Result<Arc<dyn Desensitizer>, BoxError> {
            match factory() {
                Ok(handler) => Ok(Arc::new(handler)),
                Err(err) => Err(err.into()),
            }
        });
        self.insert(id.into(), factory)
    }

    fn insert(&mut self, id: String, factory: Factory) -> Result<(), Error> {
        if self.factories.contains_key(&id) {
            return Err(Error::DuplicateHandler { id });
        }
        tracing::debug!(handler = %id, "registered desensitizer");
        self.factories.insert(id, factory);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Constructs the handler registered under `id`.
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn Desensitizer>, Error> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| Error::UnknownHandler { id: id.to_owned() })?;
        factory().map_err(|source| Error::HandlerConstruction {
            id: id.to_owned(),
            source,
        })
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("ids", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
