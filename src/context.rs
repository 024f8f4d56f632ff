//! Composition context
//!
//! Session-scoped capability table. Configurations register shared instances
//! (geometry factories, settings objects) or factory functions under string
//! keys while the session is assembled; the table is then frozen and shared
//! read-only with every binding invocation of the parse.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type FactoryFn = dyn Fn() -> Box<dyn Any + Send> + Send + Sync;

/// A registered capability
#[derive(Clone)]
enum Capability {
    /// Shared instance handed out by reference
    Instance(Arc<dyn Any + Send + Sync>),
    /// Factory producing a fresh value per call
    Factory(Arc<FactoryFn>),
}

#[derive(Clone)]
struct Entry {
    capability: Capability,
    provider: Option<String>,
}

/// Capability table populated by configurations in dependency order
#[derive(Clone, Default)]
pub struct CompositionContext {
    entries: IndexMap<String, Entry>,
    provider: Option<String>,
    frozen: bool,
}

impl CompositionContext {
    /// Create an empty, mutable context
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared instance under `key`, shadowing any earlier value
    pub fn register<T>(&mut self, key: impl Into<String>, value: T) -> Result<()>
    where
        T: Any + Send + Sync,
    {
        self.insert(key.into(), Capability::Instance(Arc::new(value)))
    }

    /// Register a factory under `key`, shadowing any earlier value
    pub fn register_factory<T, F>(&mut self, key: impl Into<String>, factory: F) -> Result<()>
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory: Arc<FactoryFn> = Arc::new(move || Box::new(factory()) as Box<dyn Any + Send>);
        self.insert(key.into(), Capability::Factory(factory))
    }

    fn insert(&mut self, key: String, capability: Capability) -> Result<()> {
        if self.frozen {
            return Err(Error::ContextFrozen { key });
        }
        let entry = Entry {
            capability,
            provider: self.provider.clone(),
        };
        if let Some(previous) = self.entries.insert(key.clone(), entry) {
            debug!(
                key = %key,
                previous = previous.provider.as_deref().unwrap_or("<unknown>"),
                current = self.provider.as_deref().unwrap_or("<unknown>"),
                "capability shadowed"
            );
        }
        Ok(())
    }

    /// Borrow a registered instance.
    ///
    /// Returns `None` when the key is absent, holds a factory, or holds a
    /// value of another type.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        match &self.entries.get(key)?.capability {
            Capability::Instance(value) => value.downcast_ref::<T>(),
            Capability::Factory(_) => None,
        }
    }

    /// Produce a value from a registered factory
    pub fn create<T: Any>(&self, key: &str) -> Option<T> {
        match &self.entries.get(key)?.capability {
            Capability::Factory(factory) => factory().downcast::<T>().ok().map(|value| *value),
            Capability::Instance(_) => None,
        }
    }

    /// Whether anything is registered under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Namespace of the configuration that registered the current value
    pub fn provider(&self, key: &str) -> Option<&str> {
        self.entries.get(key)?.provider.as_deref()
    }

    /// Registered keys in first-registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered capabilities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no capability is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject all further registrations
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.provider = None;
    }

    /// Whether [`freeze`](Self::freeze) has been called
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Attribute subsequent registrations to `namespace`; returns the previous attribution
    pub(crate) fn set_provider(&mut self, namespace: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.provider, namespace)
    }
}

impl fmt::Debug for CompositionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, entry) in &self.entries {
            let kind = match entry.capability {
                Capability::Instance(_) => "instance",
                Capability::Factory(_) => "factory",
            };
            map.entry(key, &(kind, entry.provider.as_deref()));
        }
        map.finish()?;
        if self.frozen {
            f.write_str(" (frozen)")?;
        }
        Ok(())
    }
}
