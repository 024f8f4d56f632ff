//! Schema configurations
//!
//! A [`Configuration`] governs one namespace: it knows the canonical schema
//! document for that namespace, the configurations that must be loaded before
//! it, the bindings it hands to the binding engine, and the capabilities it
//! contributes to the session's [`CompositionContext`].
//!
//! Configurations are immutable once built and shared as `Arc<Configuration>`,
//! so a dependency graph is assembled bottom-up:
//!
//! ```
//! use xmlschema_config::Configuration;
//!
//! let y = Configuration::builder("urn:y", "y.xsd").build()?;
//! let x = Configuration::builder("urn:x", "x.xsd").depends_on(y).build()?;
//!
//! assert_eq!(x.dependencies()[0].namespace_uri(), "urn:y");
//! assert_eq!(x.resolve_location("urn:x", "ignored.xsd").as_deref(), Some("x.xsd"));
//! assert_eq!(x.resolve_location("urn:y", "y.xsd"), None);
//! # Ok::<(), xmlschema_config::Error>(())
//! ```

use crate::bindings::BindingSet;
use crate::context::CompositionContext;
use crate::error::{Error, Result};
use crate::namespaces::validate_namespace;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Contribution step run against the session's composition context
pub trait ContextContributor: Send + Sync {
    /// Register capabilities into `context`
    fn contribute(&self, context: &mut CompositionContext) -> Result<()>;
}

impl<F> ContextContributor for F
where
    F: Fn(&mut CompositionContext) -> Result<()> + Send + Sync,
{
    fn contribute(&self, context: &mut CompositionContext) -> Result<()> {
        self(context)
    }
}

/// Declarative unit governing one namespace
pub struct Configuration {
    namespace: String,
    schema_location: String,
    dependencies: Vec<Arc<Configuration>>,
    bindings: Option<BindingSet>,
    contributors: Vec<Arc<dyn ContextContributor>>,
}

impl Configuration {
    /// Start building a configuration for `namespace` located at `schema_location`
    pub fn builder(
        namespace: impl Into<String>,
        schema_location: impl Into<String>,
    ) -> ConfigurationBuilder {
        ConfigurationBuilder::new(namespace, schema_location)
    }

    /// Governed namespace URI; never empty
    pub fn namespace_uri(&self) -> &str {
        &self.namespace
    }

    /// Canonical schema document location; never empty
    pub fn schema_location(&self) -> &str {
        &self.schema_location
    }

    /// Direct dependencies in declaration order, unique by namespace
    pub fn dependencies(&self) -> &[Arc<Configuration>] {
        &self.dependencies
    }

    /// Bindings contributed to the binding engine, if any
    pub fn binding_set(&self) -> Option<&BindingSet> {
        self.bindings.as_ref()
    }

    /// Resolve an import of `namespace`.
    ///
    /// The requested location is ignored: a configuration always answers with
    /// its own canonical location, and answers `None` for any other namespace.
    pub fn resolve_location(&self, namespace: &str, _requested: &str) -> Option<String> {
        (namespace == self.namespace).then(|| self.schema_location.clone())
    }

    /// Run this configuration's contribution steps against `context`.
    ///
    /// Running again re-registers the same keys; the last write wins.
    pub fn contribute_bindings(&self, context: &mut CompositionContext) -> Result<()> {
        let previous = context.set_provider(Some(self.namespace.clone()));
        let result = self
            .contributors
            .iter()
            .try_for_each(|contributor| contributor.contribute(context));
        context.set_provider(previous);
        result
    }

    /// Whether this configuration contributes capabilities
    pub fn has_contributions(&self) -> bool {
        !self.contributors.is_empty()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dependencies: Vec<&str> = self
            .dependencies
            .iter()
            .map(|d| d.namespace_uri())
            .collect();
        f.debug_struct("Configuration")
            .field("namespace", &self.namespace)
            .field("schema_location", &self.schema_location)
            .field("dependencies", &dependencies)
            .field("bindings", &self.bindings.as_ref().map(BindingSet::len))
            .field("contributors", &self.contributors.len())
            .finish()
    }
}

/// Builder for [`Configuration`]
pub struct ConfigurationBuilder {
    namespace: String,
    schema_location: String,
    dependencies: Vec<Arc<Configuration>>,
    bindings: Option<BindingSet>,
    contributors: Vec<Arc<dyn ContextContributor>>,
}

impl ConfigurationBuilder {
    /// Create a builder
    pub fn new(namespace: impl Into<String>, schema_location: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            schema_location: schema_location.into(),
            dependencies: Vec::new(),
            bindings: None,
            contributors: Vec::new(),
        }
    }

    /// Declare a dependency; duplicates by namespace are dropped at build time
    pub fn depends_on(mut self, dependency: Arc<Configuration>) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Declare several dependencies in order
    pub fn depends_on_all(mut self, dependencies: impl IntoIterator<Item = Arc<Configuration>>) -> Self {
        self.dependencies.extend(dependencies);
        self
    }

    /// Attach the binding set handed to the binding engine
    pub fn with_bindings(mut self, bindings: BindingSet) -> Self {
        self.bindings = Some(bindings);
        self
    }

    /// Add a contribution step
    pub fn contributes(mut self, contributor: impl ContextContributor + 'static) -> Self {
        self.contributors.push(Arc::new(contributor));
        self
    }

    /// Validate and freeze the configuration
    pub fn build(self) -> Result<Arc<Configuration>> {
        validate_namespace(&self.namespace)?;
        if self.schema_location.trim().is_empty() {
            return Err(Error::InvalidConfiguration(format!(
                "schema location for '{}' must not be empty",
                self.namespace
            )));
        }

        let mut dependencies: Vec<Arc<Configuration>> = Vec::with_capacity(self.dependencies.len());
        let mut explored = HashSet::new();
        for dependency in self.dependencies {
            if let Some(mut path) = path_to(&dependency, &self.namespace, &mut explored) {
                path.insert(0, self.namespace.clone());
                return Err(Error::cycle(path));
            }
            if dependencies
                .iter()
                .any(|d| d.namespace_uri() == dependency.namespace_uri())
            {
                debug!(
                    namespace = %self.namespace,
                    dependency = %dependency.namespace_uri(),
                    "dropping duplicate dependency"
                );
                continue;
            }
            dependencies.push(dependency);
        }

        Ok(Arc::new(Configuration {
            namespace: self.namespace,
            schema_location: self.schema_location,
            dependencies,
            bindings: self.bindings,
            contributors: self.contributors,
        }))
    }
}

/// Namespace path from `from` down to a configuration governing `target`.
///
/// Shared dependencies are explored once; `explored` holds the nodes already
/// known not to reach `target`.
fn path_to(
    from: &Arc<Configuration>,
    target: &str,
    explored: &mut HashSet<*const Configuration>,
) -> Option<Vec<String>> {
    if from.namespace == target {
        return Some(vec![from.namespace.clone()]);
    }
    if !explored.insert(Arc::as_ptr(from)) {
        return None;
    }
    from.dependencies.iter().find_map(|dependency| {
        path_to(dependency, target, explored).map(|mut path| {
            path.insert(0, from.namespace.clone());
            path
        })
    })
}
