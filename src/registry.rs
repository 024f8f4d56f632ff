//! Configuration registry
//!
//! The registry accepts configurations declared by namespace, in any order,
//! with dependencies named by namespace. Cycles are rejected as soon as the
//! declaration that closes them is registered; [`ConfigurationRegistry::build`]
//! then materialises shared [`Configuration`]s bottom-up.

use crate::bindings::BindingSet;
use crate::configuration::{Configuration, ContextContributor};
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::namespaces::validate_namespace;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// A configuration declared by namespace, not yet materialised
#[derive(Clone)]
pub struct Declaration {
    namespace: String,
    schema_location: String,
    dependencies: Vec<String>,
    bindings: Option<BindingSet>,
    contributors: Vec<Arc<dyn ContextContributor>>,
}

impl Declaration {
    /// Declare `namespace` located at `schema_location`
    pub fn new(namespace: impl Into<String>, schema_location: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            schema_location: schema_location.into(),
            dependencies: Vec::new(),
            bindings: None,
            contributors: Vec::new(),
        }
    }

    /// Depend on the configuration governing `namespace`
    pub fn depends_on(mut self, namespace: impl Into<String>) -> Self {
        self.dependencies.push(namespace.into());
        self
    }

    /// Attach a binding set
    pub fn with_bindings(mut self, bindings: BindingSet) -> Self {
        self.bindings = Some(bindings);
        self
    }

    /// Add a contribution step
    pub fn contributes(mut self, contributor: impl ContextContributor + 'static) -> Self {
        self.contributors.push(Arc::new(contributor));
        self
    }

    /// Declared namespace
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

enum Entry {
    Declared(Declaration),
    Built(Arc<Configuration>),
}

impl Entry {
    fn dependencies(&self) -> Vec<&str> {
        match self {
            Entry::Declared(decl) => decl.dependencies.iter().map(String::as_str).collect(),
            Entry::Built(config) => config
                .dependencies()
                .iter()
                .map(|d| d.namespace_uri())
                .collect(),
        }
    }
}

/// Namespace-keyed set of configurations
#[derive(Default)]
pub struct ConfigurationRegistry {
    entries: IndexMap<String, Entry>,
    limits: Limits,
}

impl ConfigurationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the default limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Register an already built configuration and, transitively, its dependencies.
    ///
    /// Dependencies already registered under the same namespace are kept. Fails
    /// with [`Error::CyclicDependency`] when the new entries close a cycle with
    /// registered declarations; on any error the registry is left unchanged.
    pub fn add(&mut self, configuration: Arc<Configuration>) -> Result<()> {
        if self.entries.contains_key(configuration.namespace_uri()) {
            return Err(Error::InvalidConfiguration(format!(
                "namespace '{}' is already registered",
                configuration.namespace_uri()
            )));
        }

        let mut inserted = Vec::new();
        let mut result = self.insert_built(configuration, &mut inserted);
        if result.is_ok() {
            result = inserted
                .iter()
                .try_for_each(|namespace| self.check_cycles_from(namespace));
        }
        if let Err(e) = result {
            for namespace in &inserted {
                self.entries.shift_remove(namespace);
            }
            return Err(e);
        }
        debug!(added = inserted.len(), "configurations added");
        Ok(())
    }

    fn insert_built(
        &mut self,
        configuration: Arc<Configuration>,
        inserted: &mut Vec<String>,
    ) -> Result<()> {
        for dependency in configuration.dependencies() {
            if !self.entries.contains_key(dependency.namespace_uri()) {
                self.insert_built(Arc::clone(dependency), inserted)?;
            }
        }
        self.limits.check_configurations(self.entries.len() + 1)?;
        let namespace = configuration.namespace_uri().to_string();
        self.entries.insert(namespace.clone(), Entry::Built(configuration));
        inserted.push(namespace);
        Ok(())
    }

    /// Register a declaration.
    ///
    /// Fails with [`Error::CyclicDependency`] when the declaration closes a
    /// cycle among registered configurations; the registry is left unchanged.
    pub fn declare(&mut self, declaration: Declaration) -> Result<()> {
        validate_namespace(&declaration.namespace)?;
        if declaration.schema_location.trim().is_empty() {
            return Err(Error::InvalidConfiguration(format!(
                "schema location for '{}' must not be empty",
                declaration.namespace
            )));
        }
        if self.entries.contains_key(&declaration.namespace) {
            return Err(Error::InvalidConfiguration(format!(
                "namespace '{}' is already registered",
                declaration.namespace
            )));
        }
        self.limits.check_configurations(self.entries.len() + 1)?;

        let namespace = declaration.namespace.clone();
        self.entries.insert(namespace.clone(), Entry::Declared(declaration));
        if let Err(e) = self.check_cycles_from(&namespace) {
            self.entries.shift_remove(&namespace);
            return Err(e);
        }
        debug!(namespace = %namespace, "configuration declared");
        Ok(())
    }

    /// Whether `namespace` is registered
    pub fn contains(&self, namespace: &str) -> bool {
        self.entries.contains_key(namespace)
    }

    /// Registered namespaces in registration order
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered configurations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Materialise the configuration governing `namespace`
    pub fn build(&self, namespace: &str) -> Result<Arc<Configuration>> {
        let mut built = HashMap::new();
        self.materialise(namespace, &mut built, &mut Vec::new())
    }

    /// Materialise several configurations; dependencies they share are built once
    pub fn build_many<I, S>(&self, namespaces: I) -> Result<Vec<Arc<Configuration>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut built = HashMap::new();
        namespaces
            .into_iter()
            .map(|namespace| self.materialise(namespace.as_ref(), &mut built, &mut Vec::new()))
            .collect()
    }

    /// Materialise every registered configuration, in registration order
    pub fn build_all(&self) -> Result<Vec<Arc<Configuration>>> {
        self.build_many(self.entries.keys())
    }

    fn materialise(
        &self,
        namespace: &str,
        built: &mut HashMap<String, Arc<Configuration>>,
        stack: &mut Vec<String>,
    ) -> Result<Arc<Configuration>> {
        if let Some(config) = built.get(namespace) {
            return Ok(Arc::clone(config));
        }
        if let Some(start) = stack.iter().position(|ns| ns == namespace) {
            return Err(Error::cycle(stack[start..].to_vec()));
        }
        let entry = self.entries.get(namespace).ok_or_else(|| {
            Error::InvalidConfiguration(match stack.last() {
                Some(dependent) => format!(
                    "'{}' depends on unregistered namespace '{}'",
                    dependent, namespace
                ),
                None => format!("namespace '{}' is not registered", namespace),
            })
        })?;

        let config = match entry {
            Entry::Built(config) => Arc::clone(config),
            Entry::Declared(decl) => {
                stack.push(namespace.to_string());
                self.limits.check_dependency_depth(stack.len())?;
                let mut builder = Configuration::builder(&decl.namespace, &decl.schema_location);
                for dependency in &decl.dependencies {
                    builder = builder.depends_on(self.materialise(dependency, built, stack)?);
                }
                stack.pop();
                if let Some(bindings) = &decl.bindings {
                    builder = builder.with_bindings(bindings.clone());
                }
                for contributor in &decl.contributors {
                    builder = builder.contributes(SharedContributor(Arc::clone(contributor)));
                }
                builder.build()?
            }
        };
        built.insert(namespace.to_string(), Arc::clone(&config));
        Ok(config)
    }

    /// Visited/on-stack traversal over registered entries starting at `start`.
    ///
    /// Unregistered dependencies are skipped; they are reported by `build`.
    fn check_cycles_from(&self, start: &str) -> Result<()> {
        let mut visited = HashSet::new();
        let mut stack = Vec::new();
        self.visit(start, &mut visited, &mut stack)
    }

    fn visit<'a>(
        &'a self,
        namespace: &'a str,
        visited: &mut HashSet<&'a str>,
        stack: &mut Vec<&'a str>,
    ) -> Result<()> {
        if let Some(start) = stack.iter().position(|ns| *ns == namespace) {
            return Err(Error::cycle(stack[start..].iter().copied()));
        }
        if !visited.insert(namespace) {
            return Ok(());
        }
        let Some(entry) = self.entries.get(namespace) else {
            return Ok(());
        };
        stack.push(namespace);
        for dependency in entry.dependencies() {
            self.visit(dependency, visited, stack)?;
        }
        stack.pop();
        Ok(())
    }
}

/// Lets one declared contributor back several materialisations
struct SharedContributor(Arc<dyn ContextContributor>);

impl ContextContributor for SharedContributor {
    fn contribute(&self, context: &mut crate::context::CompositionContext) -> Result<()> {
        self.0.contribute(context)
    }
}
