//! Parsing sessions
//!
//! A [`Session`] is everything the parser needs from the configuration layer
//! for one parse: the load order, the resolver chain, the merged binding set
//! and the frozen composition context.

use crate::bindings::BindingSet;
use crate::catalog::XmlCatalog;
use crate::configuration::Configuration;
use crate::context::CompositionContext;
use crate::error::Result;
use crate::graph::load_order_with_limits;
use crate::limits::Limits;
use crate::resolver::ResolverChain;
use std::sync::Arc;
use tracing::{debug, info};

/// Builder for a [`Session`]
#[derive(Debug, Default)]
pub struct SessionBuilder {
    roots: Vec<Arc<Configuration>>,
    catalog: Option<XmlCatalog>,
    limits: Limits,
}

impl SessionBuilder {
    /// Start a session rooted at `root`
    pub fn new(root: Arc<Configuration>) -> Self {
        Self {
            roots: vec![root],
            ..Self::default()
        }
    }

    /// Add another root configuration
    pub fn with_root(mut self, root: Arc<Configuration>) -> Self {
        self.roots.push(root);
        self
    }

    /// Consult `catalog` for imports no configuration claims
    pub fn with_catalog(mut self, catalog: XmlCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Override the default limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Resolve the load order, run every contribution step and freeze the context.
    ///
    /// Contributions run dependency-first, so a dependent configuration can
    /// read or override what its dependencies registered.
    pub fn build(self) -> Result<Session> {
        let order = load_order_with_limits(&self.roots, &self.limits)?;

        let mut context = CompositionContext::new();
        let mut bindings = BindingSet::new();
        for configuration in &order {
            configuration.contribute_bindings(&mut context)?;
            if let Some(set) = configuration.binding_set() {
                for (kind, name) in bindings.merge(set) {
                    debug!(
                        namespace = %configuration.namespace_uri(),
                        %kind,
                        component = %name,
                        "binding overridden"
                    );
                }
            }
        }
        context.freeze();

        let mut resolver = ResolverChain::new(order.clone());
        if let Some(catalog) = self.catalog {
            resolver = resolver.with_catalog(catalog);
        }

        info!(
            configurations = order.len(),
            capabilities = context.len(),
            bindings = bindings.len(),
            "session ready"
        );

        Ok(Session {
            order,
            context: Arc::new(context),
            resolver,
            bindings,
        })
    }
}

/// Configuration state for one parsing session
#[derive(Debug)]
pub struct Session {
    order: Vec<Arc<Configuration>>,
    context: Arc<CompositionContext>,
    resolver: ResolverChain,
    bindings: BindingSet,
}

impl Session {
    /// Shorthand for `SessionBuilder::new(root).build()`
    pub fn for_root(root: Arc<Configuration>) -> Result<Self> {
        SessionBuilder::new(root).build()
    }

    /// Configurations in load order
    pub fn load_order(&self) -> &[Arc<Configuration>] {
        &self.order
    }

    /// Frozen composition context, shareable across threads
    pub fn context(&self) -> &Arc<CompositionContext> {
        &self.context
    }

    /// Resolver chain over the load order
    pub fn resolver(&self) -> &ResolverChain {
        &self.resolver
    }

    /// Bindings of all configurations, later configurations overriding earlier ones
    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    /// Canonical schema location of a governed namespace
    pub fn schema_location(&self, namespace: &str) -> Option<&str> {
        self.order
            .iter()
            .find(|c| c.namespace_uri() == namespace)
            .map(|c| c.schema_location())
    }
}
