//! Schema location resolution
//!
//! While a schema document is loaded, every `xs:import`/`xs:include` carries
//! a namespace and a location hint. The [`ResolverChain`] asks each
//! configuration of the session, in load order, whether it governs that
//! namespace; the first answer wins. An optional catalog is consulted last.

use crate::catalog::XmlCatalog;
use crate::configuration::Configuration;
use crate::error::{Error, Result};
use crate::locations::Location;
use std::sync::Arc;
use tracing::trace;

/// Maps an import (namespace + location hint) to a loadable location
pub trait LocationResolver {
    /// Resolve an import; `None` means "not mine"
    fn resolve(&self, namespace: &str, hint: &str) -> Option<String>;
}

impl LocationResolver for Configuration {
    fn resolve(&self, namespace: &str, hint: &str) -> Option<String> {
        self.resolve_location(namespace, hint)
    }
}

impl LocationResolver for XmlCatalog {
    fn resolve(&self, namespace: &str, hint: &str) -> Option<String> {
        XmlCatalog::resolve(self, namespace)
            .or_else(|| (!hint.is_empty()).then(|| XmlCatalog::resolve(self, hint)).flatten())
            .map(str::to_string)
    }
}

/// Resolver over the dependency-resolved configuration list
#[derive(Debug, Clone, Default)]
pub struct ResolverChain {
    configurations: Vec<Arc<Configuration>>,
    catalog: Option<XmlCatalog>,
}

impl ResolverChain {
    /// Create a chain over configurations in load order
    pub fn new(configurations: Vec<Arc<Configuration>>) -> Self {
        Self {
            configurations,
            catalog: None,
        }
    }

    /// Consult `catalog` after every configuration has declined
    pub fn with_catalog(mut self, catalog: XmlCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Namespaces in the order they are tried
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.configurations.iter().map(|c| c.namespace_uri())
    }

    /// Resolve, or fall back to the hint.
    ///
    /// A relative hint is joined against `base`, the location of the
    /// document containing the import. Fails with
    /// [`Error::UnresolvedImport`] when nothing claims the namespace and the
    /// hint is empty.
    pub fn resolve_or_hint(
        &self,
        namespace: &str,
        hint: &str,
        base: Option<&Location>,
    ) -> Result<String> {
        if let Some(location) = self.resolve(namespace, hint) {
            return Ok(location);
        }
        if hint.is_empty() {
            return Err(Error::UnresolvedImport {
                namespace: namespace.to_string(),
            });
        }
        match base {
            Some(base) => Ok(base.join(hint)?.as_string()),
            None => Ok(hint.to_string()),
        }
    }
}

impl LocationResolver for ResolverChain {
    fn resolve(&self, namespace: &str, hint: &str) -> Option<String> {
        let found = self
            .configurations
            .iter()
            .find_map(|c| c.resolve_location(namespace, hint))
            .or_else(|| self.catalog.as_ref().and_then(|c| LocationResolver::resolve(c, namespace, hint)));
        trace!(namespace, hint, resolved = ?found, "resolve import");
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::load_order;

    fn scenario() -> ResolverChain {
        let y = Configuration::builder("urn:y", "y.xsd").build().unwrap();
        let x = Configuration::builder("urn:x", "x.xsd")
            .depends_on(y)
            .build()
            .unwrap();
        ResolverChain::new(load_order(&x).unwrap())
    }

    #[test]
    fn test_chain_resolves_dependency() {
        let chain = scenario();
        assert_eq!(chain.namespaces().collect::<Vec<_>>(), vec!["urn:y", "urn:x"]);
        assert_eq!(chain.resolve("urn:y", "ignored").as_deref(), Some("y.xsd"));
        assert_eq!(chain.resolve("urn:x", "ignored").as_deref(), Some("x.xsd"));
        assert_eq!(chain.resolve("urn:z", "ignored"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let a = Configuration::builder("urn:a", "first.xsd").build().unwrap();
        let a2 = Configuration::builder("urn:a", "second.xsd").build().unwrap();
        let chain = ResolverChain::new(vec![a, a2]);
        assert_eq!(chain.resolve("urn:a", "").as_deref(), Some("first.xsd"));
    }

    #[test]
    fn test_catalog_fallback() {
        let catalog = XmlCatalog::from_str_with_base(
            r#"<catalog>
                <uri name="urn:z" uri="/cache/z.xsd"/>
                <system systemId="http://example.com/w.xsd" uri="/cache/w.xsd"/>
            </catalog>"#,
            None,
        )
        .unwrap();
        let chain = scenario().with_catalog(catalog);

        assert_eq!(chain.resolve("urn:z", "whatever").as_deref(), Some("/cache/z.xsd"));
        assert_eq!(
            chain.resolve("urn:w", "http://example.com/w.xsd").as_deref(),
            Some("/cache/w.xsd")
        );
        // configurations still take precedence
        assert_eq!(chain.resolve("urn:y", "").as_deref(), Some("y.xsd"));
    }

    #[test]
    fn test_resolve_or_hint() {
        let chain = scenario();
        assert_eq!(chain.resolve_or_hint("urn:y", "other.xsd", None).unwrap(), "y.xsd");
        assert_eq!(
            chain.resolve_or_hint("urn:z", "z.xsd", None).unwrap(),
            "z.xsd"
        );

        let base = Location::parse("http://example.com/schemas/main.xsd");
        assert_eq!(
            chain.resolve_or_hint("urn:z", "z.xsd", Some(&base)).unwrap(),
            "http://example.com/schemas/z.xsd"
        );

        let err = chain.resolve_or_hint("urn:z", "", None).unwrap_err();
        assert!(matches!(err, Error::UnresolvedImport { ref namespace } if namespace == "urn:z"));
        assert!(!err.is_fatal());
    }
}
