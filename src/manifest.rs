//! JSON manifests
//!
//! A manifest declares configurations without code:
//!
//! ```json
//! {
//!   "limits": { "maxDependencyDepth": 32 },
//!   "catalog": "catalog.xml",
//!   "configurations": [
//!     {
//!       "namespace": "urn:example:roads",
//!       "schemaLocation": "roads.xsd",
//!       "dependencies": ["http://www.opengis.net/gml"],
//!       "prefixes": { "r": "urn:example:roads" },
//!       "bindings": [
//!         { "name": "r:Road", "kind": "element", "strategy": "feature" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Relative schema locations and the catalog path are resolved against the
//! directory of the manifest file. Bare binding names belong to the declared
//! namespace; the `xs`, `xml`, `xlink` and `gml` prefixes are predefined.

use crate::bindings::{BindingKind, BindingSet};
use crate::catalog::XmlCatalog;
use crate::error::{Error, Result};
use crate::gml;
use crate::limits::Limits;
use crate::locations::is_absolute;
use crate::namespaces::NamespaceContext;
use crate::registry::{ConfigurationRegistry, Declaration};
use crate::session::{Session, SessionBuilder};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_true() -> bool {
    true
}

/// Top-level manifest document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    /// Limits for graphs and catalogs
    #[serde(default)]
    pub limits: Limits,
    /// Optional XML catalog consulted after all configurations
    #[serde(default)]
    pub catalog: Option<String>,
    /// Register the stock XLink, SMIL and GML configurations first
    #[serde(default = "default_true")]
    pub stock: bool,
    /// Declared configurations
    pub configurations: Vec<ConfigurationEntry>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// One declared configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigurationEntry {
    /// Governed namespace
    pub namespace: String,
    /// Canonical schema document
    pub schema_location: String,
    /// Namespaces this configuration depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Extra prefixes for binding names
    #[serde(default)]
    pub prefixes: IndexMap<String, String>,
    /// Component bindings
    #[serde(default)]
    pub bindings: Vec<BindingEntry>,
}

/// One declared binding
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingEntry {
    /// Prefixed, Clark or bare component name
    pub name: String,
    /// Component kind
    pub kind: BindingKind,
    /// Strategy identifier
    pub strategy: String,
}

impl Manifest {
    /// Parse a manifest; relative paths stay relative to the working directory
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a manifest file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Resource(format!("failed to read manifest '{}': {}", path.display(), e))
        })?;
        let mut manifest = Self::parse(&content)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf);
        Ok(manifest)
    }

    /// Directory relative locations are resolved against
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    fn resolve_path(&self, location: &str) -> String {
        match &self.base_dir {
            Some(dir) if !is_absolute(location) => dir.join(location).to_string_lossy().to_string(),
            _ => location.to_string(),
        }
    }

    /// Declarations with locations and binding names resolved
    pub fn declarations(&self) -> Result<Vec<Declaration>> {
        self.configurations
            .iter()
            .map(|entry| -> Result<Declaration> {
                let mut declaration = Declaration::new(
                    &entry.namespace,
                    self.resolve_path(&entry.schema_location),
                );
                for dependency in &entry.dependencies {
                    declaration = declaration.depends_on(dependency);
                }
                if !entry.bindings.is_empty() {
                    declaration = declaration.with_bindings(entry.binding_set()?);
                }
                Ok(declaration)
            })
            .collect()
    }

    /// Registry holding the stock configurations (unless disabled) and every declaration
    pub fn registry(&self) -> Result<ConfigurationRegistry> {
        let mut registry = ConfigurationRegistry::new().with_limits(self.limits.clone());
        if self.stock {
            registry.add(gml::gml()?)?;
        }
        for declaration in self.declarations()? {
            registry.declare(declaration)?;
        }
        Ok(registry)
    }

    /// Load the catalog named by the manifest, if any
    pub fn load_catalog(&self) -> Result<Option<XmlCatalog>> {
        self.catalog
            .as_deref()
            .map(|path| XmlCatalog::from_file_with_limits(self.resolve_path(path), &self.limits))
            .transpose()
    }

    /// Build a session rooted at `root`, or at every declared configuration
    pub fn session(&self, root: Option<&str>) -> Result<Session> {
        let registry = self.registry()?;
        let roots = match root {
            Some(namespace) => vec![registry.build(namespace)?],
            None => registry.build_many(self.configurations.iter().map(|entry| &entry.namespace))?,
        };
        let mut roots = roots.into_iter();
        let first = roots.next().ok_or_else(|| {
            Error::InvalidConfiguration("manifest declares no configurations".to_string())
        })?;

        let mut builder = SessionBuilder::new(first).with_limits(self.limits.clone());
        for root in roots {
            builder = builder.with_root(root);
        }
        if let Some(catalog) = self.load_catalog()? {
            builder = builder.with_catalog(catalog);
        }
        builder.build()
    }
}

impl ConfigurationEntry {
    /// Binding set with names resolved against this entry's prefixes
    pub fn binding_set(&self) -> Result<BindingSet> {
        let mut context = NamespaceContext::with_well_known();
        context.set_default_namespace(&self.namespace);
        for (prefix, namespace) in &self.prefixes {
            context.add_prefix(prefix, namespace);
        }
        let mut set = BindingSet::new();
        for binding in &self.bindings {
            set.insert(binding.kind, context.resolve(&binding.name)?, &binding.strategy);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::{QName, GML_NAMESPACE, XLINK_NAMESPACE};
    use crate::resolver::LocationResolver;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
        "configurations": [
            {
                "namespace": "urn:example:roads",
                "schemaLocation": "roads.xsd",
                "dependencies": ["http://www.opengis.net/gml"],
                "prefixes": { "r": "urn:example:roads" },
                "bindings": [
                    { "name": "r:Road", "kind": "element", "strategy": "feature" },
                    { "name": "Lane", "kind": "type", "strategy": "lane" },
                    { "name": "gml:Point", "kind": "element", "strategy": "road-point" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        assert!(manifest.stock);
        assert_eq!(manifest.limits, Limits::default());
        assert_eq!(manifest.configurations.len(), 1);

        let set = manifest.configurations[0].binding_set().unwrap();
        assert_eq!(set.len(), 3);
        assert!(set
            .get(BindingKind::Type, &QName::namespaced("urn:example:roads", "Lane"))
            .is_some());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = Manifest::parse(r#"{"configurations": [], "bogus": 1}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_unknown_prefix_rejected() {
        let manifest = Manifest::parse(
            r#"{"configurations": [{"namespace": "urn:a", "schemaLocation": "a.xsd",
                "bindings": [{"name": "q:Thing", "kind": "element", "strategy": "s"}]}]}"#,
        )
        .unwrap();
        assert!(manifest.declarations().is_err());
    }

    #[test]
    fn test_session_from_manifest_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, MANIFEST).unwrap();

        let manifest = Manifest::from_file(&path).unwrap();
        assert_eq!(manifest.base_dir(), Some(dir.path()));

        let session = manifest.session(None).unwrap();
        let order: Vec<_> = session
            .load_order()
            .iter()
            .map(|c| c.namespace_uri())
            .collect();
        assert_eq!(order.last(), Some(&"urn:example:roads"));
        let gml_pos = order.iter().position(|ns| *ns == GML_NAMESPACE).unwrap();
        let xlink_pos = order.iter().position(|ns| *ns == XLINK_NAMESPACE).unwrap();
        assert!(xlink_pos < gml_pos);

        let roads = session.resolver().resolve("urn:example:roads", "").unwrap();
        assert_eq!(roads, dir.path().join("roads.xsd").to_string_lossy());

        // the application schema overrides the stock point binding
        let point = session
            .bindings()
            .get(BindingKind::Element, &QName::namespaced(GML_NAMESPACE, "Point"))
            .unwrap();
        assert_eq!(point.strategy, "road-point");
    }

    #[test]
    fn test_without_stock_dependency_is_unknown() {
        let manifest = Manifest::parse(
            r#"{"stock": false, "configurations": [{"namespace": "urn:a", "schemaLocation": "a.xsd",
                "dependencies": ["http://www.opengis.net/gml"]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            manifest.session(None),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_manifest_cycle() {
        let manifest = Manifest::parse(
            r#"{"configurations": [
                {"namespace": "urn:a", "schemaLocation": "a.xsd", "dependencies": ["urn:b"]},
                {"namespace": "urn:b", "schemaLocation": "b.xsd", "dependencies": ["urn:a"]}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(
            manifest.registry(),
            Err(Error::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_catalog_from_manifest() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("catalog.xml"),
            r#"<catalog><uri name="urn:elsewhere" uri="cache/elsewhere.xsd"/></catalog>"#,
        )
        .unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(
            &path,
            r#"{"catalog": "catalog.xml", "configurations": [{"namespace": "urn:a", "schemaLocation": "http://example.com/a.xsd"}]}"#,
        )
        .unwrap();

        let session = Manifest::from_file(&path).unwrap().session(Some("urn:a")).unwrap();
        assert_eq!(
            session.schema_location("urn:a"),
            Some("http://example.com/a.xsd")
        );
        let resolved = session.resolver().resolve("urn:elsewhere", "").unwrap();
        assert!(resolved.ends_with("elsewhere.xsd"));
    }

    #[test]
    fn test_roots_share_declared_dependency() {
        let manifest = Manifest::parse(
            r#"{"stock": false, "configurations": [
                {"namespace": "urn:base", "schemaLocation": "base.xsd"},
                {"namespace": "urn:left", "schemaLocation": "left.xsd", "dependencies": ["urn:base"]},
                {"namespace": "urn:right", "schemaLocation": "right.xsd", "dependencies": ["urn:base"]}
            ]}"#,
        )
        .unwrap();
        let session = manifest.session(None).unwrap();
        let order = session.load_order();
        assert_eq!(order.len(), 3);
        assert!(Arc::ptr_eq(&order[1].dependencies()[0], &order[0]));
        assert!(Arc::ptr_eq(&order[2].dependencies()[0], &order[0]));
    }

    #[test]
    fn test_empty_manifest_session() {
        let manifest = Manifest::parse(r#"{"configurations": []}"#).unwrap();
        assert!(matches!(
            manifest.session(None),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
