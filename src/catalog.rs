//! XML Catalog support for schema location resolution
//!
//! OASIS XML catalogs map namespace URNs and system identifiers to local
//! copies of schema documents. A catalog can be appended to a
//! [`ResolverChain`](crate::resolver::ResolverChain) so imports that no
//! configuration claims still land on a local file.
//!
//! # Supported Elements
//!
//! - `<catalog>` - Root element
//! - `<group>` - Grouping element, honours `xml:base`
//! - `<system>` - Maps system identifiers to URIs
//! - `<uri>` - Maps names (namespaces, URNs) to URIs
//! - `<nextCatalog>` - Includes another catalog file

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::is_absolute;
use crate::namespaces::XML_NAMESPACE;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// XML Catalog for resolving schema locations
#[derive(Debug, Clone, Default)]
pub struct XmlCatalog {
    /// System ID to URI mappings (systemId -> uri)
    system_mappings: HashMap<String, String>,
    /// Name to URI mappings (name -> uri)
    uri_mappings: HashMap<String, String>,
}

impl XmlCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a file, following `<nextCatalog>` references
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_limits(path, &Limits::default())
    }

    /// Load a catalog from a file with explicit nesting limits
    pub fn from_file_with_limits(path: impl AsRef<Path>, limits: &Limits) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.load_file(path.as_ref(), limits, 1)?;
        Ok(catalog)
    }

    /// Parse catalog content; relative entries are joined against `base_dir`
    pub fn from_str_with_base(xml: &str, base_dir: Option<&Path>) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.parse_catalog(xml, base_dir, &Limits::default(), 1)?;
        Ok(catalog)
    }

    fn load_file(&mut self, path: &Path, limits: &Limits, depth: usize) -> Result<()> {
        limits.check_catalog_depth(depth)?;
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Resource(format!("failed to read catalog '{}': {}", path.display(), e))
        })?;
        self.parse_catalog(&content, path.parent(), limits, depth)
    }

    fn parse_catalog(
        &mut self,
        xml: &str,
        base_dir: Option<&Path>,
        limits: &Limits,
        depth: usize,
    ) -> Result<()> {
        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != "catalog" {
            return Err(Error::Catalog(format!(
                "expected catalog root element, got '{}'",
                root.tag_name().name()
            )));
        }
        self.process_children(root, base_dir, limits, depth)
    }

    fn process_children(
        &mut self,
        parent: roxmltree::Node<'_, '_>,
        base_dir: Option<&Path>,
        limits: &Limits,
        depth: usize,
    ) -> Result<()> {
        for child in parent.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "system" => {
                    if let (Some(system_id), Some(uri)) =
                        (child.attribute("systemId"), child.attribute("uri"))
                    {
                        self.system_mappings
                            .insert(system_id.to_string(), resolve_entry(base_dir, uri));
                    }
                }
                "uri" => {
                    if let (Some(name), Some(uri)) = (child.attribute("name"), child.attribute("uri")) {
                        self.uri_mappings
                            .insert(name.to_string(), resolve_entry(base_dir, uri));
                    }
                }
                "nextCatalog" => {
                    if let Some(catalog) = child.attribute("catalog") {
                        let path = match base_dir {
                            Some(base) => base.join(catalog),
                            None => PathBuf::from(catalog),
                        };
                        let mut next = XmlCatalog::new();
                        match next.load_file(&path, limits, depth + 1) {
                            Ok(()) => self.merge(&next),
                            Err(e @ Error::LimitExceeded(_)) => return Err(e),
                            Err(e) => warn!(catalog = %path.display(), error = %e, "skipping nested catalog"),
                        }
                    }
                }
                "group" => {
                    let group_base = match child.attribute((XML_NAMESPACE, "base")) {
                        Some(xml_base) => Some(match base_dir {
                            Some(base) => base.join(xml_base),
                            None => PathBuf::from(xml_base),
                        }),
                        None => base_dir.map(Path::to_path_buf),
                    };
                    self.process_children(child, group_base.as_deref(), limits, depth)?;
                }
                other => debug!(element = other, "ignoring catalog entry"),
            }
        }
        Ok(())
    }

    /// Resolve an identifier: system IDs first, then names
    pub fn resolve(&self, location: &str) -> Option<&str> {
        self.system_mappings
            .get(location)
            .or_else(|| self.uri_mappings.get(location))
            .map(String::as_str)
    }

    /// Check if this catalog is empty (has no mappings)
    pub fn is_empty(&self) -> bool {
        self.system_mappings.is_empty() && self.uri_mappings.is_empty()
    }

    /// Get the number of mappings
    pub fn len(&self) -> usize {
        self.system_mappings.len() + self.uri_mappings.len()
    }

    /// Merge another catalog into this one; existing mappings win
    pub fn merge(&mut self, other: &XmlCatalog) {
        for (k, v) in &other.system_mappings {
            self.system_mappings.entry(k.clone()).or_insert_with(|| v.clone());
        }
        for (k, v) in &other.uri_mappings {
            self.uri_mappings.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }
}

fn resolve_entry(base_dir: Option<&Path>, uri: &str) -> String {
    match base_dir {
        Some(base) if !is_absolute(uri) => base.join(uri).to_string_lossy().to_string(),
        _ => uri.to_string(),
    }
}
