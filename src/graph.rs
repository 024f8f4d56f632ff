//! Dependency resolution order
//!
//! The load order of a configuration graph is its post-order traversal:
//! every dependency is emitted before the configurations that depend on it,
//! and each namespace appears once, at the position of its first completion.
//! Capabilities registered by a dependency are therefore already in the
//! composition context when a dependent's contribution step runs.

use crate::configuration::Configuration;
use crate::error::{Error, Result};
use crate::limits::Limits;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

/// Load order for a single root with default limits
pub fn load_order(root: &Arc<Configuration>) -> Result<Vec<Arc<Configuration>>> {
    load_order_with_limits(std::slice::from_ref(root), &Limits::default())
}

/// Load order for several roots sharing one deduplication pass
pub fn load_order_all(roots: &[Arc<Configuration>]) -> Result<Vec<Arc<Configuration>>> {
    load_order_with_limits(roots, &Limits::default())
}

/// Load order for several roots with explicit limits.
///
/// Roots are traversed in the given order. A namespace reached again while it
/// is still on the traversal stack is reported as a cycle.
pub fn load_order_with_limits(
    roots: &[Arc<Configuration>],
    limits: &Limits,
) -> Result<Vec<Arc<Configuration>>> {
    let mut traversal = Traversal {
        limits,
        visited: HashSet::new(),
        stack: Vec::new(),
        order: Vec::new(),
    };
    for root in roots {
        traversal.visit(root)?;
    }
    Ok(traversal.order)
}

struct Traversal<'a> {
    limits: &'a Limits,
    visited: HashSet<String>,
    stack: Vec<String>,
    order: Vec<Arc<Configuration>>,
}

impl Traversal<'_> {
    fn visit(&mut self, node: &Arc<Configuration>) -> Result<()> {
        let namespace = node.namespace_uri();
        if let Some(start) = self.stack.iter().position(|ns| ns == namespace) {
            return Err(Error::cycle(self.stack[start..].to_vec()));
        }
        if self.visited.contains(namespace) {
            trace!(namespace, "already ordered");
            return Ok(());
        }

        self.stack.push(namespace.to_string());
        self.limits.check_dependency_depth(self.stack.len())?;
        for dependency in node.dependencies() {
            self.visit(dependency)?;
        }
        self.stack.pop();

        self.visited.insert(namespace.to_string());
        self.order.push(Arc::clone(node));
        self.limits.check_configurations(self.order.len())?;
        trace!(namespace, position = self.order.len() - 1, "ordered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(ns: &str, deps: &[&Arc<Configuration>]) -> Arc<Configuration> {
        Configuration::builder(ns, format!("{}.xsd", ns.trim_start_matches("urn:")))
            .depends_on_all(deps.iter().map(|d| Arc::clone(*d)))
            .build()
            .unwrap()
    }

    fn namespaces(order: &[Arc<Configuration>]) -> Vec<&str> {
        order.iter().map(|c| c.namespace_uri()).collect()
    }

    #[test]
    fn test_single_dependency() {
        let y = config("urn:y", &[]);
        let x = config("urn:x", &[&y]);
        let order = load_order(&x).unwrap();
        assert_eq!(namespaces(&order), vec!["urn:y", "urn:x"]);
    }

    #[test]
    fn test_diamond_is_deduplicated() {
        let base = config("urn:base", &[]);
        let left = config("urn:left", &[&base]);
        let right = config("urn:right", &[&base]);
        let top = config("urn:top", &[&left, &right]);

        let order = load_order(&top).unwrap();
        assert_eq!(
            namespaces(&order),
            vec!["urn:base", "urn:left", "urn:right", "urn:top"]
        );
    }

    #[test]
    fn test_first_occurrence_wins_for_same_namespace() {
        let y_first = Configuration::builder("urn:y", "first.xsd").build().unwrap();
        let y_second = Configuration::builder("urn:y", "second.xsd").build().unwrap();
        let a = config("urn:a", &[&y_first]);
        let b = config("urn:b", &[&y_second]);
        let root = config("urn:root", &[&a, &b]);

        let order = load_order(&root).unwrap();
        assert_eq!(namespaces(&order), vec!["urn:y", "urn:a", "urn:b", "urn:root"]);
        assert_eq!(order[0].schema_location(), "first.xsd");
    }

    #[test]
    fn test_multiple_roots_share_dedup() {
        let y = config("urn:y", &[]);
        let x = config("urn:x", &[&y]);
        let w = config("urn:w", &[&y]);
        let order = load_order_all(&[x, w]).unwrap();
        assert_eq!(namespaces(&order), vec!["urn:y", "urn:x", "urn:w"]);
    }

    #[test]
    fn test_depth_limit() {
        let mut current = config("urn:n0", &[]);
        for i in 1..10 {
            current = config(&format!("urn:n{}", i), &[&current]);
        }
        let limits = Limits {
            max_dependency_depth: 5,
            ..Limits::default()
        };
        let err = load_order_with_limits(&[current], &limits).unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
    }

    #[test]
    fn test_configuration_count_limit() {
        let a = config("urn:a", &[]);
        let b = config("urn:b", &[]);
        let c = config("urn:c", &[&a, &b]);
        let limits = Limits {
            max_configurations: 2,
            ..Limits::default()
        };
        assert!(load_order_with_limits(&[c], &limits).is_err());
    }
}
