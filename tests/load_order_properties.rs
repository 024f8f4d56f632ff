//! Property-based tests for dependency ordering.
//!
//! Random acyclic graphs are generated by letting node `i` depend only on
//! nodes with a smaller index, then shuffled through the builder.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use proptest::prelude::*;

use xmlschema_config::graph::load_order_all;
use xmlschema_config::{Configuration, Error, LocationResolver, ResolverChain};

/// Adjacency lists: `deps[i]` holds indices strictly below `i`.
fn acyclic_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..24).prop_flat_map(|n| {
        (0..n)
            .map(|i| {
                if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    prop::collection::vec(0..i, 0..4).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

fn namespace(i: usize) -> String {
    format!("urn:node:{}", i)
}

fn build(deps: &[Vec<usize>]) -> Vec<Arc<Configuration>> {
    let mut built: Vec<Arc<Configuration>> = Vec::with_capacity(deps.len());
    for (i, node_deps) in deps.iter().enumerate() {
        let config = Configuration::builder(namespace(i), format!("node{}.xsd", i))
            .depends_on_all(node_deps.iter().map(|&d| Arc::clone(&built[d])))
            .build()
            .unwrap();
        built.push(config);
    }
    built
}

proptest! {
    /// Every dependency precedes its dependents and each namespace appears once.
    #[test]
    fn dependencies_precede_dependents(deps in acyclic_graph()) {
        let built = build(&deps);
        let roots: Vec<_> = built.iter().rev().cloned().collect();
        let order = load_order_all(&roots).unwrap();

        let positions: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(pos, c)| (c.namespace_uri(), pos))
            .collect();
        prop_assert_eq!(positions.len(), order.len());
        prop_assert_eq!(order.len(), deps.len());

        for config in &order {
            let own = positions[config.namespace_uri()];
            for dependency in config.dependencies() {
                prop_assert!(positions[dependency.namespace_uri()] < own);
            }
        }
    }

    /// A single root only pulls in what it can reach.
    #[test]
    fn order_contains_exactly_reachable(deps in acyclic_graph()) {
        let built = build(&deps);
        let root = built.last().unwrap();
        let order = load_order_all(std::slice::from_ref(root)).unwrap();

        let mut reachable = HashSet::new();
        let mut pending = vec![deps.len() - 1];
        while let Some(i) = pending.pop() {
            if reachable.insert(namespace(i)) {
                pending.extend(deps[i].iter().copied());
            }
        }
        let ordered: HashSet<String> = order.iter().map(|c| c.namespace_uri().to_string()).collect();
        prop_assert_eq!(ordered, reachable);
        prop_assert_eq!(order.last().unwrap().namespace_uri(), root.namespace_uri());
    }

    /// Each configuration resolves its own namespace and nothing else.
    #[test]
    fn resolve_location_only_claims_own_namespace(
        own in "urn:[a-z]{1,8}",
        other in "urn:[a-z]{1,8}",
        hint in ".{0,16}",
    ) {
        let config = Configuration::builder(own.clone(), "own.xsd").build().unwrap();
        prop_assert_eq!(config.resolve_location(&own, &hint), Some("own.xsd".to_string()));
        if other != own {
            prop_assert_eq!(config.resolve_location(&other, &hint), None);
        }
    }

    /// The chain answers with the first configuration claiming a namespace.
    #[test]
    fn chain_matches_first_claim(deps in acyclic_graph(), probe in 0usize..32) {
        let built = build(&deps);
        let chain = ResolverChain::new(built);
        let expected = (probe < deps.len()).then(|| format!("node{}.xsd", probe));
        prop_assert_eq!(chain.resolve(&namespace(probe), "hint.xsd"), expected);
    }
}

#[test]
fn reintroducing_a_namespace_below_itself_is_a_cycle() {
    let built = build(&[vec![], vec![0], vec![1]]);
    let err = Configuration::builder(namespace(0), "again.xsd")
        .depends_on(Arc::clone(&built[2]))
        .build()
        .unwrap_err();
    match err {
        Error::CyclicDependency { chain } => {
            assert_eq!(chain.first(), chain.last());
            assert_eq!(chain.len(), 4);
        }
        other => panic!("unexpected error: {other}"),
    }
}
