//! Per-pass identity maps that guarantee one [`GraphNode`] per node key and
//! one [`GraphEdge`] per unordered pair of endpoints.
use std::collections::HashMap;

use indexmap::map::Entry;
use indexmap::IndexMap;
use log::trace;

use super::{Graph, GraphEdge, GraphNode};

/// Labels longer than this are replaced by a short `Prot_<n>` alias
pub const MAX_LABEL_LENGTH: usize = 100;

/// Deduplication maps for one export pass.
///
/// Nodes and edges are kept in order of first encounter so the serialized
/// graph is stable for a given traversal.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    nodes: IndexMap<String, GraphNode>,
    edges: IndexMap<(String, String), GraphEdge>,
    edge_counter: u64,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all state. Must be called before each export pass.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.edge_counter = 0;
    }

    /// Look up the node for `key`, creating an empty one if it is the first
    /// time `key` is seen. The flag tells whether the node was just created.
    pub fn get_or_create_node(&mut self, key: &str) -> (&mut GraphNode, bool) {
        match self.nodes.entry(key.to_string()) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(GraphNode::new(key)), true),
        }
    }

    pub fn contains_node(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    fn find_edge(&self, a: &str, b: &str) -> Option<usize> {
        self.edges
            .get_index_of(&(a.to_string(), b.to_string()))
            .or_else(|| self.edges.get_index_of(&(b.to_string(), a.to_string())))
    }

    /// Look up the edge between `a` and `b` in either direction, creating one
    /// from `a` to `b` if there is none yet. The flag tells whether the edge
    /// was just created.
    pub fn get_or_create_edge(&mut self, a: &str, b: &str) -> (&mut GraphEdge, bool) {
        let (index, created) = match self.find_edge(a, b) {
            Some(index) => (index, false),
            None => {
                self.edge_counter += 1;
                let edge = GraphEdge::new(self.edge_counter, a, b);
                trace!("Creating edge {} between {a} and {b}", edge.id);
                let (index, _) = self.edges.insert_full((a.to_string(), b.to_string()), edge);
                (index, true)
            }
        };
        (&mut self.edges[index], created)
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut GraphNode> {
        self.nodes.values_mut()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Move the registered nodes and edges into `graph`, leaving the registry empty
    pub fn drain_into(&mut self, graph: &mut Graph) {
        graph.nodes.extend(self.nodes.drain(..).map(|(_, node)| node));
        graph.edges.extend(self.edges.drain(..).map(|(_, edge)| edge));
        self.reset();
    }
}

/// Replaces overly long labels with a numbered alias, consistently within one
/// export pass.
#[derive(Debug, Clone)]
pub struct LabelShortener {
    limit: usize,
    counter: usize,
    aliases: HashMap<String, String>,
}

impl Default for LabelShortener {
    fn default() -> Self {
        Self::new(MAX_LABEL_LENGTH)
    }
}

impl LabelShortener {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            counter: 1,
            aliases: HashMap::new(),
        }
    }

    pub fn reset(&mut self) {
        self.counter = 1;
        self.aliases.clear();
    }

    /// The label to display for `label`. The same input always yields the
    /// same output until the next reset.
    pub fn shorten(&mut self, label: &str) -> String {
        if let Some(alias) = self.aliases.get(label) {
            return alias.clone();
        }
        let alias = if label.chars().count() > self.limit {
            format!("Prot_{}", self.counter)
        } else {
            label.to_string()
        };
        self.counter += 1;
        self.aliases.insert(label.to_string(), alias.clone());
        alias
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_node_identity() {
        let mut registry = IdentityRegistry::new();
        let (node, created) = registry.get_or_create_node("PEPTIDE");
        assert!(created);
        node.label = "1.0".into();
        let (node, created) = registry.get_or_create_node("PEPTIDE");
        assert!(!created);
        assert_eq!(node.label, "1.0");
        assert_eq!(registry.num_nodes(), 1);
    }

    #[test]
    fn test_edge_is_undirected() {
        let mut registry = IdentityRegistry::new();
        let (edge, created) = registry.get_or_create_edge("P1", "AAA");
        assert!(created);
        let id = edge.id;
        let (edge, created) = registry.get_or_create_edge("AAA", "P1");
        assert!(!created);
        assert_eq!(edge.id, id);
        assert_eq!(edge.source, "P1");
        assert_eq!(registry.num_edges(), 1);
    }

    #[test]
    fn test_edge_keys_do_not_collide_on_concatenation() {
        let mut registry = IdentityRegistry::new();
        registry.get_or_create_edge("AB", "C");
        let (_, created) = registry.get_or_create_edge("A", "BC");
        assert!(created);
        assert_eq!(registry.num_edges(), 2);
    }

    #[test]
    fn test_reset() {
        let mut registry = IdentityRegistry::new();
        registry.get_or_create_node("A");
        registry.get_or_create_edge("A", "B");
        registry.reset();
        assert_eq!(registry.num_nodes(), 0);
        let (edge, created) = registry.get_or_create_edge("A", "B");
        assert!(created);
        assert_eq!(edge.id, 1);
    }

    #[test]
    fn test_label_shortener() {
        let mut labels = LabelShortener::new(5);
        assert_eq!(labels.shorten("P1"), "P1");
        assert_eq!(labels.shorten("P1 P2 P3"), "Prot_2");
        assert_eq!(labels.shorten("P1 P2 P3"), "Prot_2");
        assert_eq!(labels.shorten("Q1 Q2 Q3"), "Prot_3");
        labels.reset();
        assert_eq!(labels.shorten("Q1 Q2 Q3"), "Prot_1");
    }
}
