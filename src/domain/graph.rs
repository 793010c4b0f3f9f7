//! Graph view over a dataset
//!
//! Builds a petgraph digraph from the option edges of question nodes. Edges
//! carry the option's position so successors can be read back in declaration
//! order (petgraph itself yields neighbours newest-first).

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use super::dataset::Dataset;
use super::id::NodeId;

/// Directed graph of node ids, one edge per resolvable option
#[derive(Debug, Default)]
pub struct DecisionGraph {
    /// The underlying directed graph, edge weight = option position
    graph: DiGraph<NodeId, usize>,

    /// Map from NodeId to node index
    node_map: HashMap<NodeId, NodeIndex>,
}

impl DecisionGraph {
    /// Builds the graph for a dataset.
    ///
    /// Options pointing at unknown nodes are left out; the structural check
    /// reports those.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        // First pass: add all nodes
        for id in dataset.node_ids() {
            let idx = graph.add_node(id.clone());
            node_map.insert(id.clone(), idx);
        }

        // Second pass: add option edges
        for (key, node) in &dataset.nodes {
            let Some(&from) = node_map.get(key) else {
                continue;
            };
            for (position, option) in node.answer_options().iter().enumerate() {
                if let Some(&to) = node_map.get(&option.next) {
                    graph.add_edge(from, to, position);
                }
            }
        }

        Self { graph, node_map }
    }

    /// Targets of a node's options in declaration order
    pub fn successors(&self, id: &str) -> Vec<NodeId> {
        let Some(&idx) = self.node_map.get(id) else {
            return vec![];
        };

        let mut edges: Vec<_> = self
            .graph
            .edges(idx)
            .map(|edge| (*edge.weight(), edge.target()))
            .collect();
        edges.sort_by_key(|(position, _)| *position);

        edges
            .into_iter()
            .filter_map(|(_, target)| self.graph.node_weight(target).cloned())
            .collect()
    }

    /// Returns true if any option chain leads back to a node already on it
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.node_map.len()
    }

    /// Number of resolvable option edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
