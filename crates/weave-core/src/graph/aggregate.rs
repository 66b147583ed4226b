use std::collections::{HashMap, HashSet};

use crate::model::{Fragment, Node, NodeId};

/// A node of the merged graph with the bookkeeping the linearizer sorts by
#[derive(Debug, Clone)]
pub struct MergedNode<N> {
    pub node: N,
    /// Index of the first contribution that referenced this node
    pub contribution: usize,
    /// Position in which the node was first encountered overall
    pub discovery: usize,
}

/// Union of every fragment contributed to one extension point
///
/// Nodes are addressed by their discovery index. Nodes sharing a `NodeId`
/// across contributions are merged into one, which is how components attach
/// constraints to an action another component declared.
#[derive(Debug, Clone)]
pub struct MergedGraph<N> {
    nodes: Vec<MergedNode<N>>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    edge_count: usize,
}

impl<N: Node> MergedGraph<N> {
    /// Merge fragments in contribution order
    ///
    /// Never fails: contradictions only show up when linearizing.
    pub fn from_fragments<'a, I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = &'a Fragment<N>>,
        N: 'a,
    {
        let mut graph = Self {
            nodes: Vec::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
            edge_count: 0,
        };
        let mut index: HashMap<NodeId, usize> = HashMap::new();
        let mut seen_edges: HashSet<(usize, usize)> = HashSet::new();

        for (contribution, fragment) in fragments.into_iter().enumerate() {
            let mapping: Vec<usize> = fragment
                .nodes()
                .iter()
                .map(|node| {
                    *index.entry(node.node_id()).or_insert_with(|| {
                        let discovery = graph.nodes.len();
                        graph.nodes.push(MergedNode {
                            node: node.clone(),
                            contribution,
                            discovery,
                        });
                        graph.successors.push(Vec::new());
                        graph.predecessors.push(Vec::new());
                        discovery
                    })
                })
                .collect();

            for &(from, to) in fragment.edges() {
                let edge = (mapping[from], mapping[to]);
                if seen_edges.insert(edge) {
                    graph.successors[edge.0].push(edge.1);
                    graph.predecessors[edge.1].push(edge.0);
                    graph.edge_count += 1;
                }
            }
        }

        graph
    }

    pub fn nodes(&self) -> &[MergedNode<N>] {
        &self.nodes
    }

    pub fn successors(&self, index: usize) -> &[usize] {
        &self.successors[index]
    }

    pub fn predecessors(&self, index: usize) -> &[usize] {
        &self.predecessors[index]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::action;
    use crate::relation::sequence;

    #[test]
    fn test_shared_action_becomes_join_point() {
        let x = action("x", || {});
        let y = action("y", || {});
        let z = action("z", || {});
        let first = sequence(&x, &y);
        let second = sequence(&y, &z);

        let graph = MergedGraph::from_fragments([&first, &second]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.successors(1), &[2]);
        assert_eq!(graph.predecessors(1), &[0]);
        assert_eq!(graph.nodes()[2].contribution, 1);
        assert_eq!(graph.nodes()[1].contribution, 0);
    }

    #[test]
    fn test_duplicate_edges_are_merged() {
        let a = action("a", || {});
        let b = action("b", || {});
        let one = sequence(&a, &b);
        let two = sequence(&a, &b);

        let graph = MergedGraph::from_fragments([&one, &two]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_same_name_different_actions_stay_apart() {
        let left = action("set_pin", || {});
        let right = action("set_pin", || {});
        let one = sequence(&left, &right);

        let graph = MergedGraph::from_fragments([&one]);

        assert_eq!(graph.node_count(), 2);
    }
}
