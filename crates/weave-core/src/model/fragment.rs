//! Fragment: a small ordering graph contributed by one component.
//!
//! Nodes live in an arena addressed by index; edges are index pairs. Entry
//! nodes are the ones a following `sequence` operand attaches to as
//! predecessors, exit nodes are the ones that precede the next operand.

use std::collections::HashMap;

use super::action::Action;
use super::node::{Node, NodeId};

/// Directed graph of nodes and precedence edges
#[derive(Clone, Debug)]
pub struct Fragment<N> {
    nodes: Vec<N>,
    edges: Vec<(usize, usize)>,
    entries: Vec<usize>,
    exits: Vec<usize>,
}

impl<N: Node> Fragment<N> {
    /// Fragment with no nodes; the identity of both relation operators
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            entries: Vec::new(),
            exits: Vec::new(),
        }
    }

    /// Fragment holding one node, which is both entry and exit
    pub fn single(node: N) -> Self {
        Self {
            nodes: vec![node],
            edges: Vec::new(),
            entries: vec![0],
            exits: vec![0],
        }
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    pub fn exits(&self) -> &[usize] {
        &self.exits
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the fragment references the given node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.node_id() == id)
    }

    /// Edges rendered as `(predecessor name, successor name)`
    pub fn named_edges(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .map(|&(from, to)| (self.nodes[from].name(), self.nodes[to].name()))
            .collect()
    }

    /// Append `next` after this fragment
    pub fn then(self, next: impl IntoFragment<N>) -> Self {
        crate::relation::sequence(self, next)
    }

    /// Combine with `other` without ordering the two against each other
    pub fn alongside(self, other: impl IntoFragment<N>) -> Self {
        crate::relation::parallel(self, other)
    }

    /// Copy every node of `other` into this arena, unifying by identity.
    ///
    /// Returns the index in `self` of each node of `other`, plus `other`'s
    /// edges already remapped into `self`.
    pub(crate) fn absorb(&mut self, other: &Fragment<N>) -> Vec<usize> {
        let mut existing: HashMap<NodeId, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.node_id(), i))
            .collect();

        let mapping: Vec<usize> = other
            .nodes
            .iter()
            .map(|node| {
                *existing.entry(node.node_id()).or_insert_with(|| {
                    self.nodes.push(node.clone());
                    self.nodes.len() - 1
                })
            })
            .collect();

        for &(from, to) in &other.edges {
            self.push_edge(mapping[from], mapping[to]);
        }

        mapping
    }

    pub(crate) fn push_edge(&mut self, from: usize, to: usize) {
        if !self.edges.contains(&(from, to)) {
            self.edges.push((from, to));
        }
    }

    pub(crate) fn set_entries(&mut self, entries: impl IntoIterator<Item = usize>) {
        self.entries = dedup(entries);
    }

    pub(crate) fn set_exits(&mut self, exits: impl IntoIterator<Item = usize>) {
        self.exits = dedup(exits);
    }

    fn normalized(&self) -> (Vec<NodeId>, Vec<(NodeId, NodeId)>, Vec<NodeId>, Vec<NodeId>) {
        let id = |i: usize| self.nodes[i].node_id();
        let mut edges: Vec<(NodeId, NodeId)> =
            self.edges.iter().map(|&(a, b)| (id(a), id(b))).collect();
        edges.sort();
        let mut entries: Vec<NodeId> = self.entries.iter().map(|&i| id(i)).collect();
        entries.sort();
        let mut exits: Vec<NodeId> = self.exits.iter().map(|&i| id(i)).collect();
        exits.sort();
        (
            self.nodes.iter().map(|n| n.node_id()).collect(),
            edges,
            entries,
            exits,
        )
    }
}

impl<N: Node> Default for Fragment<N> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Structural equality: same nodes in the same arena order, same edge set,
/// same entry and exit sets.
impl<N: Node> PartialEq for Fragment<N> {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

fn dedup(items: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut out: Vec<usize> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Conversion accepted by the relation operators
pub trait IntoFragment<N> {
    fn into_fragment(self) -> Fragment<N>;
}

impl<N: Node> IntoFragment<N> for Fragment<N> {
    fn into_fragment(self) -> Fragment<N> {
        self
    }
}

impl<N: Node> IntoFragment<N> for &Fragment<N> {
    fn into_fragment(self) -> Fragment<N> {
        self.clone()
    }
}

impl IntoFragment<Action> for Action {
    fn into_fragment(self) -> Fragment<Action> {
        Fragment::single(self)
    }
}

impl IntoFragment<Action> for &Action {
    fn into_fragment(self) -> Fragment<Action> {
        Fragment::single(self.clone())
    }
}
