use std::collections::BTreeSet;

use super::aggregate::{MergedGraph, MergedNode};
use crate::errors::{Result, WeaveError};
use crate::model::Node;

/// Compute the total order of a merged graph
///
/// Stable topological sort (Kahn). Among nodes whose predecessors have all
/// been emitted, the next one is chosen by:
/// 1. contribution index of the fragment that first referenced it
/// 2. declared name (lexical)
/// 3. discovery index
///
/// so the result depends only on the input, never on hashing or ids.
///
/// # Arguments
/// * `graph` - merged graph for one extension point
/// * `extension_point` - name used in diagnostics
///
/// # Returns
/// Nodes in execution order
///
/// # Errors
/// * `CycleDetected` - if the graph is not acyclic; carries the names along
///   one cycle, first name repeated at the end
pub fn linearize<N: Node>(graph: &MergedGraph<N>, extension_point: &str) -> Result<Vec<N>> {
    let nodes = graph.nodes();
    let mut in_degree: Vec<usize> = (0..nodes.len())
        .map(|i| graph.predecessors(i).len())
        .collect();

    let mut ready: BTreeSet<(usize, &str, usize)> = (0..nodes.len())
        .filter(|&i| in_degree[i] == 0)
        .map(|i| ready_key(nodes, i))
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some((_, _, current)) = ready.pop_first() {
        order.push(nodes[current].node.clone());
        for &next in graph.successors(current) {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.insert(ready_key(nodes, next));
            }
        }
    }

    if order.len() < nodes.len() {
        let cycle = find_cycle(graph, &in_degree);
        tracing::debug!(
            extension_point = extension_point,
            cycle = ?cycle,
            "linearization failed"
        );
        return Err(WeaveError::CycleDetected {
            extension_point: extension_point.to_string(),
            cycle,
        });
    }

    Ok(order)
}

fn ready_key<N: Node>(nodes: &[MergedNode<N>], index: usize) -> (usize, &str, usize) {
    let merged = &nodes[index];
    (merged.contribution, merged.node.name(), merged.discovery)
}

/// Walk predecessor links among the nodes left with nonzero in-degree.
///
/// Every such node has at least one predecessor that was never emitted, so
/// the walk can only end by revisiting a node.
fn find_cycle<N: Node>(graph: &MergedGraph<N>, in_degree: &[usize]) -> Vec<String> {
    let nodes = graph.nodes();
    let Some(start) = (0..nodes.len()).find(|&i| in_degree[i] > 0) else {
        return Vec::new();
    };

    let mut position: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut path: Vec<usize> = Vec::new();
    let mut current = start;

    loop {
        if let Some(pos) = position[current] {
            let mut cycle: Vec<String> = path[pos..]
                .iter()
                .rev()
                .map(|&i| nodes[i].node.name().to_string())
                .collect();
            if let Some(first) = cycle.first().cloned() {
                cycle.push(first);
            }
            return cycle;
        }
        position[current] = Some(path.len());
        path.push(current);

        match graph
            .predecessors(current)
            .iter()
            .copied()
            .find(|&p| in_degree[p] > 0)
        {
            Some(previous) => current = previous,
            None => return vec![nodes[current].node.name().to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{action, Action, Fragment};
    use crate::relation::{parallel, sequence};

    fn names(order: &[Action]) -> Vec<&str> {
        order.iter().map(|a| a.name()).collect()
    }

    fn resolve(fragments: &[Fragment<Action>]) -> Result<Vec<Action>> {
        linearize(&MergedGraph::from_fragments(fragments), "Test")
    }

    #[test]
    fn test_join_point_merge() {
        let x = action("x", || {});
        let y = action("y", || {});
        let z = action("z", || {});

        let order = resolve(&[sequence(&x, &y), sequence(&y, &z)]).unwrap();

        assert_eq!(names(&order), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_ties_break_by_contribution_then_name() {
        let b = action("b", || {});
        let a = action("a", || {});
        let c = action("c", || {});

        // "c" comes from the first contribution, so it wins over "a"
        let order = resolve(&[Fragment::single(c.clone()), parallel(&b, &a)]).unwrap();

        assert_eq!(names(&order), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_equal_names_break_by_discovery() {
        let first = action("set_pin", || {});
        let second = action("set_pin", || {});

        let order = resolve(&[parallel(&first, &second)]).unwrap();

        assert_eq!(order[0], first);
        assert_eq!(order[1], second);
    }

    #[test]
    fn test_cycle_reports_members() {
        let p = action("p", || {});
        let q = action("q", || {});

        let err = resolve(&[sequence(&p, &q), sequence(&q, &p)]).unwrap_err();

        match err {
            WeaveError::CycleDetected {
                extension_point,
                cycle,
            } => {
                assert_eq!(extension_point, "Test");
                assert_eq!(cycle.first(), cycle.last());
                assert!(cycle.contains(&"p".to_string()));
                assert!(cycle.contains(&"q".to_string()));
            }
            other => panic!("expected CycleDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_excludes_nodes_only_downstream() {
        let a = action("a", || {});
        let b = action("b", || {});
        let tail = action("tail", || {});

        let err = resolve(&[sequence(&a, &b), sequence(&b, &a), sequence(&b, &tail)])
            .unwrap_err();

        let WeaveError::CycleDetected { cycle, .. } = err else {
            panic!("expected CycleDetected");
        };
        assert!(!cycle.contains(&"tail".to_string()));
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let a = action("a", || {});
        let err = resolve(&[sequence(&a, &a)]).unwrap_err();
        assert!(matches!(err, WeaveError::CycleDetected { .. }));
    }

    #[test]
    fn test_empty_graph() {
        let order = resolve(&[]).unwrap();
        assert!(order.is_empty());
    }
}
