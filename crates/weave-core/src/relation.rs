//! Relation builder
//!
//! `sequence` and `parallel` combine nodes and fragments into ordering
//! constraints. Both are pure: they only assemble data.
//!
//! ## Composition rules
//!
//! - `sequence(a, b)`: every exit of `a` precedes every entry of `b`. The
//!   result enters where `a` enters and exits where `b` exits.
//! - `parallel(a, b)`: no edge between the operands; each keeps its own
//!   edges. Entries and exits are the unions of both operands'.
//! - An empty fragment is the identity of both operators.
//!
//! Nodes referenced by both operands are unified, so
//! `parallel(sequence(x, y), sequence(y, z))` is the chain `x -> y -> z`.

use crate::model::{Fragment, IntoFragment, Node};

/// Fragment asserting `a` happens before `b`
///
/// # Example
/// ```
/// use weave_core::model::action;
/// use weave_core::relation::sequence;
///
/// let a = action("a", || {});
/// let b = action("b", || {});
/// let c = action("c", || {});
///
/// let chain = sequence(sequence(&a, &b), &c);
/// assert_eq!(chain.named_edges(), vec![("a", "b"), ("b", "c")]);
/// ```
pub fn sequence<N: Node>(a: impl IntoFragment<N>, b: impl IntoFragment<N>) -> Fragment<N> {
    let a = a.into_fragment();
    let b = b.into_fragment();

    if a.is_empty() {
        return b;
    }
    if b.is_empty() {
        return a;
    }

    let mut out = a;
    let exits: Vec<usize> = out.exits().to_vec();
    let mapping = out.absorb(&b);

    for &from in &exits {
        for &to in b.entries() {
            out.push_edge(from, mapping[to]);
        }
    }

    out.set_exits(b.exits().iter().map(|&i| mapping[i]));
    out
}

/// Fragment whose operands are unordered relative to each other
///
/// # Example
/// ```
/// use weave_core::model::action;
/// use weave_core::relation::parallel;
///
/// let a = action("a", || {});
/// let b = action("b", || {});
///
/// let both = parallel(&a, &b);
/// assert!(both.edges().is_empty());
/// assert_eq!(both.entries().len(), 2);
/// ```
pub fn parallel<N: Node>(a: impl IntoFragment<N>, b: impl IntoFragment<N>) -> Fragment<N> {
    let a = a.into_fragment();
    let b = b.into_fragment();

    if a.is_empty() {
        return b;
    }
    if b.is_empty() {
        return a;
    }

    let mut out = a;
    let entries: Vec<usize> = out.entries().to_vec();
    let exits: Vec<usize> = out.exits().to_vec();
    let mapping = out.absorb(&b);

    out.set_entries(
        entries
            .into_iter()
            .chain(b.entries().iter().map(|&i| mapping[i])),
    );
    out.set_exits(exits.into_iter().chain(b.exits().iter().map(|&i| mapping[i])));
    out
}

/// Fold `sequence` over the items: `a -> b -> c -> ...`
pub fn sequence_all<N, I, T>(items: I) -> Fragment<N>
where
    N: Node,
    I: IntoIterator<Item = T>,
    T: IntoFragment<N>,
{
    items
        .into_iter()
        .fold(Fragment::empty(), |acc, item| sequence(acc, item))
}

/// Fold `parallel` over the items
pub fn parallel_all<N, I, T>(items: I) -> Fragment<N>
where
    N: Node,
    I: IntoIterator<Item = T>,
    T: IntoFragment<N>,
{
    items
        .into_iter()
        .fold(Fragment::empty(), |acc, item| parallel(acc, item))
}
