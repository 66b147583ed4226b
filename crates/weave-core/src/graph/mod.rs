//! Merge and linearization engine
//!
//! [`aggregate`] unions the fragments registered against one extension point
//! into a single graph; [`linearize`] turns that graph into one deterministic
//! total order or reports a cycle.

pub mod aggregate;
pub mod linearize;

pub use aggregate::{MergedGraph, MergedNode};
pub use linearize::linearize;
