//! Core types shared across Weave crates
//!
//! This crate provides foundational types used by the assembly engine,
//! its logging facility and the CLI:
//!
//! - **Correlation types**: AssemblyId for tagging one assembly pass
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::AssemblyId;
