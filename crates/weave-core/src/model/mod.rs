pub mod action;
pub mod component;
pub mod fragment;
pub mod node;

pub use action::{action, Action, Body};
pub use component::{Component, ComponentId, Extension};
pub use fragment::{Fragment, IntoFragment};
pub use node::{Node, NodeId};
