//! Weave Core - component composition and deterministic dispatch
//!
//! Components contribute named actions to shared extension points, with
//! ordering constraints between them. A one-time assembly merges every
//! contribution per extension point and linearizes it into one fixed,
//! reproducible call list. This crate provides:
//! - The composition model (actions, fragments, components)
//! - `sequence` / `parallel` relation operators
//! - Graph merge and deterministic linearization with cycle detection
//! - Export/extend validation across components
//! - Policy resolution for interrupt dispatch (status clear, resources)
//! - The immutable `Nexus` dispatcher, reversible step sequences, TOML
//!   manifests and build plans
//!
//! # Example
//!
//! ```
//! use weave_core::{action, sequence, Assembly, Component};
//!
//! let clk_init = action("clk_init", || {});
//! let timer_init = action("timer_init", || {});
//!
//! let nexus = Assembly::new()
//!     .component(Component::new("interfaces").export("RuntimeInit"))
//!     .component(Component::new("core").extend("RuntimeInit", sequence(&clk_init, &timer_init)))
//!     .build()
//!     .unwrap();
//!
//! let init = nexus.service("RuntimeInit").unwrap();
//! assert_eq!(init.action_names(), vec!["clk_init", "timer_init"]);
//! init.invoke();
//! ```

pub mod assembly;
pub mod config;
pub mod digest;
pub mod dispatch;
pub mod errors;
pub mod graph;
pub mod interrupt;
pub mod logging_facility;
pub mod manifest;
pub mod model;
pub mod plan;
pub mod policy;
pub mod registry;
pub mod relation;
pub mod render;
pub mod seq;

#[doc(hidden)]
pub use weave_core_types as core_types;

// Re-export commonly used types
pub use assembly::Assembly;
pub use config::{AssemblyOptions, ContentionSeverity};
pub use dispatch::{Diagnostic, InterruptHandler, Nexus, Service};
pub use errors::{ExError, ExErrorKind, Result, WeaveError};
pub use interrupt::Interrupt;
pub use manifest::{BodyTable, Manifest};
pub use model::{action, Action, Component, Fragment};
pub use plan::Plan;
pub use policy::{PolicySet, RequiredResources, StatusClearPolicy};
pub use relation::{parallel, sequence};
pub use seq::{step, Sequence, Step, StepStatus};
