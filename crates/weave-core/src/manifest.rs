//! Declarative assembly manifests
//!
//! A manifest describes components, their exports and extensions, and
//! interrupts in TOML. Action bodies cannot live in a text file, so they are
//! bound by name from a `BodyTable` when the manifest is turned into an
//! `Assembly`.
//!
//! ## Format
//!
//! ```toml
//! [options]
//! contention = "deny"
//!
//! [[component]]
//! id = "interfaces"
//! exports = ["RuntimeInit", "OnTimerInterrupt"]
//!
//! [[component]]
//! id = "core_init"
//!
//! [[component.extend]]
//! point = "RuntimeInit"
//! sequence = ["clk_init", "timer_init"]
//!
//! [[interrupt]]
//! name = "TIMER0"
//! service = "OnTimerInterrupt"
//! status_clear = "clear_status_last"
//! resources = ["timer0"]
//! ```
//!
//! ## Naming
//!
//! Within one manifest, equal action names denote the same action, so a name
//! mentioned by two components is a join point. Names with no bound body get
//! a body that does nothing (the per-action trace event still fires).

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assembly::Assembly;
use crate::config::AssemblyOptions;
use crate::errors::{Result, WeaveError};
use crate::interrupt::Interrupt;
use crate::model::{Action, Body, Component, Fragment};
use crate::policy::{Policy, RequiredResources, StatusClearPolicy};
use crate::relation::{parallel_all, sequence_all};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub options: AssemblyOptions,
    #[serde(default, rename = "component")]
    pub components: Vec<ManifestComponent>,
    #[serde(default, rename = "interrupt")]
    pub interrupts: Vec<ManifestInterrupt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestComponent {
    pub id: String,
    #[serde(default)]
    pub exports: Vec<String>,
    #[serde(default, rename = "extend")]
    pub extends: Vec<ManifestExtend>,
}

/// One contribution: exactly one of `sequence` or `parallel`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestExtend {
    pub point: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestInterrupt {
    pub name: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_clear: Option<StatusClearPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

impl Manifest {
    /// Parse and validate manifest text
    ///
    /// # Errors
    /// * `InvalidManifest` - malformed TOML or a structural problem (see
    ///   [`Manifest::validate`])
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(text).map_err(|e| WeaveError::InvalidManifest {
            reason: e.to_string(),
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// # Errors
    /// * `Io` - the file cannot be read
    /// * `InvalidManifest` - the content is not a valid manifest
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| WeaveError::Io {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&text)
    }

    /// Structural checks that TOML typing cannot express
    ///
    /// Export/extend consistency is left to the interface registry so that
    /// manifests and code-built assemblies report it identically.
    ///
    /// # Errors
    /// * `InvalidManifest` - empty or repeated component id, an extend entry
    ///   with neither or both of `sequence`/`parallel`, or an empty name list
    pub fn validate(&self) -> Result<()> {
        let mut ids: HashSet<&str> = HashSet::new();
        for component in &self.components {
            if component.id.trim().is_empty() {
                return Err(invalid("component id must not be empty"));
            }
            if !ids.insert(component.id.as_str()) {
                return Err(invalid(format!(
                    "component {} declared more than once",
                    component.id
                )));
            }
            for extend in &component.extends {
                let names = match (&extend.sequence, &extend.parallel) {
                    (Some(names), None) | (None, Some(names)) => names,
                    (None, None) => {
                        return Err(invalid(format!(
                            "component {} extends {} without sequence or parallel",
                            component.id, extend.point
                        )))
                    }
                    (Some(_), Some(_)) => {
                        return Err(invalid(format!(
                            "component {} extends {} with both sequence and parallel",
                            component.id, extend.point
                        )))
                    }
                };
                if names.is_empty() {
                    return Err(invalid(format!(
                        "component {} extends {} with no actions",
                        component.id, extend.point
                    )));
                }
            }
        }

        for interrupt in &self.interrupts {
            if interrupt.name.trim().is_empty() {
                return Err(invalid("interrupt name must not be empty"));
            }
        }

        Ok(())
    }

    /// Build an assembly, binding action names to bodies
    ///
    /// Nothing is resolved here; registry and ordering errors surface from
    /// `Assembly::build`. Bindings the manifest never mentions are logged as
    /// warnings and otherwise ignored.
    ///
    /// # Errors
    /// * `DuplicatePolicy` - from `Interrupt::with_policies`
    pub fn into_assembly(&self, bodies: &BodyTable) -> Result<Assembly> {
        let mut actions: HashMap<&str, Action> = HashMap::new();
        let mut assembly = Assembly::with_options(self.options.clone());

        for declared in &self.components {
            let mut component = Component::new(declared.id.clone());
            for name in &declared.exports {
                component = component.export(name.clone());
            }
            for extend in &declared.extends {
                let fragment = extend_fragment(extend, bodies, &mut actions);
                component = component.extend(extend.point.clone(), fragment);
            }
            assembly.add_component(component);
        }

        for declared in &self.interrupts {
            let mut policies: Vec<Policy> = Vec::new();
            if let Some(status_clear) = declared.status_clear {
                policies.push(status_clear.into());
            }
            if let Some(resources) = &declared.resources {
                policies.push(RequiredResources::new(resources.iter().cloned()).into());
            }
            let mut interrupt =
                Interrupt::new(declared.name.clone(), declared.service.clone()).with_policies(policies)?;
            if let Some(clear) = bodies.clear_status(&declared.name) {
                let clear = Arc::clone(clear);
                interrupt = interrupt.with_clear_status(move || clear());
            }
            assembly.add_interrupt(interrupt);
        }

        for name in bodies.unmatched_actions(|name| actions.contains_key(name)) {
            tracing::warn!(action = name, "bound action body matches no manifest action");
        }
        for name in bodies.unmatched_clear_status(|name| {
            self.interrupts.iter().any(|i| i.name == name)
        }) {
            tracing::warn!(
                interrupt = name,
                "bound status-clear body matches no manifest interrupt"
            );
        }

        Ok(assembly)
    }

    /// Every distinct action name, in first-mention order
    pub fn action_names(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.components
            .iter()
            .flat_map(|c| c.extends.iter())
            .flat_map(|e| e.names().iter())
            .map(|n| n.as_str())
            .filter(|n| seen.insert(*n))
            .collect()
    }
}

impl ManifestExtend {
    fn names(&self) -> &[String] {
        self.sequence
            .as_deref()
            .or(self.parallel.as_deref())
            .unwrap_or(&[])
    }
}

fn extend_fragment<'m>(
    extend: &'m ManifestExtend,
    bodies: &BodyTable,
    actions: &mut HashMap<&'m str, Action>,
) -> Fragment<Action> {
    let nodes: Vec<Action> = extend
        .names()
        .iter()
        .map(|name| {
            actions
                .entry(name.as_str())
                .or_insert_with(|| match bodies.get(name) {
                    Some(body) => Action::from_body(name.clone(), Arc::clone(body)),
                    None => Action::new(name.clone(), || {}),
                })
                .clone()
        })
        .collect();

    if extend.parallel.is_some() {
        parallel_all(nodes)
    } else {
        sequence_all(nodes)
    }
}

fn invalid(reason: impl Into<String>) -> WeaveError {
    WeaveError::InvalidManifest {
        reason: reason.into(),
    }
}

/// Action and status-clear bodies, bound by name
#[derive(Clone, Default)]
pub struct BodyTable {
    actions: HashMap<String, Body>,
    clear_status: HashMap<String, Body>,
}

impl BodyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the body of every action named `name`
    pub fn bind<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(body));
        self
    }

    /// Bind the status-clear body of interrupt `interrupt`
    pub fn bind_clear_status<F>(mut self, interrupt: impl Into<String>, body: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.clear_status.insert(interrupt.into(), Arc::new(body));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Body> {
        self.actions.get(name)
    }

    pub fn clear_status(&self, interrupt: &str) -> Option<&Body> {
        self.clear_status.get(interrupt)
    }

    /// Bound action names rejected by `used`, sorted
    fn unmatched_actions(&self, used: impl Fn(&str) -> bool) -> Vec<&str> {
        unmatched(&self.actions, used)
    }

    /// Bound interrupt names rejected by `used`, sorted
    fn unmatched_clear_status(&self, used: impl Fn(&str) -> bool) -> Vec<&str> {
        unmatched(&self.clear_status, used)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

fn unmatched(bound: &HashMap<String, Body>, used: impl Fn(&str) -> bool) -> Vec<&str> {
    let mut names: Vec<&str> = bound
        .keys()
        .map(String::as_str)
        .filter(|name| !used(*name))
        .collect();
    names.sort_unstable();
    names
}

impl std::fmt::Debug for BodyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut actions: Vec<&String> = self.actions.keys().collect();
        actions.sort();
        let mut clear_status: Vec<&String> = self.clear_status.keys().collect();
        clear_status.sort();
        f.debug_struct("BodyTable")
            .field("actions", &actions)
            .field("clear_status", &clear_status)
            .finish()
    }
}
