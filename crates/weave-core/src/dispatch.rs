//! Dispatcher
//!
//! A `Nexus` is the immutable result of one assembly: every exported
//! extension point resolved to a `Service` (a fixed list of actions) plus the
//! interrupt handlers bound to those services.
//!
//! ## Hot path
//!
//! `Nexus::service` looks a service up once; the returned handle's
//! `Service::invoke` walks a boxed slice and calls each body. No allocation,
//! no graph work, no error channel.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use weave_core_types::AssemblyId;

use crate::errors::{Result, WeaveError};
use crate::model::{Action, Body, ComponentId};
use crate::policy::{RequiredResources, StatusClearPolicy};

/// A non-fatal finding recorded while building a nexus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable `ERR_*` code of the condition
    pub code: String,
    pub message: String,
}

/// One resolved extension point
#[derive(Debug)]
pub struct Service {
    name: String,
    exporter: ComponentId,
    actions: Box<[Action]>,
    trace_actions: bool,
}

impl Service {
    pub(crate) fn new(
        name: impl Into<String>,
        exporter: ComponentId,
        actions: Vec<Action>,
        trace_actions: bool,
    ) -> Self {
        Self {
            name: name.into(),
            exporter,
            actions: actions.into_boxed_slice(),
            trace_actions,
        }
    }

    /// Run every action's forward body in resolved order
    pub fn invoke(&self) {
        if self.trace_actions {
            for action in self.actions.iter() {
                action.run();
            }
        } else {
            for action in self.actions.iter() {
                action.run_untraced();
            }
        }
    }

    /// Run undo bodies in reverse order; actions without one are skipped
    pub fn unwind(&self) {
        for action in self.actions.iter().rev() {
            action.undo();
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exporter(&self) -> &ComponentId {
        &self.exporter
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// An interrupt bound to its resolved service
#[derive(Clone)]
pub struct InterruptHandler {
    name: String,
    service: Arc<Service>,
    status_clear: StatusClearPolicy,
    resources: RequiredResources,
    clear_status: Option<Body>,
}

impl InterruptHandler {
    pub(crate) fn new(
        name: impl Into<String>,
        service: Arc<Service>,
        status_clear: StatusClearPolicy,
        resources: RequiredResources,
        clear_status: Option<Body>,
    ) -> Self {
        Self {
            name: name.into(),
            service,
            status_clear,
            resources,
            clear_status,
        }
    }

    /// Handle one occurrence of the interrupt
    ///
    /// Runs the service with the status-flag clear placed by the interrupt's
    /// status-clear policy. Without a clear body only the service runs.
    pub fn fire(&self) {
        self.status_clear.run(
            || {
                if let Some(clear) = &self.clear_status {
                    clear();
                }
            },
            || self.service.invoke(),
        );
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    pub fn status_clear(&self) -> StatusClearPolicy {
        self.status_clear
    }

    pub fn resources(&self) -> &RequiredResources {
        &self.resources
    }
}

impl std::fmt::Debug for InterruptHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterruptHandler")
            .field("name", &self.name)
            .field("service", &self.service.name)
            .field("status_clear", &self.status_clear)
            .field("resources", &self.resources)
            .finish()
    }
}

/// Built, immutable dispatcher of one assembly
#[derive(Debug)]
pub struct Nexus {
    assembly_id: AssemblyId,
    services: Vec<Arc<Service>>,
    service_index: HashMap<String, usize>,
    interrupts: Vec<InterruptHandler>,
    interrupt_index: HashMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
    order_digest: String,
}

impl Nexus {
    pub(crate) fn new(
        assembly_id: AssemblyId,
        services: Vec<Arc<Service>>,
        interrupts: Vec<InterruptHandler>,
        diagnostics: Vec<Diagnostic>,
        order_digest: String,
    ) -> Self {
        let service_index = services
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
        let interrupt_index = interrupts
            .iter()
            .enumerate()
            .map(|(i, h)| (h.name.clone(), i))
            .collect();
        Self {
            assembly_id,
            services,
            service_index,
            interrupts,
            interrupt_index,
            diagnostics,
            order_digest,
        }
    }

    /// Run the resolved actions of an extension point
    ///
    /// Every exported point is resolved at build time, so an unknown name
    /// can only be a caller typo; it is logged and ignored.
    ///
    /// Interrupt vectors and main loops should resolve a handle once at setup
    /// with [`Nexus::service`] and call [`Service::invoke`] on it, so a bad
    /// name fails before dispatch starts.
    ///
    /// ```
    /// use weave_core::{action, Assembly, Component};
    ///
    /// let toggle = action("toggle_led", || {});
    /// let nexus = Assembly::new()
    ///     .component(Component::new("interfaces").export("OnTimerInterrupt"))
    ///     .component(Component::new("blink").extend("OnTimerInterrupt", &toggle))
    ///     .build()?;
    ///
    /// let on_timer = nexus.service("OnTimerInterrupt")?;
    /// on_timer.invoke();
    /// assert!(nexus.service("OnTimerInterupt").is_err());
    /// # Ok::<(), weave_core::WeaveError>(())
    /// ```
    pub fn invoke(&self, name: &str) {
        match self.service_index.get(name) {
            Some(&i) => self.services[i].invoke(),
            None => tracing::warn!(
                assembly_id = %self.assembly_id,
                extension_point = name,
                "invoke of unknown extension point ignored"
            ),
        }
    }

    /// Shared handle for repeated invocation
    ///
    /// # Errors
    /// * `ExtensionPointNotFound` - no component exported `name`
    pub fn service(&self, name: &str) -> Result<Arc<Service>> {
        self.service_index
            .get(name)
            .map(|&i| Arc::clone(&self.services[i]))
            .ok_or_else(|| WeaveError::ExtensionPointNotFound {
                extension_point: name.to_string(),
            })
    }

    /// Services in export declaration order
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.iter().map(|s| s.as_ref())
    }

    /// # Errors
    /// * `InterruptNotFound` - no interrupt named `name` was declared
    pub fn interrupt(&self, name: &str) -> Result<&InterruptHandler> {
        self.interrupt_index
            .get(name)
            .map(|&i| &self.interrupts[i])
            .ok_or_else(|| WeaveError::InterruptNotFound {
                interrupt: name.to_string(),
            })
    }

    pub fn interrupts(&self) -> &[InterruptHandler] {
        &self.interrupts
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn assembly_id(&self) -> &AssemblyId {
        &self.assembly_id
    }

    /// Digest of every resolved order (see [`crate::digest`])
    pub fn order_digest(&self) -> &str {
        &self.order_digest
    }

    /// `(extension point, action names)` pairs in service order
    pub fn resolved_order(&self) -> Vec<(String, Vec<String>)> {
        resolved_order(&self.services)
    }
}

pub(crate) fn resolved_order(services: &[Arc<Service>]) -> Vec<(String, Vec<String>)> {
    services
        .iter()
        .map(|s| {
            (
                s.name.clone(),
                s.actions.iter().map(|a| a.name().to_string()).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::action;
    use std::sync::Mutex;

    fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn logging_action(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Action {
        let log = Arc::clone(log);
        action(name, move || log.lock().unwrap().push(name))
    }

    fn service(name: &str, actions: Vec<Action>) -> Arc<Service> {
        Arc::new(Service::new(name, ComponentId::new("owner"), actions, true))
    }

    #[test]
    fn test_service_invokes_in_order() {
        let log = recorder();
        let svc = service(
            "Init",
            vec![logging_action(&log, "a"), logging_action(&log, "b")],
        );

        svc.invoke();
        svc.invoke();

        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "a", "b"]);
        assert_eq!(svc.action_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_unwind_runs_backward_in_reverse() {
        let log = recorder();
        let (l1, l2) = (Arc::clone(&log), Arc::clone(&log));
        let first = Action::reversible("first", || {}, move || l1.lock().unwrap().push("undo first"));
        let plain = action("plain", || {});
        let second =
            Action::reversible("second", || {}, move || l2.lock().unwrap().push("undo second"));

        service("Init", vec![first, plain, second]).unwind();

        assert_eq!(*log.lock().unwrap(), vec!["undo second", "undo first"]);
    }

    #[test]
    fn test_interrupt_handler_applies_policy() {
        let log = recorder();
        let svc = service("OnTimer", vec![logging_action(&log, "tick")]);
        let clear_log = Arc::clone(&log);
        let handler = InterruptHandler::new(
            "TIMER0",
            svc,
            StatusClearPolicy::ClearStatusLast,
            RequiredResources::empty(),
            Some(Arc::new(move || clear_log.lock().unwrap().push("clear"))),
        );

        handler.fire();

        assert_eq!(*log.lock().unwrap(), vec!["tick", "clear"]);
    }

    #[test]
    fn test_nexus_lookup_and_unknown_invoke() {
        let log = recorder();
        let nexus = Nexus::new(
            AssemblyId::new(),
            vec![service("Init", vec![logging_action(&log, "a")])],
            Vec::new(),
            Vec::new(),
            String::new(),
        );

        nexus.invoke("Init");
        nexus.invoke("Missing");

        assert_eq!(*log.lock().unwrap(), vec!["a"]);
        assert!(nexus.service("Init").is_ok());
        assert_eq!(
            nexus.service("Missing").unwrap_err(),
            WeaveError::ExtensionPointNotFound {
                extension_point: "Missing".to_string()
            }
        );
        assert!(matches!(
            nexus.interrupt("TIMER0"),
            Err(WeaveError::InterruptNotFound { .. })
        ));
    }
}
