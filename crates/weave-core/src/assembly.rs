//! Assembly
//!
//! An `Assembly` collects components and interrupts and resolves them once
//! into a `Nexus`. Each assembly is independent: several may be built in one
//! process, and each carries its own `AssemblyId` through the tracing span of
//! its build.
//!
//! ## Build phases
//!
//! 1. Interface registry: every export, then every extend
//! 2. Per extension point, in export order: merge contributions, linearize
//! 3. Interrupts: names unique, service exported
//! 4. Resource contention, per `AssemblyOptions::contention`
//! 5. Order digest over every resolved service
//!
//! The first failing phase aborts the build; no partial nexus is returned.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use weave_core_types::AssemblyId;

use crate::config::{AssemblyOptions, ContentionSeverity};
use crate::digest::compute_order_digest;
use crate::dispatch::{resolved_order, Diagnostic, InterruptHandler, Nexus, Service};
use crate::errors::{ExError, ExErrorKind, Result, WeaveError};
use crate::graph::{linearize, MergedGraph};
use crate::interrupt::{find_contention, Interrupt};
use crate::model::Component;
use crate::registry::InterfaceRegistry;
use crate::{log_op_end, log_op_error, log_op_start};

/// Explicit assembly context
///
/// # Example
/// ```
/// use std::sync::{Arc, Mutex};
/// use weave_core::assembly::Assembly;
/// use weave_core::model::{action, Component};
/// use weave_core::relation::sequence;
///
/// let log = Arc::new(Mutex::new(Vec::new()));
/// let (l1, l2) = (log.clone(), log.clone());
/// let clk = action("clk_init", move || l1.lock().unwrap().push("clk"));
/// let timer = action("timer_init", move || l2.lock().unwrap().push("timer"));
///
/// let nexus = Assembly::new()
///     .component(Component::new("interfaces").export("RuntimeInit"))
///     .component(Component::new("core").extend("RuntimeInit", sequence(&clk, &timer)))
///     .build()
///     .unwrap();
///
/// nexus.invoke("RuntimeInit");
/// assert_eq!(*log.lock().unwrap(), vec!["clk", "timer"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    id: AssemblyId,
    options: AssemblyOptions,
    components: Vec<Component>,
    interrupts: Vec<Interrupt>,
}

impl Assembly {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AssemblyOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Add a component; composition order is the order of these calls
    pub fn component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupts.push(interrupt);
        self
    }

    pub fn add_interrupt(&mut self, interrupt: Interrupt) {
        self.interrupts.push(interrupt);
    }

    pub fn id(&self) -> &AssemblyId {
        &self.id
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn interrupts(&self) -> &[Interrupt] {
        &self.interrupts
    }

    /// Resolve every extension point and bind interrupts
    ///
    /// # Errors
    /// * `DuplicateExport`, `UnexportedExtensionPoint` - registry validation
    /// * `CycleDetected` - an extension point's constraints are contradictory
    /// * `DuplicateInterrupt`, `UnknownInterruptService` - interrupt validation
    /// * `ResourceContention` - overlapping resources under `Deny`
    pub fn build(self) -> Result<Nexus> {
        let assembly_id = self.id.clone();
        let span = tracing::info_span!("assembly", assembly_id = %assembly_id);
        let _guard = span.enter();

        log_op_start!(
            "assembly_build",
            assembly_id = %assembly_id,
            component_count = self.components.len(),
            interrupt_count = self.interrupts.len()
        );
        let start = Instant::now();

        let nexus = self.build_impl().map_err(|e| {
            log_op_error!(
                "assembly_build",
                ExError::from(e.clone()).with_assembly_id(assembly_id.clone()),
                duration_ms = start.elapsed().as_millis() as u64,
                assembly_id = %assembly_id
            );
            e
        })?;

        log_op_end!(
            "assembly_build",
            duration_ms = start.elapsed().as_millis() as u64,
            assembly_id = %assembly_id,
            service_count = nexus.services().count(),
            order_digest = nexus.order_digest()
        );

        Ok(nexus)
    }

    fn build_impl(self) -> Result<Nexus> {
        let registry = InterfaceRegistry::from_components(&self.components)?;

        let mut services: Vec<Arc<Service>> = Vec::with_capacity(registry.len());
        for point in registry.extension_points() {
            let graph = MergedGraph::from_fragments(point.contributions.iter().map(|c| c.fragment));
            let order = linearize(&graph, point.name)?;

            tracing::debug!(
                extension_point = point.name,
                exporter = %point.exporter,
                contribution_count = point.contributions.len(),
                node_count = graph.node_count(),
                edge_count = graph.edge_count(),
                "extension point resolved"
            );

            services.push(Arc::new(Service::new(
                point.name,
                point.exporter.clone(),
                order,
                self.options.trace_actions,
            )));
        }

        let handlers = bind_interrupts(&self.interrupts, &services)?;
        let diagnostics = check_contention(&self.interrupts, self.options.contention)?;
        let order_digest = compute_order_digest(&resolved_order(&services))?;

        Ok(Nexus::new(
            self.id,
            services,
            handlers,
            diagnostics,
            order_digest,
        ))
    }
}

fn bind_interrupts(
    interrupts: &[Interrupt],
    services: &[Arc<Service>],
) -> Result<Vec<InterruptHandler>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut handlers = Vec::with_capacity(interrupts.len());

    for interrupt in interrupts {
        if !seen.insert(interrupt.name()) {
            return Err(WeaveError::DuplicateInterrupt {
                interrupt: interrupt.name().to_string(),
            });
        }
        let service = services
            .iter()
            .find(|s| s.name() == interrupt.service())
            .ok_or_else(|| WeaveError::UnknownInterruptService {
                interrupt: interrupt.name().to_string(),
                service: interrupt.service().to_string(),
            })?;

        handlers.push(InterruptHandler::new(
            interrupt.name(),
            Arc::clone(service),
            interrupt.status_clear(),
            interrupt.required_resources(),
            interrupt.clear_status_body().cloned(),
        ));
    }

    Ok(handlers)
}

fn check_contention(
    interrupts: &[Interrupt],
    severity: ContentionSeverity,
) -> Result<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();

    for contention in find_contention(interrupts) {
        let err = WeaveError::ResourceContention {
            first: contention.first,
            second: contention.second,
            resources: contention.resources,
        };
        match severity {
            ContentionSeverity::Deny => return Err(err),
            ContentionSeverity::Warn => {
                tracing::warn!(err.code = ExErrorKind::ResourceContention.code(), "{}", err);
                diagnostics.push(Diagnostic {
                    code: ExErrorKind::ResourceContention.code().to_string(),
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(diagnostics)
}
