//! Build plan
//!
//! A `Plan` is a serializable snapshot of what a nexus resolved to: each
//! extension point with its exporter and ordered action names, each
//! interrupt with its effective policies, the diagnostics recorded during
//! the build, and the order digest.
//!
//! ## Plan Fields
//!
//! - `plan_schema_version`: schema version (currently 1)
//! - `assembly_id`: id of the build that produced the plan
//! - `extension_points`: services in export declaration order
//! - `interrupts`: handlers in declaration order
//! - `diagnostics`: non-fatal findings (contention under `warn`)
//! - `order_digest`: see [`crate::digest`]
//!
//! `assembly_id` differs between builds; every other field is a function of
//! the declarations alone.

use serde::{Deserialize, Serialize};

use crate::dispatch::{Diagnostic, Nexus};
use crate::errors::Result;
use crate::policy::StatusClearPolicy;

pub const PLAN_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_schema_version: u32,
    pub assembly_id: String,
    pub extension_points: Vec<PlannedService>,
    pub interrupts: Vec<PlannedInterrupt>,
    pub diagnostics: Vec<Diagnostic>,
    pub order_digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedService {
    pub name: String,
    pub exporter: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedInterrupt {
    pub name: String,
    pub service: String,
    pub status_clear: StatusClearPolicy,
    pub resources: Vec<String>,
}

impl Plan {
    pub fn from_nexus(nexus: &Nexus) -> Self {
        let extension_points = nexus
            .services()
            .map(|s| PlannedService {
                name: s.name().to_string(),
                exporter: s.exporter().to_string(),
                actions: s.action_names().into_iter().map(String::from).collect(),
            })
            .collect();

        let interrupts = nexus
            .interrupts()
            .iter()
            .map(|h| PlannedInterrupt {
                name: h.name().to_string(),
                service: h.service().name().to_string(),
                status_clear: h.status_clear(),
                resources: h.resources().iter().map(|r| r.to_string()).collect(),
            })
            .collect();

        Self {
            plan_schema_version: PLAN_SCHEMA_VERSION,
            assembly_id: nexus.assembly_id().to_string(),
            extension_points,
            interrupts,
            diagnostics: nexus.diagnostics().to_vec(),
            order_digest: nexus.order_digest().to_string(),
        }
    }

    /// # Errors
    /// Returns `WeaveError::Serialization` if JSON serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, extension_point: &str) -> Option<&PlannedService> {
        self.extension_points
            .iter()
            .find(|s| s.name == extension_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::Assembly;
    use crate::interrupt::Interrupt;
    use crate::model::{action, Component};
    use crate::relation::sequence;

    fn sample_nexus() -> Nexus {
        let a = action("a", || {});
        let b = action("b", || {});
        Assembly::new()
            .component(Component::new("interfaces").export("Init").export("OnTick"))
            .component(Component::new("feature").extend("Init", sequence(&a, &b)))
            .interrupt(Interrupt::new("TICK", "OnTick"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_plan_from_nexus() {
        let nexus = sample_nexus();
        let plan = Plan::from_nexus(&nexus);

        assert_eq!(plan.plan_schema_version, 1);
        assert_eq!(plan.assembly_id, nexus.assembly_id().as_str());
        let init = plan.get("Init").unwrap();
        assert_eq!(init.exporter, "interfaces");
        assert_eq!(init.actions, vec!["a", "b"]);
        assert_eq!(plan.interrupts[0].service, "OnTick");
        assert_eq!(
            plan.interrupts[0].status_clear,
            StatusClearPolicy::ClearStatusFirst
        );
        assert_eq!(plan.order_digest.len(), 64);
    }

    #[test]
    fn test_plan_json_uses_snake_case_policies() {
        let plan = Plan::from_nexus(&sample_nexus());
        let json = plan.to_json_pretty().unwrap();
        assert!(json.contains("\"clear_status_first\""));

        let parsed: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
    }
}
