//! Interrupt declarations
//!
//! An interrupt binds a hardware event to an exported service. Its policy set
//! decides how the status flag is cleared around the service and which
//! resources the handler touches. Both are optional: an absent status-clear
//! policy means `ClearStatusFirst`, absent resources mean the empty set.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::model::Body;
use crate::policy::{Policy, PolicySet, RequiredResources, StatusClearPolicy};

/// An interrupt source dispatching to one extension point
#[derive(Clone)]
pub struct Interrupt {
    name: String,
    service: String,
    policies: PolicySet,
    clear_status: Option<Body>,
}

impl Interrupt {
    pub fn new(name: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service: service.into(),
            policies: PolicySet::new(),
            clear_status: None,
        }
    }

    /// Attach policies, rejecting two of the same category
    ///
    /// # Errors
    /// * `DuplicatePolicy` - a category is given twice, or was already set
    pub fn with_policies<I, P>(mut self, policies: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Policy>,
    {
        for policy in policies {
            self.policies.insert(policy)?;
        }
        Ok(self)
    }

    /// Body that clears the hardware status flag
    pub fn with_clear_status<F>(mut self, clear_status: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.clear_status = Some(Arc::new(clear_status));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extension point this interrupt dispatches to
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    pub fn clear_status_body(&self) -> Option<&Body> {
        self.clear_status.as_ref()
    }

    pub fn status_clear(&self) -> StatusClearPolicy {
        self.policies.get_or(StatusClearPolicy::default())
    }

    pub fn required_resources(&self) -> RequiredResources {
        self.policies.get_or(RequiredResources::empty())
    }
}

impl std::fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interrupt")
            .field("name", &self.name)
            .field("service", &self.service)
            .field("policies", &self.policies)
            .field("clear_status", &self.clear_status.is_some())
            .finish()
    }
}

/// Two interrupts whose declared resources overlap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contention {
    pub first: String,
    pub second: String,
    pub resources: Vec<String>,
}

/// Compare every pair of interrupts, in declaration order
///
/// Pairs without shared resources are skipped. Shared resources are listed
/// in lexical order.
pub fn find_contention(interrupts: &[Interrupt]) -> Vec<Contention> {
    let resources: Vec<RequiredResources> =
        interrupts.iter().map(Interrupt::required_resources).collect();

    let mut found = Vec::new();
    for i in 0..interrupts.len() {
        for j in (i + 1)..interrupts.len() {
            let shared = resources[i].overlap(&resources[j]);
            if !shared.is_empty() {
                found.push(Contention {
                    first: interrupts[i].name.clone(),
                    second: interrupts[j].name.clone(),
                    resources: shared.iter().map(|r| r.to_string()).collect(),
                });
            }
        }
    }
    found
}
