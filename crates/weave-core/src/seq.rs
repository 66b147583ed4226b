//! Reversible step sequences
//!
//! Steps are ordered with the same `sequence`/`parallel` operators and the
//! same linearizer as actions. Unlike actions, a step reports whether it
//! finished, so a `Sequence` can be driven incrementally: each call to
//! `forward` resumes where the previous one stopped.
//!
//! `backward` compensates completed steps in reverse order with the same
//! resumable semantics. Nothing calls it automatically; the owner decides
//! when to roll back.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use weave_core_types::schema::TARGET_ACTION;

use crate::errors::Result;
use crate::graph::{linearize, MergedGraph};
use crate::model::{Fragment, IntoFragment, Node, NodeId};

/// Outcome of one step body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    NotDone,
    Done,
}

/// Body of a step
pub type StepBody = Arc<dyn Fn() -> StepStatus + Send + Sync>;

/// A named, resumable unit of work with optional compensation
#[derive(Clone)]
pub struct Step {
    id: NodeId,
    name: Arc<str>,
    forward: StepBody,
    backward: Option<StepBody>,
}

impl Step {
    pub fn new<F, B>(name: impl Into<String>, forward: F, backward: B) -> Self
    where
        F: Fn() -> StepStatus + Send + Sync + 'static,
        B: Fn() -> StepStatus + Send + Sync + 'static,
    {
        Self {
            id: NodeId::fresh(),
            name: Arc::from(name.into()),
            forward: Arc::new(forward),
            backward: Some(Arc::new(backward)),
        }
    }

    /// Step with nothing to compensate; counts as done when unwinding
    pub fn forward_only<F>(name: impl Into<String>, forward: F) -> Self
    where
        F: Fn() -> StepStatus + Send + Sync + 'static,
    {
        Self {
            id: NodeId::fresh(),
            name: Arc::from(name.into()),
            forward: Arc::new(forward),
            backward: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run_forward(&self) -> StepStatus {
        tracing::trace!(target: TARGET_ACTION, step = %self.name, "forward");
        (self.forward)()
    }

    pub fn run_backward(&self) -> StepStatus {
        match &self.backward {
            Some(backward) => {
                tracing::trace!(target: TARGET_ACTION, step = %self.name, "backward");
                backward()
            }
            None => StepStatus::Done,
        }
    }
}

impl Node for Step {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Step {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Step {}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("compensable", &self.backward.is_some())
            .finish()
    }
}

impl IntoFragment<Step> for Step {
    fn into_fragment(self) -> Fragment<Step> {
        Fragment::single(self)
    }
}

impl IntoFragment<Step> for &Step {
    fn into_fragment(self) -> Fragment<Step> {
        Fragment::single(self.clone())
    }
}

/// Create a step with forward and compensating bodies
pub fn step<F, B>(name: impl Into<String>, forward: F, backward: B) -> Step
where
    F: Fn() -> StepStatus + Send + Sync + 'static,
    B: Fn() -> StepStatus + Send + Sync + 'static,
{
    Step::new(name, forward, backward)
}

/// Linearized steps plus a cursor
///
/// The cursor counts completed steps. `forward` advances it, `backward`
/// moves it back.
#[derive(Debug, Clone)]
pub struct Sequence {
    name: String,
    steps: Vec<Step>,
    position: usize,
}

impl Sequence {
    /// Resolve the fragment into a fixed step order
    ///
    /// # Errors
    /// * `CycleDetected` - the ordering constraints are contradictory
    ///
    /// # Example
    /// ```
    /// use weave_core::relation::sequence;
    /// use weave_core::seq::{step, Sequence, StepStatus};
    ///
    /// let power = step("power_on", || StepStatus::Done, || StepStatus::Done);
    /// let link = step("link_up", || StepStatus::Done, || StepStatus::Done);
    ///
    /// let mut seq = Sequence::assemble("Startup", sequence(&power, &link)).unwrap();
    /// assert_eq!(seq.forward(), StepStatus::Done);
    /// assert!(seq.is_done());
    /// ```
    pub fn assemble(name: impl Into<String>, fragment: impl IntoFragment<Step>) -> Result<Self> {
        let name = name.into();
        let fragment = fragment.into_fragment();
        let graph = MergedGraph::from_fragments([&fragment]);
        let steps = linearize(&graph, &name)?;
        Ok(Self {
            name,
            steps,
            position: 0,
        })
    }

    /// Run steps from the cursor until one is not done or all are
    pub fn forward(&mut self) -> StepStatus {
        while let Some(step) = self.steps.get(self.position) {
            if step.run_forward() == StepStatus::NotDone {
                return StepStatus::NotDone;
            }
            self.position += 1;
        }
        StepStatus::Done
    }

    /// Compensate completed steps, last first, until one is not done or
    /// none remain
    pub fn backward(&mut self) -> StepStatus {
        while self.position > 0 {
            if self.steps[self.position - 1].run_backward() == StepStatus::NotDone {
                return StepStatus::NotDone;
            }
            self.position -= 1;
        }
        StepStatus::Done
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of completed steps
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_done(&self) -> bool {
        self.position == self.steps.len()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}
