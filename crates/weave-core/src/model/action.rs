//! Action: a named unit of work contributed to an extension point.

use std::fmt;
use std::sync::Arc;

use weave_core_types::schema::TARGET_ACTION;

use super::node::{Node, NodeId};

/// Callable body of an action
///
/// Bodies are `Send + Sync` so a built nexus can be shared between the
/// interrupt and main-loop contexts without locking.
pub type Body = Arc<dyn Fn() + Send + Sync>;

/// A named unit of work with an optional undo body
///
/// Cloning an action keeps its identity. Two actions created separately are
/// distinct graph nodes even if they share a name.
#[derive(Clone)]
pub struct Action {
    id: NodeId,
    name: Arc<str>,
    forward: Body,
    backward: Option<Body>,
}

impl Action {
    /// Create an action with a forward body only
    pub fn new<F>(name: impl Into<String>, forward: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::from_body(name, Arc::new(forward))
    }

    /// Create an action from an already shared body
    pub fn from_body(name: impl Into<String>, forward: Body) -> Self {
        Self {
            id: NodeId::fresh(),
            name: Arc::from(name.into()),
            forward,
            backward: None,
        }
    }

    /// Create an action with a paired undo body
    pub fn reversible<F, B>(name: impl Into<String>, forward: F, backward: B) -> Self
    where
        F: Fn() + Send + Sync + 'static,
        B: Fn() + Send + Sync + 'static,
    {
        let mut action = Self::new(name, forward);
        action.backward = Some(Arc::new(backward));
        action
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an undo body was supplied
    pub fn is_reversible(&self) -> bool {
        self.backward.is_some()
    }

    /// Execute the forward body, emitting a trace event first
    pub fn run(&self) {
        tracing::trace!(target: TARGET_ACTION, action = %self.name, "run");
        (self.forward)();
    }

    /// Execute the forward body without the trace event
    pub fn run_untraced(&self) {
        (self.forward)();
    }

    /// Execute the undo body, if any
    pub fn undo(&self) {
        if let Some(backward) = &self.backward {
            tracing::trace!(target: TARGET_ACTION, action = %self.name, "undo");
            backward();
        }
    }
}

impl Node for Action {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Action {}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("reversible", &self.is_reversible())
            .finish()
    }
}

/// Wrap a callable with a human-readable name
///
/// # Example
/// ```
/// use weave_core::model::action;
///
/// let clk_init = action("clk_init", || {});
/// assert_eq!(clk_init.name(), "clk_init");
/// ```
pub fn action<F>(name: impl Into<String>, body: F) -> Action
where
    F: Fn() + Send + Sync + 'static,
{
    Action::new(name, body)
}
