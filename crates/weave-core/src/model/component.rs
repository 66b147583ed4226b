//! Component: an independent feature module declaring exports and extensions.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::fragment::{Fragment, IntoFragment};

/// Stable identifier of a component within one assembly
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One contribution of a component to an extension point
#[derive(Debug, Clone)]
pub struct Extension {
    pub extension_point: String,
    pub fragment: Fragment<Action>,
}

/// Feature module contributing to shared extension points
///
/// Declaration is pure data: nothing runs until the assembled nexus is
/// invoked.
///
/// # Example
/// ```
/// use weave_core::model::{action, Component};
/// use weave_core::relation::sequence;
///
/// let clk_init = action("clk_init", || {});
/// let timer_init = action("timer_init", || {});
///
/// let core = Component::new("core_init")
///     .extend("RuntimeInit", sequence(&clk_init, &timer_init));
/// assert_eq!(core.extends().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Component {
    id: ComponentId,
    exports: Vec<String>,
    extends: Vec<Extension>,
}

impl Component {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ComponentId::new(id),
            exports: Vec::new(),
            extends: Vec::new(),
        }
    }

    /// Declare a new, initially empty extension point
    pub fn export(mut self, extension_point: impl Into<String>) -> Self {
        self.exports.push(extension_point.into());
        self
    }

    /// Contribute ordering constraints and actions to an extension point
    ///
    /// A component may extend the same point several times; contributions
    /// keep declaration order.
    pub fn extend(
        mut self,
        extension_point: impl Into<String>,
        fragment: impl IntoFragment<Action>,
    ) -> Self {
        self.extends.push(Extension {
            extension_point: extension_point.into(),
            fragment: fragment.into_fragment(),
        });
        self
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn exports(&self) -> &[String] {
        &self.exports
    }

    pub fn extends(&self) -> &[Extension] {
        &self.extends
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::action;

    #[test]
    fn test_component_keeps_declaration_order() {
        let a = action("a", || {});
        let b = action("b", || {});
        let c = Component::new("c")
            .export("Init")
            .export("MainLoop")
            .extend("Init", &a)
            .extend("MainLoop", &b)
            .extend("Init", &b);

        assert_eq!(c.id().as_str(), "c");
        assert_eq!(c.exports(), &["Init".to_string(), "MainLoop".to_string()]);
        let targets: Vec<&str> = c
            .extends()
            .iter()
            .map(|e| e.extension_point.as_str())
            .collect();
        assert_eq!(targets, vec!["Init", "MainLoop", "Init"]);
    }
}
