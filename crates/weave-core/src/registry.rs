//! Interface registry
//!
//! Validates export/extend relationships across all components of an
//! assembly and groups the fragments registered against each extension
//! point in composition order.
//!
//! ## Ordering rules
//!
//! - Extension points are listed in the order their exports were declared
//!   (component order, then declaration order within the component).
//! - Contributions to one extension point are listed in the order the
//!   extending components were composed, then declaration order within a
//!   component. Never alphabetical, never hash-based.
//!
//! Exports are collected before extends are checked, so a component may
//! extend a point exported by a component composed after it.

use std::collections::HashMap;

use crate::errors::{Result, WeaveError};
use crate::model::{Action, Component, ComponentId, Fragment};

/// One fragment registered against an extension point
#[derive(Debug, Clone, Copy)]
pub struct Contribution<'a> {
    pub component: &'a ComponentId,
    pub fragment: &'a Fragment<Action>,
}

/// A validated extension point with its single exporter
#[derive(Debug, Clone)]
pub struct ExtensionPointDecl<'a> {
    pub name: &'a str,
    pub exporter: &'a ComponentId,
    pub contributions: Vec<Contribution<'a>>,
}

/// Validated view of every export and extend in an assembly
#[derive(Debug, Clone)]
pub struct InterfaceRegistry<'a> {
    points: Vec<ExtensionPointDecl<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> InterfaceRegistry<'a> {
    /// Build the registry from components in composition order
    ///
    /// # Errors
    /// * `DuplicateExport` - two components (or one component twice) export
    ///   the same name; the first offending pair in declaration order
    /// * `UnexportedExtensionPoint` - a component extends a name nobody exports
    pub fn from_components(components: &'a [Component]) -> Result<Self> {
        let mut points: Vec<ExtensionPointDecl<'a>> = Vec::new();
        let mut index: HashMap<&'a str, usize> = HashMap::new();

        for component in components {
            for name in component.exports() {
                if let Some(&existing) = index.get(name.as_str()) {
                    return Err(WeaveError::DuplicateExport {
                        extension_point: name.clone(),
                        first: points[existing].exporter.to_string(),
                        second: component.id().to_string(),
                    });
                }
                index.insert(name.as_str(), points.len());
                points.push(ExtensionPointDecl {
                    name: name.as_str(),
                    exporter: component.id(),
                    contributions: Vec::new(),
                });
            }
        }

        for component in components {
            for extension in component.extends() {
                let slot = index
                    .get(extension.extension_point.as_str())
                    .copied()
                    .ok_or_else(|| WeaveError::UnexportedExtensionPoint {
                        extension_point: extension.extension_point.clone(),
                        component: component.id().to_string(),
                    })?;
                points[slot].contributions.push(Contribution {
                    component: component.id(),
                    fragment: &extension.fragment,
                });
            }
        }

        Ok(Self { points, index })
    }

    /// Extension points in export declaration order
    pub fn extension_points(&self) -> &[ExtensionPointDecl<'a>] {
        &self.points
    }

    pub fn get(&self, name: &str) -> Option<&ExtensionPointDecl<'a>> {
        self.index.get(name).map(|&i| &self.points[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::action;

    #[test]
    fn test_duplicate_export_fails() {
        let components = vec![
            Component::new("c1").export("Init"),
            Component::new("c2").export("Init"),
        ];

        let err = InterfaceRegistry::from_components(&components).unwrap_err();

        assert_eq!(
            err,
            WeaveError::DuplicateExport {
                extension_point: "Init".to_string(),
                first: "c1".to_string(),
                second: "c2".to_string(),
            }
        );
    }

    #[test]
    fn test_dangling_extend_fails() {
        let a = action("a", || {});
        let components = vec![
            Component::new("interfaces").export("Init"),
            Component::new("feature").extend("Unknown", &a),
        ];

        let err = InterfaceRegistry::from_components(&components).unwrap_err();

        assert_eq!(
            err,
            WeaveError::UnexportedExtensionPoint {
                extension_point: "Unknown".to_string(),
                component: "feature".to_string(),
            }
        );
    }

    #[test]
    fn test_extend_before_export_in_composition_order() {
        let a = action("a", || {});
        let components = vec![
            Component::new("feature").extend("Init", &a),
            Component::new("interfaces").export("Init"),
        ];

        let registry = InterfaceRegistry::from_components(&components).unwrap();

        let init = registry.get("Init").unwrap();
        assert_eq!(init.exporter.as_str(), "interfaces");
        assert_eq!(init.contributions.len(), 1);
        assert_eq!(init.contributions[0].component.as_str(), "feature");
    }

    #[test]
    fn test_contributions_follow_composition_order() {
        let a = action("a", || {});
        let b = action("b", || {});
        let c = action("c", || {});
        let components = vec![
            Component::new("interfaces").export("MainLoop").export("Init"),
            Component::new("zeta").extend("Init", &a),
            Component::new("alpha").extend("Init", &b).extend("MainLoop", &c),
        ];

        let registry = InterfaceRegistry::from_components(&components).unwrap();

        let names: Vec<&str> = registry.extension_points().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["MainLoop", "Init"]);

        let contributors: Vec<&str> = registry
            .get("Init")
            .unwrap()
            .contributions
            .iter()
            .map(|c| c.component.as_str())
            .collect();
        assert_eq!(contributors, vec!["zeta", "alpha"]);
        assert!(registry.contains("MainLoop"));
        assert!(!registry.contains("OnTimerInterrupt"));
        assert_eq!(registry.len(), 2);
    }
}
