//! Policy resolver
//!
//! A `PolicySet` maps each `PolicyCategory` to at most one `Policy`. Lookups
//! always name a default at the call site, so absence is a normal outcome and
//! never an error.
//!
//! Two categories parametrize interrupt dispatch:
//! - `StatusClear`: when the interrupt status flag is cleared relative to the
//!   handler body
//! - `RequiredResources`: hardware resources the handler touches, checked for
//!   contention at assembly time only

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WeaveError};

/// Tag identifying a class of configurable behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyCategory {
    StatusClear,
    RequiredResources,
}

impl PolicyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyCategory::StatusClear => "status_clear",
            PolicyCategory::RequiredResources => "required_resources",
        }
    }
}

impl std::fmt::Display for PolicyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering of the status-flag clear relative to the handler body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClearPolicy {
    /// Clear the status flag, then run the body
    #[default]
    ClearStatusFirst,
    /// Run the body, then clear the status flag
    ClearStatusLast,
    /// Never clear the flag; the body owns it
    DontClearStatus,
}

impl StatusClearPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClearPolicy::ClearStatusFirst => "clear_status_first",
            StatusClearPolicy::ClearStatusLast => "clear_status_last",
            StatusClearPolicy::DontClearStatus => "dont_clear_status",
        }
    }

    /// Run `body` with `clear_status` placed according to the policy
    ///
    /// # Example
    /// ```
    /// use std::cell::RefCell;
    /// use weave_core::policy::StatusClearPolicy;
    ///
    /// let log = RefCell::new(Vec::new());
    /// StatusClearPolicy::ClearStatusLast.run(
    ///     || log.borrow_mut().push("clear"),
    ///     || log.borrow_mut().push("body"),
    /// );
    /// assert_eq!(*log.borrow(), vec!["body", "clear"]);
    /// ```
    pub fn run(&self, clear_status: impl FnOnce(), body: impl FnOnce()) {
        match self {
            StatusClearPolicy::ClearStatusFirst => {
                clear_status();
                body();
            }
            StatusClearPolicy::ClearStatusLast => {
                body();
                clear_status();
            }
            StatusClearPolicy::DontClearStatus => body(),
        }
    }
}

/// A named hardware resource (timer, pin bank, peripheral)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Resource(String);

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared set of resources an interrupt handler uses
///
/// Pure metadata: nothing locks these at run time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredResources(BTreeSet<Resource>);

impl RequiredResources {
    pub fn new<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(resources.into_iter().map(Resource::new).collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|r| r.as_str() == name)
    }

    /// Resources in lexical order
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.0.iter()
    }

    /// Resources present in both sets, in lexical order
    pub fn overlap(&self, other: &RequiredResources) -> Vec<Resource> {
        self.0.intersection(&other.0).cloned().collect()
    }
}

/// A policy value tagged with its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Policy {
    StatusClear(StatusClearPolicy),
    RequiredResources(RequiredResources),
}

impl Policy {
    pub fn category(&self) -> PolicyCategory {
        match self {
            Policy::StatusClear(_) => PolicyCategory::StatusClear,
            Policy::RequiredResources(_) => PolicyCategory::RequiredResources,
        }
    }
}

impl From<StatusClearPolicy> for Policy {
    fn from(policy: StatusClearPolicy) -> Self {
        Policy::StatusClear(policy)
    }
}

impl From<RequiredResources> for Policy {
    fn from(resources: RequiredResources) -> Self {
        Policy::RequiredResources(resources)
    }
}

/// Typed access to one policy category
pub trait PolicyKind: Clone + Into<Policy> {
    const CATEGORY: PolicyCategory;

    fn from_policy(policy: &Policy) -> Option<&Self>;
}

impl PolicyKind for StatusClearPolicy {
    const CATEGORY: PolicyCategory = PolicyCategory::StatusClear;

    fn from_policy(policy: &Policy) -> Option<&Self> {
        match policy {
            Policy::StatusClear(p) => Some(p),
            _ => None,
        }
    }
}

impl PolicyKind for RequiredResources {
    const CATEGORY: PolicyCategory = PolicyCategory::RequiredResources;

    fn from_policy(policy: &Policy) -> Option<&Self> {
        match policy {
            Policy::RequiredResources(r) => Some(r),
            _ => None,
        }
    }
}

/// Collection of policies with at most one entry per category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySet {
    entries: BTreeMap<PolicyCategory, Policy>,
}

impl PolicySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from policies
    ///
    /// # Errors
    /// * `DuplicatePolicy` - two policies share a category
    pub fn from_policies<I, P>(policies: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Policy>,
    {
        let mut set = Self::new();
        for policy in policies {
            set.insert(policy)?;
        }
        Ok(set)
    }

    /// Add a policy
    ///
    /// # Errors
    /// * `DuplicatePolicy` - the category already has an entry
    pub fn insert(&mut self, policy: impl Into<Policy>) -> Result<()> {
        let policy = policy.into();
        let category = policy.category();
        if self.entries.contains_key(&category) {
            return Err(WeaveError::DuplicatePolicy {
                category: category.to_string(),
            });
        }
        self.entries.insert(category, policy);
        Ok(())
    }

    /// Entry for `category`, or `default` if absent
    pub fn resolve<'a>(&'a self, category: PolicyCategory, default: &'a Policy) -> &'a Policy {
        self.entries.get(&category).unwrap_or(default)
    }

    /// Typed entry, if present
    pub fn get<T: PolicyKind>(&self) -> Option<&T> {
        self.entries.get(&T::CATEGORY).and_then(T::from_policy)
    }

    /// Typed entry, or `default` if absent
    pub fn get_or<T: PolicyKind>(&self, default: T) -> T {
        self.get::<T>().cloned().unwrap_or(default)
    }

    /// Typed entry for consumers that have no sensible default
    ///
    /// # Errors
    /// * `PolicyMissing` - the category has no entry
    pub fn require<T: PolicyKind>(&self) -> Result<T> {
        self.get::<T>()
            .cloned()
            .ok_or_else(|| WeaveError::PolicyMissing {
                category: T::CATEGORY.to_string(),
            })
    }

    pub fn contains(&self, category: PolicyCategory) -> bool {
        self.entries.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `resolve(set, category, default)`: the set's entry, else the default
pub fn resolve<'a>(set: &'a PolicySet, category: PolicyCategory, default: &'a Policy) -> &'a Policy {
    set.resolve(category, default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn order_of(policy: StatusClearPolicy) -> Vec<&'static str> {
        let log = RefCell::new(Vec::new());
        policy.run(
            || log.borrow_mut().push("clear"),
            || log.borrow_mut().push("body"),
        );
        log.into_inner()
    }

    #[test]
    fn test_status_clear_orderings() {
        assert_eq!(
            order_of(StatusClearPolicy::ClearStatusFirst),
            vec!["clear", "body"]
        );
        assert_eq!(
            order_of(StatusClearPolicy::ClearStatusLast),
            vec!["body", "clear"]
        );
        assert_eq!(order_of(StatusClearPolicy::DontClearStatus), vec!["body"]);
    }

    #[test]
    fn test_default_fallback() {
        let set = PolicySet::from_policies([StatusClearPolicy::ClearStatusFirst]).unwrap();

        let empty = Policy::from(RequiredResources::empty());
        assert_eq!(
            set.resolve(PolicyCategory::RequiredResources, &empty),
            &Policy::RequiredResources(RequiredResources::empty())
        );

        let fallback = Policy::from(StatusClearPolicy::DontClearStatus);
        assert_eq!(
            resolve(&set, PolicyCategory::StatusClear, &fallback),
            &Policy::StatusClear(StatusClearPolicy::ClearStatusFirst)
        );
    }

    #[test]
    fn test_typed_lookup() {
        let mut set = PolicySet::new();
        set.insert(RequiredResources::new(["timer0", "portb"]))
            .unwrap();

        assert_eq!(
            set.get_or(StatusClearPolicy::ClearStatusLast),
            StatusClearPolicy::ClearStatusLast
        );
        let resources: RequiredResources = set.get_or(RequiredResources::empty());
        assert!(resources.contains("timer0"));
        assert_eq!(resources.len(), 2);
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let err = PolicySet::from_policies([
            StatusClearPolicy::ClearStatusFirst,
            StatusClearPolicy::ClearStatusLast,
        ])
        .unwrap_err();
        assert_eq!(
            err,
            WeaveError::DuplicatePolicy {
                category: "status_clear".to_string()
            }
        );
    }

    #[test]
    fn test_require_missing_category() {
        let set = PolicySet::new();
        let err = set.require::<StatusClearPolicy>().unwrap_err();
        assert!(matches!(err, WeaveError::PolicyMissing { .. }));
    }

    #[test]
    fn test_resource_overlap_is_sorted() {
        let a = RequiredResources::new(["timer1", "portb", "adc"]);
        let b = RequiredResources::new(["portb", "timer1"]);
        let shared: Vec<String> = a.overlap(&b).iter().map(|r| r.to_string()).collect();
        assert_eq!(shared, vec!["portb", "timer1"]);
    }
}
