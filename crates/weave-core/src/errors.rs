use thiserror::Error;
use weave_core_types::AssemblyId;

/// Result type alias using WeaveError
pub type Result<T> = std::result::Result<T, WeaveError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised while assembling a system. Each kind maps to a stable error code
/// that can be used for programmatic handling, testing and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Composition
    DuplicateExport,
    UnexportedExtensionPoint,
    CycleDetected,
    NotFound,
    AlreadyExists,

    // Policy
    PolicyMissing,
    DuplicatePolicy,
    ResourceContention,

    // Configuration
    InvalidManifest,
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DuplicateExport => "ERR_DUPLICATE_EXPORT",
            ExErrorKind::UnexportedExtensionPoint => "ERR_UNEXPORTED_EXTENSION_POINT",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::PolicyMissing => "ERR_POLICY_MISSING",
            ExErrorKind::DuplicatePolicy => "ERR_DUPLICATE_POLICY",
            ExErrorKind::ResourceContention => "ERR_RESOURCE_CONTENTION",
            ExErrorKind::InvalidManifest => "ERR_INVALID_MANIFEST",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    extension_point: Option<String>,
    component: Option<String>,
    assembly_id: Option<AssemblyId>,
    message: String,
    participants: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            extension_point: None,
            component: None,
            assembly_id: None,
            message: String::new(),
            participants: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add extension point context
    pub fn with_extension_point(mut self, name: impl Into<String>) -> Self {
        self.extension_point = Some(name.into());
        self
    }

    /// Add component context
    pub fn with_component(mut self, id: impl Into<String>) -> Self {
        self.component = Some(id.into());
        self
    }

    /// Add assembly ID context
    pub fn with_assembly_id(mut self, assembly_id: AssemblyId) -> Self {
        self.assembly_id = Some(assembly_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add the names involved in the failure (cycle members, conflicting components)
    pub fn with_participants(mut self, names: Vec<String>) -> Self {
        self.participants = Some(names);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the extension point context, if any
    pub fn extension_point(&self) -> Option<&str> {
        self.extension_point.as_deref()
    }

    /// Get the component context, if any
    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    /// Get the assembly ID context, if any
    pub fn assembly_id(&self) -> Option<&AssemblyId> {
        self.assembly_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get participant names, if any
    pub fn participants(&self) -> Option<&[String]> {
        self.participants.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(extension_point) = &self.extension_point {
            write!(f, " (extension_point: {})", extension_point)?;
        }
        if let Some(component) = &self.component {
            write!(f, " (component: {})", component)?;
        }
        if let Some(assembly_id) = &self.assembly_id {
            write!(f, " (assembly_id: {})", assembly_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for assembly operations
///
/// Every variant is raised during assembly. Dispatch has no error channel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeaveError {
    // ===== Composition Errors =====
    /// Two components export the same extension point
    #[error("Extension point {extension_point} is exported by both {first} and {second}")]
    DuplicateExport {
        extension_point: String,
        first: String,
        second: String,
    },

    /// A component extends an extension point nobody exports
    #[error("Component {component} extends unexported extension point {extension_point}")]
    UnexportedExtensionPoint {
        extension_point: String,
        component: String,
    },

    /// The merged graph of an extension point is not acyclic
    #[error("Cycle detected in extension point {extension_point}: {}", .cycle.join(" -> "))]
    CycleDetected {
        extension_point: String,
        cycle: Vec<String>,
    },

    /// Extension point lookup on a built nexus failed
    #[error("Extension point not found: {extension_point}")]
    ExtensionPointNotFound { extension_point: String },

    // ===== Policy Errors =====
    /// A policy consumer required a category that is absent
    #[error("No policy declared for category {category}")]
    PolicyMissing { category: String },

    /// A policy set received a second entry for the same category
    #[error("Policy category {category} declared more than once")]
    DuplicatePolicy { category: String },

    /// Two interrupts declare overlapping hardware resources
    #[error("Interrupts {first} and {second} both require {}", .resources.join(", "))]
    ResourceContention {
        first: String,
        second: String,
        resources: Vec<String>,
    },

    // ===== Interrupt Errors =====
    /// An interrupt refers to a service no component exports
    #[error("Interrupt {interrupt} dispatches to unexported extension point {service}")]
    UnknownInterruptService { interrupt: String, service: String },

    /// Two interrupts share a name
    #[error("Interrupt declared more than once: {interrupt}")]
    DuplicateInterrupt { interrupt: String },

    /// Interrupt lookup on a built nexus failed
    #[error("Interrupt not found: {interrupt}")]
    InterruptNotFound { interrupt: String },

    // ===== Configuration Errors =====
    /// Manifest content is malformed or inconsistent
    #[error("Invalid manifest: {reason}")]
    InvalidManifest { reason: String },

    /// Assembly options are malformed
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File system error while reading configuration
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from WeaveError to ExError
impl From<WeaveError> for ExError {
    fn from(err: WeaveError) -> Self {
        match err {
            WeaveError::DuplicateExport {
                extension_point,
                first,
                second,
            } => ExError::new(ExErrorKind::DuplicateExport)
                .with_extension_point(extension_point)
                .with_component(second.clone())
                .with_participants(vec![first, second])
                .with_message("Extension point exported more than once"),

            WeaveError::UnexportedExtensionPoint {
                extension_point,
                component,
            } => ExError::new(ExErrorKind::UnexportedExtensionPoint)
                .with_extension_point(extension_point)
                .with_component(component)
                .with_message("Extended extension point has no exporter"),

            WeaveError::CycleDetected {
                extension_point,
                cycle,
            } => ExError::new(ExErrorKind::CycleDetected)
                .with_extension_point(extension_point)
                .with_message(format!("Ordering cycle: {}", cycle.join(" -> ")))
                .with_participants(cycle),

            WeaveError::ExtensionPointNotFound { extension_point } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_extension_point(extension_point)
                    .with_message("Extension point not found")
            }

            WeaveError::PolicyMissing { category } => ExError::new(ExErrorKind::PolicyMissing)
                .with_message(format!("No policy for category {}", category)),

            WeaveError::DuplicatePolicy { category } => {
                ExError::new(ExErrorKind::DuplicatePolicy)
                    .with_message(format!("Policy category {} declared twice", category))
            }

            WeaveError::ResourceContention {
                first,
                second,
                resources,
            } => ExError::new(ExErrorKind::ResourceContention)
                .with_message(format!("Shared resources: {}", resources.join(", ")))
                .with_participants(vec![first, second]),

            WeaveError::UnknownInterruptService { interrupt, service } => {
                ExError::new(ExErrorKind::UnexportedExtensionPoint)
                    .with_extension_point(service)
                    .with_message(format!("Interrupt {} has no exported service", interrupt))
            }

            WeaveError::DuplicateInterrupt { interrupt } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_message(format!("Interrupt {} declared twice", interrupt))
            }

            WeaveError::InterruptNotFound { interrupt } => ExError::new(ExErrorKind::NotFound)
                .with_message(format!("Interrupt {} not found", interrupt)),

            WeaveError::InvalidManifest { reason } => {
                ExError::new(ExErrorKind::InvalidManifest).with_message(reason)
            }

            WeaveError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            WeaveError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            WeaveError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),

            WeaveError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to WeaveError
impl From<serde_json::Error> for WeaveError {
    fn from(err: serde_json::Error) -> Self {
        WeaveError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_error_kind_codes() {
        let cases = [
            (ExErrorKind::DuplicateExport, "ERR_DUPLICATE_EXPORT"),
            (
                ExErrorKind::UnexportedExtensionPoint,
                "ERR_UNEXPORTED_EXTENSION_POINT",
            ),
            (ExErrorKind::CycleDetected, "ERR_CYCLE_DETECTED"),
            (ExErrorKind::ResourceContention, "ERR_RESOURCE_CONTENTION"),
            (ExErrorKind::PolicyMissing, "ERR_POLICY_MISSING"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_cycle_error_display_lists_members() {
        let err = WeaveError::CycleDetected {
            extension_point: "RuntimeInit".to_string(),
            cycle: vec!["p".to_string(), "q".to_string(), "p".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Cycle detected in extension point RuntimeInit: p -> q -> p"
        );
    }

    #[test]
    fn test_cycle_error_carries_participants() {
        let err: ExError = WeaveError::CycleDetected {
            extension_point: "MainLoop".to_string(),
            cycle: vec!["a".to_string(), "b".to_string()],
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::CycleDetected);
        assert_eq!(err.extension_point(), Some("MainLoop"));
        assert_eq!(
            err.participants().expect("participants should be Some"),
            &["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_duplicate_export_names_both_components() {
        let err: ExError = WeaveError::DuplicateExport {
            extension_point: "Init".to_string(),
            first: "c1".to_string(),
            second: "c2".to_string(),
        }
        .into();
        assert_eq!(err.code(), "ERR_DUPLICATE_EXPORT");
        assert_eq!(err.component(), Some("c2"));
        assert_eq!(
            err.participants().unwrap(),
            &["c1".to_string(), "c2".to_string()]
        );
    }

    #[test]
    fn test_ex_error_participants_none_by_default() {
        let err = ExError::new(ExErrorKind::NotFound);
        assert!(err.participants().is_none());
        assert!(err.assembly_id().is_none());
    }

    #[test]
    fn test_ex_error_display_includes_op_and_assembly() {
        let id = AssemblyId::new();
        let err = ExError::new(ExErrorKind::CycleDetected)
            .with_op("assembly_build")
            .with_message("p -> q -> p")
            .with_assembly_id(id.clone());

        assert_eq!(err.op(), Some("assembly_build"));
        assert_eq!(
            err.to_string(),
            format!(
                "[ERR_CYCLE_DETECTED] in operation 'assembly_build': p -> q -> p (assembly_id: {})",
                id
            )
        );
    }
}
