//! Resolution errors.

use thiserror::Error;

/// Why a resolution run was rejected.
///
/// Resolution fails fast: the first inconsistency aborts the run and no
/// partial plan is produced. Every variant carries the type name(s)
/// involved so the caller can report against the decoded stream.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A field, superclass, or interface reference resolves to neither a
    /// natively known type nor a supplied node.
    #[error("missing dependency: {0}")]
    MissingDependency(String),

    /// The superclass/interface/field reference graph contains a cycle.
    /// The path lists the cycle with its entry node repeated at the end.
    #[error("cyclic dependency: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// Two levels of a hierarchy, or two merged interfaces, declare the
    /// same field with different descriptors.
    #[error("field conflict on {type_name}.{field}: {first} vs {second}")]
    FieldConflict {
        type_name: String,
        field: String,
        first: String,
        second: String,
    },

    /// A type's field set does not structurally satisfy an interface it
    /// declares.
    #[error("{type_name} does not satisfy interface {interface}: field {field}")]
    InterfaceViolation {
        type_name: String,
        interface: String,
        field: String,
    },

    /// The supplied node set contains the same type name twice.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A declaration breaks the class/interface shape rules.
    #[error("invalid declaration for {type_name}: {reason}")]
    InvalidDeclaration { type_name: String, reason: String },

    /// The availability oracle failed while looking up a name. Terminal
    /// for this run; the caller may retry the whole run.
    #[error("availability lookup failed for {type_name}")]
    Oracle {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },
}
