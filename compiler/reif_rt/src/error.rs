//! Runtime failures.
//!
//! Two classes, told apart by [`RuntimeError::is_protocol_defect`]:
//!
//! - **Protocol defects** (bad type evaluation, re-initialization, asking an
//!   abstract class for an instance, malformed capability surfaces) mean the
//!   emitted code or this runtime broke an invariant. They are logged at
//!   `error` where they arise and must be propagated, never absorbed.
//! - **Data-dependent failures** (`IndexOutOfRange`) are ordinary per-call
//!   outcomes the caller handles like any bounds-checked access.

use reif_types::TypeError;

use crate::Lifecycle;

/// Failure raised by the object model runtime.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Type(#[from] TypeError),

    /// An initializer ran on an instance whose construction already finished.
    #[error("`{class}` is already initialized")]
    AlreadyInitialized { class: &'static str },

    #[error("illegal lifecycle transition for `{class}`: {from:?} -> {to:?}")]
    IllegalTransition {
        class: &'static str,
        from: Lifecycle,
        to: Lifecycle,
    },

    /// Abstract classes have no factory.
    #[error("`{class}` is abstract and cannot be instantiated")]
    AbstractClass { class: &'static str },

    #[error("factory for `{expected}` called with type `{found}`")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("`{class}` carries no object header")]
    MissingHeader { class: &'static str },

    #[error("`{class}` has no capability interface")]
    MissingCapability { class: &'static str },

    /// A capability surface was derived from the wrong parent surface.
    #[error("capability of `{class}` must extend that of `{expected}`, found `{found}`")]
    ParentMismatch {
        class: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{member}` in `{class}` does not match the inherited signature")]
    IncompatibleOverride { class: &'static str, member: String },

    #[error("concrete class `{class}` does not implement `{member}`")]
    UnimplementedMember { class: &'static str, member: String },

    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },
}

impl RuntimeError {
    /// Whether this failure indicates a broken invariant rather than an
    /// expected data-dependent outcome.
    pub fn is_protocol_defect(&self) -> bool {
        !matches!(self, RuntimeError::IndexOutOfRange { .. })
    }
}

/// Log a protocol defect and hand it back for propagation.
#[cold]
pub(crate) fn defect(err: RuntimeError) -> RuntimeError {
    tracing::error!(%err, "protocol defect");
    err
}

#[cold]
pub(crate) fn index_out_of_range(index: i64, length: usize) -> RuntimeError {
    RuntimeError::IndexOutOfRange { index, length }
}
