//! Type-level failures.
//!
//! Every variant here is a protocol defect: it means emitted code (or this
//! runtime) broke an invariant, such as evaluating an expression against an
//! environment captured at the wrong scope. None of them is expected during
//! a correct run, so callers propagate rather than recover.

/// Failure while building, linking or evaluating types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// A parametric expression referenced a slot with no binding anywhere in
    /// the environment chain.
    #[error("unbound type parameter `{param}` of `{owner}`")]
    UnboundTypeParameter { owner: &'static str, param: String },

    /// Wrong number of type arguments (or a parameter index past the end).
    #[error("`{class}` expects {expected} type argument(s), found {found}")]
    ArityMismatch {
        class: &'static str,
        expected: usize,
        found: usize,
    },

    /// Environments only hold literal types.
    #[error("binding for `{class}` must be a literal type, found `{expr}`")]
    NonLiteralBinding { class: &'static str, expr: String },

    /// An operation that needs a fully evaluated type got a parametric one.
    #[error("expected a literal type, found `{expr}`")]
    NotLiteral { expr: String },

    /// An ancestor's static initialization has not run yet.
    #[error("superclass of `{class}` has not been linked")]
    UnlinkedSuperclass { class: &'static str },

    /// The superclass link is write-once.
    #[error("superclass of `{class}` is already linked")]
    SuperclassAlreadyLinked { class: &'static str },

    #[error("`{class}` is the root type and cannot have a superclass")]
    RootSuperclass { class: &'static str },

    #[error("linking `{class}` to `{superclass}` would make the hierarchy cyclic")]
    CyclicInheritance {
        class: &'static str,
        superclass: &'static str,
    },

    /// Two different descriptors claimed the same class name.
    #[error("class `{name}` is already registered")]
    DuplicateClass { name: &'static str },

    /// Each capability interface has exactly one implementing class.
    #[error(
        "capability interface `{capability}` is already implemented by `{existing}`, \
         cannot pair it with `{class}`"
    )]
    DuplicateCapability {
        capability: &'static str,
        existing: &'static str,
        class: &'static str,
    },
}
