//! Reified generic types for an erasing host.
//!
//! Generated code needs run-time answers to questions the host type system
//! has thrown away: "what is `E` for this list?", "is this a
//! `List<Constraint>`?". This crate keeps that information as explicit
//! values:
//!
//! - [`TypeInfo`]: one `static` descriptor per compiled class
//! - [`TypeExpr`]: a concrete or parametric instantiation tree
//! - [`TypeEnvironment`]: a persistent binding chain that turns a
//!   parametric expression into a literal one
//! - [`TypeRegistry`]: the process-wide, write-once class table
//!
//! # Static initialization
//!
//! A class descriptor is created in two steps. The `static` itself is built
//! by a `const fn` and carries no superclass; the superclass link is written
//! once afterwards (usually through [`TypeRegistry::declare`]). Mutually
//! referencing classes can therefore name each other before either link
//! exists.
//!
//! ```text
//! static VARIABLE: TypeInfo = TypeInfo::new("Variable", "VariableApi", &[]);
//!
//! TypeRegistry::global().declare(&VARIABLE, TypeExpr::class(builtin::object()))?;
//! let list_of_constraint = TypeExpr::interface(builtin::list(), vec![TypeExpr::class(&CONSTRAINT)])?;
//! ```

pub mod builtin;
mod env;
mod error;
mod expr;
mod info;
mod registry;
mod stack;
mod subtype;

pub use env::TypeEnvironment;
pub use error::TypeError;
pub use expr::{InterfaceType, TypeExpr, TypeParam};
pub use info::TypeInfo;
pub use registry::TypeRegistry;
pub use stack::ensure_sufficient_stack;
