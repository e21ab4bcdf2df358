//! Type expressions: concrete or parametric instantiation trees.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::builtin;
use crate::{TypeError, TypeInfo};

/// A type instantiation, possibly referencing unbound parameter slots.
///
/// An expression is *literal* when no [`TypeExpr::Param`] occurs anywhere in
/// it, and *parametric* otherwise. Literal expressions are what instances,
/// lists and environments carry; parametric ones only appear as the
/// per-class constants generated code evaluates against an environment.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// `base<args...>`.
    Interface(InterfaceType),
    /// Slot `index` of `owner`'s type parameter list.
    Param(TypeParam),
}

/// Shared node for `base<args...>`. Literalness is computed once at
/// construction so evaluating a literal tree is a pointer copy.
#[derive(Clone)]
pub struct InterfaceType(Arc<InterfaceNode>);

struct InterfaceNode {
    base: &'static TypeInfo,
    args: Vec<TypeExpr>,
    literal: bool,
}

/// Reference to a declared type parameter slot.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct TypeParam {
    owner: &'static TypeInfo,
    index: usize,
}

impl TypeExpr {
    /// The raw type `base`: every declared parameter is filled with
    /// `dynamic`, so a generic class named without arguments is still a
    /// literal type.
    pub fn class(base: &'static TypeInfo) -> TypeExpr {
        let args = (0..base.arity())
            .map(|_| TypeExpr::Interface(InterfaceType::new(&builtin::DYNAMIC, Vec::new())))
            .collect();
        TypeExpr::Interface(InterfaceType::new(base, args))
    }

    /// `base<args...>`, checking the argument count.
    pub fn interface(base: &'static TypeInfo, args: Vec<TypeExpr>) -> Result<TypeExpr, TypeError> {
        if args.len() != base.arity() {
            return Err(TypeError::ArityMismatch {
                class: base.name(),
                expected: base.arity(),
                found: args.len(),
            });
        }
        Ok(TypeExpr::Interface(InterfaceType::new(base, args)))
    }

    /// Reference to parameter slot `index` of `owner`.
    pub fn param(owner: &'static TypeInfo, index: usize) -> Result<TypeExpr, TypeError> {
        if index >= owner.arity() {
            return Err(TypeError::ArityMismatch {
                class: owner.name(),
                expected: owner.arity(),
                found: index + 1,
            });
        }
        Ok(TypeExpr::Param(TypeParam { owner, index }))
    }

    /// Rebuild with already-checked arguments.
    pub(crate) fn from_parts(base: &'static TypeInfo, args: Vec<TypeExpr>) -> TypeExpr {
        debug_assert_eq!(args.len(), base.arity());
        TypeExpr::Interface(InterfaceType::new(base, args))
    }

    pub fn is_literal(&self) -> bool {
        match self {
            TypeExpr::Interface(it) => it.is_literal(),
            TypeExpr::Param(_) => false,
        }
    }

    /// Class of an interface expression. `None` for a parameter reference.
    pub fn base(&self) -> Option<&'static TypeInfo> {
        match self {
            TypeExpr::Interface(it) => Some(it.base()),
            TypeExpr::Param(_) => None,
        }
    }

    /// Type arguments of an interface expression (empty for a parameter).
    pub fn args(&self) -> &[TypeExpr] {
        match self {
            TypeExpr::Interface(it) => it.args(),
            TypeExpr::Param(_) => &[],
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match self {
            TypeExpr::Interface(it) => Some(it),
            TypeExpr::Param(_) => None,
        }
    }

    /// Whether `self` and `other` are the same shared node, not merely equal.
    pub fn ptr_eq(&self, other: &TypeExpr) -> bool {
        match (self, other) {
            (TypeExpr::Interface(a), TypeExpr::Interface(b)) => Arc::ptr_eq(&a.0, &b.0),
            (TypeExpr::Param(a), TypeExpr::Param(b)) => a == b,
            _ => false,
        }
    }

    pub(crate) fn not_literal(&self) -> TypeError {
        TypeError::NotLiteral {
            expr: self.to_string(),
        }
    }
}

impl InterfaceType {
    fn new(base: &'static TypeInfo, args: Vec<TypeExpr>) -> Self {
        let literal = args.iter().all(TypeExpr::is_literal);
        InterfaceType(Arc::new(InterfaceNode {
            base,
            args,
            literal,
        }))
    }

    pub fn base(&self) -> &'static TypeInfo {
        self.0.base
    }

    pub fn args(&self) -> &[TypeExpr] {
        &self.0.args
    }

    pub fn is_literal(&self) -> bool {
        self.0.literal
    }
}

impl PartialEq for InterfaceType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || (self.0.base == other.0.base && self.0.args == other.0.args)
    }
}

impl Eq for InterfaceType {}

impl Hash for InterfaceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.base.hash(state);
        self.0.args.hash(state);
    }
}

impl TypeParam {
    pub fn owner(self) -> &'static TypeInfo {
        self.owner
    }

    pub fn index(self) -> usize {
        self.index
    }

    /// Declared name of the slot (`E` for `List.E`).
    pub fn name(self) -> &'static str {
        self.owner.type_params().get(self.index).copied().unwrap_or("?")
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Interface(it) => fmt::Display::fmt(it, f),
            TypeExpr::Param(p) => fmt::Display::fmt(p, f),
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base().name())?;
        if let Some((first, rest)) = self.args().split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeExpr({self})")
    }
}

impl fmt::Debug for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InterfaceType({self})")
    }
}

impl fmt::Debug for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeParam({}.{})", self.owner.name(), self.name())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
