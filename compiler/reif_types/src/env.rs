//! Type environments: binding chains that specialize parametric types.
//!
//! Each scope binds the parameter slots of one generic class, by position,
//! to literal types. Scopes link outward to their parent and the chain ends
//! at the single global empty environment, [`TypeEnvironment::ROOT`].
//!
//! # Performance
//!
//! Scopes are immutable and shared through `Arc`, so extending an
//! environment is O(1) and never copies the parent chain. Evaluating a
//! literal expression is a pointer copy.

use std::fmt;
use std::sync::Arc;

use crate::stack::ensure_sufficient_stack;
use crate::{InterfaceType, TypeError, TypeExpr, TypeInfo, TypeParam};

struct Scope {
    owner: &'static TypeInfo,
    bindings: Vec<TypeExpr>,
    parent: TypeEnvironment,
}

/// Persistent chain of parameter bindings.
///
/// Every instance is tagged with exactly one environment at allocation time
/// and keeps it for life; generated code evaluates its per-class parametric
/// constants against it.
#[derive(Clone)]
pub struct TypeEnvironment(Option<Arc<Scope>>);

impl TypeEnvironment {
    /// The global empty environment.
    pub const ROOT: TypeEnvironment = TypeEnvironment(None);

    pub fn is_root(&self) -> bool {
        self.0.is_none()
    }

    /// Number of scopes between here and the root.
    pub fn depth(&self) -> usize {
        self.scopes().count()
    }

    /// Enclosing environment, `None` at the root.
    pub fn parent(&self) -> Option<&TypeEnvironment> {
        self.0.as_ref().map(|scope| &scope.parent)
    }

    /// Classes bound by each scope, innermost first.
    pub fn owners(&self) -> impl Iterator<Item = &'static TypeInfo> + '_ {
        self.scopes().map(|scope| scope.owner)
    }

    /// Push a scope binding `owner`'s parameters to `args`.
    ///
    /// Bindings must be literal and match the declared arity.
    #[must_use = "bind returns a new environment and leaves `self` unchanged"]
    pub fn bind(&self, owner: &'static TypeInfo, args: Vec<TypeExpr>) -> Result<Self, TypeError> {
        if args.len() != owner.arity() {
            return Err(TypeError::ArityMismatch {
                class: owner.name(),
                expected: owner.arity(),
                found: args.len(),
            });
        }
        if let Some(arg) = args.iter().find(|arg| !arg.is_literal()) {
            return Err(TypeError::NonLiteralBinding {
                class: owner.name(),
                expr: arg.to_string(),
            });
        }
        Ok(TypeEnvironment(Some(Arc::new(Scope {
            owner,
            bindings: args,
            parent: self.clone(),
        }))))
    }

    /// Binding for `param`, searching outward through enclosing scopes.
    pub fn lookup(&self, param: TypeParam) -> Option<&TypeExpr> {
        self.scopes()
            .find(|scope| std::ptr::eq(scope.owner, param.owner()))
            .and_then(|scope| scope.bindings.get(param.index()))
    }

    /// Specialize `expr` into a literal type.
    ///
    /// Literal input comes back unchanged (the same shared node). Parametric
    /// subtrees have every slot substituted from this chain; the result is
    /// always an interface expression. A slot bound nowhere in the chain
    /// means the environment was captured at the wrong scope, which is a
    /// defect in the emitted code, and fails with `UnboundTypeParameter`.
    pub fn evaluate(&self, expr: &TypeExpr) -> Result<TypeExpr, TypeError> {
        if expr.is_literal() {
            return Ok(expr.clone());
        }
        let result = self.substitute(expr);
        if let Err(err) = &result {
            tracing::error!(%err, %expr, env = %self, "type evaluation failed");
        }
        result
    }

    fn substitute(&self, expr: &TypeExpr) -> Result<TypeExpr, TypeError> {
        ensure_sufficient_stack(|| match expr {
            TypeExpr::Interface(it) if it.is_literal() => Ok(expr.clone()),
            TypeExpr::Interface(it) => {
                let args = it
                    .args()
                    .iter()
                    .map(|arg| self.substitute(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TypeExpr::from_parts(it.base(), args))
            }
            TypeExpr::Param(param) => {
                self.lookup(*param)
                    .cloned()
                    .ok_or_else(|| TypeError::UnboundTypeParameter {
                        owner: param.owner().name(),
                        param: param.name().to_string(),
                    })
            }
        })
    }

    /// Fully evaluated environment for an instance of literal type `ty`.
    ///
    /// Binds the class's own parameters to `ty`'s arguments, then walks the
    /// superclass chain, evaluating each superclass expression against what
    /// is bound so far and binding that ancestor's parameters. Classes
    /// without parameters add no scope.
    #[tracing::instrument(level = "trace", skip_all, fields(ty = %ty))]
    pub fn for_type(ty: &TypeExpr) -> Result<Self, TypeError> {
        let current = literal_interface(ty)?;
        let mut env = TypeEnvironment::ROOT;
        let mut current = Some(current.clone());
        while let Some(it) = current {
            if it.base().arity() > 0 {
                env = env.bind(it.base(), it.args().to_vec())?;
            }
            current = direct_supertype(&it)?;
        }
        Ok(env)
    }

    fn scopes(&self) -> impl Iterator<Item = &Scope> + '_ {
        std::iter::successors(self.0.as_deref(), |scope| scope.parent.0.as_deref())
    }
}

/// The literal interface node of `ty`, or `NotLiteral`.
pub(crate) fn literal_interface(ty: &TypeExpr) -> Result<&InterfaceType, TypeError> {
    match ty {
        TypeExpr::Interface(it) if it.is_literal() => Ok(it),
        _ => Err(ty.not_literal()),
    }
}

/// Superclass of literal `it`, instantiated with `it`'s arguments.
///
/// `None` at the root. Fails if the class's static initialization has not
/// linked a superclass yet.
pub(crate) fn direct_supertype(it: &InterfaceType) -> Result<Option<InterfaceType>, TypeError> {
    let info = it.base();
    if info.is_root() {
        return Ok(None);
    }
    let superclass = info
        .superclass()
        .ok_or(TypeError::UnlinkedSuperclass { class: info.name() })?;
    let scope = if info.arity() > 0 {
        TypeEnvironment::ROOT.bind(info, it.args().to_vec())?
    } else {
        TypeEnvironment::ROOT
    };
    let evaluated = scope.evaluate(superclass)?;
    let parent = literal_interface(&evaluated)?.clone();
    Ok(Some(parent))
}

impl Default for TypeEnvironment {
    fn default() -> Self {
        TypeEnvironment::ROOT
    }
}

impl fmt::Display for TypeEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, scope) in self.scopes().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            for (slot, binding) in scope.bindings.iter().enumerate() {
                if slot > 0 {
                    f.write_str(", ")?;
                }
                let name = scope.owner.type_params().get(slot).copied().unwrap_or("?");
                write!(f, "{}.{name} = {binding}", scope.owner.name())?;
            }
        }
        f.write_str("}")
    }
}

impl fmt::Debug for TypeEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeEnvironment{self}")
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
