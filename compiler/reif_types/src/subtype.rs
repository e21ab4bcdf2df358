//! Reified subtype tests over literal types.
//!
//! Rules, for literal `S` and `T`:
//! - `dynamic` is compatible with everything, in both directions
//! - `Null` is a subtype of everything
//! - otherwise `S <: T` iff `S`'s superclass chain reaches `T`'s class and
//!   the arguments at that point are pairwise subtypes (covariant generics)

use crate::builtin;
use crate::env::{direct_supertype, literal_interface};
use crate::stack::ensure_sufficient_stack;
use crate::{TypeError, TypeExpr, TypeInfo};

impl TypeExpr {
    /// Instantiation of ancestor class `target` as seen from literal `self`.
    ///
    /// For `class B<T> extends A<List<T>>`, upcasting `B<int>` to `A` gives
    /// `A<List<int>>`. `None` if `target` is not an ancestor.
    pub fn upcast(&self, target: &'static TypeInfo) -> Result<Option<TypeExpr>, TypeError> {
        let mut current = Some(literal_interface(self)?.clone());
        while let Some(it) = current {
            if std::ptr::eq(it.base(), target) {
                return Ok(Some(TypeExpr::Interface(it)));
            }
            current = direct_supertype(&it)?;
        }
        Ok(None)
    }

    /// Whether a value of literal type `self` may be used where literal type
    /// `other` is expected.
    pub fn is_subtype_of(&self, other: &TypeExpr) -> Result<bool, TypeError> {
        ensure_sufficient_stack(|| {
            let sub = literal_interface(self)?;
            let sup = literal_interface(other)?;
            let dynamic = builtin::dynamic();
            if std::ptr::eq(sub.base(), dynamic)
                || std::ptr::eq(sup.base(), dynamic)
                || std::ptr::eq(sub.base(), builtin::null())
                || sup.base().is_root()
            {
                return Ok(true);
            }
            let Some(view) = self.upcast(sup.base())? else {
                return Ok(false);
            };
            for (left, right) in view.args().iter().zip(sup.args()) {
                if !left.is_subtype_of(right)? {
                    return Ok(false);
                }
            }
            Ok(true)
        })
    }
}
