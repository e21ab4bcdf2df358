//! Per-class type descriptors.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::{TypeError, TypeExpr};

/// Identity record for one compiled class.
///
/// Built by a `const fn` so it can live in a `static`; the superclass is
/// linked in a separate write-once step. Two descriptors are the same class
/// iff they are the same `static` (address identity), so `PartialEq` and
/// `Hash` never look at the contents.
pub struct TypeInfo {
    name: &'static str,
    /// Name of the paired capability interface. Built-ins have none.
    capability: Option<&'static str>,
    type_params: &'static [&'static str],
    is_abstract: bool,
    is_root: bool,
    superclass: OnceLock<TypeExpr>,
}

impl TypeInfo {
    /// Descriptor for a concrete class paired with `capability`.
    pub const fn new(
        name: &'static str,
        capability: &'static str,
        type_params: &'static [&'static str],
    ) -> Self {
        Self::build(name, Some(capability), type_params, false, false)
    }

    /// Descriptor for an abstract class: it has an interface and shared
    /// initializer logic, but no factory.
    pub const fn new_abstract(
        name: &'static str,
        capability: &'static str,
        type_params: &'static [&'static str],
    ) -> Self {
        Self::build(name, Some(capability), type_params, true, false)
    }

    /// The universal root type. Never linked.
    pub(crate) const fn root(name: &'static str) -> Self {
        Self::build(name, None, &[], false, true)
    }

    /// A built-in type with no capability interface of its own.
    pub(crate) const fn builtin(name: &'static str, type_params: &'static [&'static str]) -> Self {
        Self::build(name, None, type_params, false, false)
    }

    const fn build(
        name: &'static str,
        capability: Option<&'static str>,
        type_params: &'static [&'static str],
        is_abstract: bool,
        is_root: bool,
    ) -> Self {
        TypeInfo {
            name,
            capability,
            type_params,
            is_abstract,
            is_root,
            superclass: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capability(&self) -> Option<&'static str> {
        self.capability
    }

    /// Declared type parameter names, in slot order.
    pub fn type_params(&self) -> &'static [&'static str] {
        self.type_params
    }

    /// Declared type parameter count.
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// The superclass expression, or `None` for the root and for classes
    /// whose static initialization has not linked one yet.
    pub fn superclass(&self) -> Option<&TypeExpr> {
        self.superclass.get()
    }

    /// Whether the supertype chain is usable from this class upward.
    pub fn is_linked(&self) -> bool {
        self.is_root || self.superclass.get().is_some()
    }

    /// Write the superclass link. Second step of static initialization.
    ///
    /// `superclass` may reference this class's own type parameters
    /// (`class B<T> extends A<List<T>>`); they are resolved per instance.
    pub fn link_superclass(&'static self, superclass: TypeExpr) -> Result<(), TypeError> {
        if self.is_root {
            return Err(TypeError::RootSuperclass { class: self.name });
        }
        let Some(parent) = superclass.base() else {
            return Err(TypeError::NotLiteral {
                expr: superclass.to_string(),
            });
        };
        if std::ptr::eq(parent, self) || parent.is_subclass_of(self) {
            return Err(TypeError::CyclicInheritance {
                class: self.name,
                superclass: parent.name,
            });
        }
        self.superclass
            .set(superclass)
            .map_err(|_| TypeError::SuperclassAlreadyLinked { class: self.name })?;
        tracing::trace!(class = self.name, superclass = parent.name, "superclass linked");
        Ok(())
    }

    /// Class-level subtype test: walks the linked superclass chain.
    ///
    /// Reflexive. Stops at the first unlinked ancestor.
    pub fn is_subclass_of(&self, other: &TypeInfo) -> bool {
        let mut current = self;
        loop {
            if std::ptr::eq(current, other) {
                return true;
            }
            match current.superclass().and_then(TypeExpr::base) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self, state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("capability", &self.capability)
            .field("type_params", &self.type_params)
            .field("is_abstract", &self.is_abstract)
            .field("superclass", &self.superclass.get().map(ToString::to_string))
            .finish()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
