//! Built-in types every program sees: the root, `dynamic`, the primitive
//! value types and the reified `List<E>`.
//!
//! The descriptors are plain `static`s; their superclass links are written
//! once, the first time any accessor here (or a [`TypeRegistry`]) is used.
//!
//! [`TypeRegistry`]: crate::TypeRegistry

use std::sync::Once;

use crate::{TypeExpr, TypeInfo};

pub(crate) static OBJECT: TypeInfo = TypeInfo::root("Object");
pub(crate) static DYNAMIC: TypeInfo = TypeInfo::builtin("dynamic", &[]);
static NULL: TypeInfo = TypeInfo::builtin("Null", &[]);
static INT: TypeInfo = TypeInfo::builtin("int", &[]);
static DOUBLE: TypeInfo = TypeInfo::builtin("double", &[]);
static BOOL: TypeInfo = TypeInfo::builtin("bool", &[]);
static STRING: TypeInfo = TypeInfo::builtin("String", &[]);
static LIST: TypeInfo = TypeInfo::builtin("List", &["E"]);

static LINK: Once = Once::new();

/// Link every built-in below `Object`. Idempotent.
pub(crate) fn ensure_linked() {
    LINK.call_once(|| {
        for info in [&DYNAMIC, &NULL, &INT, &DOUBLE, &BOOL, &STRING, &LIST] {
            if let Err(err) = info.link_superclass(TypeExpr::class(&OBJECT)) {
                tracing::error!(%err, "failed to link built-in type");
            }
        }
    });
}

/// Every built-in descriptor, root first.
pub(crate) fn all() -> [&'static TypeInfo; 8] {
    ensure_linked();
    [&OBJECT, &DYNAMIC, &NULL, &INT, &DOUBLE, &BOOL, &STRING, &LIST]
}

/// The universal root type.
pub fn object() -> &'static TypeInfo {
    ensure_linked();
    &OBJECT
}

/// Unknown type: compatible with everything in both directions.
pub fn dynamic() -> &'static TypeInfo {
    ensure_linked();
    &DYNAMIC
}

/// Type of the `null` value.
pub fn null() -> &'static TypeInfo {
    ensure_linked();
    &NULL
}

pub fn int() -> &'static TypeInfo {
    ensure_linked();
    &INT
}

pub fn double() -> &'static TypeInfo {
    ensure_linked();
    &DOUBLE
}

pub fn bool() -> &'static TypeInfo {
    ensure_linked();
    &BOOL
}

pub fn string() -> &'static TypeInfo {
    ensure_linked();
    &STRING
}

/// The reified list class, one parameter `E`.
pub fn list() -> &'static TypeInfo {
    ensure_linked();
    &LIST
}

/// `List<element>`.
pub fn list_of(element: TypeExpr) -> TypeExpr {
    TypeExpr::from_parts(list(), vec![element])
}
