//! The root object protocol.

use std::any::Any;
use std::hash::Hasher;
use std::rc::Rc;

use reif_types::{builtin, TypeExpr};
use rustc_hash::FxHasher;

use crate::{ObjectHeader, RuntimeError};

/// Behaviour every value visible to generated code has.
///
/// Capability traits extend this. Class instances get identity semantics by
/// default (equal only to themselves, hashed by object id); classes that
/// override equality in the source language override `equals` and
/// `hash_code` here. Use [`object_impl!`](crate::object_impl) for the
/// default implementation.
pub trait Object: Any {
    fn as_object(&self) -> &dyn Object;

    fn as_any(&self) -> &dyn Any;

    /// Reified type this value was created with.
    fn runtime_type(&self) -> TypeExpr;

    /// Instance header. `None` for primitive values.
    fn header(&self) -> Option<&ObjectHeader> {
        None
    }

    fn equals(&self, other: &dyn Object) -> bool {
        same_instance(self.as_object(), other)
    }

    fn hash_code(&self) -> i64 {
        match self.header() {
            Some(header) => header.id().hash_code(),
            None => address_hash(self.as_object()),
        }
    }

    /// Textual form, as the source language's `toString`.
    fn to_text(&self) -> String {
        format!("Instance of '{}'", self.runtime_type())
    }
}

/// Identity comparison: same header id, or the same allocation.
pub(crate) fn same_instance(a: &dyn Object, b: &dyn Object) -> bool {
    match (a.header(), b.header()) {
        (Some(x), Some(y)) => x.id() == y.id(),
        _ => std::ptr::addr_eq(a as *const dyn Object, b as *const dyn Object),
    }
}

#[allow(
    clippy::cast_possible_wrap,
    reason = "hash codes are bit patterns; wrapping is intended"
)]
fn address_hash(value: &dyn Object) -> i64 {
    (value as *const dyn Object).cast::<()>() as usize as i64
}

/// Nullable view of a value as an [`Object`].
///
/// `None` stands for the source language's `null`.
pub trait AsObject {
    fn as_object(&self) -> Option<&dyn Object>;
}

impl AsObject for dyn Object {
    fn as_object(&self) -> Option<&dyn Object> {
        Some(self)
    }
}

impl<T: AsObject> AsObject for Option<T> {
    fn as_object(&self) -> Option<&dyn Object> {
        self.as_ref().and_then(AsObject::as_object)
    }
}

impl<T: Object + ?Sized> AsObject for Rc<T> {
    fn as_object(&self) -> Option<&dyn Object> {
        Some(Object::as_object(&**self))
    }
}

/// Reified `is` test: whether `value`'s runtime type is a subtype of `ty`.
///
/// Null is an instance of nothing but `Null`, `Object` and `dynamic`, the
/// same as the `Null` type's subtype relation.
pub fn instance_of<T: AsObject + ?Sized>(value: &T, ty: &TypeExpr) -> Result<bool, RuntimeError> {
    let runtime_type = match value.as_object() {
        Some(object) => object.runtime_type(),
        None => {
            let null_ok = ty.base().is_some_and(|base| {
                base.is_root() || base == builtin::null() || base == builtin::dynamic()
            });
            return Ok(null_ok);
        }
    };
    Ok(runtime_type.is_subtype_of(ty)?)
}

macro_rules! primitive_object {
    ($ty:ty, $info:path, |$self_:ident| $hash:expr, |$text_self:ident| $text:expr) => {
        impl Object for $ty {
            fn as_object(&self) -> &dyn Object {
                self
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn runtime_type(&self) -> TypeExpr {
                TypeExpr::class($info())
            }

            fn equals(&self, other: &dyn Object) -> bool {
                other.as_any().downcast_ref::<$ty>() == Some(self)
            }

            fn hash_code(&self) -> i64 {
                let $self_ = self;
                $hash
            }

            fn to_text(&self) -> String {
                let $text_self = self;
                $text
            }
        }

        impl AsObject for $ty {
            fn as_object(&self) -> Option<&dyn Object> {
                Some(self)
            }
        }
    };
}

primitive_object!(i64, builtin::int, |v| *v, |v| v.to_string());
primitive_object!(
    bool,
    builtin::bool,
    |v| if *v { 1231 } else { 1237 },
    |v| v.to_string()
);
primitive_object!(
    f64,
    builtin::double,
    |v| double_hash(*v),
    |v| format_double(*v)
);
primitive_object!(String, builtin::string, |v| string_hash(v), |v| v.clone());

/// `0.0 == -0.0`, so both zeros hash as `0.0`.
fn double_hash(value: f64) -> i64 {
    let value = if value == 0.0 { 0.0 } else { value };
    i64::from_ne_bytes(value.to_bits().to_ne_bytes())
}

/// Doubles always show a fractional part: `1.0`, not `1`.
fn format_double(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn string_hash(value: &str) -> i64 {
    let mut hasher = FxHasher::default();
    hasher.write(value.as_bytes());
    i64::from_ne_bytes(hasher.finish().to_ne_bytes())
}

/// Implement [`Object`] for a class struct with a `header: ObjectHeader`
/// field, using identity equality.
#[macro_export]
macro_rules! object_impl {
    ($ty:ty) => {
        impl $crate::Object for $ty {
            fn as_object(&self) -> &dyn $crate::Object {
                self
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn runtime_type(&self) -> $crate::reif_types::TypeExpr {
                self.header.runtime_type().clone()
            }

            fn header(&self) -> ::std::option::Option<&$crate::ObjectHeader> {
                ::std::option::Option::Some(&self.header)
            }
        }
    };
}
