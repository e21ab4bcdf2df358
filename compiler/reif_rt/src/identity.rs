//! Null-tolerant hashing, equality and text.
//!
//! Generated code calls these instead of the [`Object`](crate::Object)
//! methods whenever either operand may be null.

use crate::{AsObject, Object};

/// Hash code of `null`. Fixed for the life of the process.
pub const NULL_HASH: i64 = 2011;

/// The `null` literal, as a value generated code can pass around.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Null;

impl AsObject for Null {
    fn as_object(&self) -> Option<&dyn Object> {
        None
    }
}

pub fn hash_of<T: AsObject + ?Sized>(value: &T) -> i64 {
    value.as_object().map_or(NULL_HASH, Object::hash_code)
}

/// Both null, or both non-null and `a.equals(b)`.
pub fn equal<A, B>(a: &A, b: &B) -> bool
where
    A: AsObject + ?Sized,
    B: AsObject + ?Sized,
{
    match (a.as_object(), b.as_object()) {
        (None, None) => true,
        (Some(a), Some(b)) => a.equals(b),
        _ => false,
    }
}

pub fn string_of<T: AsObject + ?Sized>(value: &T) -> String {
    value
        .as_object()
        .map_or_else(|| "null".to_string(), Object::to_text)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
