//! Declared instance fields.

use std::cell::RefCell;
use std::fmt;

/// One mutable field slot of a class instance.
///
/// Instances are shared through `Rc`, so fields are interior-mutable. The
/// generated getter is [`Field::get`] and the generated setter is
/// [`Field::set`].
#[derive(Default)]
pub struct Field<T>(RefCell<T>);

impl<T> Field<T> {
    pub fn new(value: T) -> Self {
        Field(RefCell::new(value))
    }

    /// Assign and return the assigned value, the value of an assignment
    /// expression.
    pub fn set(&self, value: T) -> T
    where
        T: Clone,
    {
        *self.0.borrow_mut() = value.clone();
        value
    }

    /// Assign and return the previous value.
    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not write this same field.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }
}

impl<T: Clone> Field<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T: fmt::Debug> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(value) => value.fmt(f),
            Err(_) => f.write_str("<borrowed>"),
        }
    }
}
