//! `List<E>` with its element type kept at run time.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use reif_types::{builtin, TypeExpr, TypeInfo};

use crate::error::index_out_of_range;
use crate::{
    construct, equal, string_of, AsObject, Class, Object, ObjectHeader, ObjectId, RuntimeError,
};

/// Mutable ordered sequence tagged with a literal element type.
///
/// The element type is fixed by the factory and is also the single argument
/// of the list's runtime type, `List<E>`. Indices are signed so that
/// negative indices from generated code fail like any other out-of-range
/// access.
pub struct List<E> {
    header: ObjectHeader,
    element: TypeExpr,
    items: RefCell<Vec<E>>,
}

/// Lists are reference values, shared like class instances.
pub type ListRef<E> = Rc<List<E>>;

impl<E> List<E>
where
    E: AsObject + Clone + 'static,
{
    /// `new List<elem>(length)`: empty, or `length` default elements.
    pub fn new(element: &TypeExpr, length: Option<usize>) -> Result<ListRef<E>, RuntimeError>
    where
        E: Default,
    {
        let items = length.map_or_else(Vec::new, |n| vec![E::default(); n]);
        Self::from_vec(element, items)
    }

    /// A list literal `<elem>[a, b, c]`.
    pub fn from_vec(element: &TypeExpr, items: Vec<E>) -> Result<ListRef<E>, RuntimeError> {
        let ty = builtin::list_of(element.clone());
        construct::<List<E>, _>(&ty, move |this| {
            this.header.begin_initialize()?;
            *this.items.borrow_mut() = items;
            Ok(())
        })
    }

    pub fn element_type(&self) -> &TypeExpr {
        &self.element
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn position(&self, index: i64) -> Result<usize, RuntimeError> {
        let length = self.len();
        usize::try_from(index)
            .ok()
            .filter(|&i| i < length)
            .ok_or_else(|| index_out_of_range(index, length))
    }

    pub fn get(&self, index: i64) -> Result<E, RuntimeError> {
        let at = self.position(index)?;
        Ok(self.items.borrow()[at].clone())
    }

    /// Replace the element at `index`; returns the stored value.
    pub fn set(&self, index: i64, value: E) -> Result<E, RuntimeError> {
        let at = self.position(index)?;
        self.items.borrow_mut()[at] = value.clone();
        Ok(value)
    }

    pub fn add(&self, value: E) {
        self.items.borrow_mut().push(value);
    }

    /// Remove the first element equal to `value`. `false` if none matched.
    pub fn remove<V: AsObject + ?Sized>(&self, value: &V) -> bool {
        match self.find(value, 0) {
            Some(at) => {
                self.items.borrow_mut().remove(at);
                true
            }
            None => false,
        }
    }

    /// Remove and return the element at `index`, shifting later elements down.
    pub fn remove_at(&self, index: i64) -> Result<E, RuntimeError> {
        let at = self.position(index)?;
        Ok(self.items.borrow_mut().remove(at))
    }

    /// Position of the first element equal to `value`, or -1.
    pub fn index_of<V: AsObject + ?Sized>(&self, value: &V) -> i64 {
        self.index_of_from(value, 0)
    }

    /// As [`List::index_of`], starting at `start`. A negative start searches
    /// from the beginning.
    pub fn index_of_from<V: AsObject + ?Sized>(&self, value: &V, start: i64) -> i64 {
        let start = usize::try_from(start).unwrap_or(0);
        self.find(value, start)
            .and_then(|at| i64::try_from(at).ok())
            .unwrap_or(-1)
    }

    pub fn contains<V: AsObject + ?Sized>(&self, value: &V) -> bool {
        self.find(value, 0).is_some()
    }

    fn find<V: AsObject + ?Sized>(&self, value: &V, start: usize) -> Option<usize> {
        let items = self.items.borrow();
        items
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, item)| equal(*item, value))
            .map(|(at, _)| at)
    }

    /// Grow with default elements or truncate.
    pub fn set_len(&self, length: usize)
    where
        E: Default,
    {
        self.items.borrow_mut().resize(length, E::default());
    }

    pub fn clear(&self) {
        self.items.borrow_mut().clear();
    }

    /// Snapshot of the current elements.
    pub fn to_vec(&self) -> Vec<E> {
        self.items.borrow().clone()
    }
}

impl<E> Class for List<E>
where
    E: AsObject + Clone + 'static,
{
    fn type_info() -> &'static TypeInfo {
        builtin::list()
    }

    fn allocate(header: ObjectHeader) -> Self {
        let element = header
            .runtime_type()
            .args()
            .first()
            .cloned()
            .unwrap_or_else(|| TypeExpr::class(builtin::dynamic()));
        List {
            header,
            element,
            items: RefCell::new(Vec::new()),
        }
    }
}

impl<E> Object for List<E>
where
    E: AsObject + Clone + 'static,
{
    fn as_object(&self) -> &dyn Object {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn runtime_type(&self) -> TypeExpr {
        self.header.runtime_type().clone()
    }

    fn header(&self) -> Option<&ObjectHeader> {
        Some(&self.header)
    }

    /// `[a, b, c]`; a list already being printed on this thread shows as
    /// `[...]`.
    fn to_text(&self) -> String {
        let Some(_guard) = PrintGuard::enter(self.header.id()) else {
            return "[...]".to_string();
        };
        let items = self.items.borrow();
        let parts: Vec<String> = items.iter().map(string_of).collect();
        format!("[{}]", parts.join(", "))
    }
}

thread_local! {
    static PRINTING: RefCell<Vec<ObjectId>> = const { RefCell::new(Vec::new()) };
}

/// Marks one list as being printed until dropped.
struct PrintGuard;

impl PrintGuard {
    fn enter(id: ObjectId) -> Option<PrintGuard> {
        PRINTING.with(|printing| {
            let mut printing = printing.borrow_mut();
            if printing.contains(&id) {
                return None;
            }
            printing.push(id);
            Some(PrintGuard)
        })
    }
}

impl Drop for PrintGuard {
    fn drop(&mut self) {
        PRINTING.with(|printing| {
            printing.borrow_mut().pop();
        });
    }
}

impl<E> fmt::Debug for List<E>
where
    E: AsObject + Clone + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.header.runtime_type(), self.to_text())
    }
}
