//! Two-phase construction.
//!
//! ```text
//! Unallocated --allocate--> Allocated --initialize--> Initialized
//!                                 |
//!                                 +--initializer error--> Failed
//! ```
//!
//! **Allocate** creates the instance with its reified type and fully
//! evaluated environment, every field at its default. **Initialize** runs
//! the class's initializer: own fields in declaration order, then the
//! superclass initializer with arguments computed from the constructor's
//! parameters, then any constructor body. Only [`construct`] drives the two
//! phases. An initializer that fails leaves its instance `Failed`, so even a
//! reference it leaked can never be initialized or finished later.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use reif_types::{TypeEnvironment, TypeExpr, TypeInfo};

use crate::error::defect;
use crate::{Object, RuntimeError};

/// Position of an instance in the construction protocol.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Unallocated,
    /// Fields at defaults; initializers are running.
    Allocated,
    /// Terminal.
    Initialized,
    /// An initializer returned an error. Terminal.
    Failed,
}

/// Process-unique instance identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl ObjectId {
    fn fresh() -> Self {
        ObjectId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    /// Identity hash derived from the id.
    pub fn hash_code(self) -> i64 {
        i64::from_ne_bytes(self.0.to_ne_bytes())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-instance runtime state every class struct carries.
///
/// The reified type and environment are fixed at allocation and never
/// change afterwards.
pub struct ObjectHeader {
    id: ObjectId,
    ty: TypeExpr,
    env: TypeEnvironment,
    state: Cell<Lifecycle>,
}

impl ObjectHeader {
    pub(crate) fn new(ty: TypeExpr, env: TypeEnvironment) -> Self {
        ObjectHeader {
            id: ObjectId::fresh(),
            ty,
            env,
            state: Cell::new(Lifecycle::Unallocated),
        }
    }

    /// Header of `object`, for inherited initializers that only see the
    /// ancestor's capability trait.
    pub fn of<O: Object + ?Sized>(object: &O) -> Result<&ObjectHeader, RuntimeError> {
        object.header().ok_or_else(|| {
            let class = object.runtime_type().base().map_or("?", TypeInfo::name);
            defect(RuntimeError::MissingHeader { class })
        })
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn runtime_type(&self) -> &TypeExpr {
        &self.ty
    }

    pub fn env(&self) -> &TypeEnvironment {
        &self.env
    }

    pub fn state(&self) -> Lifecycle {
        self.state.get()
    }

    fn class_name(&self) -> &'static str {
        self.ty.base().map_or("?", TypeInfo::name)
    }

    /// Evaluate one of the class's parametric constants for this instance.
    pub fn evaluate(&self, expr: &TypeExpr) -> Result<TypeExpr, RuntimeError> {
        Ok(self.env.evaluate(expr)?)
    }

    /// Guard at the top of every initializer, including inherited ones.
    ///
    /// Passes while the instance is being constructed; fails once
    /// construction has finished or failed, so initializers cannot be
    /// re-run.
    pub fn begin_initialize(&self) -> Result<(), RuntimeError> {
        match self.state.get() {
            Lifecycle::Allocated => Ok(()),
            Lifecycle::Initialized => Err(defect(RuntimeError::AlreadyInitialized {
                class: self.class_name(),
            })),
            from @ (Lifecycle::Unallocated | Lifecycle::Failed) => {
                Err(defect(RuntimeError::IllegalTransition {
                    class: self.class_name(),
                    from,
                    to: Lifecycle::Initialized,
                }))
            }
        }
    }

    pub(crate) fn advance(&self, to: Lifecycle) -> Result<(), RuntimeError> {
        let from = self.state.get();
        let legal = matches!(
            (from, to),
            (Lifecycle::Unallocated, Lifecycle::Allocated)
                | (Lifecycle::Allocated, Lifecycle::Initialized | Lifecycle::Failed)
        );
        if !legal {
            return Err(defect(RuntimeError::IllegalTransition {
                class: self.class_name(),
                from,
                to,
            }));
        }
        self.state.set(to);
        Ok(())
    }
}

impl fmt::Debug for ObjectHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHeader")
            .field("id", &self.id)
            .field("ty", &self.ty)
            .field("env", &self.env)
            .field("state", &self.state.get())
            .finish()
    }
}

/// A compiled class that can be allocated.
///
/// Abstract classes may implement this too (their descriptor says they are
/// abstract); [`construct`] refuses them.
pub trait Class: Object + Sized {
    fn type_info() -> &'static TypeInfo;

    /// Phase 1: every declared field at its default. Must not run any
    /// initializer logic.
    fn allocate(header: ObjectHeader) -> Self;
}

/// The static factory protocol: allocate, initialize, return.
///
/// `ty` must be the literal instantiation of `T` being created (generated
/// code evaluates it against the caller's environment first). `init` is the
/// class's initializer chain. The returned `Rc<T>` coerces to the class's
/// capability trait object.
#[tracing::instrument(level = "trace", skip_all, fields(ty = %ty))]
pub fn construct<T, F>(ty: &TypeExpr, init: F) -> Result<Rc<T>, RuntimeError>
where
    T: Class,
    F: FnOnce(&Rc<T>) -> Result<(), RuntimeError>,
{
    let info = T::type_info();
    if info.is_abstract() {
        return Err(defect(RuntimeError::AbstractClass { class: info.name() }));
    }
    if ty.base() != Some(info) {
        return Err(defect(RuntimeError::TypeMismatch {
            expected: info.name(),
            found: ty.to_string(),
        }));
    }
    let env = TypeEnvironment::for_type(ty)?;

    let instance = Rc::new(T::allocate(ObjectHeader::new(ty.clone(), env)));
    let header = instance
        .header()
        .ok_or_else(|| defect(RuntimeError::MissingHeader { class: info.name() }))?;
    header.advance(Lifecycle::Allocated)?;
    if let Err(err) = init(&instance) {
        header.advance(Lifecycle::Failed)?;
        tracing::debug!(id = %header.id(), %err, "initializer failed");
        return Err(err);
    }
    header.advance(Lifecycle::Initialized)?;
    tracing::trace!(id = %header.id(), "instance constructed");
    Ok(instance)
}
