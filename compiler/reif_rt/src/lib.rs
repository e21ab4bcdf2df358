//! Object model runtime for generated code.
//!
//! Generated code for every source class is expressed through this crate:
//!
//! - **Identity**: `hash_of`, `equal`, `string_of` treat null as a value
//! - **Construction**: allocate, then initialize, only through a factory
//! - **Capabilities**: one trait per class, checked against declared surfaces
//! - **Lists**: `List<E>` tagged with its element type at run time
//!
//! # Shape of a generated class
//!
//! ```text
//! pub trait VariableApi: Object { fn value(&self) -> i64; fn set_value(&self, v: i64) -> i64; }
//!
//! pub struct Variable { header: ObjectHeader, value: Field<i64> }
//! reif_rt::object_impl!(Variable);
//!
//! impl Class for Variable {
//!     fn type_info() -> &'static TypeInfo { &VARIABLE }
//!     fn allocate(header: ObjectHeader) -> Self { Variable { header, value: Field::default() } }
//! }
//!
//! impl Variable {
//!     pub fn new(ty: &TypeExpr, value: i64) -> Result<Rc<dyn VariableApi>, RuntimeError> {
//!         let v = construct::<Variable, _>(ty, |this| Variable::initialize(this, value))?;
//!         Ok(v)
//!     }
//! }
//! ```
//!
//! Values are single-threaded (`Rc` + interior mutability). Type
//! descriptors from `reif_types` are the only shared state.

mod capability;
mod construct;
mod error;
mod field;
pub mod identity;
mod list;
mod object;

pub use capability::{
    CapabilityInterface, CapabilityTable, ClassDecl, FieldDecl, Member, MemberKind, MethodSig,
};
pub use construct::{construct, Class, Lifecycle, ObjectHeader, ObjectId};
pub use error::RuntimeError;
pub use field::Field;
pub use identity::{equal, hash_of, string_of, Null, NULL_HASH};
pub use list::{List, ListRef};
pub use object::{instance_of, AsObject, Object};

pub use reif_types;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber for runtime diagnostics.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=reif_rt=debug,reif_types=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
