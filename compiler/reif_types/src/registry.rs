//! Process-wide class registry.
//!
//! One entry per compiled class, written once during that class's static
//! initialization and read-only afterwards. Lookups go by class name or by
//! capability interface name; the second index is what enforces the
//! one-implementation-per-interface pairing.
//!
//! # Design
//!
//! - Entries are `&'static TypeInfo`, so readers never copy descriptors
//! - `parking_lot::RwLock` guards; after start-up every access is a read
//! - Registering the same `static` twice is a no-op

use std::sync::LazyLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::builtin;
use crate::{TypeError, TypeExpr, TypeInfo};

static GLOBAL: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::new);

/// Class table keyed by name and by capability interface.
#[derive(Debug)]
pub struct TypeRegistry {
    classes: RwLock<Index>,
    capabilities: RwLock<Index>,
}

impl TypeRegistry {
    /// A registry holding only the built-in types.
    pub fn new() -> Self {
        let classes = builtin::all()
            .into_iter()
            .map(|info| (info.name(), info))
            .collect();
        TypeRegistry {
            classes: RwLock::new(classes),
            capabilities: RwLock::new(FxHashMap::default()),
        }
    }

    /// The registry generated code populates.
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL
    }

    /// Static-init step for one class: link its superclass, then register.
    ///
    /// Name and capability are checked before the link is written, so a
    /// rejected class stays unlinked and can still be declared elsewhere.
    pub fn declare(&self, info: &'static TypeInfo, superclass: TypeExpr) -> Result<(), TypeError> {
        let mut classes = self.classes.write();
        let mut capabilities = self.capabilities.write();
        let registered = check_vacant(&classes, &capabilities, info)?;
        info.link_superclass(superclass)?;
        if !registered {
            insert(&mut classes, &mut capabilities, info);
        }
        Ok(())
    }

    /// Record `info` under its name and capability interface.
    pub fn register(&self, info: &'static TypeInfo) -> Result<(), TypeError> {
        let mut classes = self.classes.write();
        let mut capabilities = self.capabilities.write();
        if !check_vacant(&classes, &capabilities, info)? {
            insert(&mut classes, &mut capabilities, info);
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&'static TypeInfo> {
        self.classes.read().get(name).copied()
    }

    /// The single class implementing `capability`.
    pub fn implementor(&self, capability: &str) -> Option<&'static TypeInfo> {
        self.capabilities.read().get(capability).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    /// Registered class names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.classes.read().keys().copied().collect();
        names.sort_unstable();
        names
    }
}

type Index = FxHashMap<&'static str, &'static TypeInfo>;

/// `Ok(true)` if this very descriptor is already registered, `Ok(false)` if
/// both its name and capability are free.
fn check_vacant(
    classes: &Index,
    capabilities: &Index,
    info: &'static TypeInfo,
) -> Result<bool, TypeError> {
    if let Some(existing) = classes.get(info.name()) {
        if std::ptr::eq(*existing, info) {
            return Ok(true);
        }
        return Err(TypeError::DuplicateClass { name: info.name() });
    }
    if let Some(capability) = info.capability() {
        if let Some(existing) = capabilities.get(capability) {
            return Err(TypeError::DuplicateCapability {
                capability,
                existing: existing.name(),
                class: info.name(),
            });
        }
    }
    Ok(false)
}

fn insert(classes: &mut Index, capabilities: &mut Index, info: &'static TypeInfo) {
    if let Some(capability) = info.capability() {
        capabilities.insert(capability, info);
    }
    classes.insert(info.name(), info);
    tracing::debug!(
        class = info.name(),
        capability = info.capability().unwrap_or("-"),
        arity = info.arity(),
        "class registered"
    );
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
