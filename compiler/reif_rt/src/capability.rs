//! Capability interfaces: the complete public surface of each class.
//!
//! Generated code renders every class's surface as a trait
//! (`trait VariableApi: Object`) implemented by exactly one struct, with
//! subclass traits extending their parent's. This module keeps the metadata
//! side of that pairing: it derives each surface from the class declaration
//! the emitter hands over and checks the pairing rules, so a malformed
//! surface fails at static initialization instead of at a call site.
//!
//! # Design
//!
//! - Members stored in one `Vec`, with a name index into it
//! - Inherited signatures are rewritten into the subclass's own parameter
//!   space, so `E get(int)` on `Base<E>` reads `List<T> get(int)` on
//!   `Derived<T> extends Base<List<T>>`
//! - One getter (`x`) and one setter (`set_x`) per field, inherited ones
//!   included

use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use reif_types::{builtin, ensure_sufficient_stack, TypeExpr, TypeInfo, TypeRegistry};
use rustc_hash::FxHashMap;

use crate::error::defect;
use crate::RuntimeError;

/// One declared field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    /// May reference the class's own type parameters.
    pub ty: TypeExpr,
}

impl FieldDecl {
    pub fn new(name: &'static str, ty: TypeExpr) -> Self {
        FieldDecl { name, ty }
    }
}

/// One declared method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSig {
    pub name: &'static str,
    pub params: Vec<TypeExpr>,
    pub returns: TypeExpr,
    pub is_abstract: bool,
}

impl MethodSig {
    pub fn new(name: &'static str, params: Vec<TypeExpr>, returns: TypeExpr) -> Self {
        MethodSig {
            name,
            params,
            returns,
            is_abstract: false,
        }
    }

    /// A method with no body, to be supplied by a concrete subclass.
    pub fn new_abstract(name: &'static str, params: Vec<TypeExpr>, returns: TypeExpr) -> Self {
        MethodSig {
            is_abstract: true,
            ..Self::new(name, params, returns)
        }
    }
}

/// What the emitter knows about one compiled class.
#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub info: &'static TypeInfo,
    /// Superclass expression; may reference `info`'s own type parameters.
    pub superclass: TypeExpr,
    /// Own fields, in declaration order.
    pub fields: Vec<FieldDecl>,
    /// Own methods, overriding or new.
    pub methods: Vec<MethodSig>,
}

impl ClassDecl {
    /// A class extending `Object` directly.
    pub fn new(info: &'static TypeInfo) -> Self {
        ClassDecl {
            info,
            superclass: TypeExpr::class(builtin::object()),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[must_use]
    pub fn extends(mut self, superclass: TypeExpr) -> Self {
        self.superclass = superclass;
        self
    }

    #[must_use]
    pub fn field(mut self, name: &'static str, ty: TypeExpr) -> Self {
        self.fields.push(FieldDecl::new(name, ty));
        self
    }

    #[must_use]
    pub fn method(mut self, sig: MethodSig) -> Self {
        self.methods.push(sig);
        self
    }

    /// The class's static initialization, in write order: link the
    /// superclass, register class and capability in the global registry,
    /// then derive and install the capability surface.
    ///
    /// Runs once per class; the superclass's static initialization must
    /// already have run.
    pub fn static_init(&self) -> Result<Arc<CapabilityInterface>, RuntimeError> {
        TypeRegistry::global().declare(self.info, self.superclass.clone())?;
        CapabilityTable::global().install(self)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Getter,
    Setter,
}

/// One entry of a capability surface, typed in the owning surface's
/// parameter space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub params: Vec<TypeExpr>,
    pub returns: TypeExpr,
    pub is_abstract: bool,
    /// Class whose declaration introduced or last overrode this member.
    pub declared_by: &'static TypeInfo,
}

impl Member {
    fn same_signature(&self, other: &Member) -> bool {
        self.kind == other.kind && self.params == other.params && self.returns == other.returns
    }

    fn rewrite(&self, owner: &'static TypeInfo, args: &[TypeExpr]) -> Result<Member, RuntimeError> {
        Ok(Member {
            params: self
                .params
                .iter()
                .map(|p| rewrite(p, owner, args))
                .collect::<Result<_, _>>()?,
            returns: rewrite(&self.returns, owner, args)?,
            ..self.clone()
        })
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.returns, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

/// Replace `owner`'s parameter slots in `expr` with `args`.
///
/// Unlike environment evaluation the replacements may themselves be
/// parametric, which is what moving a signature into a subclass needs.
fn rewrite(
    expr: &TypeExpr,
    owner: &'static TypeInfo,
    args: &[TypeExpr],
) -> Result<TypeExpr, RuntimeError> {
    ensure_sufficient_stack(|| match expr {
        TypeExpr::Param(param) if std::ptr::eq(param.owner(), owner) => Ok(args
            .get(param.index())
            .cloned()
            .unwrap_or_else(|| TypeExpr::class(builtin::dynamic()))),
        TypeExpr::Param(_) => Ok(expr.clone()),
        TypeExpr::Interface(it) if it.is_literal() => Ok(expr.clone()),
        TypeExpr::Interface(it) => {
            let rewritten = it
                .args()
                .iter()
                .map(|arg| rewrite(arg, owner, args))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeExpr::interface(it.base(), rewritten)?)
        }
    })
}

/// The derived surface of one class.
#[derive(Clone, Debug)]
pub struct CapabilityInterface {
    class: &'static TypeInfo,
    name: &'static str,
    /// Nearest first.
    ancestors: Vec<&'static TypeInfo>,
    members: Vec<Member>,
    by_name: FxHashMap<String, usize>,
}

impl CapabilityInterface {
    /// Derive the surface of `decl`.
    ///
    /// `parent` is the surface of the declared superclass, or `None` when
    /// the superclass is `Object`. The result holds every inherited member
    /// rewritten into this class's parameter space, own methods replacing
    /// inherited ones of the same name, and an accessor pair per own field.
    pub fn derive(
        decl: &ClassDecl,
        parent: Option<&CapabilityInterface>,
    ) -> Result<CapabilityInterface, RuntimeError> {
        let class = decl.info;
        let name = class
            .capability()
            .ok_or_else(|| defect(RuntimeError::MissingCapability { class: class.name() }))?;
        let super_info = decl.superclass.base().unwrap_or_else(builtin::object);

        let mut surface = CapabilityInterface {
            class,
            name,
            ancestors: Vec::new(),
            members: Vec::new(),
            by_name: FxHashMap::default(),
        };

        match parent {
            Some(parent) if std::ptr::eq(parent.class, super_info) => {
                surface.ancestors.push(parent.class);
                surface.ancestors.extend(parent.ancestors.iter().copied());
                for member in &parent.members {
                    let inherited = member.rewrite(parent.class, decl.superclass.args())?;
                    surface.push(inherited);
                }
            }
            None if super_info.is_root() => {}
            other => {
                return Err(defect(RuntimeError::ParentMismatch {
                    class: class.name(),
                    expected: super_info.name(),
                    found: other.map_or(builtin::object().name(), |p| p.class.name()),
                }));
            }
        }

        for field in &decl.fields {
            surface.declare(Member {
                name: field.name.to_string(),
                kind: MemberKind::Getter,
                params: Vec::new(),
                returns: field.ty.clone(),
                is_abstract: false,
                declared_by: class,
            })?;
            surface.declare(Member {
                name: format!("set_{}", field.name),
                kind: MemberKind::Setter,
                params: vec![field.ty.clone()],
                returns: field.ty.clone(),
                is_abstract: false,
                declared_by: class,
            })?;
        }
        for method in &decl.methods {
            surface.declare(Member {
                name: method.name.to_string(),
                kind: MemberKind::Method,
                params: method.params.clone(),
                returns: method.returns.clone(),
                is_abstract: method.is_abstract,
                declared_by: class,
            })?;
        }

        if !class.is_abstract() {
            if let Some(missing) = surface.members.iter().find(|m| m.is_abstract) {
                return Err(defect(RuntimeError::UnimplementedMember {
                    class: class.name(),
                    member: missing.name.clone(),
                }));
            }
        }
        Ok(surface)
    }

    fn push(&mut self, member: Member) {
        self.by_name.insert(member.name.clone(), self.members.len());
        self.members.push(member);
    }

    /// Add an own member, replacing an inherited one with the same
    /// signature.
    fn declare(&mut self, member: Member) -> Result<(), RuntimeError> {
        let Some(&at) = self.by_name.get(&member.name) else {
            self.push(member);
            return Ok(());
        };
        let existing = &self.members[at];
        let redeclared = std::ptr::eq(existing.declared_by, member.declared_by);
        if redeclared || !existing.same_signature(&member) {
            return Err(defect(RuntimeError::IncompatibleOverride {
                class: self.class.name(),
                member: member.to_string(),
            }));
        }
        self.members[at] = member;
        Ok(())
    }

    pub fn class(&self) -> &'static TypeInfo {
        self.class
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ancestor classes that have a surface, nearest first.
    pub fn ancestors(&self) -> &[&'static TypeInfo] {
        &self.ancestors
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.by_name.get(name).map(|&at| &self.members[at])
    }

    /// Whether this surface is, or extends, the surface named `capability`.
    pub fn extends(&self, capability: &str) -> bool {
        self.name == capability
            || self
                .ancestors
                .iter()
                .any(|info| info.capability() == Some(capability))
    }

    /// Whether every member of `ancestor` is present here with the same
    /// signature, seen through the superclass chain.
    pub fn conforms_to(&self, ancestor: &CapabilityInterface) -> Result<bool, RuntimeError> {
        if !self.extends(ancestor.name) {
            return Ok(false);
        }
        let path = path_to(self.class, ancestor.class);
        for theirs in &ancestor.members {
            let mut expected = theirs.clone();
            for step in path.iter().rev() {
                let Some(superclass) = step.superclass() else {
                    return Ok(false);
                };
                let Some(owner) = superclass.base() else {
                    return Ok(false);
                };
                expected = expected.rewrite(owner, superclass.args())?;
            }
            match self.member(&expected.name) {
                Some(ours) if ours.same_signature(&expected) => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}

/// Classes from `from` up to, not including, `to`.
fn path_to(from: &'static TypeInfo, to: &'static TypeInfo) -> Vec<&'static TypeInfo> {
    let mut path = Vec::new();
    let mut current = Some(from);
    while let Some(info) = current {
        if std::ptr::eq(info, to) {
            break;
        }
        path.push(info);
        current = info.superclass().and_then(TypeExpr::base);
    }
    path
}

static GLOBAL: LazyLock<CapabilityTable> = LazyLock::new(CapabilityTable::new);

/// Installed surfaces, keyed by class name.
#[derive(Debug, Default)]
pub struct CapabilityTable {
    surfaces: RwLock<FxHashMap<&'static str, Arc<CapabilityInterface>>>,
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static CapabilityTable {
        &GLOBAL
    }

    /// Derive `decl`'s surface against its installed parent and keep it.
    pub fn install(&self, decl: &ClassDecl) -> Result<Arc<CapabilityInterface>, RuntimeError> {
        let super_info = decl.superclass.base().unwrap_or_else(builtin::object);
        let parent = if super_info.is_root() {
            None
        } else {
            let found = self.get(super_info.name());
            if found.is_none() {
                return Err(defect(RuntimeError::MissingCapability {
                    class: super_info.name(),
                }));
            }
            found
        };
        let surface = Arc::new(CapabilityInterface::derive(decl, parent.as_deref())?);
        self.surfaces
            .write()
            .insert(decl.info.name(), Arc::clone(&surface));
        tracing::debug!(
            class = decl.info.name(),
            capability = surface.name(),
            members = surface.members().len(),
            "capability installed"
        );
        Ok(surface)
    }

    pub fn get(&self, class: &str) -> Option<Arc<CapabilityInterface>> {
        self.surfaces.read().get(class).cloned()
    }
}
