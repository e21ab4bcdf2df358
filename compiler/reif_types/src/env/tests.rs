use super::*;
use crate::builtin;
use pretty_assertions::assert_eq;

static BOX: TypeInfo = TypeInfo::new("env_tests.Box", "env_tests.BoxApi", &["T"]);
static PAIR: TypeInfo = TypeInfo::new("env_tests.Pair", "env_tests.PairApi", &["A", "B"]);
// class Base<S>; class Derived<T> extends Base<List<T>>
static BASE: TypeInfo = TypeInfo::new("env_tests.Base", "env_tests.BaseApi", &["S"]);
static DERIVED: TypeInfo = TypeInfo::new("env_tests.Derived", "env_tests.DerivedApi", &["T"]);
static ORPHAN: TypeInfo = TypeInfo::new("env_tests.Orphan", "env_tests.OrphanApi", &[]);

static LINK: std::sync::Once = std::sync::Once::new();

fn link() {
    LINK.call_once(|| {
        let object = TypeExpr::class(builtin::object());
        BOX.link_superclass(object.clone()).unwrap();
        PAIR.link_superclass(object.clone()).unwrap();
        BASE.link_superclass(object).unwrap();
        let list_of_t = builtin::list_of(TypeExpr::param(&DERIVED, 0).unwrap());
        DERIVED
            .link_superclass(TypeExpr::interface(&BASE, vec![list_of_t]).unwrap())
            .unwrap();
    });
}

fn int() -> TypeExpr {
    TypeExpr::class(builtin::int())
}

fn string() -> TypeExpr {
    TypeExpr::class(builtin::string())
}

fn box_t() -> TypeExpr {
    TypeExpr::param(&BOX, 0).unwrap()
}

#[test]
fn literal_comes_back_unchanged() {
    let literal = builtin::list_of(int());
    let env = TypeEnvironment::ROOT.bind(&BOX, vec![string()]).unwrap();
    let evaluated = env.evaluate(&literal).unwrap();
    assert_eq!(evaluated, literal);
    assert!(evaluated.ptr_eq(&literal));
    assert!(TypeEnvironment::ROOT.evaluate(&literal).unwrap().ptr_eq(&literal));
}

#[test]
fn substitutes_bound_slots() {
    let env = TypeEnvironment::ROOT.bind(&BOX, vec![int()]).unwrap();
    let expr = builtin::list_of(box_t());

    let once = env.evaluate(&expr).unwrap();
    assert_eq!(once, builtin::list_of(int()));
    assert!(once.is_literal());

    let twice = env.evaluate(&once).unwrap();
    assert_eq!(twice, once);
}

#[test]
fn lookup_walks_outward() {
    let outer = TypeEnvironment::ROOT.bind(&BOX, vec![int()]).unwrap();
    let inner = outer.bind(&PAIR, vec![string(), int()]).unwrap();
    let expr = TypeExpr::interface(
        &PAIR,
        vec![box_t(), TypeExpr::param(&PAIR, 0).unwrap()],
    )
    .unwrap();

    let evaluated = inner.evaluate(&expr).unwrap();
    assert_eq!(evaluated.to_string(), "env_tests.Pair<int, String>");
    assert_eq!(inner.depth(), 2);
    assert_eq!(inner.parent().map(TypeEnvironment::depth), Some(1));
    let owners: Vec<_> = inner.owners().map(TypeInfo::name).collect();
    assert_eq!(owners, vec!["env_tests.Pair", "env_tests.Box"]);
}

#[test]
fn inner_scope_shadows_nothing_it_does_not_own() {
    let outer = TypeEnvironment::ROOT.bind(&BOX, vec![int()]).unwrap();
    let inner = outer.bind(&BOX, vec![string()]).unwrap();
    assert_eq!(inner.evaluate(&box_t()).unwrap(), string());
    assert_eq!(outer.evaluate(&box_t()).unwrap(), int());
}

#[test]
fn unbound_slot_fails() {
    let err = TypeEnvironment::ROOT
        .evaluate(&builtin::list_of(box_t()))
        .unwrap_err();
    assert_eq!(
        err,
        TypeError::UnboundTypeParameter {
            owner: "env_tests.Box",
            param: "T".to_string()
        }
    );

    let wrong_scope = TypeEnvironment::ROOT.bind(&PAIR, vec![int(), int()]).unwrap();
    assert!(matches!(
        wrong_scope.evaluate(&box_t()),
        Err(TypeError::UnboundTypeParameter { .. })
    ));
}

#[test]
fn bind_checks_arity_and_literalness() {
    let err = TypeEnvironment::ROOT.bind(&PAIR, vec![int()]).unwrap_err();
    assert_eq!(
        err,
        TypeError::ArityMismatch {
            class: "env_tests.Pair",
            expected: 2,
            found: 1
        }
    );

    let err = TypeEnvironment::ROOT.bind(&BOX, vec![box_t()]).unwrap_err();
    assert_eq!(
        err,
        TypeError::NonLiteralBinding {
            class: "env_tests.Box",
            expr: "T".to_string()
        }
    );
}

#[test]
fn instance_environment_binds_ancestors() {
    link();
    let ty = TypeExpr::interface(&DERIVED, vec![int()]).unwrap();
    let env = TypeEnvironment::for_type(&ty).unwrap();

    assert_eq!(env.depth(), 2);
    let base_s = TypeExpr::param(&BASE, 0).unwrap();
    let derived_t = TypeExpr::param(&DERIVED, 0).unwrap();
    assert_eq!(env.evaluate(&base_s).unwrap(), builtin::list_of(int()));
    assert_eq!(env.evaluate(&derived_t).unwrap(), int());
}

#[test]
fn instance_environment_skips_plain_classes() {
    link();
    let env = TypeEnvironment::for_type(&TypeExpr::class(builtin::string())).unwrap();
    assert!(env.is_root());
}

#[test]
fn instance_environment_needs_literal_type() {
    let err = TypeEnvironment::for_type(&builtin::list_of(box_t())).unwrap_err();
    assert_eq!(
        err,
        TypeError::NotLiteral {
            expr: "List<T>".to_string()
        }
    );
}

#[test]
fn instance_environment_needs_linked_ancestors() {
    let err = TypeEnvironment::for_type(&TypeExpr::class(&ORPHAN)).unwrap_err();
    assert_eq!(
        err,
        TypeError::UnlinkedSuperclass {
            class: "env_tests.Orphan"
        }
    );
}

#[test]
fn display_lists_bindings() {
    let env = TypeEnvironment::ROOT
        .bind(&BOX, vec![int()])
        .unwrap()
        .bind(&PAIR, vec![string(), builtin::list_of(int())])
        .unwrap();
    assert_eq!(
        env.to_string(),
        "{env_tests.Pair.A = String, env_tests.Pair.B = List<int>; env_tests.Box.T = int}"
    );
    assert_eq!(TypeEnvironment::ROOT.to_string(), "{}");
}
