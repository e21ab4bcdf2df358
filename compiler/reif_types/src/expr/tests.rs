use super::*;
use pretty_assertions::assert_eq;

static MAP: TypeInfo = TypeInfo::new("Map", "MapApi", &["K", "V"]);
static NODE: TypeInfo = TypeInfo::new("Node", "NodeApi", &[]);

#[test]
fn raw_class_fills_dynamic() {
    let raw = TypeExpr::class(&MAP);
    assert!(raw.is_literal());
    assert_eq!(raw.args().len(), 2);
    assert_eq!(raw.to_string(), "Map<dynamic, dynamic>");

    let plain = TypeExpr::class(&NODE);
    assert!(plain.args().is_empty());
    assert_eq!(plain.to_string(), "Node");
}

#[test]
fn interface_checks_arity() {
    let err = TypeExpr::interface(&MAP, vec![TypeExpr::class(builtin::int())]).unwrap_err();
    assert_eq!(
        err,
        TypeError::ArityMismatch {
            class: "Map",
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn param_checks_index() {
    assert!(TypeExpr::param(&MAP, 1).is_ok());
    let err = TypeExpr::param(&MAP, 2).unwrap_err();
    assert_eq!(
        err,
        TypeError::ArityMismatch {
            class: "Map",
            expected: 2,
            found: 3
        }
    );
}

#[test]
fn literalness_propagates_up() {
    let k = TypeExpr::param(&MAP, 0).unwrap();
    let list_of_k = builtin::list_of(k.clone());
    let nested = TypeExpr::interface(&MAP, vec![TypeExpr::class(&NODE), list_of_k.clone()]).unwrap();

    assert!(!k.is_literal());
    assert!(!list_of_k.is_literal());
    assert!(!nested.is_literal());
    assert!(builtin::list_of(TypeExpr::class(&NODE)).is_literal());
    assert_eq!(nested.to_string(), "Map<Node, List<K>>");
}

#[test]
fn structural_equality_and_sharing() {
    let a = builtin::list_of(TypeExpr::class(&NODE));
    let b = builtin::list_of(TypeExpr::class(&NODE));
    assert_eq!(a, b);
    assert!(!a.ptr_eq(&b));
    assert!(a.ptr_eq(&a.clone()));
    assert_ne!(a, builtin::list_of(TypeExpr::class(builtin::int())));
}

#[test]
fn accessors() {
    let k = TypeExpr::param(&MAP, 0).unwrap();
    let TypeExpr::Param(param) = &k else {
        panic!("expected a parameter");
    };
    assert_eq!(param.owner(), &MAP);
    assert_eq!(param.index(), 0);
    assert_eq!(param.name(), "K");
    assert_eq!(k.base(), None);
    assert!(k.as_interface().is_none());

    let node = TypeExpr::class(&NODE);
    assert_eq!(node.base(), Some(&NODE));
    assert_eq!(node.as_interface().map(InterfaceType::base), Some(&NODE));
}
