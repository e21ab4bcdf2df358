use super::*;
use crate::{construct, Class, ObjectHeader};
use pretty_assertions::assert_eq;
use reif_types::{builtin, TypeExpr, TypeInfo};
use std::rc::Rc;

static POINT: TypeInfo = TypeInfo::new("identity_tests.Point", "identity_tests.PointApi", &[]);
static OTHER: TypeInfo = TypeInfo::new("identity_tests.Other", "identity_tests.OtherApi", &[]);

static LINK: std::sync::Once = std::sync::Once::new();

fn link() {
    LINK.call_once(|| {
        POINT.link_superclass(TypeExpr::class(builtin::object())).unwrap();
        OTHER.link_superclass(TypeExpr::class(builtin::object())).unwrap();
    });
}

struct Point {
    header: ObjectHeader,
}
crate::object_impl!(Point);

impl Class for Point {
    fn type_info() -> &'static TypeInfo {
        &POINT
    }

    fn allocate(header: ObjectHeader) -> Self {
        Point { header }
    }
}

struct Other {
    header: ObjectHeader,
}
crate::object_impl!(Other);

impl Class for Other {
    fn type_info() -> &'static TypeInfo {
        &OTHER
    }

    fn allocate(header: ObjectHeader) -> Self {
        Other { header }
    }
}

fn point() -> Rc<Point> {
    link();
    match construct::<Point, _>(&TypeExpr::class(&POINT), |_| Ok(())) {
        Ok(point) => point,
        Err(err) => panic!("{err}"),
    }
}

fn other() -> Rc<Other> {
    link();
    match construct::<Other, _>(&TypeExpr::class(&OTHER), |_| Ok(())) {
        Ok(other) => other,
        Err(err) => panic!("{err}"),
    }
}

#[test]
fn null_hash_is_fixed() {
    assert_eq!(hash_of(&Null), NULL_HASH);
    assert_eq!(hash_of(&Null), 2011);
    assert_eq!(hash_of(&None::<Rc<Point>>), NULL_HASH);
}

#[test]
fn null_equality() {
    assert!(equal(&Null, &Null));
    assert!(equal(&None::<Rc<Point>>, &Null));
    assert!(!equal(&point(), &Null));
    assert!(!equal(&Null, &point()));
    assert!(!equal(&5_i64, &None::<i64>));
}

#[test]
fn null_text() {
    assert_eq!(string_of(&Null), "null");
    assert_eq!(string_of(&Some(3_i64)), "3");
}

#[test]
fn instances_are_equal_only_to_themselves() {
    let a = point();
    let b = point();
    assert!(equal(&a, &a));
    assert!(equal(&a, &Rc::clone(&a)));
    assert!(!equal(&a, &b));
    assert_eq!(hash_of(&a), hash_of(&Rc::clone(&a)));
    assert_ne!(hash_of(&a), hash_of(&b));
}

#[test]
fn unrelated_classes_are_unequal() {
    let a = point();
    let b = other();
    assert!(!equal(&a, &b));
    assert!(!equal(&b, &a));
}

#[test]
fn primitives_compare_by_value() {
    assert!(equal(&3_i64, &3_i64));
    assert!(!equal(&3_i64, &4_i64));
    assert!(!equal(&3_i64, &3.0_f64));
    assert!(equal(&String::from("x"), &String::from("x")));
    assert_eq!(hash_of(&String::from("x")), hash_of(&String::from("x")));
    assert_eq!(hash_of(&42_i64), 42);
    assert_eq!(hash_of(&true), 1231);
    assert_eq!(hash_of(&false), 1237);
}

#[test]
fn signed_zeros_are_equal_and_hash_alike() {
    assert!(equal(&0.0_f64, &-0.0_f64));
    assert_eq!(hash_of(&0.0_f64), hash_of(&-0.0_f64));
    assert_ne!(hash_of(&1.0_f64), hash_of(&-1.0_f64));
}

#[test]
fn text_of_values() {
    assert_eq!(string_of(&1.0_f64), "1.0");
    assert_eq!(string_of(&1.5_f64), "1.5");
    assert_eq!(string_of(&true), "true");
    assert_eq!(string_of(&point()), "Instance of 'identity_tests.Point'");
}

#[test]
fn trait_objects_work_through_rc_dyn() {
    let a: Rc<dyn Object> = point();
    let b: Rc<dyn Object> = Rc::clone(&a);
    assert!(equal(&a, &b));
    assert!(equal(&*a, &*b));
}
