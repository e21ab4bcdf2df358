//! Property tests for the null-tolerant identity functions.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use reif_rt::reif_types::{builtin, TypeExpr};
use reif_rt::{equal, hash_of, string_of, List, Null, NULL_HASH};

fn nullable_int() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![Just(None), any::<i64>().prop_map(Some)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_equal_is_symmetric(a in nullable_int(), b in nullable_int()) {
        prop_assert_eq!(equal(&a, &b), equal(&b, &a));
        prop_assert_eq!(equal(&a, &b), a == b);
    }

    #[test]
    fn prop_equal_values_hash_alike(a in nullable_int()) {
        let b = a;
        prop_assert!(equal(&a, &b));
        prop_assert_eq!(hash_of(&a), hash_of(&b));
        if a.is_none() {
            prop_assert_eq!(hash_of(&a), NULL_HASH);
        }
    }

    #[test]
    fn prop_null_never_equals_a_value(v in any::<i64>(), s in ".*") {
        prop_assert!(!equal(&v, &Null));
        prop_assert!(!equal(&Null, &s));
        prop_assert!(equal(&Null, &None::<String>));
    }

    #[test]
    fn prop_string_of_matches_display(v in nullable_int()) {
        let expected = v.map_or_else(|| "null".to_string(), |n| n.to_string());
        prop_assert_eq!(string_of(&v), expected);
    }

    #[test]
    fn prop_list_search_uses_equal(items in prop::collection::vec(nullable_int(), 0..12), probe in nullable_int()) {
        let list = List::from_vec(&TypeExpr::class(builtin::int()), items.clone()).unwrap();
        let expected = items
            .iter()
            .position(|item| *item == probe)
            .map_or(-1, |at| i64::try_from(at).unwrap());
        prop_assert_eq!(list.index_of(&probe), expected);
        prop_assert_eq!(list.len(), items.len());
    }
}
