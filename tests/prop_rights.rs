use proptest::prelude::*;
use captoken_core::rights::{self, Rights};

fn arb_right() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}"
}

proptest! {
    /// The canonical string does not depend on the order rights were given in.
    #[test]
    fn prop_canonical_string_order_insensitive(names in prop::collection::vec(arb_right(), 1..8)) {
        let forward = Rights::new(names.clone()).unwrap();
        let mut reversed = names.clone();
        reversed.reverse();
        let backward = Rights::new(reversed).unwrap();
        prop_assert_eq!(forward.to_canonical_string(), backward.to_canonical_string());
        prop_assert_eq!(forward, backward);
    }

    /// Parsing the canonical string yields the same set.
    #[test]
    fn prop_parse_canonical_identity(names in prop::collection::vec(arb_right(), 1..8)) {
        let rights = Rights::new(names).unwrap();
        let parsed = Rights::parse(&rights.to_canonical_string()).unwrap();
        prop_assert_eq!(parsed, rights);
    }

    /// A right is sufficient exactly when it was granted; there are no implied rights.
    #[test]
    fn prop_sufficient_is_membership(
        names in prop::collection::vec(arb_right(), 1..8),
        need in arb_right(),
    ) {
        let rights = Rights::new(names.clone()).unwrap();
        prop_assert_eq!(rights::sufficient(&rights, &need), names.contains(&need));
    }

    /// Names containing a separator are always rejected.
    #[test]
    fn prop_separator_names_rejected(prefix in arb_right(), sep in "[,:]", suffix in arb_right()) {
        let name = format!("{}{}{}", prefix, sep, suffix);
        prop_assert!(Rights::new([name]).is_err());
    }
}
