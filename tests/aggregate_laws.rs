use mask_dp::aggregate::{Aggregator, AllOf, CountMod, Game, MaxProfit, MinCost, Reachability};
use proptest::prelude::*;

proptest! {
    #[test]
    fn count_mod_is_a_commutative_semiring(
        m in 1i64..1_000_000_007,
        a in any::<i64>(),
        b in any::<i64>(),
        c in any::<i64>(),
    ) {
        let agg = CountMod::new(m).unwrap();
        let (a, b, c) = (agg.reduce(a as i128), agg.reduce(b as i128), agg.reduce(c as i128));
        prop_assert_eq!(agg.combine(agg.identity(), a), a);
        prop_assert_eq!(agg.combine(a, b), agg.combine(b, a));
        prop_assert_eq!(agg.combine(agg.combine(a, b), c), agg.combine(a, agg.combine(b, c)));
        prop_assert_eq!(agg.extend(a, 1), Some(a));
        prop_assert_eq!(agg.extend(agg.identity(), b), Some(agg.identity()));
        // Distributivity of the multiplicity over sibling sums.
        let lhs = agg.extend(agg.combine(a, b), c).unwrap();
        let rhs = agg.combine(agg.extend(a, c).unwrap(), agg.extend(b, c).unwrap());
        prop_assert_eq!(lhs, rhs);
        prop_assert!((0..m).contains(&agg.combine(a, b)));
    }

    #[test]
    fn min_cost_never_poisons(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let agg = MinCost;
        prop_assert_eq!(agg.combine(agg.identity(), a), a);
        prop_assert_eq!(agg.extend(agg.unit(), a), Some(a));
        prop_assert_eq!(agg.extend(agg.identity(), a), Some(agg.identity()));
        prop_assert_eq!(agg.extend(a, b), Some(a + b));
        prop_assert_eq!(agg.improves(a, b), a < b);
    }

    #[test]
    fn max_profit_never_poisons(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let agg = MaxProfit;
        prop_assert_eq!(agg.combine(agg.identity(), a), a);
        prop_assert_eq!(agg.extend(agg.identity(), b), Some(agg.identity()));
        prop_assert_eq!(agg.combine(a, b), a.max(b));
    }

    #[test]
    fn improving_always_changes_the_combination(a in any::<bool>(), b in any::<bool>()) {
        for (improves, combined) in [
            (Reachability.improves(a, b), Reachability.combine(b, a)),
            (AllOf.improves(a, b), AllOf.combine(b, a)),
            (Game.improves(a, b), Game.combine(b, a)),
        ] {
            if improves {
                prop_assert_ne!(combined, b);
            }
        }
    }
}

#[test]
fn boolean_identities() {
    assert!(!Reachability.identity());
    assert!(AllOf.identity());
    assert!(!Game.identity());
    assert_eq!(Game.extend(true, ()), Some(false));
    assert_eq!(Game.extend(false, ()), Some(true));
}

#[test]
fn overflowing_costs_are_reported_not_wrapped() {
    assert_eq!(MinCost.extend(i64::MAX - 10, 20), None);
    assert_eq!(MaxProfit.extend(i64::MIN + 10, -20), None);
}
