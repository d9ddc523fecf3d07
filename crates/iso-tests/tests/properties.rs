//! Property tests across composition arithmetic and decay.

use std::time::Duration;

use proptest::prelude::*;

use iso_core::Basis;
use iso_tests::helpers::{iso, loaded_context};
use iso_vector::IsoVector;

const TOPES: [i64; 4] = [92235, 92238, 94239, 94241];

fn vector(quantities: &[f64]) -> IsoVector {
    IsoVector::from_raw(TOPES.iter().copied().zip(quantities.iter().copied()), Basis::Mass)
        .unwrap()
}

proptest! {
    #[test]
    fn minimized_fractions_sum_to_one(q in proptest::collection::vec(0.001f64..100.0, 4)) {
        let mut v = vector(&q);
        v.minimize();
        let sum: f64 = v.mass_fractions().values().sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
        let atoms: f64 = v.atom_fractions().values().sum();
        prop_assert!((atoms - 1.0).abs() < 1e-9);
    }

    #[test]
    fn add_then_subtract_round_trips(
        a in proptest::collection::vec(0.0f64..10.0, 4),
        b in proptest::collection::vec(0.0f64..10.0, 4),
    ) {
        let a = vector(&a);
        let b = vector(&b);
        let back = (&(&a + &b) - &b).unwrap();
        prop_assert_eq!(back, a);
    }

    #[test]
    fn scale_preserves_fractions(
        q in proptest::collection::vec(0.01f64..10.0, 4),
        factor in 0.01f64..100.0,
    ) {
        let v = vector(&q);
        let scaled = (&v * factor).unwrap();
        for raw in TOPES {
            let tope = iso(raw);
            prop_assert!((scaled.mass_fraction(tope) - v.mass_fraction(tope)).abs() < 1e-9);
        }
    }

    #[test]
    fn decay_conserves_chain_mass(t in 0i64..10_000) {
        let (ctx, _, _) = loaded_context(Duration::ZERO);
        let mut v = ctx.recipe("spent_fuel").unwrap();
        let total = v.total_mass();
        ctx.decay(&mut v, t).unwrap();
        prop_assert!((v.total_mass() - total).abs() < 1e-9);
        prop_assert!(v.quantity(iso(94241)) <= 0.002 + 1e-15);
    }
}
