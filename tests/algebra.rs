//! Algebraic laws over randomized operands.

use magia::{Sign, SignedInt};
use proptest::prelude::*;

fn signed_int() -> impl Strategy<Value = SignedInt> {
    (any::<bool>(), proptest::collection::vec(any::<u32>(), 0..10)).prop_map(|(neg, limbs)| {
        let sign = if neg { Sign::Negative } else { Sign::NonNegative };
        SignedInt::from_le_limbs(sign, &limbs)
    })
}

proptest! {
    #[test]
    fn addition_commutes(a in signed_int(), b in signed_int()) {
        prop_assert_eq!(&a + &b, &b + &a);
    }

    #[test]
    fn multiplication_commutes(a in signed_int(), b in signed_int()) {
        prop_assert_eq!(&a * &b, &b * &a);
    }

    #[test]
    fn addition_associates(a in signed_int(), b in signed_int(), c in signed_int()) {
        prop_assert_eq!((&a + &b) + &c, &a + (&b + &c));
    }

    #[test]
    fn multiplication_associates(a in signed_int(), b in signed_int(), c in signed_int()) {
        prop_assert_eq!((&a * &b) * &c, &a * (&b * &c));
    }

    #[test]
    fn multiplication_distributes(a in signed_int(), b in signed_int(), c in signed_int()) {
        prop_assert_eq!(&a * (&b + &c), &a * &b + &a * &c);
    }

    #[test]
    fn identities(a in signed_int()) {
        prop_assert_eq!(&a + SignedInt::ZERO, a.clone());
        prop_assert_eq!(&a * SignedInt::one(), a.clone());
        prop_assert_eq!(&a * SignedInt::ZERO, SignedInt::ZERO);
    }

    #[test]
    fn sign_laws(a in signed_int(), b in signed_int()) {
        prop_assert_eq!(-(-a.clone()), a.clone());
        prop_assert!(!a.abs().is_negative());
        let prod = &a * &b;
        if !prod.is_zero() {
            let expect = if a.is_negative() == b.is_negative() { 1 } else { -1 };
            prop_assert_eq!(prod.signum(), expect);
        }
    }

    #[test]
    fn division_identity(a in signed_int(), b in signed_int()) {
        if !b.is_zero() {
            let (q, r) = a.div_rem(&b).unwrap();
            prop_assert_eq!(&q * &b + &r, a.clone());
            if !r.is_zero() {
                prop_assert_eq!(r.signum(), a.signum());
            }
            prop_assert!(r.abs() < b.abs());
        }
    }

    #[test]
    fn subtraction_inverts_addition(a in signed_int(), b in signed_int()) {
        prop_assert_eq!((&a + &b) - &b, a.clone());
    }

    #[test]
    fn square_matches_self_product(a in signed_int()) {
        prop_assert_eq!(a.sqr(), &a * &a);
        prop_assert_eq!(a.pow(2), a.sqr());
    }

    #[test]
    fn pow_adds_exponents(a in signed_int(), n in 0u32..5, m in 0u32..5) {
        prop_assert_eq!(a.pow(n + m), a.pow(n) * a.pow(m));
    }

    #[test]
    fn isqrt_brackets(a in signed_int()) {
        let n = a.abs();
        let r = n.isqrt().unwrap();
        prop_assert!(r.sqr() <= n);
        prop_assert!((&r + 1u32).sqr() > n);
        prop_assert_eq!(a.sqr().isqrt().unwrap(), a.abs());
    }

    #[test]
    fn gcd_laws(a in signed_int(), b in signed_int(), k in any::<i32>()) {
        let g = SignedInt::gcd(&a, &b);
        prop_assert_eq!(g.clone(), SignedInt::gcd(&b, &a));
        prop_assert_eq!(g.clone(), SignedInt::gcd(&a.abs(), &b.abs()));
        prop_assert_eq!(SignedInt::gcd(&a, &SignedInt::ZERO), a.abs());

        let k_int = SignedInt::from(k);
        prop_assert_eq!(
            SignedInt::gcd(&(&a * &k_int), &(&b * &k_int)),
            k_int.abs() * &g
        );
    }

    #[test]
    fn accumulator_matches_functional_fold(terms in proptest::collection::vec(signed_int(), 0..8)) {
        let mut acc = magia::Accumulator::new();
        let mut expect = SignedInt::ZERO;
        for t in &terms {
            acc += t;
            expect = expect + t;
        }
        prop_assert_eq!(acc.to_signed_int(), expect);
    }

    #[test]
    fn shifts_scale_by_powers_of_two(a in signed_int(), n in 0u64..100) {
        let up = &a << n;
        prop_assert_eq!(up.clone() >> n, a.clone());
        prop_assert_eq!(up, &a * SignedInt::with_set_bit(n));
    }
}
