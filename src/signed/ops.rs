//! Operator implementations, including the primitive-operand overloads.
//!
//! Every binary operator against `i32`/`u32`/`i64`/`u64` funnels through
//! [`SmallOperand::split`], which extracts `(sign, magnitude)` without heap
//! allocation; the sign-handling path is the same one the `SignedInt` ×
//! `SignedInt` operators use.

use super::SignedInt;
use crate::magia::{self, arith, bits, div, small_limbs};
use crate::sign::Sign;
use core::cmp::Ordering;
use core::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, Mul, MulAssign, Neg, Rem, Shl, Shr, Sub,
    SubAssign,
};

/// A primitive integer usable directly as an arithmetic operand.
pub trait SmallOperand: Copy {
    /// Sign and absolute value; `i64::MIN` splits cleanly because the
    /// magnitude is unsigned.
    fn split(self) -> (Sign, u64);
}

impl SmallOperand for i32 {
    #[inline]
    fn split(self) -> (Sign, u64) {
        (Sign::of_i64(self as i64), self.unsigned_abs() as u64)
    }
}

impl SmallOperand for u32 {
    #[inline]
    fn split(self) -> (Sign, u64) {
        (Sign::NonNegative, self as u64)
    }
}

impl SmallOperand for i64 {
    #[inline]
    fn split(self) -> (Sign, u64) {
        (Sign::of_i64(self), self.unsigned_abs())
    }
}

impl SmallOperand for u64 {
    #[inline]
    fn split(self) -> (Sign, u64) {
        (Sign::NonNegative, self)
    }
}

// ----------------------------------------------------------------------
// SignedInt x SignedInt
// ----------------------------------------------------------------------

impl Add<&SignedInt> for &SignedInt {
    type Output = SignedInt;

    fn add(self, rhs: &SignedInt) -> SignedInt {
        SignedInt::add_with_sign(self.sign, &self.mag, rhs.sign, &rhs.mag)
    }
}

impl Sub<&SignedInt> for &SignedInt {
    type Output = SignedInt;

    fn sub(self, rhs: &SignedInt) -> SignedInt {
        SignedInt::add_with_sign(self.sign, &self.mag, rhs.sign.flip(), &rhs.mag)
    }
}

impl Mul<&SignedInt> for &SignedInt {
    type Output = SignedInt;

    fn mul(self, rhs: &SignedInt) -> SignedInt {
        SignedInt::raw(self.sign.xor(rhs.sign), arith::mul(&self.mag, &rhs.mag))
    }
}

impl Div<&SignedInt> for &SignedInt {
    type Output = SignedInt;

    fn div(self, rhs: &SignedInt) -> SignedInt {
        match self.div_rem(rhs) {
            Ok((q, _)) => q,
            Err(_) => panic!("attempt to divide by zero"),
        }
    }
}

impl Rem<&SignedInt> for &SignedInt {
    type Output = SignedInt;

    fn rem(self, rhs: &SignedInt) -> SignedInt {
        match self.div_rem(rhs) {
            Ok((_, r)) => r,
            Err(_) => panic!("attempt to calculate the remainder with a divisor of zero"),
        }
    }
}

/// Forwards the owned/borrowed operand combinations onto the
/// reference-reference core.
macro_rules! forward_value_binops {
    ($($imp:ident, $method:ident;)*) => {$(
        impl $imp<SignedInt> for SignedInt {
            type Output = SignedInt;
            fn $method(self, rhs: SignedInt) -> SignedInt {
                (&self).$method(&rhs)
            }
        }
        impl $imp<&SignedInt> for SignedInt {
            type Output = SignedInt;
            fn $method(self, rhs: &SignedInt) -> SignedInt {
                (&self).$method(rhs)
            }
        }
        impl $imp<SignedInt> for &SignedInt {
            type Output = SignedInt;
            fn $method(self, rhs: SignedInt) -> SignedInt {
                self.$method(&rhs)
            }
        }
    )*};
}

forward_value_binops! {
    Add, add;
    Sub, sub;
    Mul, mul;
    Div, div;
    Rem, rem;
    BitAnd, bitand;
    BitOr, bitor;
    BitXor, bitxor;
}

/// Compound assignment rebuilds through the binary operator; the value
/// semantics stay immutable underneath.
macro_rules! forward_assign_binops {
    ($($imp:ident, $method:ident, $binop:ident;)*) => {$(
        impl $imp<&SignedInt> for SignedInt {
            fn $method(&mut self, rhs: &SignedInt) {
                *self = (&*self).$binop(rhs);
            }
        }
        impl $imp<SignedInt> for SignedInt {
            fn $method(&mut self, rhs: SignedInt) {
                *self = (&*self).$binop(&rhs);
            }
        }
    )*};
}

forward_assign_binops! {
    AddAssign, add_assign, add;
    SubAssign, sub_assign, sub;
    MulAssign, mul_assign, mul;
}

impl Neg for &SignedInt {
    type Output = SignedInt;

    fn neg(self) -> SignedInt {
        SignedInt::raw(self.sign.flip(), self.mag.clone())
    }
}

impl Neg for SignedInt {
    type Output = SignedInt;

    fn neg(self) -> SignedInt {
        SignedInt::raw(self.sign.flip(), self.mag)
    }
}

// ----------------------------------------------------------------------
// Bit operations: magnitudes only, results non-negative
// ----------------------------------------------------------------------

impl BitAnd<&SignedInt> for &SignedInt {
    type Output = SignedInt;

    fn bitand(self, rhs: &SignedInt) -> SignedInt {
        SignedInt::raw(Sign::NonNegative, bits::and(&self.mag, &rhs.mag))
    }
}

impl BitOr<&SignedInt> for &SignedInt {
    type Output = SignedInt;

    fn bitor(self, rhs: &SignedInt) -> SignedInt {
        SignedInt::raw(Sign::NonNegative, bits::or(&self.mag, &rhs.mag))
    }
}

impl BitXor<&SignedInt> for &SignedInt {
    type Output = SignedInt;

    fn bitxor(self, rhs: &SignedInt) -> SignedInt {
        SignedInt::raw(Sign::NonNegative, bits::xor(&self.mag, &rhs.mag))
    }
}

impl Shl<u64> for &SignedInt {
    type Output = SignedInt;

    fn shl(self, rhs: u64) -> SignedInt {
        SignedInt::raw(self.sign, bits::shl(&self.mag, rhs))
    }
}

impl Shl<u64> for SignedInt {
    type Output = SignedInt;

    fn shl(self, rhs: u64) -> SignedInt {
        (&self).shl(rhs)
    }
}

impl Shr<u64> for &SignedInt {
    type Output = SignedInt;

    /// Arithmetic shift: rounds toward negative infinity, so a negative
    /// value whose discarded low bits were set is pulled one further down
    /// (`-5 >> 1 == -3`).
    fn shr(self, rhs: u64) -> SignedInt {
        let shifted = bits::shr(&self.mag, rhs);
        if self.sign.is_negative() && bits::any_bit_in_lower(&self.mag, rhs) {
            SignedInt::raw(Sign::Negative, arith::add(&shifted, &[1]))
        } else {
            SignedInt::raw(self.sign, shifted)
        }
    }
}

impl Shr<u64> for SignedInt {
    type Output = SignedInt;

    fn shr(self, rhs: u64) -> SignedInt {
        (&self).shr(rhs)
    }
}

// ----------------------------------------------------------------------
// Primitive-operand arithmetic cores
// ----------------------------------------------------------------------

impl SignedInt {
    fn add_small(&self, rhs: (Sign, u64)) -> SignedInt {
        let (rs, rm) = rhs;
        let (limbs, n) = small_limbs(rm);
        SignedInt::add_with_sign(self.sign, &self.mag, rs, &limbs[..n])
    }

    fn sub_small(&self, rhs: (Sign, u64)) -> SignedInt {
        let (rs, rm) = rhs;
        let (limbs, n) = small_limbs(rm);
        SignedInt::add_with_sign(self.sign, &self.mag, rs.flip(), &limbs[..n])
    }

    fn rsub_small(&self, lhs: (Sign, u64)) -> SignedInt {
        let (ls, lm) = lhs;
        let (limbs, n) = small_limbs(lm);
        SignedInt::add_with_sign(ls, &limbs[..n], self.sign.flip(), &self.mag)
    }

    fn mul_small(&self, rhs: (Sign, u64)) -> SignedInt {
        let (rs, rm) = rhs;
        SignedInt::raw(self.sign.xor(rs), arith::mul_u64(&self.mag, rm))
    }

    fn div_small(&self, rhs: (Sign, u64)) -> SignedInt {
        let (rs, rm) = rhs;
        if rm == 0 {
            panic!("attempt to divide by zero");
        }
        let (q, _) = div::div_rem_u64(&self.mag, rm);
        SignedInt::raw(self.sign.xor(rs), q)
    }

    /// Remainder by a primitive. The divisor's sign is ignored: the result
    /// depends only on the dividend.
    fn rem_small(&self, rhs: (Sign, u64)) -> SignedInt {
        let (_, rm) = rhs;
        if rm == 0 {
            panic!("attempt to calculate the remainder with a divisor of zero");
        }
        let r = div::rem_u64(&self.mag, rm);
        let (limbs, n) = small_limbs(r);
        SignedInt::raw(self.sign, limbs[..n].to_vec())
    }

    fn rdiv_small(&self, lhs: (Sign, u64)) -> SignedInt {
        let (ls, lm) = lhs;
        if self.is_zero() {
            panic!("attempt to divide by zero");
        }
        let (limbs, n) = small_limbs(lm);
        if magia::cmp(&self.mag, &limbs[..n]) == Ordering::Greater {
            return SignedInt::ZERO;
        }
        let q = lm / magia::to_u64(&self.mag);
        let (ql, qn) = small_limbs(q);
        SignedInt::raw(ls.xor(self.sign), ql[..qn].to_vec())
    }

    fn rrem_small(&self, lhs: (Sign, u64)) -> SignedInt {
        let (ls, lm) = lhs;
        if self.is_zero() {
            panic!("attempt to calculate the remainder with a divisor of zero");
        }
        let (limbs, n) = small_limbs(lm);
        if magia::cmp(&self.mag, &limbs[..n]) == Ordering::Greater {
            return SignedInt::raw(ls, limbs[..n].to_vec());
        }
        let r = lm % magia::to_u64(&self.mag);
        let (rl, rn) = small_limbs(r);
        SignedInt::raw(ls, rl[..rn].to_vec())
    }
}

/// The full operator family for one primitive type: both operand
/// positions, owned and borrowed `SignedInt`, plus comparisons and `From`.
macro_rules! impl_small_operand_ops {
    ($($t:ty),* $(,)?) => {$(
        impl From<$t> for SignedInt {
            fn from(v: $t) -> SignedInt {
                let (sign, m) = v.split();
                let (limbs, n) = small_limbs(m);
                SignedInt::raw(sign, limbs[..n].to_vec())
            }
        }

        impl Add<$t> for &SignedInt {
            type Output = SignedInt;
            fn add(self, rhs: $t) -> SignedInt { self.add_small(rhs.split()) }
        }
        impl Add<$t> for SignedInt {
            type Output = SignedInt;
            fn add(self, rhs: $t) -> SignedInt { self.add_small(rhs.split()) }
        }
        impl Add<SignedInt> for $t {
            type Output = SignedInt;
            fn add(self, rhs: SignedInt) -> SignedInt { rhs.add_small(self.split()) }
        }
        impl Add<&SignedInt> for $t {
            type Output = SignedInt;
            fn add(self, rhs: &SignedInt) -> SignedInt { rhs.add_small(self.split()) }
        }

        impl Sub<$t> for &SignedInt {
            type Output = SignedInt;
            fn sub(self, rhs: $t) -> SignedInt { self.sub_small(rhs.split()) }
        }
        impl Sub<$t> for SignedInt {
            type Output = SignedInt;
            fn sub(self, rhs: $t) -> SignedInt { self.sub_small(rhs.split()) }
        }
        impl Sub<SignedInt> for $t {
            type Output = SignedInt;
            fn sub(self, rhs: SignedInt) -> SignedInt { rhs.rsub_small(self.split()) }
        }
        impl Sub<&SignedInt> for $t {
            type Output = SignedInt;
            fn sub(self, rhs: &SignedInt) -> SignedInt { rhs.rsub_small(self.split()) }
        }

        impl Mul<$t> for &SignedInt {
            type Output = SignedInt;
            fn mul(self, rhs: $t) -> SignedInt { self.mul_small(rhs.split()) }
        }
        impl Mul<$t> for SignedInt {
            type Output = SignedInt;
            fn mul(self, rhs: $t) -> SignedInt { self.mul_small(rhs.split()) }
        }
        impl Mul<SignedInt> for $t {
            type Output = SignedInt;
            fn mul(self, rhs: SignedInt) -> SignedInt { rhs.mul_small(self.split()) }
        }
        impl Mul<&SignedInt> for $t {
            type Output = SignedInt;
            fn mul(self, rhs: &SignedInt) -> SignedInt { rhs.mul_small(self.split()) }
        }

        impl Div<$t> for &SignedInt {
            type Output = SignedInt;
            fn div(self, rhs: $t) -> SignedInt { self.div_small(rhs.split()) }
        }
        impl Div<$t> for SignedInt {
            type Output = SignedInt;
            fn div(self, rhs: $t) -> SignedInt { self.div_small(rhs.split()) }
        }
        impl Div<SignedInt> for $t {
            type Output = SignedInt;
            fn div(self, rhs: SignedInt) -> SignedInt { rhs.rdiv_small(self.split()) }
        }
        impl Div<&SignedInt> for $t {
            type Output = SignedInt;
            fn div(self, rhs: &SignedInt) -> SignedInt { rhs.rdiv_small(self.split()) }
        }

        impl Rem<$t> for &SignedInt {
            type Output = SignedInt;
            fn rem(self, rhs: $t) -> SignedInt { self.rem_small(rhs.split()) }
        }
        impl Rem<$t> for SignedInt {
            type Output = SignedInt;
            fn rem(self, rhs: $t) -> SignedInt { self.rem_small(rhs.split()) }
        }
        impl Rem<SignedInt> for $t {
            type Output = SignedInt;
            fn rem(self, rhs: SignedInt) -> SignedInt { rhs.rrem_small(self.split()) }
        }
        impl Rem<&SignedInt> for $t {
            type Output = SignedInt;
            fn rem(self, rhs: &SignedInt) -> SignedInt { rhs.rrem_small(self.split()) }
        }

        impl PartialEq<$t> for SignedInt {
            fn eq(&self, other: &$t) -> bool {
                self.cmp_small(other.split()) == Ordering::Equal
            }
        }
        impl PartialEq<SignedInt> for $t {
            fn eq(&self, other: &SignedInt) -> bool {
                other.cmp_small(self.split()) == Ordering::Equal
            }
        }
        impl PartialOrd<$t> for SignedInt {
            fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                Some(self.cmp_small(other.split()))
            }
        }
        impl PartialOrd<SignedInt> for $t {
            fn partial_cmp(&self, other: &SignedInt) -> Option<Ordering> {
                Some(other.cmp_small(self.split()).reverse())
            }
        }
    )*};
}

impl_small_operand_ops!(i32, u32, i64, u64);

#[cfg(test)]
mod tests {
    use super::*;

    fn big(s: &str) -> SignedInt {
        s.parse().unwrap()
    }

    #[test]
    fn sign_rules_for_addition() {
        assert_eq!(big("7") + big("5"), big("12"));
        assert_eq!(big("-7") + big("-5"), big("-12"));
        assert_eq!(big("7") + big("-5"), big("2"));
        assert_eq!(big("-7") + big("5"), big("-2"));
        assert_eq!(big("5") + big("-7"), big("-2"));
    }

    #[test]
    fn sign_rules_for_division_and_remainder() {
        assert_eq!(big("7") / big("2"), big("3"));
        assert_eq!(big("-7") / big("2"), big("-3"));
        assert_eq!(big("7") / big("-2"), big("-3"));
        assert_eq!(big("-7") / big("-2"), big("3"));
        // Remainder takes the dividend's sign.
        assert_eq!(big("7") % big("-2"), big("1"));
        assert_eq!(big("-7") % big("2"), big("-1"));
        assert_eq!(big("-7") % big("-2"), big("-1"));
    }

    #[test]
    #[should_panic(expected = "divide by zero")]
    fn division_by_zero_panics() {
        let _ = big("1") / SignedInt::ZERO;
    }

    #[test]
    fn primitive_operands_share_the_sign_path() {
        let a = big("1000000000000");
        assert_eq!(&a + 1i32, big("1000000000001"));
        assert_eq!(&a + (-1i64), big("999999999999"));
        assert_eq!(1u32 + &a, big("1000000000001"));
        assert_eq!(&a - 1u64, big("999999999999"));
        assert_eq!(5i64 - &a, big("-999999999995"));
        assert_eq!(&a * (-3i32), big("-3000000000000"));
        assert_eq!((-3i64) * &a, big("-3000000000000"));
        assert_eq!(&a / 7u32, big("142857142857"));
        assert_eq!(&a % 7u32, big("1"));
        assert_eq!(big("-10") % 7u32, big("-3"));
        assert_eq!(big("-10") % (-7i32), big("-3"));
    }

    #[test]
    fn primitive_on_the_left_of_division() {
        let small = big("42");
        assert_eq!(1000i64 / &small, big("23"));
        assert_eq!(1000i64 % &small, big("34"));
        assert_eq!((-1000i64) / &small, big("-23"));
        assert_eq!((-1000i64) % &small, big("-34"));
        let huge = big("123456789012345678901234567890");
        assert_eq!(1000u64 / &huge, SignedInt::ZERO);
        assert_eq!(1000u64 % &huge, big("1000"));
        assert_eq!(u64::MAX % &huge, SignedInt::from(u64::MAX));
    }

    #[test]
    fn i64_min_splits_without_overflow() {
        let v = SignedInt::from(i64::MIN);
        assert_eq!(v.to_string(), "-9223372036854775808");
        assert_eq!(&v * (-1i32), big("9223372036854775808"));
        assert_eq!(v, i64::MIN);
    }

    #[test]
    fn comparisons_against_primitives() {
        let a = big("-5");
        assert!(a < 0i32);
        assert!(a < 1u64);
        assert!(a == -5i64);
        assert!(0i32 > a);
        assert!(big("18446744073709551616") > u64::MAX);
    }

    #[test]
    fn logical_ops_ignore_sign() {
        assert_eq!(big("-12") & big("10"), big("8"));
        assert_eq!(big("-12") | big("10"), big("14"));
        assert_eq!(big("12") ^ big("10"), big("6"));
    }

    #[test]
    fn shifts_floor_negative_values() {
        assert_eq!(big("-5") >> 1, big("-3"));
        assert_eq!(big("-4") >> 1, big("-2"));
        assert_eq!(big("-1") >> 5, big("-1"));
        assert_eq!(big("5") >> 1, big("2"));
        assert_eq!(big("-3") << 2, big("-12"));
        assert_eq!(big("1") << 100, SignedInt::with_set_bit(100));
    }

    #[test]
    fn compound_assignment_matches_binary_ops() {
        let mut v = big("100");
        v += &big("23");
        assert_eq!(v, big("123"));
        v -= big("200");
        assert_eq!(v, big("-77"));
        v *= &big("-3");
        assert_eq!(v, big("231"));
    }

    #[test]
    fn negation_round_trips() {
        let a = big("123456789");
        assert_eq!(-(-a.clone()), a);
        assert_eq!(-SignedInt::ZERO, SignedInt::ZERO);
    }
}
