//! A mutable sign-magnitude value for streaming aggregation.

use crate::magia::{self, arith, normalized_len, small_limbs};
use crate::sign::Sign;
use crate::signed::{SignedInt, SmallOperand};
use core::cmp::Ordering;
use core::fmt;
use core::mem;
use core::ops::{AddAssign, MulAssign, SubAssign};

/// Limbs are reserved in rounds of this many; capacity never shrinks.
const GROWTH_LIMBS: usize = 4;

#[inline]
fn round_up(limbs: usize) -> usize {
    (limbs + GROWTH_LIMBS - 1) & !(GROWTH_LIMBS - 1)
}

/// A mutable accumulator over the same sign-magnitude representation as
/// [`SignedInt`], reusing its buffers so aggregation loops stay free of
/// allocation.
///
/// The primary buffer holds the active limbs (top limb non-zero); a scratch
/// buffer is retained across operations and swapped in as the destination
/// of multi-limb products. Accumulators are exclusively owned and not
/// thread-safe; `&mut` access makes concurrent mutation a compile-time
/// impossibility.
///
/// ```
/// use magia::{Accumulator, SignedInt};
///
/// let mut acc = Accumulator::new();
/// for k in 1u32..=10 {
///     acc.add_square_of(&SignedInt::from(k));
/// }
/// assert_eq!(acc.to_signed_int(), SignedInt::from(385u32));
/// ```
pub struct Accumulator {
    sign: Sign,
    magia: Vec<u32>,
    scratch: Vec<u32>,
}

impl Accumulator {
    pub fn new() -> Accumulator {
        Accumulator::with_capacity(GROWTH_LIMBS)
    }

    /// An empty (zero) accumulator with room for `limbs` limbs.
    pub fn with_capacity(limbs: usize) -> Accumulator {
        Accumulator {
            sign: Sign::NonNegative,
            magia: Vec::with_capacity(round_up(limbs)),
            scratch: Vec::with_capacity(GROWTH_LIMBS),
        }
    }

    /// Clears the value; capacity is retained.
    pub fn set_zero(&mut self) {
        self.magia.clear();
        self.sign = Sign::NonNegative;
    }

    /// Replaces the value with a snapshot of `v`.
    pub fn set(&mut self, v: &SignedInt) {
        self.replace(v.sign(), v.mag());
    }

    /// Replaces the value with a copy of another accumulator's.
    pub fn set_from(&mut self, other: &Accumulator) {
        let (sign, mag) = (other.sign, &other.magia);
        self.replace(sign, mag);
    }

    /// Replaces the value with a primitive.
    pub fn set_small<T: SmallOperand>(&mut self, v: T) {
        let (sign, m) = v.split();
        let (limbs, n) = small_limbs(m);
        self.replace(sign, &limbs[..n]);
    }

    fn replace(&mut self, sign: Sign, mag: &[u32]) {
        self.magia.clear();
        self.reserve_rounded(mag.len());
        self.magia.extend_from_slice(mag);
        self.trim();
        self.sign = if self.magia.is_empty() {
            Sign::NonNegative
        } else {
            sign
        };
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.magia.is_empty()
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn bit_len(&self) -> u64 {
        magia::bits::bit_len(&self.magia)
    }

    /// Copies the active limbs out into an immutable value.
    pub fn to_signed_int(&self) -> SignedInt {
        SignedInt::from_le_limbs(self.sign, &self.magia)
    }

    /// Adds `v * v`; squares into scratch first, then magnitude-adds.
    pub fn add_square_of(&mut self, v: &SignedInt) {
        let mut scratch = mem::take(&mut self.scratch);
        square_into(&mut scratch, v.mag());
        self.mutate_add(Sign::NonNegative, &scratch);
        self.scratch = scratch;
    }

    /// Adds the square of the accumulator's own value: the aliasing form
    /// of [`add_square_of`](Self::add_square_of).
    pub fn add_square_of_self(&mut self) {
        let mut scratch = mem::take(&mut self.scratch);
        square_into(&mut scratch, &self.magia);
        self.mutate_add(Sign::NonNegative, &scratch);
        self.scratch = scratch;
    }

    /// Adds `|v|`, ignoring its sign.
    pub fn add_abs_value_of(&mut self, v: &SignedInt) {
        self.mutate_add(Sign::NonNegative, v.mag());
    }

    /// Squares the accumulator in place. `acc *= acc` cannot be written
    /// (the borrows alias), so self-multiplication dispatches here.
    pub fn square(&mut self) {
        if self.is_zero() {
            return;
        }
        let mut scratch = mem::take(&mut self.scratch);
        square_into(&mut scratch, &self.magia);
        mem::swap(&mut self.magia, &mut scratch);
        self.scratch = scratch;
        self.sign = Sign::NonNegative;
    }

    /// The add/sub core: adopt the operand when zero, add magnitudes when
    /// the signs agree, otherwise subtract the smaller magnitude from the
    /// larger and take the larger's sign.
    fn mutate_add(&mut self, rs: Sign, rm: &[u32]) {
        let rm = &rm[..normalized_len(rm)];
        if rm.is_empty() {
            return;
        }
        if self.magia.is_empty() {
            self.reserve_rounded(rm.len());
            self.magia.extend_from_slice(rm);
            self.sign = rs;
            return;
        }
        if self.sign == rs {
            if self.magia.len() < rm.len() {
                self.reserve_rounded(rm.len());
                self.magia.resize(rm.len(), 0);
            }
            if arith::mutate_add(&mut self.magia, rm) {
                self.reserve_rounded(self.magia.len() + 1);
                self.magia.push(1);
            }
            return;
        }
        match magia::cmp(&self.magia, rm) {
            Ordering::Equal => self.set_zero(),
            Ordering::Greater => {
                arith::mutate_sub(&mut self.magia, rm);
                self.trim();
            }
            Ordering::Less => {
                self.reserve_rounded(rm.len());
                self.magia.resize(rm.len(), 0);
                arith::mutate_reverse_sub(&mut self.magia, rm);
                self.trim();
                self.sign = rs;
            }
        }
    }

    /// The multiply core. Scalar-sized operands multiply in place after
    /// growing one or two limbs; wider operands multiply into scratch,
    /// which is then swapped with the primary buffer.
    fn mutate_mul(&mut self, rs: Sign, rm: &[u32]) {
        let rm = &rm[..normalized_len(rm)];
        if self.is_zero() {
            return;
        }
        if rm.is_empty() {
            self.set_zero();
            return;
        }
        if rm.len() <= 2 {
            self.mutate_mul_small(rs, magia::to_u64(rm));
            return;
        }
        let mut scratch = mem::take(&mut self.scratch);
        scratch.clear();
        scratch.resize(self.magia.len() + rm.len(), 0);
        let n = arith::mul_into(&mut scratch, &self.magia, rm);
        scratch.truncate(n);
        mem::swap(&mut self.magia, &mut scratch);
        self.scratch = scratch;
        self.sign = self.sign.xor(rs);
    }

    fn mutate_mul_small(&mut self, rs: Sign, m: u64) {
        if self.is_zero() {
            return;
        }
        if m == 0 {
            self.set_zero();
            return;
        }
        if m >> 32 == 0 {
            self.reserve_rounded(self.magia.len() + 1);
            let carry = arith::mutate_mul_u32(&mut self.magia, m as u32);
            if carry != 0 {
                self.magia.push(carry);
            }
        } else {
            self.reserve_rounded(self.magia.len() + 2);
            let (lo, hi) = arith::mutate_mul_u64(&mut self.magia, m);
            if lo != 0 || hi != 0 {
                self.magia.push(lo);
            }
            if hi != 0 {
                self.magia.push(hi);
            }
        }
        self.sign = self.sign.xor(rs);
    }

    fn reserve_rounded(&mut self, limbs: usize) {
        if self.magia.capacity() < limbs {
            self.magia
                .reserve_exact(round_up(limbs) - self.magia.len());
        }
    }

    fn trim(&mut self) {
        let n = normalized_len(&self.magia);
        self.magia.truncate(n);
        if self.magia.is_empty() {
            self.sign = Sign::NonNegative;
        }
    }
}

/// Squares `x` into `dst`, leaving `dst` trimmed.
fn square_into(dst: &mut Vec<u32>, x: &[u32]) {
    dst.clear();
    dst.resize(2 * x.len(), 0);
    let n = arith::sqr_into(dst, x);
    dst.truncate(n);
}

impl Default for Accumulator {
    fn default() -> Self {
        Accumulator::new()
    }
}

impl fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Accumulator({})", self.to_signed_int())
    }
}

impl AddAssign<&SignedInt> for Accumulator {
    fn add_assign(&mut self, rhs: &SignedInt) {
        self.mutate_add(rhs.sign(), rhs.mag());
    }
}

impl SubAssign<&SignedInt> for Accumulator {
    fn sub_assign(&mut self, rhs: &SignedInt) {
        self.mutate_add(rhs.sign().flip(), rhs.mag());
    }
}

impl AddAssign<&Accumulator> for Accumulator {
    fn add_assign(&mut self, rhs: &Accumulator) {
        self.mutate_add(rhs.sign, &rhs.magia);
    }
}

impl SubAssign<&Accumulator> for Accumulator {
    fn sub_assign(&mut self, rhs: &Accumulator) {
        self.mutate_add(rhs.sign.flip(), &rhs.magia);
    }
}

impl MulAssign<&SignedInt> for Accumulator {
    fn mul_assign(&mut self, rhs: &SignedInt) {
        self.mutate_mul(rhs.sign(), rhs.mag());
    }
}

macro_rules! impl_small_assign_ops {
    ($($t:ty),* $(,)?) => {$(
        impl AddAssign<$t> for Accumulator {
            fn add_assign(&mut self, rhs: $t) {
                let (sign, m) = rhs.split();
                let (limbs, n) = small_limbs(m);
                self.mutate_add(sign, &limbs[..n]);
            }
        }
        impl SubAssign<$t> for Accumulator {
            fn sub_assign(&mut self, rhs: $t) {
                let (sign, m) = rhs.split();
                let (limbs, n) = small_limbs(m);
                self.mutate_add(sign.flip(), &limbs[..n]);
            }
        }
        impl MulAssign<$t> for Accumulator {
            fn mul_assign(&mut self, rhs: $t) {
                let (sign, m) = rhs.split();
                self.mutate_mul_small(sign, m);
            }
        }
    )*};
}

impl_small_assign_ops!(i32, u32, i64, u64);
