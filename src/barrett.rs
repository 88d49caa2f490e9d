//! Barrett reduction by a fixed modulus.

use crate::error::MagiaError;
use crate::magia::{self, arith, bits, div};
use crate::sign::Sign;
use crate::signed::SignedInt;
use core::cmp::Ordering;

/// A precomputed reciprocal of a fixed modulus `m > 1`, turning each
/// reduction into a high multiply, a shift, and a multiply-subtract with at
/// most two trailing corrections.
///
/// With `K = bit_len(m)`, the context caches `mu = floor(2^(2K) / m)`. For
/// `0 <= x < m^2`, `q = (x * mu) >> 2K` underestimates `floor(x / m)` by at
/// most two, so `r = x - q * m` lands within two subtractions of the true
/// remainder. Inputs outside `[0, m^2)` are a hard error: `remainder` is
/// not a general `mod`.
///
/// ```
/// use magia::{Barrett, SignedInt};
///
/// let m = SignedInt::from(12_345_678_901_234_567_890u64);
/// let ctx = Barrett::new(&m).unwrap();
/// let x: SignedInt = "123456789012345678901234567890".parse().unwrap();
/// assert_eq!(ctx.remainder(&x).unwrap(), x.checked_rem(&m).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct Barrett {
    modulus: SignedInt,
    modulus_squared: Vec<u32>,
    mu: Vec<u32>,
    bits: u64,
}

impl Barrett {
    /// Builds a context for `m`; fails unless `m > 1`.
    pub fn new(m: &SignedInt) -> Result<Barrett, MagiaError> {
        if m.is_negative() || m.mag().is_empty() || m.mag() == [1] {
            return Err(MagiaError::InvalidArgument(
                "Barrett modulus must be greater than 1",
            ));
        }
        let k = m.bit_len();
        let power = bits::with_set_bit(2 * k);
        let (mu, _) = div::div_rem(&power, m.mag());
        Ok(Barrett {
            modulus: m.clone(),
            modulus_squared: arith::sqr(m.mag()),
            mu,
            bits: k,
        })
    }

    pub fn modulus(&self) -> &SignedInt {
        &self.modulus
    }

    /// `x mod m` for `0 <= x < m^2`.
    pub fn remainder(&self, x: &SignedInt) -> Result<SignedInt, MagiaError> {
        if x.is_negative() {
            return Err(MagiaError::BarrettPrecondition);
        }
        if magia::cmp(x.mag(), self.modulus.mag()) == Ordering::Less {
            return Ok(x.clone());
        }
        if magia::cmp(x.mag(), &self.modulus_squared) != Ordering::Less {
            return Err(MagiaError::BarrettPrecondition);
        }

        let prod = arith::mul(x.mag(), &self.mu);
        let q = bits::shr(&prod, 2 * self.bits);
        let mut r = arith::sub(x.mag(), &arith::mul(&q, self.modulus.mag()));
        // The estimate is at most two below the true quotient.
        while magia::cmp(&r, self.modulus.mag()) != Ordering::Less {
            r = arith::sub(&r, self.modulus.mag());
        }
        Ok(SignedInt::from_le_limbs(Sign::NonNegative, &r))
    }
}
