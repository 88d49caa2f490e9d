//! Immutable signed arbitrary-precision integers.

mod convert;
mod ops;

pub use ops::SmallOperand;

use crate::accumulator::Accumulator;
use crate::error::MagiaError;
use crate::magia::{self, arith, bits, bytes, div, gcd, radix, random, small_limbs, sqrt};
use crate::sign::Sign;
use crate::stream::AsciiStream;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;
use rand_core::RngCore;

/// An immutable arbitrary-precision signed integer.
///
/// Values are sign-magnitude: a [`Sign`] plus a normalized little-endian
/// sequence of 32-bit limbs. The canonical zero is the unique value with an
/// empty magnitude and a non-negative sign; no operation can construct a
/// negative zero. Values are never mutated after construction, so they are
/// freely shareable across threads.
///
/// ```
/// use magia::SignedInt;
///
/// let a: SignedInt = "123456789012345678901234567890".parse().unwrap();
/// let b = SignedInt::from(42u32);
/// assert_eq!((&a * &b) % 97u32, (&a % 97u32) * (&b % 97u32) % 97u32);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SignedInt {
    sign: Sign,
    mag: Vec<u32>,
}

impl SignedInt {
    /// The canonical zero.
    pub const ZERO: SignedInt = SignedInt {
        sign: Sign::NonNegative,
        mag: Vec::new(),
    };

    pub fn one() -> SignedInt {
        SignedInt {
            sign: Sign::NonNegative,
            mag: vec![1],
        }
    }

    /// Normalizing constructor; the only way magnitudes enter a value.
    pub(crate) fn raw(sign: Sign, mag: Vec<u32>) -> SignedInt {
        let mag = magia::trim(mag);
        let sign = if mag.is_empty() { Sign::NonNegative } else { sign };
        SignedInt { sign, mag }
    }

    #[inline]
    pub(crate) fn mag(&self) -> &[u32] {
        &self.mag
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    // ------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------

    /// Parses a decimal literal (or a hex one carrying the `0x` prefix).
    pub fn from_decimal_str(text: &str) -> Result<SignedInt, MagiaError> {
        let (sign, mag) = radix::parse(text.as_bytes())?;
        Ok(SignedInt::raw(sign, mag))
    }

    /// Parses a hex literal; the `0x` prefix is optional.
    pub fn from_hex_str(text: &str) -> Result<SignedInt, MagiaError> {
        let (sign, mag) = radix::parse_hex(text.as_bytes())?;
        Ok(SignedInt::raw(sign, mag))
    }

    /// Parses an ASCII byte window.
    pub fn from_ascii(text: &[u8]) -> Result<SignedInt, MagiaError> {
        let (sign, mag) = radix::parse(text)?;
        Ok(SignedInt::raw(sign, mag))
    }

    /// Parses one literal off the front of a character stream, leaving the
    /// cursor after its last digit.
    pub fn parse_from_stream(stream: &mut AsciiStream<'_>) -> Result<SignedInt, MagiaError> {
        let (sign, mag) = radix::parse_stream(stream)?;
        Ok(SignedInt::raw(sign, mag))
    }

    /// Builds a value from raw little-endian limbs; leading zero limbs are
    /// trimmed and a zero magnitude forces the non-negative sign.
    pub fn from_le_limbs(sign: Sign, limbs: &[u32]) -> SignedInt {
        SignedInt::raw(sign, limbs.to_vec())
    }

    /// The magnitude as little-endian limbs.
    pub fn to_le_limbs(&self) -> Vec<u32> {
        self.mag.clone()
    }

    /// Decodes two's-complement big-endian bytes.
    pub fn from_twos_complement_be_bytes(bytes: &[u8]) -> SignedInt {
        SignedInt::from_binary_bytes(true, true, bytes)
    }

    /// Decodes any of the four (encoding, endianness) byte layouts. An
    /// empty slice is canonical zero.
    pub fn from_binary_bytes(twos_complement: bool, big_endian: bool, data: &[u8]) -> SignedInt {
        let (sign, mag) = bytes::from_bytes(twos_complement, big_endian, data);
        SignedInt::raw(sign, mag)
    }

    /// `2^i`.
    pub fn with_set_bit(i: u64) -> SignedInt {
        SignedInt::raw(Sign::NonNegative, bits::with_set_bit(i))
    }

    /// `2^w - 1`: the lowest `w` bits set.
    pub fn with_bit_mask(w: u64) -> SignedInt {
        SignedInt::raw(Sign::NonNegative, bits::with_bit_mask(w))
    }

    /// A run of `w` one bits starting at bit `i`.
    pub fn with_indexed_bit_mask(i: u64, w: u64) -> SignedInt {
        SignedInt::raw(Sign::NonNegative, bits::with_indexed_bit_mask(i, w))
    }

    /// `n!`. The result's bit length is pre-estimated with Stirling's
    /// series (including the `1/(12n ln 2)` correction); if the estimated
    /// limb count overflows a 32-bit counter the call fails before
    /// allocating anything.
    pub fn factorial(n: u32) -> Result<SignedInt, MagiaError> {
        if n < 2 {
            return Ok(SignedInt::one());
        }
        let nf = n as f64;
        let ln2 = core::f64::consts::LN_2;
        let est_bits = nf * (nf.ln() - 1.0) / ln2
            + 0.5 * (2.0 * core::f64::consts::PI * nf).ln() / ln2
            + 1.0 / (12.0 * nf * ln2)
            + 1.0;
        let est_limbs = (est_bits / 32.0).ceil() + 1.0;
        if est_limbs >= u32::MAX as f64 {
            return Err(MagiaError::Overflow);
        }
        let mut acc = Accumulator::with_capacity(est_limbs as usize);
        acc.set_small(1u32);
        for k in 2..=n {
            acc *= k;
        }
        Ok(acc.to_signed_int())
    }

    /// Greatest common divisor of the absolute values; `gcd(a, 0) = |a|`.
    pub fn gcd(a: &SignedInt, b: &SignedInt) -> SignedInt {
        SignedInt::raw(Sign::NonNegative, gcd::gcd(&a.mag, &b.mag))
    }

    /// Least common multiple of the absolute values; zero if either is.
    pub fn lcm(a: &SignedInt, b: &SignedInt) -> SignedInt {
        if a.is_zero() || b.is_zero() {
            return SignedInt::ZERO;
        }
        let g = gcd::gcd(&a.mag, &b.mag);
        let prod = arith::mul(&a.mag, &b.mag);
        let (q, _) = div::div_rem(&prod, &g);
        SignedInt::raw(Sign::NonNegative, q)
    }

    // ------------------------------------------------------------------
    // Predicates and structure
    // ------------------------------------------------------------------

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mag.is_empty()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.sign.is_negative()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        !self.mag.is_empty() && !self.sign.is_negative()
    }

    pub fn is_even(&self) -> bool {
        self.mag.first().map_or(true, |&l| l & 1 == 0)
    }

    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }

    /// `0`, `1`, or `-1`.
    pub fn signum(&self) -> i32 {
        if self.is_zero() {
            0
        } else {
            self.sign.neg1_or_1()
        }
    }

    pub fn abs(&self) -> SignedInt {
        SignedInt::raw(Sign::NonNegative, self.mag.clone())
    }

    /// Magnitude bit length; zero for the zero value.
    pub fn bit_len(&self) -> u64 {
        bits::bit_len(&self.mag)
    }

    /// Two's-complement bit length excluding the sign bit: `-1` has length
    /// 0 and `-2^7` has length 7.
    pub fn twos_complement_bit_len(&self) -> u64 {
        bits::bit_len_twos_complement(self.sign, &self.mag)
    }

    /// Index of the lowest set magnitude bit, `-1` for zero by convention.
    pub fn trailing_zeros(&self) -> i64 {
        bits::trailing_zeros(&self.mag)
    }

    /// Number of set bits in the magnitude.
    pub fn count_ones(&self) -> u64 {
        bits::count_ones(&self.mag)
    }

    /// Tests magnitude bit `i`; bits past the top read as zero.
    pub fn test_bit(&self, i: u64) -> bool {
        bits::test_bit(&self.mag, i)
    }

    /// A copy of the value with magnitude bit `i` set.
    pub fn set_bit(&self, i: u64) -> SignedInt {
        SignedInt::raw(self.sign, bits::or(&self.mag, &bits::with_set_bit(i)))
    }

    // ------------------------------------------------------------------
    // Algebra beyond the operators
    // ------------------------------------------------------------------

    /// Quotient and remainder in one division; the quotient truncates
    /// toward zero and the remainder takes the dividend's sign.
    pub fn div_rem(&self, rhs: &SignedInt) -> Result<(SignedInt, SignedInt), MagiaError> {
        if rhs.is_zero() {
            return Err(MagiaError::DivisionByZero);
        }
        let (q, r) = div::div_rem(&self.mag, &rhs.mag);
        Ok((
            SignedInt::raw(self.sign.xor(rhs.sign), q),
            SignedInt::raw(self.sign, r),
        ))
    }

    pub fn checked_div(&self, rhs: &SignedInt) -> Result<SignedInt, MagiaError> {
        Ok(self.div_rem(rhs)?.0)
    }

    pub fn checked_rem(&self, rhs: &SignedInt) -> Result<SignedInt, MagiaError> {
        Ok(self.div_rem(rhs)?.1)
    }

    /// `self * self`, through the dedicated squaring path.
    pub fn sqr(&self) -> SignedInt {
        SignedInt::raw(Sign::NonNegative, arith::sqr(&self.mag))
    }

    /// `self^exp` by binary exponentiation. Exponents 0, 1, and 2 and
    /// bases of magnitude 1 or 2 short-circuit.
    pub fn pow(&self, exp: u32) -> SignedInt {
        let result_sign = if self.sign.is_negative() && exp & 1 == 1 {
            Sign::Negative
        } else {
            Sign::NonNegative
        };
        match exp {
            0 => return SignedInt::one(),
            1 => return self.clone(),
            2 => return self.sqr(),
            _ => {}
        }
        if self.mag.is_empty() {
            return SignedInt::ZERO;
        }
        if self.mag == [1] {
            return SignedInt::raw(result_sign, vec![1]);
        }
        if self.mag == [2] {
            return SignedInt::raw(result_sign, bits::with_set_bit(exp as u64));
        }

        let mut base = self.mag.clone();
        let mut acc: Option<Vec<u32>> = None;
        let mut e = exp;
        loop {
            if e & 1 == 1 {
                acc = Some(match acc {
                    Some(a) => arith::mul(&a, &base),
                    None => base.clone(),
                });
            }
            e >>= 1;
            if e == 0 {
                break;
            }
            base = arith::sqr(&base);
        }
        // exp >= 3 always sets at least one bit.
        SignedInt::raw(result_sign, acc.unwrap_or_default())
    }

    /// `floor(sqrt(self))`; negative input is an error.
    pub fn isqrt(&self) -> Result<SignedInt, MagiaError> {
        if self.sign.is_negative() {
            return Err(MagiaError::out_of_range(self, "isqrt of a negative value"));
        }
        Ok(SignedInt::raw(Sign::NonNegative, sqrt::isqrt(&self.mag)))
    }

    // ------------------------------------------------------------------
    // Text and binary output
    // ------------------------------------------------------------------

    /// Uppercase hex rendering: `["-"]"0x"` followed by the nibbles.
    pub fn to_hex_string(&self) -> String {
        radix::to_hex_string(self.sign, &self.mag)
    }

    /// Minimal-length byte encoding.
    pub fn to_binary_bytes(&self, twos_complement: bool, big_endian: bool) -> Vec<u8> {
        // Minimal length never errors.
        bytes::to_bytes(self.sign, &self.mag, twos_complement, big_endian, 0)
            .unwrap_or_default()
    }

    /// Byte encoding padded (sign-extended) out to `len` bytes; fails when
    /// `len` cannot hold the minimal encoding.
    pub fn to_binary_bytes_padded(
        &self,
        twos_complement: bool,
        big_endian: bool,
        len: usize,
    ) -> Result<Vec<u8>, MagiaError> {
        bytes::to_bytes(self.sign, &self.mag, twos_complement, big_endian, len)
    }

    /// Fills `dest` with the encoding, sign-extending past the magnitude;
    /// returns the number of bytes written (always `dest.len()`).
    pub fn write_binary_bytes(
        &self,
        twos_complement: bool,
        big_endian: bool,
        dest: &mut [u8],
    ) -> Result<usize, MagiaError> {
        if dest.len() < bytes::min_byte_len(self.sign, &self.mag, twos_complement) {
            return Err(MagiaError::InvalidArgument(
                "destination shorter than the minimal encoding",
            ));
        }
        bytes::write_bytes(self.sign, &self.mag, twos_complement, big_endian, dest);
        Ok(dest.len())
    }

    // ------------------------------------------------------------------
    // Random values
    // ------------------------------------------------------------------

    /// Uniform on `(-2^n, 2^n)` when `random_sign` is set, else `[0, 2^n)`.
    /// Zero keeps its canonical form, so it is twice as likely as any given
    /// non-zero magnitude when a random sign is requested.
    pub fn random_with_max_bit_len_from<R: RngCore + ?Sized>(
        rng: &mut R,
        n: u64,
        random_sign: bool,
    ) -> SignedInt {
        let mag = random::random_with_max_bit_len(rng, n);
        SignedInt::finish_random(rng, mag, random_sign)
    }

    /// Magnitude uniform on `[2^(n-1), 2^n)`: exactly `n` significant bits.
    pub fn random_with_bit_len_from<R: RngCore + ?Sized>(
        rng: &mut R,
        n: u64,
        random_sign: bool,
    ) -> SignedInt {
        let mag = random::random_with_bit_len(rng, n);
        SignedInt::finish_random(rng, mag, random_sign)
    }

    /// Picks a bit length uniformly in `[1, max_n]`, then a magnitude of
    /// exactly that length.
    pub fn random_with_random_bit_len_from<R: RngCore + ?Sized>(
        rng: &mut R,
        max_n: u64,
        random_sign: bool,
    ) -> SignedInt {
        if max_n == 0 {
            return SignedInt::ZERO;
        }
        let n = rng.next_u64() % max_n + 1;
        SignedInt::random_with_bit_len_from(rng, n, random_sign)
    }

    /// Magnitude uniform on `[0, |m|)` by rejection sampling; `m` must be
    /// non-zero.
    pub fn random_below_from<R: RngCore + ?Sized>(
        rng: &mut R,
        m: &SignedInt,
        random_sign: bool,
    ) -> Result<SignedInt, MagiaError> {
        if m.is_zero() {
            return Err(MagiaError::InvalidArgument(
                "random_below needs a non-zero bound",
            ));
        }
        let mag = random::random_below(rng, &m.mag);
        Ok(SignedInt::finish_random(rng, mag, random_sign))
    }

    /// [`random_with_max_bit_len_from`](Self::random_with_max_bit_len_from)
    /// with the thread-local generator.
    pub fn random_with_max_bit_len(n: u64, random_sign: bool) -> SignedInt {
        SignedInt::random_with_max_bit_len_from(&mut rand::thread_rng(), n, random_sign)
    }

    /// [`random_with_bit_len_from`](Self::random_with_bit_len_from) with
    /// the thread-local generator.
    pub fn random_with_bit_len(n: u64, random_sign: bool) -> SignedInt {
        SignedInt::random_with_bit_len_from(&mut rand::thread_rng(), n, random_sign)
    }

    /// [`random_with_random_bit_len_from`](Self::random_with_random_bit_len_from)
    /// with the thread-local generator.
    pub fn random_with_random_bit_len(max_n: u64, random_sign: bool) -> SignedInt {
        SignedInt::random_with_random_bit_len_from(&mut rand::thread_rng(), max_n, random_sign)
    }

    /// [`random_below_from`](Self::random_below_from) with the thread-local
    /// generator.
    pub fn random_below(m: &SignedInt, random_sign: bool) -> Result<SignedInt, MagiaError> {
        SignedInt::random_below_from(&mut rand::thread_rng(), m, random_sign)
    }

    fn finish_random<R: RngCore + ?Sized>(
        rng: &mut R,
        mag: Vec<u32>,
        random_sign: bool,
    ) -> SignedInt {
        if mag.is_empty() {
            return SignedInt::ZERO;
        }
        let sign = if random_sign && rng.next_u32() & 1 == 1 {
            Sign::Negative
        } else {
            Sign::NonNegative
        };
        SignedInt::raw(sign, mag)
    }

    // ------------------------------------------------------------------
    // Shared sign-rule cores, also driving the primitive overloads
    // ------------------------------------------------------------------

    pub(crate) fn add_with_sign(ls: Sign, lm: &[u32], rs: Sign, rm: &[u32]) -> SignedInt {
        if lm.is_empty() {
            return SignedInt::raw(rs, rm.to_vec());
        }
        if rm.is_empty() {
            return SignedInt::raw(ls, lm.to_vec());
        }
        if ls == rs {
            return SignedInt::raw(ls, arith::add(lm, rm));
        }
        match magia::cmp(lm, rm) {
            Ordering::Equal => SignedInt::ZERO,
            Ordering::Greater => SignedInt::raw(ls, arith::sub(lm, rm)),
            Ordering::Less => SignedInt::raw(rs, arith::sub(rm, lm)),
        }
    }

    pub(crate) fn cmp_with_sign(&self, rs: Sign, rm: &[u32]) -> Ordering {
        match (self.sign, rs) {
            (Sign::NonNegative, Sign::Negative) => Ordering::Greater,
            (Sign::Negative, Sign::NonNegative) => Ordering::Less,
            (Sign::NonNegative, Sign::NonNegative) => magia::cmp(&self.mag, rm),
            (Sign::Negative, Sign::Negative) => magia::cmp(rm, &self.mag),
        }
    }

    pub(crate) fn cmp_small(&self, rhs: (Sign, u64)) -> Ordering {
        let (rs, rm) = rhs;
        let (limbs, n) = small_limbs(rm);
        self.cmp_with_sign(rs, &limbs[..n])
    }
}

impl Default for SignedInt {
    fn default() -> Self {
        SignedInt::ZERO
    }
}

impl fmt::Display for SignedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&radix::to_decimal_string(self.sign, &self.mag))
    }
}

impl fmt::Debug for SignedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignedInt({self})")
    }
}

impl FromStr for SignedInt {
    type Err = MagiaError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        SignedInt::from_decimal_str(text)
    }
}

impl Hash for SignedInt {
    /// Combines the sign flag with a polynomial hash of the normalized
    /// magnitude limbs; consistent with `Eq` because magnitudes are stored
    /// normalized.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut h: u64 = 1;
        for &limb in &self.mag {
            h = h.wrapping_mul(31).wrapping_add(limb as u64);
        }
        state.write_i32(self.sign.neg1_or_1());
        state.write_u64(h);
    }
}

impl Ord for SignedInt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_with_sign(other.sign, &other.mag)
    }
}

impl PartialOrd for SignedInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl num_traits::Zero for SignedInt {
    fn zero() -> Self {
        SignedInt::ZERO
    }

    fn is_zero(&self) -> bool {
        self.mag.is_empty()
    }
}

impl num_traits::One for SignedInt {
    fn one() -> Self {
        SignedInt::one()
    }
}

impl core::iter::Sum for SignedInt {
    fn sum<I: Iterator<Item = SignedInt>>(iter: I) -> SignedInt {
        iter.fold(SignedInt::ZERO, |acc, v| acc + v)
    }
}

impl<'a> core::iter::Sum<&'a SignedInt> for SignedInt {
    fn sum<I: Iterator<Item = &'a SignedInt>>(iter: I) -> SignedInt {
        iter.fold(SignedInt::ZERO, |acc, v| acc + v)
    }
}

impl core::iter::Product for SignedInt {
    fn product<I: Iterator<Item = SignedInt>>(iter: I) -> SignedInt {
        iter.fold(SignedInt::one(), |acc, v| acc * v)
    }
}

impl<'a> core::iter::Product<&'a SignedInt> for SignedInt {
    fn product<I: Iterator<Item = &'a SignedInt>>(iter: I) -> SignedInt {
        iter.fold(SignedInt::one(), |acc, v| acc * v)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SignedInt {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SignedInt {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
