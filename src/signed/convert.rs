//! Truncating, exact, and clamped conversions to the primitive widths,
//! plus the floating-point factory.

use super::SignedInt;
use crate::error::MagiaError;
use crate::magia::{bits, low_u64, small_limbs};
use crate::sign::Sign;

impl SignedInt {
    /// Low 64 bits of the two's-complement form: the value mod 2^64 with
    /// the sign reapplied.
    pub fn to_u64(&self) -> u64 {
        self.sign.apply_to_u64(low_u64(&self.mag))
    }

    pub fn to_i64(&self) -> i64 {
        self.to_u64() as i64
    }

    pub fn to_u32(&self) -> u32 {
        self.to_u64() as u32
    }

    pub fn to_i32(&self) -> i32 {
        self.to_u64() as i32
    }

    pub fn to_u64_exact(&self) -> Result<u64, MagiaError> {
        if self.sign.is_negative() || self.bit_len() > 64 {
            return Err(MagiaError::out_of_range(self, "u64"));
        }
        Ok(low_u64(&self.mag))
    }

    pub fn to_i64_exact(&self) -> Result<i64, MagiaError> {
        let low = low_u64(&self.mag);
        // i64::MIN is the one magnitude allowed to reach bit 63.
        let bound = if self.sign.is_negative() {
            1u64 << 63
        } else {
            i64::MAX as u64
        };
        if self.bit_len() > 64 || low > bound {
            return Err(MagiaError::out_of_range(self, "i64"));
        }
        Ok(self.sign.apply_to_u64(low) as i64)
    }

    pub fn to_u32_exact(&self) -> Result<u32, MagiaError> {
        if self.sign.is_negative() || self.bit_len() > 32 {
            return Err(MagiaError::out_of_range(self, "u32"));
        }
        Ok(low_u64(&self.mag) as u32)
    }

    pub fn to_i32_exact(&self) -> Result<i32, MagiaError> {
        let low = low_u64(&self.mag);
        let fits = if self.sign.is_negative() {
            low <= 1 << 31
        } else {
            low <= i32::MAX as u64
        };
        if self.bit_len() > 32 || !fits {
            return Err(MagiaError::out_of_range(self, "i32"));
        }
        Ok(self.sign.apply_to_u64(low) as i32)
    }

    pub fn to_u64_clamped(&self) -> u64 {
        if self.sign.is_negative() {
            0
        } else if self.bit_len() > 64 {
            u64::MAX
        } else {
            low_u64(&self.mag)
        }
    }

    pub fn to_i64_clamped(&self) -> i64 {
        self.to_i64_exact().unwrap_or(if self.sign.is_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    pub fn to_u32_clamped(&self) -> u32 {
        if self.sign.is_negative() {
            0
        } else if self.bit_len() > 32 {
            u32::MAX
        } else {
            low_u64(&self.mag) as u32
        }
    }

    pub fn to_i32_clamped(&self) -> i32 {
        self.to_i32_exact().unwrap_or(if self.sign.is_negative() {
            i32::MIN
        } else {
            i32::MAX
        })
    }

    /// Converts a double, truncating the fraction toward zero. `NaN` and
    /// the infinities collapse to canonical zero: a legacy contract this
    /// library preserves for compatibility.
    pub fn from_f64(x: f64) -> SignedInt {
        if !x.is_finite() {
            return SignedInt::ZERO;
        }
        let ax = x.abs();
        if ax < 1.0 {
            return SignedInt::ZERO;
        }
        let sign = if x.is_sign_negative() {
            Sign::Negative
        } else {
            Sign::NonNegative
        };
        let raw = ax.to_bits();
        // ax >= 1 rules out subnormals, so the implicit bit is set.
        let exp = ((raw >> 52) & 0x7FF) as i64 - 1075;
        let mantissa = (raw & ((1u64 << 52) - 1)) | (1u64 << 52);
        let (limbs, n) = small_limbs(mantissa);
        let mag = if exp >= 0 {
            bits::shl(&limbs[..n], exp as u64)
        } else {
            bits::shr(&limbs[..n], (-exp) as u64)
        };
        SignedInt::raw(sign, mag)
    }
}

macro_rules! impl_try_from_signed_int {
    ($($t:ty => $method:ident),* $(,)?) => {$(
        impl TryFrom<&SignedInt> for $t {
            type Error = MagiaError;
            fn try_from(v: &SignedInt) -> Result<$t, MagiaError> {
                v.$method()
            }
        }
        impl TryFrom<SignedInt> for $t {
            type Error = MagiaError;
            fn try_from(v: SignedInt) -> Result<$t, MagiaError> {
                v.$method()
            }
        }
    )*};
}

impl_try_from_signed_int! {
    i32 => to_i32_exact,
    u32 => to_u32_exact,
    i64 => to_i64_exact,
    u64 => to_u64_exact,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(s: &str) -> SignedInt {
        s.parse().unwrap()
    }

    #[test]
    fn truncating_conversions_wrap_mod_2_to_the_64() {
        let v = big("18446744073709551617"); // 2^64 + 1
        assert_eq!(v.to_u64(), 1);
        assert_eq!(v.to_i64(), 1);
        assert_eq!(big("-1").to_u64(), u64::MAX);
        assert_eq!(big("-1").to_i64(), -1);
        assert_eq!(big("4294967297").to_u32(), 1); // 2^32 + 1
        assert_eq!(big("-4294967297").to_i32(), -1);
    }

    #[test]
    fn exact_conversions_guard_the_range() {
        assert_eq!(big("9223372036854775807").to_i64_exact().unwrap(), i64::MAX);
        assert_eq!(big("-9223372036854775808").to_i64_exact().unwrap(), i64::MIN);
        assert!(big("9223372036854775808").to_i64_exact().is_err());
        assert!(big("-9223372036854775809").to_i64_exact().is_err());
        assert_eq!(big("18446744073709551615").to_u64_exact().unwrap(), u64::MAX);
        assert!(big("18446744073709551616").to_u64_exact().is_err());
        assert!(big("-1").to_u64_exact().is_err());
        assert_eq!(big("-2147483648").to_i32_exact().unwrap(), i32::MIN);
        assert!(big("2147483648").to_i32_exact().is_err());
        assert_eq!(big("0").to_u32_exact().unwrap(), 0);
    }

    #[test]
    fn exact_then_relift_is_identity() {
        for s in ["0", "1", "-1", "2147483647", "-2147483648", "4294967295"] {
            let v = big(s);
            if let Ok(w) = v.to_i64_exact() {
                assert_eq!(SignedInt::from(w), v);
            }
        }
    }

    #[test]
    fn clamped_conversions_saturate() {
        assert_eq!(big("18446744073709551616").to_u64_clamped(), u64::MAX);
        assert_eq!(big("-5").to_u64_clamped(), 0);
        assert_eq!(big("9223372036854775808").to_i64_clamped(), i64::MAX);
        assert_eq!(big("-9223372036854775809").to_i64_clamped(), i64::MIN);
        assert_eq!(big("5000000000").to_i32_clamped(), i32::MAX);
        assert_eq!(big("-5000000000").to_i32_clamped(), i32::MIN);
        assert_eq!(big("7").to_i32_clamped(), 7);
    }

    #[test]
    fn try_from_mirrors_exact() {
        assert_eq!(i32::try_from(&big("-7")).unwrap(), -7);
        assert!(u32::try_from(&big("-7")).is_err());
        assert_eq!(u64::try_from(big("42")).unwrap(), 42);
    }

    #[test]
    fn doubles_truncate_toward_zero() {
        assert_eq!(SignedInt::from_f64(0.0), SignedInt::ZERO);
        assert_eq!(SignedInt::from_f64(0.99), SignedInt::ZERO);
        assert_eq!(SignedInt::from_f64(-0.99), SignedInt::ZERO);
        assert_eq!(SignedInt::from_f64(1.0), SignedInt::one());
        assert_eq!(SignedInt::from_f64(-2.7), big("-2"));
        assert_eq!(SignedInt::from_f64(123456789.99), big("123456789"));
        assert_eq!(SignedInt::from_f64(2f64.powi(80)), SignedInt::with_set_bit(80));
    }

    #[test]
    fn non_finite_doubles_collapse_to_zero() {
        assert_eq!(SignedInt::from_f64(f64::NAN), SignedInt::ZERO);
        assert_eq!(SignedInt::from_f64(f64::INFINITY), SignedInt::ZERO);
        assert_eq!(SignedInt::from_f64(f64::NEG_INFINITY), SignedInt::ZERO);
    }
}
