//! Magnitude integer square root: top-word seed + Newton iteration.

use super::bits::{bit_len, extract_u64_at_bit, shl};
use super::{arith, cmp, div, to_u64, trim};
use core::cmp::Ordering;

/// `floor(sqrt(x))` of a magnitude.
///
/// Values of at most 53 bits fit an IEEE double exactly and take the
/// hardware square root with two branch-free corrections. Larger values
/// seed Newton's method from the square root of a 64-bit top window; the
/// iterate decreases monotonically and stops at the floor.
pub(crate) fn isqrt(x: &[u32]) -> Vec<u32> {
    let bits = bit_len(x);
    if bits == 0 {
        return Vec::new();
    }
    if bits <= 53 {
        let r = isqrt_u64(to_u64(x));
        return trim(vec![r as u32, (r >> 32) as u32]);
    }

    // Even split point just below the double-exact range. The +2 covers one
    // unit of uncertainty from the discarded low bits and one unit of
    // downward rounding in the hardware sqrt.
    let top_index = (bits - 52) & !1;
    let top = extract_u64_at_bit(x, top_index) + 2;
    let mut top_sqrt = (top as f64).sqrt() as u64;
    if top_sqrt * top_sqrt < top {
        top_sqrt += 1;
    }

    let (tl, tn) = super::small_limbs(top_sqrt);
    let mut cur = shl(&tl[..tn], top_index / 2);

    loop {
        let (q, _) = div::div_rem(x, &cur);
        let next = half_sum_floor(&q, &cur);
        if cmp(&next, &cur) != Ordering::Less {
            return cur;
        }
        cur = next;
    }
}

/// `floor(sqrt(n))` for a value that fits 53 bits exactly in a double.
fn isqrt_u64(n: u64) -> u64 {
    let mut r = (n as f64).sqrt() as u64;
    // At most two upward fixes, then at most one downward: each test reads
    // the sign bit of the wrapped difference.
    r += (r * r).wrapping_sub(n) >> 63;
    r += (r * r).wrapping_sub(n) >> 63;
    r -= n.wrapping_sub(r * r) >> 63;
    debug_assert!(r * r <= n && n < (r + 1) * (r + 1));
    r
}

/// `floor((a + b) / 2)`: limb-wise add keeping the carry-out, shift right
/// one, and fold the carry back into the top bit so odd sums round down.
fn half_sum_floor(a: &[u32], b: &[u32]) -> Vec<u32> {
    let sum = arith::add(a, b);
    let mut out = Vec::with_capacity(sum.len());
    let mut high = 0u32;
    for &limb in sum.iter().rev() {
        out.push((limb >> 1) | (high << 31));
        high = limb & 1;
    }
    out.reverse();
    trim(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_u128(v: u128) -> Vec<u32> {
        let mut out = Vec::new();
        let mut v = v;
        while v != 0 {
            out.push(v as u32);
            v >>= 32;
        }
        out
    }

    fn to_u128(x: &[u32]) -> u128 {
        x.iter()
            .rev()
            .fold(0u128, |acc, &l| (acc << 32) | l as u128)
    }

    #[test]
    fn small_regime_is_exact_at_the_seams() {
        for n in [0u64, 1, 2, 3, 4, 8, 9, 15, 16, 24, 25, 26, 1 << 52] {
            let r = to_u128(&isqrt(&from_u128(n as u128))) as u64;
            assert!(r * r <= n, "n = {n}");
            assert!((r + 1) * (r + 1) > n, "n = {n}");
        }
    }

    #[test]
    fn fifty_three_bit_square_roots_exactly() {
        // 89515880^2 has bit length 53.
        let n = from_u128(89_515_880u128 * 89_515_880);
        assert_eq!(to_u128(&isqrt(&n)), 89_515_880);
        let n1 = from_u128(89_515_880u128 * 89_515_880 - 1);
        assert_eq!(to_u128(&isqrt(&n1)), 89_515_879);
    }

    #[test]
    fn large_regime_brackets_the_root() {
        let values: [u128; 5] = [
            1 << 54,
            (1 << 60) - 1,
            u64::MAX as u128 + 1,
            u128::MAX >> 1,
            u128::MAX,
        ];
        for v in values {
            let r = to_u128(&isqrt(&from_u128(v)));
            assert!(r * r <= v, "v = {v}");
            assert!(
                r.checked_add(1)
                    .and_then(|r1| r1.checked_mul(r1))
                    .map_or(true, |sq| sq > v),
                "v = {v}"
            );
        }
    }

    #[test]
    fn perfect_squares_of_multi_limb_values() {
        let root = from_u128(0xDEAD_BEEF_CAFE_BABE_1234_5678u128);
        let square = arith::sqr(&root);
        assert_eq!(isqrt(&square), root);
        let minus_one = arith::sub(&square, &[1]);
        let r = isqrt(&minus_one);
        assert_eq!(to_u128(&r), 0xDEAD_BEEF_CAFE_BABE_1234_5678u128 - 1);
    }
}
