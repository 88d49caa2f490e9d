//! Random magnitude generation.

use super::{bits, cmp, trim, LIMB_BITS};
use core::cmp::Ordering;
use rand_core::RngCore;

/// Magnitude uniform on `[0, 2^n)`; each bit independent, so the result
/// may have fewer than `n` significant bits.
pub(crate) fn random_with_max_bit_len<R: RngCore + ?Sized>(rng: &mut R, n: u64) -> Vec<u32> {
    if n == 0 {
        return Vec::new();
    }
    let limbs = n.div_ceil(LIMB_BITS as u64) as usize;
    let mut out: Vec<u32> = (0..limbs).map(|_| rng.next_u32()).collect();
    let rest = (n % LIMB_BITS as u64) as u32;
    if rest != 0 {
        out[limbs - 1] &= (1u32 << rest) - 1;
    }
    trim(out)
}

/// Magnitude uniform on `[2^(n-1), 2^n)`: the top bit is forced on.
pub(crate) fn random_with_bit_len<R: RngCore + ?Sized>(rng: &mut R, n: u64) -> Vec<u32> {
    if n == 0 {
        return Vec::new();
    }
    let mut out = random_with_max_bit_len(rng, n);
    let limbs = n.div_ceil(LIMB_BITS as u64) as usize;
    out.resize(limbs, 0);
    out[limbs - 1] |= 1u32 << ((n - 1) % LIMB_BITS as u64);
    out
}

/// Magnitude uniform on `[0, m)` by rejection from the enclosing power of
/// two. `m` must be non-empty.
pub(crate) fn random_below<R: RngCore + ?Sized>(rng: &mut R, m: &[u32]) -> Vec<u32> {
    let n = bits::bit_len(m);
    debug_assert!(n > 0);
    loop {
        let candidate = random_with_max_bit_len(rng, n);
        if cmp(&candidate, m) == Ordering::Less {
            return candidate;
        }
    }
}
