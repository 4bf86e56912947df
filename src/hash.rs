//! Legacy float hashing.
//!
//! Whole-number keys hash to their integer value. Other keys are split into
//! a mantissa in `[0.5, 1)` and an exponent; the mantissa is expanded into
//! two 31-bit chunks and the exponent is folded in above bit 15. All
//! arithmetic wraps in `u64`, and out-of-range float-to-int casts saturate.

/// Scale applied to the mantissa chunks (2^31).
const CHUNK_SCALE: f64 = 2147483648.0;

/// 2^64, used to lift subnormals into the normal range in [`frexp`].
const SUBNORMAL_LIFT: f64 = 18446744073709551616.0;

/// Split `x` into `(m, e)` with `x == m * 2^e` and `0.5 <= |m| < 1`.
///
/// Zero, infinities and NaN are returned unchanged with exponent 0.
pub fn frexp(x: f64) -> (f64, i32) {
    if x == 0.0 || !x.is_finite() {
        return (x, 0);
    }
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    if biased == 0 {
        let (m, e) = frexp(x * SUBNORMAL_LIFT);
        return (m, e - 64);
    }
    let mantissa = (bits & 0x800f_ffff_ffff_ffff) | (1022u64 << 52);
    (f64::from_bits(mantissa), biased - 1022)
}

/// Hash an `f64` key.
pub fn hash_f64(v: f64) -> u64 {
    if v.fract() == 0.0 {
        return v as i64 as u64;
    }
    let (m, e) = frexp(v);
    let scaled = m * CHUNK_SCALE;
    let hi = scaled as i64;
    let lo = ((scaled - hi as f64) * CHUNK_SCALE) as i64;
    (hi as u64)
        .wrapping_add(lo as u64)
        .wrapping_add(i64::from(e << 15) as u64)
}

/// Hash an ordered `(f64, f64)` pair by combining the element hashes.
///
/// Never returns `-1` reinterpreted as `u64`.
pub fn hash_f64_pair(a: f64, b: f64) -> u64 {
    let mut mult: i64 = 1_000_003;
    let mut x: i64 = 0x345678;
    for (len, v) in [(1i64, a), (0, b)] {
        let y = hash_f64(v) as i64;
        x = (x ^ y).wrapping_mul(mult);
        mult = mult.wrapping_add(82520 + len + len);
    }
    x = x.wrapping_add(97531);
    if x == -1 {
        x = -2;
    }
    x as u64
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f64 {}
    impl Sealed for (f64, f64) {}
}

/// Key types the table engine can store. Equality is exact (`==`), so a NaN
/// key never matches anything, itself included.
pub trait TableKey: Copy + PartialEq + sealed::Sealed {
    fn table_hash(&self) -> u64;
}

impl TableKey for f64 {
    #[inline]
    fn table_hash(&self) -> u64 {
        hash_f64(*self)
    }
}

impl TableKey for (f64, f64) {
    #[inline]
    fn table_hash(&self) -> u64 {
        hash_f64_pair(self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn frexp_normalizes_mantissa() {
        assert_eq!(frexp(1.0), (0.5, 1));
        assert_eq!(frexp(1.5), (0.75, 1));
        assert_eq!(frexp(0.75), (0.75, 0));
        assert_eq!(frexp(-6.0), (-0.75, 3));
        assert_eq!(frexp(0.0), (0.0, 0));

        let tiny = f64::from_bits(1); // smallest subnormal, 2^-1074
        assert_eq!(frexp(tiny), (0.5, -1073));
    }

    #[test]
    fn whole_numbers_hash_to_their_value() {
        assert_eq!(hash_f64(3.0), 3);
        assert_eq!(hash_f64(0.0), 0);
        assert_eq!(hash_f64(-0.0), 0);
        assert_eq!(hash_f64(-2.0), (-2i64) as u64);
        // saturating cast for values past i64 range
        assert_eq!(hash_f64(1e300), i64::MAX as u64);
    }

    #[test]
    fn fractional_keys_fold_mantissa_and_exponent() {
        // 0.75 = 0.75 * 2^0: high chunk only.
        assert_eq!(hash_f64(0.75), 1_610_612_736);
        // 1.5 = 0.75 * 2^1: exponent lands at bit 15.
        assert_eq!(hash_f64(1.5), 1_610_612_736 + (1 << 15));
        // 2.75 = 0.6875 * 2^2
        assert_eq!(hash_f64(2.75), 1_476_395_008 + (2 << 15));
        // 0.5 + 2^-40: low chunk carries the bits below 2^-31.
        let v = 0.5 + 2f64.powi(-40);
        assert_eq!(hash_f64(v), (1u64 << 30) + (1u64 << 22));
        // negative mantissa wraps
        assert_eq!(hash_f64(-0.5), (-1_073_741_824i64) as u64);
    }

    #[test]
    fn pair_hash_is_order_sensitive_and_stable() {
        assert_eq!(hash_f64_pair(1.0, 2.0), hash_f64_pair(1.0, 2.0));
        assert_ne!(hash_f64_pair(1.0, 2.0), hash_f64_pair(2.0, 1.0));
        assert_ne!(hash_f64_pair(0.5, 0.25), hash_f64_pair(0.25, 0.5));
        assert_eq!((1.0f64, 2.0f64).table_hash(), hash_f64_pair(1.0, 2.0));
        assert_eq!(2.5f64.table_hash(), hash_f64(2.5));
    }
}
