//! Aggregated reduction: four GHASH multiply-accumulates folded into a
//! single modular reduction.
//!
//! Ported from the reference `reduce4`, attributed there to Krzysztof
//! Jankowski and Pierre Laurent (Intel). Given four byte-reversed blocks
//! `x0..x3` (already loaded in reverse call order, matching
//! `aesni_encrypt8full`'s `temp3, temp2, temp1, temp0` argument order) and
//! the corresponding powers `h0 = H^4 .. h3 = H^1`, computes
//! `acc' = (x3 + acc)*h3 + x2*h2 + x1*h1 + x0*h0` in GF(2^128), using one
//! Karatsuba-style middle-term multiply per block and one shared carry
//! propagation for all four products.
use core::arch::x86_64::*;

#[target_feature(enable = "pclmul", enable = "sse2", enable = "ssse3")]
pub(crate) unsafe fn reduce4(
    h0: __m128i,
    h1: __m128i,
    h2: __m128i,
    h3: __m128i,
    x0: __m128i,
    x1: __m128i,
    x2: __m128i,
    x3: __m128i,
    acc: __m128i,
) -> __m128i {
    let rev = _mm_set_epi8(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15);

    let x0 = _mm_shuffle_epi8(x0, rev);
    let x1 = _mm_shuffle_epi8(x1, rev);
    let x2 = _mm_shuffle_epi8(x2, rev);
    let x3 = _mm_shuffle_epi8(x3, rev);
    let x3 = _mm_xor_si128(x3, acc);

    let h0_x0_lo = _mm_clmulepi64_si128::<0x00>(h0, x0);
    let h1_x1_lo = _mm_clmulepi64_si128::<0x00>(h1, x1);
    let h2_x2_lo = _mm_clmulepi64_si128::<0x00>(h2, x2);
    let h3_x3_lo = _mm_clmulepi64_si128::<0x00>(h3, x3);
    let lo = _mm_xor_si128(_mm_xor_si128(h0_x0_lo, h1_x1_lo), _mm_xor_si128(h2_x2_lo, h3_x3_lo));

    let h0_x0_hi = _mm_clmulepi64_si128::<0x11>(h0, x0);
    let h1_x1_hi = _mm_clmulepi64_si128::<0x11>(h1, x1);
    let h2_x2_hi = _mm_clmulepi64_si128::<0x11>(h2, x2);
    let h3_x3_hi = _mm_clmulepi64_si128::<0x11>(h3, x3);
    let hi = _mm_xor_si128(_mm_xor_si128(h0_x0_hi, h1_x1_hi), _mm_xor_si128(h2_x2_hi, h3_x3_hi));

    // Karatsuba middle term: (h_lo+h_hi)*(x_lo+x_hi) for each of the 4 pairs.
    let mid = |h: __m128i, x: __m128i| -> __m128i {
        let hs = _mm_shuffle_epi32::<0x4e>(h);
        let xs = _mm_shuffle_epi32::<0x4e>(x);
        let hs = _mm_xor_si128(hs, h);
        let xs = _mm_xor_si128(xs, x);
        _mm_clmulepi64_si128::<0x00>(hs, xs)
    };
    let m0 = mid(h0, x0);
    let m1 = mid(h1, x1);
    let m2 = mid(h2, x2);
    let m3 = mid(h3, x3);

    let mut t = _mm_xor_si128(m0, lo);
    t = _mm_xor_si128(t, hi);
    t = _mm_xor_si128(m1, t);
    t = _mm_xor_si128(m2, t);
    t = _mm_xor_si128(m3, t);

    // Reduction, shared across all four products.
    let t_hi = _mm_slli_si128::<8>(t);
    let t_lo = _mm_srli_si128::<8>(t);
    let lo = _mm_xor_si128(t_hi, lo);
    let hi = _mm_xor_si128(t_lo, hi);

    let mut a = lo;
    let mut b = hi;
    let a_carry = _mm_srli_epi32::<31>(a);
    let b_carry = _mm_srli_epi32::<31>(b);
    a = _mm_slli_epi32::<1>(a);
    b = _mm_slli_epi32::<1>(b);
    let carry_into_b = _mm_srli_si128::<12>(a_carry);
    let b_carry_shifted = _mm_slli_si128::<4>(b_carry);
    let a_carry_shifted = _mm_slli_si128::<4>(a_carry);
    a = _mm_or_si128(a, a_carry_shifted);
    b = _mm_or_si128(b, b_carry_shifted);
    b = _mm_or_si128(b, carry_into_b);

    let r1 = _mm_slli_epi32::<31>(a);
    let r2 = _mm_slli_epi32::<30>(a);
    let r3 = _mm_slli_epi32::<25>(a);
    let mut r = _mm_xor_si128(r1, r2);
    r = _mm_xor_si128(r, r3);
    let r_hi = _mm_srli_si128::<4>(r);
    let r_lo = _mm_slli_si128::<12>(r);
    a = _mm_xor_si128(a, r_lo);

    let s1 = _mm_srli_epi32::<1>(a);
    let s2 = _mm_srli_epi32::<2>(a);
    let s3 = _mm_srli_epi32::<7>(a);
    let mut s = _mm_xor_si128(s1, s2);
    s = _mm_xor_si128(s, s3);
    s = _mm_xor_si128(s, r_hi);
    a = _mm_xor_si128(a, s);

    _mm_xor_si128(b, a)
}
