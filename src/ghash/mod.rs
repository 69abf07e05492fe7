//! GF(2^128) multiplication for GHASH, via PCLMULQDQ.
//!
//! Ported from the reference `addmul` (single-block multiply-accumulate,
//! with byte masking for a partial trailing block) and `mulv` (pure
//! multiply, used only to pre-compute the powers of `H`). Both follow the
//! carry-less-multiplication reduction technique from Intel's
//! "Carry-Less Multiplication and Its Usage for Computing the GCM Mode"
//! white paper, reduction polynomial `x^128 + x^7 + x^2 + x + 1`.

pub(crate) mod batch;

pub(crate) use batch::reduce4;

use core::arch::x86_64::*;

const BYTE_REV: [i8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

#[inline(always)]
unsafe fn rev_mask() -> __m128i {
    _mm_set_epi8(
        BYTE_REV[0],
        BYTE_REV[1],
        BYTE_REV[2],
        BYTE_REV[3],
        BYTE_REV[4],
        BYTE_REV[5],
        BYTE_REV[6],
        BYTE_REV[7],
        BYTE_REV[8],
        BYTE_REV[9],
        BYTE_REV[10],
        BYTE_REV[11],
        BYTE_REV[12],
        BYTE_REV[13],
        BYTE_REV[14],
        BYTE_REV[15],
    )
}

/// Multiplies two already byte-reversed, reduction-ready 128-bit values in
/// GF(2^128) and returns the (still byte-reversed) product. Used only to
/// build the powers `H^2`, `H^3`, `H^4` of the hash subkey.
#[target_feature(enable = "pclmul", enable = "sse2")]
pub(crate) unsafe fn gf_mul(a: __m128i, b: __m128i) -> __m128i {
    gf_mul_core(a, b)
}

/// Carries out the modular reduction shared by [`gf_mul`] and
/// [`batch::reduce4`], given the 256-bit product split as (low-ish,
/// high-ish) halves already combined with the middle cross terms.
#[inline(always)]
unsafe fn reduce(tmp15: __m128i, tmp17: __m128i) -> __m128i {
    let tmp7 = _mm_srli_epi32::<31>(tmp15);
    let tmp8 = _mm_srli_epi32::<31>(tmp17);
    let tmp16 = _mm_slli_epi32::<1>(tmp15);
    let tmp18 = _mm_slli_epi32::<1>(tmp17);
    let tmp9 = _mm_srli_si128::<12>(tmp7);
    let tmp22 = _mm_slli_si128::<4>(tmp8);
    let tmp25 = _mm_slli_si128::<4>(tmp7);
    let tmp29 = _mm_or_si128(tmp16, tmp25);
    let tmp19 = _mm_or_si128(tmp18, tmp22);
    let tmp20 = _mm_or_si128(tmp19, tmp9);
    let tmp26 = _mm_slli_epi32::<31>(tmp29);
    let tmp23 = _mm_slli_epi32::<30>(tmp29);
    let tmp32 = _mm_slli_epi32::<25>(tmp29);
    let tmp27 = _mm_xor_si128(tmp26, tmp23);
    let tmp28 = _mm_xor_si128(tmp27, tmp32);
    let tmp24 = _mm_srli_si128::<4>(tmp28);
    let tmp33 = _mm_slli_si128::<12>(tmp28);
    let tmp30 = _mm_xor_si128(tmp29, tmp33);
    let tmp2 = _mm_srli_epi32::<1>(tmp30);
    let tmp12 = _mm_srli_epi32::<2>(tmp30);
    let tmp14 = _mm_srli_epi32::<7>(tmp30);
    let tmp34 = _mm_xor_si128(tmp2, tmp12);
    let tmp35 = _mm_xor_si128(tmp34, tmp14);
    let tmp36 = _mm_xor_si128(tmp35, tmp24);
    let tmp31 = _mm_xor_si128(tmp30, tmp36);

    _mm_xor_si128(tmp20, tmp31)
}

/// Byte-reverses `a` and multiplies it by already-reversed `h`, adding the
/// result into `c` (the running GHASH accumulator, also byte-reversed).
/// `xlen` bytes of `a` are meaningful; any remaining high-order bytes are
/// masked to zero, matching GHASH's implicit zero-padding of a short final
/// block.
#[target_feature(enable = "pclmul", enable = "sse2", enable = "sse4.1")]
pub(crate) unsafe fn gf_mul_accum(c: &mut [u8; 16], a: &[u8; 16], xlen: usize, h: __m128i) {
    let rev = rev_mask();
    let mut av = _mm_shuffle_epi8(_mm_loadu_si128(a.as_ptr() as *const __m128i), rev);

    if xlen < 16 {
        let shift = ((16 - xlen) % 8) * 8;
        let mask = !0u64 ^ ((1u64 << shift) - 1);
        let vm = if xlen > 8 {
            _mm_insert_epi64::<0>(_mm_set1_epi32(-1), mask as i64)
        } else {
            _mm_insert_epi64::<1>(_mm_setzero_si128(), mask as i64)
        };
        av = _mm_and_si128(vm, av);
    }

    let cv = _mm_loadu_si128(c.as_ptr() as *const __m128i);
    av = _mm_xor_si128(av, cv);

    let result = gf_mul_core(av, h);
    _mm_storeu_si128(c.as_mut_ptr() as *mut __m128i, result);
}

/// The multiply-and-reduce core shared between [`gf_mul_accum`] and
/// [`gf_mul`] once both operands are already prepared (accumulated/byte
/// reversed as needed).
#[inline(always)]
unsafe fn gf_mul_core(a: __m128i, b: __m128i) -> __m128i {
    let tmp3 = _mm_clmulepi64_si128::<0x00>(a, b);
    let tmp4 = _mm_clmulepi64_si128::<0x10>(a, b);
    let tmp5 = _mm_clmulepi64_si128::<0x01>(a, b);
    let tmp6 = _mm_clmulepi64_si128::<0x11>(a, b);
    let tmp10 = _mm_xor_si128(tmp4, tmp5);
    let tmp13 = _mm_slli_si128::<8>(tmp10);
    let tmp11 = _mm_srli_si128::<8>(tmp10);
    let tmp15 = _mm_xor_si128(tmp3, tmp13);
    let tmp17 = _mm_xor_si128(tmp6, tmp11);

    reduce(tmp15, tmp17)
}

/// Byte-reverses the in-memory hash subkey `h` into the representation
/// every GHASH routine in this module operates on.
#[target_feature(enable = "sse2", enable = "ssse3")]
pub(crate) unsafe fn byte_reverse(h: &[u8; 16]) -> __m128i {
    _mm_shuffle_epi8(_mm_loadu_si128(h.as_ptr() as *const __m128i), rev_mask())
}

#[inline(always)]
pub(crate) unsafe fn load_block(b: &[u8; 16]) -> __m128i {
    _mm_loadu_si128(b.as_ptr() as *const __m128i)
}

#[inline(always)]
pub(crate) unsafe fn store_block(dst: &mut [u8; 16], v: __m128i) {
    _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, v);
}
