//! AES-256 block cipher core: key schedule and single/batched block
//! encryption via AES-NI.
//!
//! Mirrors `aesni_key256_expand` / `aesni_encrypt1` / `aesni_encrypt8` from
//! the reference AES256-GCM-AESNI implementation this crate is built from,
//! using stable `core::arch::x86_64` intrinsics instead of the compiler
//! builtins the reference C uses.

mod batch;

pub(crate) use batch::{encrypt8, encrypt8_xor};

use core::arch::x86_64::*;

/// Number of AES-256 round keys (14 rounds + the whitening key).
pub(crate) const ROUNDS: usize = 15;

/// Expands a 256-bit key into 15 round keys.
///
/// Ported from `aesni_key256_expand`: each Rcon step computes an
/// `aeskeygenassist` result once and stores the *other* half of the running
/// pair before folding that result in, which is why the loop below advances
/// two 128-bit round keys per Rcon rather than one. `block1` derives the
/// assist from `temp2` (word 3 of the result, `RotWord`+`SubWord`+Rcon),
/// stores the pre-update `temp2` and updates `temp0`; `block2` derives the
/// assist from the just-updated `temp0` (word 2, plain `SubWord` -- the
/// Rcon value is irrelevant here since it only perturbs words 1 and 3),
/// stores the pre-update `temp0` and updates `temp2`.
#[target_feature(enable = "aes,sse2")]
pub(crate) unsafe fn expand_round_keys(key: &[u8; 32]) -> [[u8; 16]; ROUNDS] {
    let mut rk = [[0u8; 16]; ROUNDS];

    let mut temp0 = _mm_loadu_si128(key.as_ptr() as *const __m128i);
    let mut temp2 = _mm_loadu_si128(key[16..].as_ptr() as *const __m128i);
    let mut idx = 0usize;

    store(&mut rk[idx], temp0);
    idx += 1;

    macro_rules! block1 {
        ($imm:literal) => {{
            let assist = _mm_aeskeygenassist_si128::<$imm>(temp2);
            store(&mut rk[idx], temp2);
            idx += 1;
            temp0 = propagate::<0xff>(temp0, assist);
        }};
    }

    macro_rules! block2 {
        ($imm:literal) => {{
            let assist = _mm_aeskeygenassist_si128::<$imm>(temp0);
            store(&mut rk[idx], temp0);
            idx += 1;
            temp2 = propagate::<0xaa>(temp2, assist);
        }};
    }

    macro_rules! round_pair {
        ($imm:literal) => {{
            block1!($imm);
            block2!($imm);
        }};
    }

    round_pair!(0x01);
    round_pair!(0x02);
    round_pair!(0x04);
    round_pair!(0x08);
    round_pair!(0x10);
    round_pair!(0x20);

    // Final half-round: only the first half of round 14 is needed.
    let assist = _mm_aeskeygenassist_si128::<0x40>(temp2);
    store(&mut rk[idx], temp2);
    idx += 1;
    temp0 = propagate::<0xff>(temp0, assist);
    store(&mut rk[idx], temp0);

    rk
}

/// Propagates the low 32 bits of `prev` across all four lanes via the
/// classic shift-xor chain, then folds in the selected word of `assist`.
/// Equivalent (bit for bit) to the `BLOCK1`/`BLOCK2` float-shuffle macros
/// in the reference implementation.
#[inline(always)]
unsafe fn propagate<const MASK: i32>(prev: __m128i, assist: __m128i) -> __m128i {
    let mut t = prev;
    t = _mm_xor_si128(t, _mm_slli_si128::<4>(t));
    t = _mm_xor_si128(t, _mm_slli_si128::<4>(t));
    t = _mm_xor_si128(t, _mm_slli_si128::<4>(t));
    let word = _mm_shuffle_epi32::<MASK>(assist);
    _mm_xor_si128(t, word)
}

#[inline(always)]
unsafe fn store(dst: &mut [u8; 16], v: __m128i) {
    _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, v);
}

#[inline(always)]
unsafe fn load(src: &[u8; 16]) -> __m128i {
    _mm_loadu_si128(src.as_ptr() as *const __m128i)
}

/// Single-block, by-the-book AES-256 encryption. Used for `H = AES(0)` and
/// for the tag mask `T = AES(J0)`; not used on the bulk data path, which
/// goes through [`encrypt8`] instead.
#[target_feature(enable = "aes,sse2")]
pub(crate) unsafe fn encrypt1(rkeys: &[[u8; 16]; ROUNDS], block: &[u8; 16]) -> [u8; 16] {
    let mut t = _mm_xor_si128(load(block), load(&rkeys[0]));
    for rk in &rkeys[1..14] {
        t = _mm_aesenc_si128(t, load(rk));
    }
    t = _mm_aesenclast_si128(t, load(&rkeys[14]));
    let mut out = [0u8; 16];
    store(&mut out, t);
    out
}
