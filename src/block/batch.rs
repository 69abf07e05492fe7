//! Eight-block-wide AES-256 encryption, used to generate one batch of CTR
//! keystream per call.
//!
//! Ported from the reference `FUNC(8, MAKE8)` instantiation
//! (`aesni_encrypt8`): the eight blocks are carried in independent
//! registers so the round-key loads and `aesenc` chain are shared across
//! all eight, keeping the AES-NI pipeline full.

use super::{load, store, ROUNDS};
use core::arch::x86_64::*;

/// Encrypts eight independent 16-byte blocks under the same round keys.
/// Used both to produce keystream (the caller XORs the result with
/// plaintext/ciphertext) and, for `H`'s powers aside, has no GHASH
/// involvement of its own -- that happens in the `ghash` module.
#[target_feature(enable = "aes,sse2")]
pub(crate) unsafe fn encrypt8(rkeys: &[[u8; 16]; ROUNDS], blocks: &[[u8; 16]; 8]) -> [[u8; 16]; 8] {
    let mut t: [__m128i; 8] = core::array::from_fn(|i| load(&blocks[i]));

    let k0 = load(&rkeys[0]);
    for v in t.iter_mut() {
        *v = _mm_xor_si128(*v, k0);
    }
    for rk in &rkeys[1..14] {
        let kr = load(rk);
        for v in t.iter_mut() {
            *v = _mm_aesenc_si128(*v, kr);
        }
    }
    let klast = load(&rkeys[14]);
    for v in t.iter_mut() {
        *v = _mm_aesenclast_si128(*v, klast);
    }

    let mut out = [[0u8; 16]; 8];
    for (o, v) in out.iter_mut().zip(t.iter()) {
        store(o, *v);
    }
    out
}

/// Same eight-lane keystream as [`encrypt8`], but XORs each lane with the
/// matching 16-byte block of `input` before storing. Ported from the
/// reference `aesni_encrypt8full`/`aesni_decrypt8full` (the XOR-with-input
/// step shared by both the encrypt and decrypt bulk loops -- only the
/// GHASH absorption that accompanies it differs between the two, and that
/// lives in the `aead` module, not here).
#[target_feature(enable = "aes,sse2")]
pub(crate) unsafe fn encrypt8_xor(
    rkeys: &[[u8; 16]; ROUNDS],
    blocks: &[[u8; 16]; 8],
    input: &[[u8; 16]; 8],
) -> [[u8; 16]; 8] {
    let mut t: [__m128i; 8] = core::array::from_fn(|i| load(&blocks[i]));

    let k0 = load(&rkeys[0]);
    for v in t.iter_mut() {
        *v = _mm_xor_si128(*v, k0);
    }
    for rk in &rkeys[1..14] {
        let kr = load(rk);
        for v in t.iter_mut() {
            *v = _mm_aesenc_si128(*v, kr);
        }
    }
    let klast = load(&rkeys[14]);
    for v in t.iter_mut() {
        *v = _mm_aesenclast_si128(*v, klast);
    }
    for (v, blk) in t.iter_mut().zip(input.iter()) {
        *v = _mm_xor_si128(*v, load(blk));
    }

    let mut out = [[0u8; 16]; 8];
    for (o, v) in out.iter_mut().zip(t.iter()) {
        store(o, *v);
    }
    out
}
