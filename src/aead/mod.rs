//! The GCM composition: counter-mode keystream generation interleaved with
//! GHASH absorption over precomputed powers of `H`.
//!
//! Ported from the reference `crypto_aead_aes256gcm_aesni_encrypt_afternm`
//! / `_decrypt_afternm`: J0 and the tag mask, the AAD loop (64-byte
//! aggregated-reduction chunks plus a 16-byte remainder), the 128-byte
//! bulk loop (`aesni_encrypt8full` / `aesni_addmul8full` +
//! `aesni_decrypt8full`), the tail loop for partial 128-byte groups, and
//! tag finalization/verification.

#[cfg(test)]
mod tests;

use core::arch::x86_64::{_mm_setzero_si128, __m128i};

use zeroize::Zeroize;

use crate::block;
use crate::error::Error;
use crate::ghash::{byte_reverse, gf_mul, gf_mul_accum, load_block, reduce4, store_block};
use crate::state::ExpandedState;
use crate::TAG_BYTES;

/// The reference source's check (`mlen > 16 * 2^32`) is looser than the
/// NIST SP 800-38D bound of `2^39 - 256` bits of plaintext. We enforce the
/// tighter bound.
const MAX_PLAINTEXT_BYTES: u64 = (1u64 << 36) - 32;

/// Four powers of the (byte-reversed) hash subkey, precomputed once per
/// call and reused across AAD, bulk, and tail absorption.
struct HashPowers {
    h1: __m128i,
    h2: __m128i,
    h3: __m128i,
    h4: __m128i,
}

impl HashPowers {
    /// SAFETY: caller must have already confirmed `pclmul`/`sse2`/`ssse3`.
    unsafe fn derive(h: &[u8; 16]) -> (Self, [u8; 16]) {
        let h1 = byte_reverse(h);
        let h2 = gf_mul(h1, h1);
        let h3 = gf_mul(h2, h1);
        let h4 = gf_mul(h3, h1);
        let mut h1_bytes = [0u8; 16];
        store_block(&mut h1_bytes, h1);
        (HashPowers { h1, h2, h3, h4 }, h1_bytes)
    }
}

/// Builds J0 = nonce ‖ 0x00000001.
fn build_j0(nonce: &[u8; 12]) -> [u8; 16] {
    let mut j0 = [0u8; 16];
    j0[..12].copy_from_slice(nonce);
    j0[12..].copy_from_slice(&1u32.to_be_bytes());
    j0
}

/// Builds the 16-byte counter block `nonce ‖ be32(ctr)` fed to AES as CTR
/// input. This is the crate's concrete reading of the design note on
/// `COUNTER_INC2`/the raw 4-byte counter write: the counter is kept as a
/// native `u32`, incremented as an integer and written out in the correct
/// endianness right before each AES call, rather than aliasing a 32-bit
/// word over a SIMD register lane the way the reference C does.
fn ctr_block(nonce: &[u8; 12], ctr: u32) -> [u8; 16] {
    let mut b = [0u8; 16];
    b[..12].copy_from_slice(nonce);
    b[12..].copy_from_slice(&ctr.to_be_bytes());
    b
}

/// Builds the big-endian bit-length block `fb = be64(8*adlen) ‖ be64(8*mlen)`.
fn length_block(ad_len: usize, m_len: usize) -> [u8; 16] {
    let mut fb = [0u8; 16];
    fb[..8].copy_from_slice(&(8u64 * ad_len as u64).to_be_bytes());
    fb[8..].copy_from_slice(&(8u64 * m_len as u64).to_be_bytes());
    fb
}

/// Absorbs four 16-byte blocks, oldest to newest, into `acc` with a single
/// shared reduction. Callers must pass `[oldest, ..., newest]`; internally
/// this pairs `H4` with the oldest block, per the aggregated-reduction
/// ordering contract.
unsafe fn absorb4(hp: &HashPowers, blocks: [&[u8; 16]; 4], acc: __m128i) -> __m128i {
    let x0 = load_block(blocks[3]);
    let x1 = load_block(blocks[2]);
    let x2 = load_block(blocks[1]);
    let x3 = load_block(blocks[0]);
    reduce4(hp.h1, hp.h2, hp.h3, hp.h4, x0, x1, x2, x3, acc)
}

/// Absorbs associated data into the GHASH accumulator: 64-byte chunks via
/// the aggregated [`absorb4`] reduction, then a 16-byte-step remainder
/// (with a zero-padded final short block) via [`gf_mul_accum`].
unsafe fn absorb_aad(aad: &[u8], hp: &HashPowers, h1_bytes: &[u8; 16]) -> [u8; 16] {
    let mut accv = _mm_setzero_si128();
    let chunks = aad.chunks_exact(64);
    let remainder = chunks.remainder();
    for chunk in chunks {
        let b0: &[u8; 16] = chunk[0..16].try_into().unwrap();
        let b1: &[u8; 16] = chunk[16..32].try_into().unwrap();
        let b2: &[u8; 16] = chunk[32..48].try_into().unwrap();
        let b3: &[u8; 16] = chunk[48..64].try_into().unwrap();
        accv = absorb4(hp, [b0, b1, b2, b3], accv);
    }

    let mut accum = [0u8; 16];
    store_block(&mut accum, accv);

    for tail in remainder.chunks(16) {
        let mut block = [0u8; 16];
        block[..tail.len()].copy_from_slice(tail);
        gf_mul_accum(&mut accum, &block, tail.len(), load_block(h1_bytes));
    }
    accum
}

/// Absorbs ciphertext with no keystream generation and no plaintext
/// emitted -- the reference `aesni_addmul8full` bulk loop plus its
/// `gf_mul_accum` tail. Used to compute the expected tag before any
/// plaintext is produced.
unsafe fn absorb_ciphertext(c: &[u8], hp: &HashPowers, h1_bytes: &[u8; 16], accum: &mut [u8; 16]) {
    let len = c.len();
    let bulk_len = len - (len % 128);
    let mut accv = load_block(accum);

    let mut off = 0;
    while off < bulk_len {
        let b: [[u8; 16]; 8] = core::array::from_fn(|i| {
            c[off + i * 16..off + i * 16 + 16].try_into().unwrap()
        });
        accv = absorb4(hp, [&b[0], &b[1], &b[2], &b[3]], accv);
        accv = absorb4(hp, [&b[4], &b[5], &b[6], &b[7]], accv);
        off += 128;
    }
    store_block(accum, accv);

    for tail in c[off..].chunks(16) {
        let mut block = [0u8; 16];
        block[..tail.len()].copy_from_slice(tail);
        gf_mul_accum(accum, &block, tail.len(), load_block(h1_bytes));
    }
}

/// Drives the 128-byte bulk keystream loop plus the sub-128-byte tail,
/// turning `input` into `out` under CTR keystream starting at counter
/// value `start_ctr` (2, per the GCM counter convention: J0 itself is
/// counter 1, and keystream generation starts at 2). When
/// `absorb` is `true`, the produced/consumed output blocks are folded
/// into `accum` as they go (the encrypt path's single-pass
/// `aesni_encrypt8full`); when `false`, `accum` is left untouched (the
/// decrypt path's post-verification plaintext-recovery pass).
unsafe fn cipher_stream(
    state: &ExpandedState,
    nonce: &[u8; 12],
    input: &[u8],
    out: &mut [u8],
    start_ctr: u32,
    hp: &HashPowers,
    accum: &mut [u8; 16],
    h1_bytes: &[u8; 16],
    absorb: bool,
) {
    let mut ctr = start_ctr;
    let len = input.len();
    let bulk_len = len - (len % 128);

    let mut off = 0usize;
    while off < bulk_len {
        let mut ctr_blocks = [[0u8; 16]; 8];
        for cb in ctr_blocks.iter_mut() {
            *cb = ctr_block(nonce, ctr);
            ctr += 1;
        }
        let in_blocks: [[u8; 16]; 8] =
            core::array::from_fn(|i| input[off + i * 16..off + i * 16 + 16].try_into().unwrap());

        let out_blocks = block::encrypt8_xor(&state.rkeys, &ctr_blocks, &in_blocks);
        for (i, b) in out_blocks.iter().enumerate() {
            out[off + i * 16..off + i * 16 + 16].copy_from_slice(b);
        }

        if absorb {
            let mut accv = load_block(accum);
            accv = absorb4(
                hp,
                [&out_blocks[0], &out_blocks[1], &out_blocks[2], &out_blocks[3]],
                accv,
            );
            accv = absorb4(
                hp,
                [&out_blocks[4], &out_blocks[5], &out_blocks[6], &out_blocks[7]],
                accv,
            );
            store_block(accum, accv);
        }

        off += 128;
    }

    if off == len {
        return;
    }

    let mut ctr_blocks = [[0u8; 16]; 8];
    for cb in ctr_blocks.iter_mut() {
        *cb = ctr_block(nonce, ctr);
        ctr += 1;
    }
    let mut keystream = block::encrypt8(&state.rkeys, &ctr_blocks);
    let tail_len = len - off;

    for (i, ks) in keystream.iter().enumerate() {
        let lane_off = i * 16;
        if lane_off >= tail_len {
            break;
        }
        let lane_len = core::cmp::min(16, tail_len - lane_off);
        let dst = &mut out[off + lane_off..off + lane_off + lane_len];
        let src = &input[off + lane_off..off + lane_off + lane_len];
        for j in 0..lane_len {
            dst[j] = src[j] ^ ks[j];
        }

        if absorb {
            let mut block = [0u8; 16];
            block[..lane_len].copy_from_slice(dst);
            gf_mul_accum(accum, &block, lane_len, load_block(h1_bytes));
        }
    }
    keystream.zeroize();
}

/// Common prelude shared by encrypt and decrypt: J0, the tag mask `T`, the
/// length block, H's powers, and the AAD absorption.
struct Prelude {
    j0: [u8; 16],
    t: [u8; 16],
    fb: [u8; 16],
    h1_bytes: [u8; 16],
    hp: HashPowers,
    accum: [u8; 16],
}

unsafe fn run_prelude(state: &ExpandedState, nonce: &[u8; 12], aad: &[u8], m_len: usize) -> Prelude {
    let j0 = build_j0(nonce);
    let t = block::encrypt1(&state.rkeys, &j0);
    let fb = length_block(aad.len(), m_len);
    let (hp, h1_bytes) = HashPowers::derive(&state.h);
    let accum = absorb_aad(aad, &hp, &h1_bytes);

    Prelude { j0, t, fb, h1_bytes, hp, accum }
}

fn tag_from_accum(t: &[u8; 16], accum: &[u8; 16]) -> [u8; 16] {
    let mut tag = [0u8; 16];
    for i in 0..16 {
        tag[i] = t[i] ^ accum[15 - i];
    }
    tag
}

/// `encrypt_after`: one-shot AES-256-GCM encrypt-with-authentication over
/// a complete message, given an already-expanded key. Returns
/// `ciphertext ‖ tag`, exactly `mlen + 16` bytes long.
pub(crate) fn encrypt_after(
    state: &ExpandedState,
    nonce: &[u8; 12],
    aad: &[u8],
    m: &[u8],
) -> Result<Vec<u8>, Error> {
    if m.len() as u64 > MAX_PLAINTEXT_BYTES {
        return Err(Error::TooLong);
    }

    let mut out = vec![0u8; m.len() + TAG_BYTES];

    // SAFETY: `ExpandedState` is only constructed after `expand` confirms
    // the `aes`/`pclmul`/`sse4.1`/`ssse3` features this call relies on.
    unsafe {
        let mut prelude = run_prelude(state, nonce, aad, m.len());
        cipher_stream(
            state,
            nonce,
            m,
            &mut out[..m.len()],
            2,
            &prelude.hp,
            &mut prelude.accum,
            &prelude.h1_bytes,
            true,
        );
        gf_mul_accum(&mut prelude.accum, &prelude.fb, 16, load_block(&prelude.h1_bytes));
        let tag = tag_from_accum(&prelude.t, &prelude.accum);
        out[m.len()..].copy_from_slice(&tag);

        prelude.j0.zeroize();
        prelude.t.zeroize();
        prelude.fb.zeroize();
        prelude.h1_bytes.zeroize();
        prelude.accum.zeroize();
    }

    Ok(out)
}

/// `decrypt_after`: one-shot AES-256-GCM decrypt-with-verification.
/// Authenticates the ciphertext before producing any plaintext; on
/// [`Error::AuthFailure`] no plaintext is returned at all.
pub(crate) fn decrypt_after(
    state: &ExpandedState,
    nonce: &[u8; 12],
    aad: &[u8],
    c: &[u8],
) -> Result<Vec<u8>, Error> {
    if c.len() < TAG_BYTES {
        return Err(Error::ShortCiphertext);
    }
    let m_len = c.len() - TAG_BYTES;
    if m_len as u64 > MAX_PLAINTEXT_BYTES {
        return Err(Error::TooLong);
    }
    let ciphertext = &c[..m_len];
    let received_tag = &c[m_len..];

    // SAFETY: see `encrypt_after`.
    unsafe {
        let mut prelude = run_prelude(state, nonce, aad, m_len);
        absorb_ciphertext(ciphertext, &prelude.hp, &prelude.h1_bytes, &mut prelude.accum);
        gf_mul_accum(&mut prelude.accum, &prelude.fb, 16, load_block(&prelude.h1_bytes));
        let expected_tag = tag_from_accum(&prelude.t, &prelude.accum);

        let mut diff = 0u8;
        for i in 0..TAG_BYTES {
            diff |= expected_tag[i] ^ received_tag[i];
        }

        if diff != 0 {
            prelude.j0.zeroize();
            prelude.t.zeroize();
            prelude.fb.zeroize();
            prelude.h1_bytes.zeroize();
            prelude.accum.zeroize();
            return Err(Error::AuthFailure);
        }

        let mut out = vec![0u8; m_len];
        let mut scratch_accum = [0u8; 16];
        cipher_stream(
            state,
            nonce,
            ciphertext,
            &mut out,
            2,
            &prelude.hp,
            &mut scratch_accum,
            &prelude.h1_bytes,
            false,
        );

        prelude.j0.zeroize();
        prelude.t.zeroize();
        prelude.fb.zeroize();
        prelude.h1_bytes.zeroize();
        prelude.accum.zeroize();
        scratch_accum.zeroize();

        Ok(out)
    }
}
