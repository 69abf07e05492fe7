//! The amortized per-key object: expanded AES-256 round keys plus the
//! derived GHASH subkey `H`.
//!
//! Mirrors the reference `context` struct (`rkeys[16]`, `H[16]`) populated
//! once by `crypto_aead_aes256gcm_aesni_beforenm` and reused read-only by
//! every `_afternm` call afterwards.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::block::{self, ROUNDS};
use crate::error::Error;

/// Expanded AES-256 key schedule plus the GHASH subkey `H = AES_K(0^128)`.
///
/// Built once per key via [`ExpandedState::expand`] and then reused,
/// read-only, for as many `encrypt_after`/`decrypt_after` calls as the
/// caller likes. Two expansions of the same key produce byte-identical
/// `rkeys`/`h`; nothing about the state depends on anything but the key.
/// Both fields are wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ExpandedState {
    pub(crate) rkeys: [[u8; 16]; ROUNDS],
    pub(crate) h: [u8; 16],
}

impl ExpandedState {
    /// Checks that the host CPU has the instruction set extensions this
    /// crate's intrinsics require, then runs the AES-256 key schedule and
    /// derives `H`.
    ///
    /// This is the only feature-detection point in the crate: every other
    /// operation reuses an already-validated `ExpandedState` and performs
    /// no further checks, so the `#[target_feature]` functions it calls
    /// into are sound.
    pub fn expand(key: &[u8; 32]) -> Result<Self, Error> {
        if !(is_x86_feature_detected!("aes")
            && is_x86_feature_detected!("pclmul")
            && is_x86_feature_detected!("sse4.1")
            && is_x86_feature_detected!("ssse3"))
        {
            return Err(Error::CpuUnsupported);
        }

        // SAFETY: the feature check above guarantees every intrinsic these
        // calls reach is available on the running CPU.
        let (rkeys, h) = unsafe {
            let rkeys = block::expand_round_keys(key);
            let h = block::encrypt1(&rkeys, &[0u8; 16]);
            (rkeys, h)
        };

        Ok(ExpandedState { rkeys, h })
    }
}
