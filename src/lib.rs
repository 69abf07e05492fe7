//! AES-256-GCM authenticated encryption, accelerated with AES-NI and
//! PCLMULQDQ intrinsics.
//!
//! This crate is the hardware-accelerated CORE of an AES-256-GCM
//! implementation: AES-256 key expansion and single/8-block encryption,
//! GHASH over GF(2^128) with a four-block aggregated-reduction batch
//! multiplier, and the GCM composition tying counter-mode keystream
//! generation to GHASH absorption. It is deliberately one-shot: callers
//! pass a complete message and get back a complete ciphertext-plus-tag (or
//! plaintext, on successful verification) in a single call. There is no
//! streaming/incremental API, no nonce management, and no support for tag
//! lengths other than 128 bits.
//!
//! CPU feature detection, key/nonce sourcing, algorithm dispatch, and
//! constant-time byte comparison outside of tag verification are the
//! responsibility of callers layered on top of this crate; the one
//! exception is [`ExpandedState::expand`], which checks for the `aes`,
//! `pclmul`, `sse4.1`, and `ssse3` CPU features itself because every
//! `unsafe` intrinsic call in the crate depends on that check having
//! already happened.
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), aesni_gcm::Error> {
//! use aesni_gcm::{decrypt_one, encrypt_one};
//!
//! let key = [0x42; 32];
//! let nonce = [0x24; 12];
//! let aad = b"header";
//! let plaintext = b"hello, GCM";
//!
//! let ciphertext = encrypt_one(&key, &nonce, aad, plaintext)?;
//! let recovered = decrypt_one(&key, &nonce, aad, &ciphertext)?;
//! assert_eq!(recovered, plaintext);
//! # Ok(())
//! # }
//! ```

mod aead;
mod block;
mod error;
mod ghash;
mod state;

pub use error::Error;
pub use state::ExpandedState;

/// Key size in bytes (AES-256).
pub const KEY_BYTES: usize = 32;
/// Nonce ("npub") size in bytes: a 96-bit GCM IV.
pub const NPUB_BYTES: usize = 12;
/// Authentication tag size in bytes: this core only supports 128-bit tags.
pub const TAG_BYTES: usize = 16;
/// Size in bytes of the reserved `nsec` parameter carried by this AEAD
/// family's conventional signature. No Rust signature in this crate
/// accepts an `nsec` argument at all -- there is no more idiomatic way to
/// "accept and ignore" a parameter than omitting it -- so this constant
/// exists purely to document the reservation for API-family compatibility.
pub const NSEC_BYTES: usize = 0;

impl ExpandedState {
    /// Encrypts `m` under this state's key, authenticating `m` and `ad`
    /// together. Returns `ciphertext ‖ tag`, exactly `m.len() + TAG_BYTES`
    /// bytes.
    ///
    /// `ad` may be empty. Returns [`Error::TooLong`] if `m` exceeds the
    /// AES-GCM plaintext bound of `2^39 - 256` bits.
    pub fn encrypt_after(&self, nonce: &[u8; NPUB_BYTES], ad: &[u8], m: &[u8]) -> Result<Vec<u8>, Error> {
        aead::encrypt_after(self, nonce, ad, m)
    }

    /// Decrypts `c` (ciphertext ‖ tag) under this state's key, verifying
    /// `ad` and the ciphertext before returning any plaintext.
    ///
    /// Returns [`Error::ShortCiphertext`] if `c` is shorter than
    /// [`TAG_BYTES`], [`Error::TooLong`] if the implied plaintext exceeds
    /// the AES-GCM bound, or [`Error::AuthFailure`] if the tag does not
    /// verify -- in which case no plaintext is returned.
    pub fn decrypt_after(&self, nonce: &[u8; NPUB_BYTES], ad: &[u8], c: &[u8]) -> Result<Vec<u8>, Error> {
        aead::decrypt_after(self, nonce, ad, c)
    }
}

/// Convenience wrapper: expands `key` and encrypts `m` in one call. Prefer
/// [`ExpandedState::expand`] directly when encrypting more than one
/// message under the same key, to amortize the key schedule and GHASH
/// subkey derivation.
pub fn encrypt_one(key: &[u8; KEY_BYTES], nonce: &[u8; NPUB_BYTES], ad: &[u8], m: &[u8]) -> Result<Vec<u8>, Error> {
    let state = ExpandedState::expand(key)?;
    state.encrypt_after(nonce, ad, m)
}

/// Convenience wrapper: expands `key` and decrypts `c` in one call. Prefer
/// [`ExpandedState::expand`] directly when decrypting more than one
/// message under the same key.
pub fn decrypt_one(key: &[u8; KEY_BYTES], nonce: &[u8; NPUB_BYTES], ad: &[u8], c: &[u8]) -> Result<Vec<u8>, Error> {
    let state = ExpandedState::expand(key)?;
    state.decrypt_after(nonce, ad, c)
}
