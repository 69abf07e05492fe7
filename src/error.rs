//! Error taxonomy for the AES-256-GCM core.

/// Failure modes surfaced by this crate.
///
/// Every fallible operation returns one of these instead of panicking or
/// aborting, including the one case (`CpuUnsupported`) where the reference
/// algorithm this crate is built from would call `abort()`.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Plaintext or ciphertext length exceeds the GCM bound of
    /// `2^39 - 256` bits (`2^36 - 32` bytes of plaintext).
    #[error("plaintext or ciphertext exceeds the AES-GCM length bound")]
    TooLong,

    /// A ciphertext shorter than [`crate::TAG_BYTES`] cannot hold an
    /// authentication tag and is rejected before any decryption work starts.
    #[error("ciphertext shorter than the 16-byte authentication tag")]
    ShortCiphertext,

    /// The computed tag did not match the tag carried in the ciphertext.
    /// No plaintext is returned to the caller when this occurs.
    #[error("authentication tag verification failed")]
    AuthFailure,

    /// The host CPU is missing one of the instruction set extensions
    /// (`aes`, `pclmul`, `sse4.1`, `ssse3`) this core requires.
    #[error("required CPU features (AES-NI, PCLMULQDQ) are not available")]
    CpuUnsupported,
}
