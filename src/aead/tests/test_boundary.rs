//! Boundary-size round-trip coverage: message and AAD lengths straddling
//! the 16-byte block size and the 128-byte bulk-loop chunk size.

use crate::{decrypt_one, encrypt_one, TAG_BYTES};

const KEY: [u8; 32] = [0x11; 32];
const NONCE: [u8; 12] = [0x22; 12];

fn filled(len: usize, byte: u8) -> Vec<u8> {
    vec![byte; len]
}

const SIZES: &[usize] = &[0, 1, 15, 16, 17, 127, 128, 129, 4096];

#[test]
fn round_trip_across_plaintext_size_boundaries() {
    for &mlen in SIZES {
        let m = filled(mlen, 0xab);
        let ct = encrypt_one(&KEY, &NONCE, b"fixed-aad", &m).expect("encrypt");
        assert_eq!(ct.len(), mlen + TAG_BYTES);

        let pt = decrypt_one(&KEY, &NONCE, b"fixed-aad", &ct).expect("decrypt");
        assert_eq!(pt, m);
    }
}

#[test]
fn round_trip_across_aad_size_boundaries() {
    for &adlen in SIZES {
        let ad = filled(adlen, 0xcd);
        let m = b"a message of fixed length spanning a couple of blocks!";
        let ct = encrypt_one(&KEY, &NONCE, &ad, m).expect("encrypt");

        let pt = decrypt_one(&KEY, &NONCE, &ad, &ct).expect("decrypt");
        assert_eq!(pt, m);
    }
}

/// A 130-byte plaintext fills one full 128-byte bulk chunk and leaves a
/// 2-byte final block in the tail loop.
#[test]
fn misaligned_tail_of_two_bytes() {
    let m = filled(130, 0x5a);
    let ct = encrypt_one(&KEY, &NONCE, b"", &m).expect("encrypt");
    assert_eq!(ct.len(), 146);

    let pt = decrypt_one(&KEY, &NONCE, b"", &ct).expect("decrypt");
    assert_eq!(pt, m);
}

#[test]
fn encrypt_is_deterministic() {
    let m = b"deterministic please";
    let a = encrypt_one(&KEY, &NONCE, b"ad", m).expect("encrypt");
    let b = encrypt_one(&KEY, &NONCE, b"ad", m).expect("encrypt");
    assert_eq!(a, b);
}

#[test]
fn expand_is_a_pure_function_of_the_key() {
    use crate::ExpandedState;

    let s1 = ExpandedState::expand(&KEY).expect("expand");
    let s2 = ExpandedState::expand(&KEY).expect("expand");

    let m = b"same key, same derived state";
    let a = s1.encrypt_after(&NONCE, b"", m).expect("encrypt");
    let b = s2.encrypt_after(&NONCE, b"", m).expect("encrypt");
    assert_eq!(a, b);
}
