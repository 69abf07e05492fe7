//! Authentication-failure coverage: any single-bit flip in the
//! ciphertext, tag, AAD, or nonce must be rejected, and a failed decrypt
//! must not hand back plaintext.

use crate::{decrypt_one, encrypt_one, Error};

const KEY: [u8; 32] = [0x33; 32];
const NONCE: [u8; 12] = [0x44; 12];

fn sample() -> (Vec<u8>, Vec<u8>) {
    let ad = b"associated data".to_vec();
    let m = b"the quick brown fox jumps over the lazy dog, 44 bytes".to_vec();
    let ct = encrypt_one(&KEY, &NONCE, &ad, &m).expect("encrypt");
    (ad, ct)
}

#[test]
fn tampered_tag_fails_closed() {
    let (ad, mut ct) = sample();
    let last = ct.len() - 1;
    ct[last] ^= 0x01;

    let result = decrypt_one(&KEY, &NONCE, &ad, &ct);
    assert_eq!(result, Err(Error::AuthFailure));
}

#[test]
fn tampered_ciphertext_byte_fails_closed() {
    let (ad, mut ct) = sample();
    ct[0] ^= 0x80;

    assert_eq!(decrypt_one(&KEY, &NONCE, &ad, &ct), Err(Error::AuthFailure));
}

#[test]
fn tampered_aad_fails_closed() {
    let (mut ad, ct) = sample();
    ad[0] ^= 0x01;

    assert_eq!(decrypt_one(&KEY, &NONCE, &ad, &ct), Err(Error::AuthFailure));
}

#[test]
fn tampered_nonce_fails_closed() {
    let (ad, ct) = sample();
    let mut bad_nonce = NONCE;
    bad_nonce[0] ^= 0x01;

    assert_eq!(decrypt_one(&KEY, &bad_nonce, &ad, &ct), Err(Error::AuthFailure));
}

#[test]
fn ciphertext_shorter_than_tag_is_rejected() {
    let short = [0u8; 8];
    assert_eq!(
        decrypt_one(&KEY, &NONCE, b"", &short),
        Err(Error::ShortCiphertext)
    );
}

#[test]
fn empty_ciphertext_is_rejected_as_short() {
    assert_eq!(decrypt_one(&KEY, &NONCE, b"", &[]), Err(Error::ShortCiphertext));
}
