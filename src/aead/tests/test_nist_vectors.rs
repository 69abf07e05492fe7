//! NIST SP 800-38D AES-256-GCM known-answer tests (96-bit IV, 128-bit
//! tag). Vectors are Test Cases 13/14/16 from the specification.

use crate::{decrypt_one, encrypt_one};

fn hex_bytes(s: &str) -> Vec<u8> {
    hex::decode(s).expect("valid hex literal")
}

/// NIST Test Case 13: all-zero key and nonce, empty AAD and plaintext.
#[test]
fn nist_test_case_13_empty_plaintext() {
    let key = [0u8; 32];
    let nonce = [0u8; 12];

    let ct = encrypt_one(&key, &nonce, b"", b"").expect("encrypt");
    assert_eq!(ct, hex_bytes("530f8afbc74536b9a963b4f1c4cb738b"));

    let pt = decrypt_one(&key, &nonce, b"", &ct).expect("decrypt");
    assert!(pt.is_empty());
}

/// NIST Test Case 14: all-zero key, nonce, and 16-byte plaintext.
#[test]
fn nist_test_case_14_one_block() {
    let key = [0u8; 32];
    let nonce = [0u8; 12];
    let m = [0u8; 16];

    let ct = encrypt_one(&key, &nonce, b"", &m).expect("encrypt");
    let expected_c = hex_bytes("cea7403d4d606b6e074ec5d3baf39d18");
    let expected_tag = hex_bytes("d0d1c8a799996bf0265b98b5d48ab919");
    assert_eq!(&ct[..16], &expected_c[..]);
    assert_eq!(&ct[16..], &expected_tag[..]);

    let pt = decrypt_one(&key, &nonce, b"", &ct).expect("decrypt");
    assert_eq!(pt, m);
}

/// NIST Test Case 16: 60-byte plaintext with 20-byte AAD.
#[test]
fn nist_test_case_16_partial_block_with_aad() {
    let key: [u8; 32] = hex_bytes(
        "feffe9928665731c6d6a8f9467308308feffe9928665731c6d6a8f9467308308",
    )[..32]
        .try_into()
        .unwrap();
    let nonce: [u8; 12] = hex_bytes("cafebabefacedbaddecaf888")[..]
        .try_into()
        .unwrap();
    let ad = hex_bytes("feedfacedeadbeeffeedfacedeadbeefabaddad2");
    let m = hex_bytes(
        "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a7\
         21c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b39",
    );

    let ct = encrypt_one(&key, &nonce, &ad, &m).expect("encrypt");
    let expected_c = hex_bytes(
        "522dc1f099567d07f47f37a32a84427d643a8cdcbfe5c0c97598a2bd2555d1a\
         a8cb08e48590dbb3da7b08b1056828838c5f61e6393ba7a0abcc9f662",
    );
    let expected_tag = hex_bytes("76fc6ece0f4e1768cddf8853bb2d551b");
    assert_eq!(&ct[..60], &expected_c[..]);
    assert_eq!(&ct[60..], &expected_tag[..]);

    let pt = decrypt_one(&key, &nonce, &ad, &ct).expect("decrypt");
    assert_eq!(pt, m);
}
