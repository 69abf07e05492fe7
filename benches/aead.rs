//! Throughput benchmarks across representative message-size boundaries:
//! a hardware-accelerated AEAD core's entire reason for existing is
//! throughput, so this is the one place size, not correctness, is under
//! the microscope.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use aesni_gcm::ExpandedState;

const KEY: [u8; 32] = [0x7e; 32];
const NONCE: [u8; 12] = [0x5a; 12];

fn bench_encrypt(c: &mut Criterion) {
    let state = ExpandedState::expand(&KEY).expect("AES-NI/PCLMULQDQ required to run this benchmark");
    let mut group = c.benchmark_group("encrypt_after");

    for &size in &[16usize, 128, 4096] {
        let m = vec![0x42u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &m, |b, m| {
            b.iter(|| state.encrypt_after(black_box(&NONCE), black_box(b""), black_box(m)).unwrap());
        });
    }

    group.finish();
}

fn bench_decrypt(c: &mut Criterion) {
    let state = ExpandedState::expand(&KEY).expect("AES-NI/PCLMULQDQ required to run this benchmark");
    let mut group = c.benchmark_group("decrypt_after");

    for &size in &[16usize, 128, 4096] {
        let m = vec![0x42u8; size];
        let ct = state.encrypt_after(&NONCE, b"", &m).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ct, |b, ct| {
            b.iter(|| state.decrypt_after(black_box(&NONCE), black_box(b""), black_box(ct)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encrypt, bench_decrypt);
criterion_main!(benches);
