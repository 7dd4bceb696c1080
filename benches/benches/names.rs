use criterion::{Criterion, black_box, criterion_group, criterion_main};
use cyclebase::names::{action_name, message_signature_name, return_code_name};

pub fn lookup_benchmarks(c: &mut Criterion) {
    c.bench_function("message_signature_name, last entry", |b| {
        b.iter(|| black_box(message_signature_name(black_box(0x5942))))
    });
    c.bench_function("message_signature_name, missing", |b| {
        b.iter(|| black_box(message_signature_name(black_box(1))))
    });
    c.bench_function("action_name", |b| {
        b.iter(|| black_box(action_name(black_box(3))))
    });
    c.bench_function("return_code_name", |b| {
        b.iter(|| black_box(return_code_name(black_box(7))))
    });
}

criterion_group!(benches, lookup_benchmarks);
criterion_main!(benches);
