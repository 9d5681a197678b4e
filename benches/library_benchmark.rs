use cookiecutter::kmer::{KmerLength, KmerTable};
use cookiecutter::library::make_library;
use cookiecutter::revcomp::reverse_complement;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn bench_reverse_complement(c: &mut Criterion) {
    let mut group = c.benchmark_group("reverse_complement");

    for len in [11, 23, 31, 150] {
        let seq = "GATTACA".repeat(len / 7 + 1)[..len].to_string();

        group.bench_with_input(BenchmarkId::from_parameter(len), &seq, |b, seq| {
            b.iter(|| reverse_complement(black_box(seq)));
        });
    }

    group.finish();
}

fn bench_add_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("KmerTable::add_sequence");
    let seq = "ACGTTGCAGATTACA".repeat(100);

    for k in [11, 23, 31] {
        let k_len = KmerLength::new(k).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(k), &seq, |b, seq| {
            b.iter(|| {
                let table = KmerTable::new();
                table.add_sequence(black_box(seq), k_len);
                black_box(table.len())
            });
        });
    }

    group.finish();
}

fn bench_make_library(c: &mut Criterion) {
    let mut fasta = NamedTempFile::new().unwrap();
    for i in 0..200 {
        writeln!(fasta, ">seq{i}").unwrap();
        writeln!(fasta, "{}", "ACGTTGCAGATTACAGGCCTTAA".repeat(10)).unwrap();
    }
    fasta.flush().unwrap();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("lib.tsv");

    c.bench_function("make_library k=23", |b| {
        b.iter(|| make_library([fasta.path()], &out, black_box(23)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_reverse_complement,
    bench_add_sequence,
    bench_make_library
);
criterion_main!(benches);
