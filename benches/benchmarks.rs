use criterion::{black_box, criterion_group, criterion_main, Criterion};

use guidescan::score::{self, ScoreMethod};
use guidescan::search::{self, Guide, PamPattern, ReferenceSequence, ScanConfig};

fn make_reference(len: usize) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = 42;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

fn bench_scan(c: &mut Criterion) {
    let seq = make_reference(100_000);
    let guide = Guide::new(std::str::from_utf8(&seq[500..520]).unwrap()).unwrap();
    let refs = vec![ReferenceSequence::new("bench", &seq)];
    let config = ScanConfig::new(PamPattern::new("NGG").unwrap(), 4);

    c.bench_function("scan_100kb_20nt", |b| {
        b.iter(|| {
            black_box(search::scan(black_box(&guide), &refs, &config));
        })
    });
}

fn bench_scan_parallel(c: &mut Criterion) {
    let refs: Vec<_> = (0..8)
        .map(|i| ReferenceSequence::new(format!("chr{}", i), make_reference(25_000)))
        .collect();
    let guide = Guide::new("GAGTCCGAGCAGAAGAAGAA").unwrap();
    let config = ScanConfig::new(PamPattern::new("NGG").unwrap(), 4);

    c.bench_function("scan_parallel_8x25kb", |b| {
        b.iter(|| {
            black_box(search::scan_parallel(black_box(&guide), &refs, &config));
        })
    });
}

fn bench_scores(c: &mut Criterion) {
    let guide = "GAGTCCGAGCAGAAGAAGAA";
    let target = "GAGTCAGAGCAGTAGAAGCA";
    let table = score::load_published_table().unwrap();

    for method in [ScoreMethod::Pw, ScoreMethod::Mit, ScoreMethod::Cfd, ScoreMethod::CfdFull, ScoreMethod::CfdTable] {
        c.bench_function(&format!("score_{}", method), |b| {
            b.iter(|| {
                black_box(method.score(black_box(guide), black_box(target), "NGG", Some(&table)).unwrap());
            })
        });
    }
}

criterion_group!(benches, bench_scan, bench_scan_parallel, bench_scores);
criterion_main!(benches);
