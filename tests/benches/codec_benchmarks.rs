//! # Codec Benchmarks
//!
//! Hot paths of every submission: bundle parsing, PushDrop decoding and the
//! full admission report.
//!
//! ```bash
//! cargo bench -p am-tests
//! ```

use am_01_transaction_bundle::Beef;
use am_02_pushdrop::{AdvertisementToken, PushDrop};
use am_03_topic_manager::AdmissionReport;
use am_tests::fixtures::{advertisement, advertisement_script, beef, p2pkh_like_script, transaction};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_types::Txid;

fn bench_beef_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("beef_parse");
    for outputs in [1usize, 10, 100] {
        let scripts = (0..outputs)
            .map(|_| advertisement_script(&advertisement("02sponsor", 30)))
            .collect();
        let bundle = beef(&transaction(Txid([1; 32]), scripts));
        group.throughput(Throughput::Bytes(bundle.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(outputs), &bundle, |b, bundle| {
            b.iter(|| Beef::from_bytes(black_box(bundle)).unwrap())
        });
    }
    group.finish();
}

fn bench_pushdrop_decode(c: &mut Criterion) {
    let script = advertisement_script(&advertisement("02sponsor", 30));
    c.bench_function("pushdrop_decode_advertisement", |b| {
        b.iter(|| {
            let token = PushDrop::decode(black_box(&script)).unwrap();
            AdvertisementToken::try_from_fields(&token.fields).unwrap()
        })
    });
}

fn bench_admission(c: &mut Criterion) {
    let mut scripts: Vec<_> = (0..20).map(|_| p2pkh_like_script()).collect();
    scripts.push(advertisement_script(&advertisement("02sponsor", 30)));
    let bundle = beef(&transaction(Txid([2; 32]), scripts));
    c.bench_function("admission_report_21_outputs", |b| {
        b.iter(|| AdmissionReport::evaluate(black_box(&bundle)))
    });
}

criterion_group!(benches, bench_beef_parsing, bench_pushdrop_decode, bench_admission);
criterion_main!(benches);
