use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use secdef_stats::{Aggregator, MemorySource, QueryResults, SecdefConfig};

fn synthetic_feed(records: usize) -> Vec<String> {
    const TYPES: [&str; 5] = ["FUT", "OOF", "MLEG", "IRS", "FXSPOT"];
    const COMPLEXES: [&str; 8] = ["2", "4", "5", "12", "14", "15", "16", "17"];

    (0..records)
        .map(|i| {
            let mut fields = vec![
                "35=d".to_string(),
                "5799=00000000".to_string(),
                "980=A".to_string(),
                format!("779=2018052{}", i % 10),
                format!("167={}", TYPES[i % TYPES.len()]),
                format!("462={}", COMPLEXES[i % COMPLEXES.len()]),
                format!("55=GE{}", i),
                format!("200=20{:04}", 1800 + i % 120),
            ];
            if i % 3 == 0 {
                fields.push("6937=GE".to_string());
            }
            if i % 7 == 0 {
                fields.push("555=2".to_string());
            }
            fields.rotate_left(i % fields.len());
            let mut line = fields.join("\x01");
            line.push('\x01');
            line
        })
        .collect()
}

fn bench_pass(c: &mut Criterion) {
    let records = 50_000;
    let source = MemorySource::new(synthetic_feed(records));

    let mut group = c.benchmark_group("secdef_pass");
    group.throughput(Throughput::Elements(records as u64));
    group.bench_function("run_and_derive", |b| {
        b.iter(|| {
            let summary = Aggregator::new(SecdefConfig::default())
                .unwrap()
                .run(black_box(&source))
                .unwrap();
            black_box(QueryResults::derive(&summary.aggregates, 4))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_pass);
criterion_main!(benches);
