use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nlc_stub::classifier::scorer::score;
use nlc_stub::classifier::training::parse_training_data;
use nlc_stub::TrainingLimits;

fn training_text(lines: usize, classes: usize) -> String {
    (0..lines)
        .map(|i| format!("training phrase number {},class_{}\n", i, i % classes))
        .collect()
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parsing");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let limits = TrainingLimits::default();
    let small = training_text(100, 10);
    let large = training_text(20_000, 3000);

    group.bench_function("100_lines", |b| b.iter(|| {
        parse_training_data(black_box(&small), &limits).unwrap()
    }));
    group.bench_function("20000_lines", |b| b.iter(|| {
        parse_training_data(black_box(&large), &limits).unwrap()
    }));

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scoring");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let limits = TrainingLimits::default();
    let few = parse_training_data(&training_text(100, 10), &limits).unwrap().classes;
    let many = parse_training_data(&training_text(20_000, 3000), &limits).unwrap().classes;

    group.bench_function("10_classes_match", |b| b.iter(|| {
        score(black_box(&few), black_box("number 42"), 10)
    }));
    group.bench_function("3000_classes_match", |b| b.iter(|| {
        score(black_box(&many), black_box("number 4242"), 10)
    }));
    group.bench_function("3000_classes_no_match", |b| b.iter(|| {
        score(black_box(&many), black_box("no such phrase"), 10)
    }));

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_scoring);
criterion_main!(benches);
