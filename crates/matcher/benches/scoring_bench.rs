use criterion::{black_box, criterion_group, criterion_main, Criterion};
use matcher::{Candidate, CandidateDetail, CandidateSummary, Matcher, Query};

fn catalog(size: usize) -> Vec<Candidate> {
    (0..size)
        .map(|i| {
            Candidate::detailed(
                CandidateSummary::new(i.to_string(), format!("Nosferatu Part {i}"))
                    .with_original_title("Nosferatu")
                    .with_release_year(1900 + (i % 120) as i32),
                CandidateDetail {
                    directors: vec!["Friedrich Wilhelm Murnau".into(), "Werner Herzog".into()],
                    countries: vec!["Germany".into(), "France".into()],
                },
            )
        })
        .collect()
}

fn bench_evaluate(c: &mut Criterion) {
    let matcher = Matcher::default();
    let title_only = Query::new("Nosferatu");
    let full = Query::new("Nosferatu")
        .with_year(1922)
        .with_director("F.W. Murnau")
        .with_country("Germany, France");

    let mut group = c.benchmark_group("evaluate");
    for size in [10usize, 100] {
        let candidates = catalog(size);
        group.bench_function(format!("title_only_{size}"), |b| {
            b.iter(|| matcher.evaluate(black_box(&title_only), black_box(&candidates)))
        });
        group.bench_function(format!("all_fields_{size}"), |b| {
            b.iter(|| matcher.evaluate(black_box(&full), black_box(&candidates)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
