// Criterion benchmarks for Heartbeat Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geo::Point;
use heartbeat_match::core::{
    bounding_box, detailed_score, distance_meters, filter_candidates, quick_score, FilterOptions,
    MatchRanker,
};
use heartbeat_match::models::{Gender, GeoPoint, Preferences, UserProfile};
use std::collections::HashSet;

const TAGS: [&str; 8] = ["tennis", "hiking", "jazz", "cooking", "film", "chess", "yoga", "travel"];

fn create_candidate(id: usize, lat: f64, lon: f64) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        name: format!("User {}", id),
        age: 21 + (id % 15) as u8,
        gender: if id % 2 == 0 { Gender::Female } else { Gender::Male },
        interests: TAGS.iter().skip(id % 5).take(3).map(|s| s.to_string()).collect(),
        location: Some(GeoPoint::new(lon, lat)),
        last_active: None,
        is_verified: id % 3 == 0,
        is_online: id % 4 == 0,
        preferences: Preferences::default(),
    }
}

fn create_requester() -> UserProfile {
    UserProfile {
        id: "current_user".to_string(),
        preferences: Preferences {
            min_age: 21,
            max_age: 35,
            gender_preference: [Gender::Female].into(),
            max_distance_km: 50.0,
        },
        ..create_candidate(0, 40.7128, -74.0060)
    }
}

fn create_pool(size: usize) -> Vec<UserProfile> {
    (0..size)
        .map(|i| {
            let offset = (i as f64 * 0.001) % 0.5;
            create_candidate(i + 1, 40.7128 + offset, -74.0060 + offset)
        })
        .collect()
}

fn bench_distance(c: &mut Criterion) {
    let a = Point::new(-74.0060, 40.7128);
    let b = Point::new(-74.01, 40.72);

    c.bench_function("distance_meters", |bench| {
        bench.iter(|| distance_meters(black_box(a), black_box(b)));
    });

    c.bench_function("bounding_box", |bench| {
        bench.iter(|| bounding_box(black_box(a), black_box(50.0)));
    });
}

fn bench_scoring(c: &mut Criterion) {
    let requester = create_requester();
    let candidate = create_candidate(2, 40.72, -74.01);

    c.bench_function("quick_score", |b| {
        b.iter(|| quick_score(black_box(&requester), black_box(&candidate)));
    });

    c.bench_function("detailed_score", |b| {
        b.iter(|| detailed_score(black_box(&requester), black_box(&candidate)));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let ranker = MatchRanker::default();
    let requester = create_requester();
    let options = FilterOptions::discovery(&requester.preferences, None);
    let exclude = HashSet::new();

    let mut group = c.benchmark_group("ranking");

    for size in [10, 50, 100, 500, 1000] {
        let pool = create_pool(size);

        group.bench_with_input(BenchmarkId::new("rank", size), &pool, |b, pool| {
            b.iter(|| {
                ranker.rank(
                    black_box(pool),
                    &requester,
                    &requester.preferences,
                    &exclude,
                    &options,
                    black_box(20),
                )
            });
        });

        group.bench_with_input(BenchmarkId::new("filter", size), &pool, |b, pool| {
            b.iter(|| {
                filter_candidates(
                    black_box(pool),
                    &requester,
                    &requester.preferences,
                    &exclude,
                    &options,
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_distance, bench_scoring, bench_ranking);
criterion_main!(benches);
