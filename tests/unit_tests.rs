// Unit tests for Heartbeat Match

use chrono::{Duration, TimeZone, Utc};
use geo::Point;
use heartbeat_match::core::{
    bounding_box, detailed_score, distance_meters, filter_candidates, is_within_bounding_box,
    quick_score, scoring::{
        ACTIVITY_WEIGHT, AGE_WEIGHT, INTERESTS_WEIGHT, LOCATION_WEIGHT, VERIFICATION_WEIGHT,
    },
    FilterOptions,
};
use heartbeat_match::models::{Gender, GeoPoint, Preferences, UserProfile};
use std::collections::HashSet;

fn create_profile(id: &str, age: u8, interests: &[&str], lon: f64, lat: f64) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        name: format!("User {}", id),
        age,
        gender: Gender::Female,
        interests: interests.iter().map(|s| s.to_string()).collect(),
        location: Some(GeoPoint::new(lon, lat)),
        last_active: None,
        is_verified: false,
        is_online: false,
        preferences: Preferences::default(),
    }
}

fn sample_points() -> Vec<Point<f64>> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(-74.0060, 40.7128),
        Point::new(13.4050, 52.5200),
        Point::new(151.2093, -33.8688),
        Point::new(179.9, 0.0),
        Point::new(-179.9, 0.0),
        Point::new(0.0, 89.9),
    ]
}

/// A point `meters` due north of `origin`
fn north_of(origin: Point<f64>, meters: f64) -> Point<f64> {
    let degrees = (meters / 6_371_000.0).to_degrees();
    Point::new(origin.x(), origin.y() + degrees)
}

#[test]
fn test_distance_to_self_is_zero() {
    for p in sample_points() {
        assert_eq!(distance_meters(p, p), 0.0);
    }
}

#[test]
fn test_distance_is_symmetric() {
    let points = sample_points();
    for a in &points {
        for b in &points {
            assert_eq!(distance_meters(*a, *b), distance_meters(*b, *a));
        }
    }
}

#[test]
fn test_distance_across_antimeridian() {
    let d = distance_meters(Point::new(179.9, 0.0), Point::new(-179.9, 0.0));
    assert!(d > 20_000.0 && d < 25_000.0, "got {}", d);
}

#[test]
fn test_bounding_box_contains_radius() {
    let center = Point::new(-74.0060, 40.7128);
    let bbox = bounding_box(center, 10.0);

    assert!(is_within_bounding_box(center, &bbox));
    assert!(is_within_bounding_box(north_of(center, 9_000.0), &bbox));
    assert!(!is_within_bounding_box(north_of(center, 20_000.0), &bbox));
}

#[test]
fn test_quick_score_reference_example() {
    let mut requester = create_profile("me", 25, &["hiking", "coffee"], 13.4050, 52.5200);
    requester.preferences.min_age = 20;
    requester.preferences.max_age = 30;
    let candidate = create_profile("c", 26, &["hiking", "coffee", "coding"], 13.4050, 52.5200);

    assert_eq!(quick_score(&requester, &candidate), 70.0);
}

#[test]
fn test_quick_score_age_bonus_inclusive() {
    let mut requester = create_profile("me", 25, &[], 0.0, 0.0);
    requester.location = None;
    requester.preferences.min_age = 20;
    requester.preferences.max_age = 30;

    for (age, expected) in [(19, 0.0), (20, 20.0), (30, 20.0), (31, 0.0)] {
        let mut candidate = create_profile("c", age, &[], 0.0, 0.0);
        candidate.location = None;
        assert_eq!(quick_score(&requester, &candidate), expected, "age {}", age);
    }
}

#[test]
fn test_location_components_zero_at_50km() {
    let origin = Point::new(2.3522, 48.8566);
    let far = north_of(origin, 50_000.0);

    let mut requester = create_profile("me", 30, &[], origin.x(), origin.y());
    requester.preferences.max_age = 40;
    let candidate = create_profile("c", 60, &[], far.x(), far.y());

    // Only the location bonus could contribute here, and it has decayed away
    assert_eq!(quick_score(&requester, &candidate), 0.0);
    assert_eq!(detailed_score(&requester, &candidate).location, 0.0);
}

#[test]
fn test_scores_bounded() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let tags = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"];

    for i in 0..tags.len() {
        for age_gap in [0u8, 3, 11, 40] {
            let mut user = create_profile("u", 30, &tags[..i], 0.0, 0.0);
            let mut other = create_profile("o", 30 + age_gap, &tags, 0.0, 0.001 * i as f64);
            user.is_verified = i % 2 == 0;
            other.is_verified = true;
            user.last_active = Some(now);
            other.last_active = Some(now - Duration::hours(i as i64));

            let quick = quick_score(&user, &other);
            assert!((0.0..=100.0).contains(&quick), "quick {}", quick);

            let s = detailed_score(&user, &other);
            assert!((0.0..=INTERESTS_WEIGHT).contains(&s.interests));
            assert!((0.0..=AGE_WEIGHT).contains(&s.age));
            assert!((0.0..=LOCATION_WEIGHT).contains(&s.location));
            assert!((0.0..=ACTIVITY_WEIGHT).contains(&s.activity));
            assert!((0.0..=VERIFICATION_WEIGHT).contains(&s.verification));
            assert!((0.0..=100.0).contains(&s.total), "total {}", s.total);
        }
    }
}

#[test]
fn test_components_zero_for_unrelated_users() {
    let origin = Point::new(13.4050, 52.5200);
    let far = north_of(origin, 35_000.0);

    let mut user = create_profile("u", 25, &["chess"], origin.x(), origin.y());
    user.preferences.max_age = 30;
    let mut other = create_profile("o", 40, &["surfing"], far.x(), far.y());
    other.is_verified = true;

    let s = detailed_score(&user, &other);
    assert_eq!(s.interests, 0.0);
    assert_eq!(s.age, 0.0);
    assert_eq!(s.location, 0.0);
    assert_eq!(s.verification, 0.0);
    assert_eq!(quick_score(&user, &other), 0.0);
}

#[test]
fn test_filter_is_idempotent() {
    let requester = create_profile("me", 30, &["tennis"], -74.0060, 40.7128);
    let mut pool = vec![
        create_profile("1", 25, &["tennis"], -74.01, 40.72),
        create_profile("2", 17, &["tennis"], -74.01, 40.72),
        create_profile("3", 28, &["golf"], -74.01, 40.72),
        create_profile("4", 28, &["tennis"], -80.0, 35.0),
        create_profile("5", 28, &["tennis"], -74.0, 40.7),
        create_profile("6", 31, &["tennis", "golf"], -74.0, 40.7),
    ];
    pool[4].gender = Gender::Other("agender".to_string());

    let exclude = HashSet::from(["1".to_string()]);
    let options = FilterOptions::discovery(&requester.preferences, None);

    let once: Vec<UserProfile> =
        filter_candidates(&pool, &requester, &requester.preferences, &exclude, &options)
            .into_iter()
            .cloned()
            .collect();
    let twice = filter_candidates(&once, &requester, &requester.preferences, &exclude, &options);

    let once_ids: Vec<&str> = once.iter().map(|p| p.id.as_str()).collect();
    let twice_ids: Vec<&str> = twice.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(once_ids, twice_ids);
    assert_eq!(once_ids, vec!["6"]);
}
