use crate::models::BoundingBox;
use geo::Point;

/// Earth's radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate the Haversine distance between two points in meters
///
/// Points are `geo` points, so `x` is the longitude and `y` the latitude,
/// both in degrees. Non-finite input propagates as NaN.
#[inline]
pub fn distance_meters(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat1_rad = a.y().to_radians();
    let lat2_rad = b.y().to_radians();
    let delta_lat = (b.y() - a.y()).to_radians();
    let delta_lon = (b.x() - a.x()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Distance in kilometers, for display and radius checks
#[inline]
pub fn distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    distance_meters(a, b) / 1000.0
}

/// Calculate a bounding box around a center point
///
/// Used to build storage-side candidate queries. It over-approximates the
/// radius, so the exact haversine check still runs on the results.
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude)
pub fn bounding_box(center: Point<f64>, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / 111.0;
    let lon_delta = radius_km / (111.0 * center.y().to_radians().cos().abs());

    BoundingBox {
        min_lat: center.y() - lat_delta,
        max_lat: center.y() + lat_delta,
        min_lon: center.x() - lon_delta,
        max_lon: center.x() + lon_delta,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(point: Point<f64>, bbox: &BoundingBox) -> bool {
    point.y() >= bbox.min_lat
        && point.y() <= bbox.max_lat
        && point.x() >= bbox.min_lon
        && point.x() <= bbox.max_lon
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: (f64, f64) = (-0.1278, 51.5074);
    const PARIS: (f64, f64) = (2.3522, 48.8566);

    #[test]
    fn test_haversine_distance() {
        let distance = distance_meters(LONDON.into(), PARIS.into());
        assert!((distance - 344_000.0).abs() < 10_000.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_distance_identical_points() {
        let p: Point<f64> = LONDON.into();
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a: Point<f64> = LONDON.into();
        let b: Point<f64> = PARIS.into();
        assert_eq!(distance_meters(a, b), distance_meters(b, a));
    }

    #[test]
    fn test_nan_propagates() {
        let d = distance_meters(Point::new(f64::NAN, 0.0), Point::new(0.0, 0.0));
        assert!(d.is_nan());
    }

    #[test]
    fn test_bounding_box() {
        let bbox = bounding_box(Point::new(-74.0060, 40.7128), 10.0);

        assert!(bbox.min_lat < 40.7128);
        assert!(bbox.max_lat > 40.7128);
        assert!(bbox.min_lon < -74.0060);
        assert!(bbox.max_lon > -74.0060);

        // 20km / 111km per degree = ~0.18 degrees
        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.18).abs() < 0.02, "Lat span should be ~0.18 degrees");
    }

    #[test]
    fn test_point_within_bbox() {
        let bbox = bounding_box(Point::new(-74.0060, 40.7128), 10.0);

        assert!(is_within_bounding_box(Point::new(-74.0060, 40.7128), &bbox));
        assert!(is_within_bounding_box(Point::new(-74.0, 40.71), &bbox));
        assert!(!is_within_bounding_box(Point::new(-80.0, 50.0), &bbox));
    }
}
