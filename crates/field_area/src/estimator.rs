//! Area estimation from an ordered boundary walk.
//!
//! Points are flattened onto a tangent plane at the mean latitude of the walk
//! (equirectangular approximation) and the enclosed area is taken with the
//! shoelace formula. The approximation holds for field-sized parcels of a few
//! hectares. It is not valid for large extents or for walks near the poles,
//! where `cos(mean latitude)` collapses the x axis.
//!
//! The absolute value of the shoelace sum is used, so clockwise and
//! counter-clockwise walks give the same area. A walk that crosses itself
//! still yields a number, but not the area of any meaningful parcel; no
//! self-intersection check is made.

use geo::{Centroid, EuclideanLength};
use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use tracing::debug;

use crate::{
    error::Result,
    traits::Projection,
    types::{AreaReport, Coordinate, ProjectedPoint, Sample},
};

/// WGS-84 equatorial radius in meters
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Fewer boundary points than this enclose no area
pub const MIN_POLYGON_POINTS: usize = 3;

/// Tangent-plane projection centered on a reference latitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquirectangularProjection {
    reference_latitude_rad: f64,
    radius: f64,
}

impl EquirectangularProjection {
    pub fn new(reference_latitude_deg: f64) -> Self {
        Self {
            reference_latitude_rad: reference_latitude_deg.to_radians(),
            radius: EARTH_RADIUS_M,
        }
    }

    /// Project around the simple (unweighted) mean latitude of `points`
    pub fn centered_on(points: &[Coordinate]) -> Self {
        Self::new(mean_latitude(points))
    }

    pub fn reference_latitude(&self) -> f64 {
        self.reference_latitude_rad.to_degrees()
    }
}

impl Projection for EquirectangularProjection {
    fn project(&self, coordinate: Coordinate) -> ProjectedPoint {
        ProjectedPoint {
            x: self.radius * coordinate.longitude.to_radians() * self.reference_latitude_rad.cos(),
            y: self.radius * coordinate.latitude.to_radians(),
        }
    }

    fn unproject(&self, point: ProjectedPoint) -> Coordinate {
        Coordinate {
            latitude: (point.y / self.radius).to_degrees(),
            longitude: (point.x / (self.radius * self.reference_latitude_rad.cos())).to_degrees(),
        }
    }
}

/// Arithmetic mean of the latitudes, in degrees; 0 for an empty slice
pub fn mean_latitude(points: &[Coordinate]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|c| c.latitude).sum::<f64>() / points.len() as f64
}

/// Half the cyclic cross-product sum over a closed ring; positive when counter-clockwise
pub fn shoelace_signed_area(points: &[ProjectedPoint]) -> f64 {
    let n = points.len();
    if n < MIN_POLYGON_POINTS {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Everything derived from one boundary walk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AreaEstimate {
    /// Unrounded enclosed area in square meters
    pub area_m2: f64,
    pub report: AreaReport,
    /// The walk in capture order, identifiers stripped
    pub coordinates: Vec<Coordinate>,
    /// Length of the closed boundary on the tangent plane, in meters
    pub perimeter_m: f64,
    pub centroid: Option<Coordinate>,
}

impl AreaEstimate {
    /// The estimate for a walk too short to enclose anything
    pub fn empty(coordinates: Vec<Coordinate>) -> Self {
        Self {
            area_m2: 0.0,
            report: AreaReport::ZERO,
            coordinates,
            perimeter_m: 0.0,
            centroid: None,
        }
    }

    pub fn is_polygon(&self) -> bool {
        self.coordinates.len() >= MIN_POLYGON_POINTS
    }
}

/// Stateless area estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaEstimator;

impl AreaEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate the area enclosed by `points`, taken in walk order
    pub fn estimate(&self, points: &[Coordinate]) -> Result<AreaEstimate> {
        for (i, point) in points.iter().enumerate() {
            point.validate().map_err(|e| e.at_index(i))?;
        }

        let coordinates = points.to_vec();
        if points.len() < MIN_POLYGON_POINTS {
            return Ok(AreaEstimate::empty(coordinates));
        }

        let projection = EquirectangularProjection::centered_on(points);
        let projected: Vec<ProjectedPoint> =
            points.iter().map(|&c| projection.project(c)).collect();

        let area_m2 = shoelace_signed_area(&projected).abs();
        let polygon = to_geo_polygon(&projected);
        let perimeter_m = polygon.exterior().euclidean_length();
        let centroid = polygon
            .centroid()
            .map(|p| projection.unproject(ProjectedPoint { x: p.x(), y: p.y() }));

        debug!(
            points = points.len(),
            reference_latitude = projection.reference_latitude(),
            area_m2,
            perimeter_m,
            "Recomputed field area"
        );

        Ok(AreaEstimate {
            area_m2,
            report: AreaReport::from_square_meters(area_m2),
            coordinates,
            perimeter_m,
            centroid,
        })
    }

    /// Estimate from captured samples, in capture order
    pub fn estimate_samples(&self, samples: &[Sample]) -> Result<AreaEstimate> {
        let coordinates: Vec<Coordinate> = samples.iter().map(Sample::coordinate).collect();
        self.estimate(&coordinates)
    }
}

/// Closed projected ring as a geo-types polygon
pub fn to_geo_polygon(points: &[ProjectedPoint]) -> Polygon<f64> {
    let ring: Vec<Coord<f64>> = points.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
    Polygon::new(LineString::new(ring), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldAreaError;

    const BASE_LAT: f64 = 18.52;
    const BASE_LON: f64 = 73.85;

    /// Degrees of latitude spanning `meters` on the tangent plane
    fn lat_offset(meters: f64) -> f64 {
        (meters / EARTH_RADIUS_M).to_degrees()
    }

    /// Degrees of longitude spanning `meters` at the given mean latitude
    fn lon_offset(meters: f64, mean_lat: f64) -> f64 {
        (meters / (EARTH_RADIUS_M * mean_lat.to_radians().cos())).to_degrees()
    }

    /// Right triangle with 100 m legs along x and y after projection
    fn right_triangle() -> Vec<Coordinate> {
        let dlat = lat_offset(100.0);
        let mean_lat = BASE_LAT + dlat / 3.0;
        let dlon = lon_offset(100.0, mean_lat);
        vec![
            Coordinate::new(BASE_LAT, BASE_LON),
            Coordinate::new(BASE_LAT, BASE_LON + dlon),
            Coordinate::new(BASE_LAT + dlat, BASE_LON),
        ]
    }

    /// Axis-aligned square of the given side in meters
    fn square(side: f64) -> Vec<Coordinate> {
        let dlat = lat_offset(side);
        let dlon = lon_offset(side, BASE_LAT + dlat / 2.0);
        vec![
            Coordinate::new(BASE_LAT, BASE_LON),
            Coordinate::new(BASE_LAT, BASE_LON + dlon),
            Coordinate::new(BASE_LAT + dlat, BASE_LON + dlon),
            Coordinate::new(BASE_LAT + dlat, BASE_LON),
        ]
    }

    #[test]
    fn test_fewer_than_three_points_is_zero() {
        let estimator = AreaEstimator::new();
        let points = right_triangle();
        for n in 0..3 {
            let estimate = estimator.estimate(&points[..n]).expect("Should estimate");
            assert_eq!(estimate.report, AreaReport::ZERO);
            assert_eq!(estimate.area_m2, 0.0);
            assert_eq!(estimate.coordinates.len(), n);
        }
    }

    #[test]
    fn test_right_triangle_area() {
        let estimate = AreaEstimator::new().estimate(&right_triangle()).expect("Should estimate");

        assert!((estimate.area_m2 - 5_000.0).abs() < 1e-6, "area was {}", estimate.area_m2);
        assert_eq!(estimate.report.hectare, 0.5);
        assert_eq!(estimate.report.acre, 1.2355);
        assert!((estimate.report.gunta - 49.42).abs() < 0.01);
        assert_eq!(estimate.report.sqft, 53_819.5);
    }

    #[test]
    fn test_rotation_invariance() {
        let estimator = AreaEstimator::new();
        let mut points = square(80.0);
        points.insert(
            2,
            Coordinate::new(
                BASE_LAT + lat_offset(40.0),
                BASE_LON + lon_offset(120.0, BASE_LAT),
            ),
        );
        let reference = estimator.estimate(&points).unwrap().area_m2;

        for shift in 1..points.len() {
            let mut rotated = points.clone();
            rotated.rotate_left(shift);
            let area = estimator.estimate(&rotated).unwrap().area_m2;
            assert!((area - reference).abs() < 1e-6, "shift {shift}: {area} vs {reference}");
        }
    }

    #[test]
    fn test_orientation_does_not_matter() {
        let estimator = AreaEstimator::new();
        let points = square(50.0);
        let mut reversed = points.clone();
        reversed.reverse();
        let a = estimator.estimate(&points).unwrap().area_m2;
        let b = estimator.estimate(&reversed).unwrap().area_m2;
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_reordering_can_change_area() {
        // Swapping two vertices of a square walks a bow-tie
        let estimator = AreaEstimator::new();
        let points = square(50.0);
        let mut crossed = points.clone();
        crossed.swap(1, 2);
        let a = estimator.estimate(&points).unwrap().area_m2;
        let b = estimator.estimate(&crossed).unwrap().area_m2;
        assert!((a - b).abs() > 1.0);
    }

    #[test]
    fn test_square_scaling() {
        let projected = |side: f64| {
            vec![
                ProjectedPoint { x: 0.0, y: 0.0 },
                ProjectedPoint { x: side, y: 0.0 },
                ProjectedPoint { x: side, y: side },
                ProjectedPoint { x: 0.0, y: side },
            ]
        };
        let small = shoelace_signed_area(&projected(60.0)).abs();
        let large = shoelace_signed_area(&projected(120.0)).abs();
        assert_eq!(small, 3_600.0);
        assert_eq!(large, 4.0 * small);

        let estimator = AreaEstimator::new();
        let small = estimator.estimate(&square(60.0)).unwrap().area_m2;
        let large = estimator.estimate(&square(120.0)).unwrap().area_m2;
        assert!((large / small - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = [
            ProjectedPoint { x: 0.0, y: 0.0 },
            ProjectedPoint { x: 10.0, y: 0.0 },
            ProjectedPoint { x: 0.0, y: 10.0 },
        ];
        assert_eq!(shoelace_signed_area(&ccw), 50.0);
        let mut cw = ccw;
        cw.reverse();
        assert_eq!(shoelace_signed_area(&cw), -50.0);
    }

    #[test]
    fn test_matches_geo_area() {
        use geo::Area;
        let points = square(75.0);
        let projection = EquirectangularProjection::centered_on(&points);
        let projected: Vec<ProjectedPoint> =
            points.iter().map(|&c| projection.project(c)).collect();
        let ours = shoelace_signed_area(&projected).abs();
        let geo_area = to_geo_polygon(&projected).unsigned_area();
        assert!((ours - geo_area).abs() < 1e-6);
    }

    #[test]
    fn test_unit_consistency() {
        let estimator = AreaEstimator::new();
        for side in [20.0, 63.0, 150.0, 400.0] {
            let report = estimator.estimate(&square(side)).unwrap().report;
            assert!(!report.is_zero());
            assert!(
                (report.acre - report.hectare * 2.47105).abs() < 1e-3,
                "side {side}: {report:?}"
            );
            assert!(
                (report.gunta - report.acre * 40.0).abs() < 40.0 * 1e-4 + 1e-4,
                "side {side}: {report:?}"
            );
        }
    }

    #[test]
    fn test_degenerate_points() {
        let points = vec![Coordinate::new(BASE_LAT, BASE_LON); 5];
        let estimate = AreaEstimator::new().estimate(&points).expect("Should estimate");
        assert_eq!(estimate.area_m2, 0.0);
        assert_eq!(estimate.report, AreaReport::ZERO);
        assert!(!estimate.perimeter_m.is_nan());
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let mut points = right_triangle();
        points[1].latitude = 200.0;
        let err = AreaEstimator::new().estimate(&points).unwrap_err();
        match err {
            FieldAreaError::InvalidCoordinate { index, .. } => assert_eq!(index, Some(1)),
            other => panic!("unexpected error {other:?}"),
        }

        let points = vec![Coordinate::new(f64::NAN, BASE_LON)];
        assert!(AreaEstimator::new().estimate(&points).is_err());
    }

    #[test]
    fn test_perimeter_and_centroid() {
        let points = square(100.0);
        let estimate = AreaEstimator::new().estimate(&points).unwrap();
        assert!((estimate.perimeter_m - 400.0).abs() < 0.5);

        let centroid = estimate.centroid.expect("Should have a centroid");
        assert!((centroid.latitude - (BASE_LAT + lat_offset(50.0))).abs() < 1e-7);
        assert!(centroid.longitude > BASE_LON && centroid.longitude < points[1].longitude);
    }

    #[test]
    fn test_projection_round_trip() {
        let projection = EquirectangularProjection::new(BASE_LAT);
        let c = Coordinate::new(18.6, 73.9);
        let back = projection.unproject(projection.project(c));
        assert!((back.latitude - c.latitude).abs() < 1e-9);
        assert!((back.longitude - c.longitude).abs() < 1e-9);
    }
}
