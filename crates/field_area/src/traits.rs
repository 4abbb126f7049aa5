use crate::types::{Coordinate, ProjectedPoint};

/// Trait for flattening geodetic positions onto a local plane
pub trait Projection: Send + Sync {
    /// Map a position in degrees to plane coordinates in meters
    fn project(&self, coordinate: Coordinate) -> ProjectedPoint;

    /// Inverse of [`Projection::project`]
    fn unproject(&self, point: ProjectedPoint) -> Coordinate;
}
