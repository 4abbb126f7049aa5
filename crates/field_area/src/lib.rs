//! # Field Area Estimation
//!
//! Estimates the land area enclosed by a walked field boundary from
//! geotagged photos taken along the perimeter.
//!
//! ## Core Features
//!
//! - **Bounded sample collection**: up to 8 boundary samples per field, in capture order
//! - **Area estimation**: tangent-plane projection and shoelace area, reported in
//!   hectare, acre, gunta and square feet
//! - **Session commands**: serializable commands and responses for the host application
//! - **GeoJSON Support**: export the boundary for map rendering, read stored boundaries back
//!
//! ## Quick Start
//!
//! ```rust
//! use field_area::{FieldSession, Sample};
//!
//! let mut session = FieldSession::new();
//! session.add_sample(Sample::new("file:///photo1.jpg", 18.5200, 73.8500));
//! session.add_sample(Sample::new("file:///photo2.jpg", 18.5200, 73.8510));
//! let response = session.add_sample(Sample::new("file:///photo3.jpg", 18.5210, 73.8505));
//!
//! assert!(response.accepted);
//! let report = response.report.unwrap();
//! println!("{} ha / {} gunta", report.hectare, report.gunta);
//! ```
//!
//! ## Using the estimator directly
//!
//! ```rust
//! use field_area::{AreaEstimator, Coordinate};
//!
//! let walk = [
//!     Coordinate::new(18.5200, 73.8500),
//!     Coordinate::new(18.5200, 73.8510),
//!     Coordinate::new(18.5210, 73.8510),
//!     Coordinate::new(18.5210, 73.8500),
//! ];
//! let estimate = AreaEstimator::new().estimate(&walk)?;
//! assert!(estimate.report.acre > 2.0);
//! # Ok::<(), field_area::FieldAreaError>(())
//! ```

pub mod error;
pub mod types;
pub mod traits;
pub mod units;
pub mod estimator;
pub mod collector;
pub mod session;
pub mod io;
pub mod typed_geojson;

pub use error::{FieldAreaError, Result, SessionErrorKind};
pub use types::{AreaReport, Coordinate, FieldRecord, ProjectedPoint, Sample, SampleRecord};
pub use traits::Projection;
pub use units::AreaUnit;
pub use estimator::{
    AreaEstimate, AreaEstimator, EquirectangularProjection, EARTH_RADIUS_M, MIN_POLYGON_POINTS,
};
pub use collector::{SampleCollector, SampleOutcome, MAX_SAMPLES};
pub use session::{FieldSession, SessionCommand, SessionResponse, SharedSession};
pub use io::coordinates_from_geojson_string;
