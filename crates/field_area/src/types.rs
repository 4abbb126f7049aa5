use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use ts_rs::TS;

use crate::{
    error::{FieldAreaError, Result},
    units::{AreaUnit, SQ_FEET_PER_GUNTA, round_to},
};

/// A geodetic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Reject non-finite or out-of-range degrees
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(FieldAreaError::invalid_coordinate(format!(
                "non-finite position ({}, {})",
                self.latitude, self.longitude
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(FieldAreaError::invalid_coordinate(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(FieldAreaError::invalid_coordinate(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// One accepted boundary observation: a captured photo and where it was taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SampleRecord", into = "SampleRecord")]
pub struct Sample {
    identifier: String,
    position: Coordinate,
}

impl Sample {
    pub fn new(identifier: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            identifier: identifier.into(),
            position: Coordinate::new(latitude, longitude),
        }
    }

    /// Opaque capture identifier, e.g. the photo URI
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn latitude(&self) -> f64 {
        self.position.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.position.longitude
    }

    pub fn coordinate(&self) -> Coordinate {
        self.position
    }
}

/// Wire form of a sample as handed over by the capture layer.
///
/// Latitude and longitude may be absent when the location fix failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SampleRecord {
    #[serde(alias = "uri")]
    pub identifier: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl TryFrom<SampleRecord> for Sample {
    type Error = FieldAreaError;

    fn try_from(record: SampleRecord) -> Result<Self> {
        match (record.latitude, record.longitude) {
            (Some(latitude), Some(longitude)) => {
                Ok(Sample::new(record.identifier, latitude, longitude))
            }
            (None, _) => Err(FieldAreaError::invalid_coordinate(format!(
                "sample '{}' has no latitude",
                record.identifier
            ))),
            (_, None) => Err(FieldAreaError::invalid_coordinate(format!(
                "sample '{}' has no longitude",
                record.identifier
            ))),
        }
    }
}

impl From<Sample> for SampleRecord {
    fn from(sample: Sample) -> Self {
        Self {
            identifier: sample.identifier,
            latitude: Some(sample.position.latitude),
            longitude: Some(sample.position.longitude),
        }
    }
}

/// A point on the local tangent plane, in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

/// Area of a field in the units used by land records
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct AreaReport {
    pub hectare: f64,
    pub acre: f64,
    pub gunta: f64,
    pub sqft: f64,
}

impl AreaReport {
    /// The report for a field with fewer than three samples
    pub const ZERO: AreaReport = AreaReport { hectare: 0.0, acre: 0.0, gunta: 0.0, sqft: 0.0 };

    /// Convert an unrounded area and round each unit to its output precision
    pub fn from_square_meters(area_m2: f64) -> Self {
        Self {
            hectare: AreaUnit::Hectare.report_value(area_m2),
            acre: AreaUnit::Acre.report_value(area_m2),
            gunta: AreaUnit::Gunta.report_value(area_m2),
            sqft: AreaUnit::SquareFeet.report_value(area_m2),
        }
    }

    /// Rebuild a report from a stored record, which keeps no square-feet value
    pub fn from_stored(hectare: f64, acre: f64, gunta: f64) -> Self {
        Self {
            hectare,
            acre,
            gunta,
            sqft: round_to(gunta * SQ_FEET_PER_GUNTA, AreaUnit::SquareFeet.precision()),
        }
    }

    pub fn get(&self, unit: AreaUnit) -> f64 {
        match unit {
            AreaUnit::Hectare => self.hectare,
            AreaUnit::Acre => self.acre,
            AreaUnit::Gunta => self.gunta,
            AreaUnit::SquareFeet => self.sqft,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Persisted shape of a surveyed field: the report plus the boundary it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct FieldRecord {
    #[serde(flatten)]
    pub report: AreaReport,
    pub coordinates: Vec<Coordinate>,
}

impl FieldRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
