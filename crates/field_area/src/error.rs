use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use strum::{Display, IntoStaticStr};
use thiserror::Error;
use ts_rs::TS;

#[derive(Error, Debug)]
pub enum FieldAreaError {
    #[error("Sample capacity exceeded: a field holds at most {capacity} samples")]
    CapacityExceeded { capacity: usize },

    #[error("Invalid coordinate: {reason}")]
    InvalidCoordinate { index: Option<usize>, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

impl FieldAreaError {
    pub(crate) fn invalid_coordinate(reason: impl Into<String>) -> Self {
        Self::InvalidCoordinate { index: None, reason: reason.into() }
    }

    /// Attach the position of the offending sample
    pub(crate) fn at_index(self, i: usize) -> Self {
        match self {
            Self::InvalidCoordinate { reason, .. } => Self::InvalidCoordinate {
                index: Some(i),
                reason: format!("sample {i}: {reason}"),
            },
            other => other,
        }
    }

    /// The caller-facing kind, if this is one of the two admission errors
    pub fn kind(&self) -> Option<SessionErrorKind> {
        match self {
            Self::CapacityExceeded { .. } => Some(SessionErrorKind::CapacityExceeded),
            Self::InvalidCoordinate { .. } => Some(SessionErrorKind::InvalidCoordinate),
            _ => None,
        }
    }
}

/// Error kinds reported back to the host application in a [`crate::SessionResponse`].
///
/// The host maps `CapacityExceeded` to a "limit reached" message and
/// `InvalidCoordinate` to a "retake photo" message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    Serialize, Deserialize, JsonSchema, TS,
    Display, IntoStaticStr,
)]
#[ts(export)]
pub enum SessionErrorKind {
    CapacityExceeded,
    InvalidCoordinate,
}

pub type Result<T> = std::result::Result<T, FieldAreaError>;
