use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use ts_rs::TS;

use crate::{
    collector::{SampleCollector, MAX_SAMPLES},
    error::{FieldAreaError, SessionErrorKind},
    estimator::MIN_POLYGON_POINTS,
    types::{AreaReport, Coordinate, FieldRecord, Sample, SampleRecord},
};

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params")]
#[strum(serialize_all = "snake_case")]
pub enum SessionCommand {
    /// Add one geotagged boundary photo to the survey
    #[serde(rename = "add_sample")]
    AddSample {
        sample: SampleRecord,
    },

    /// Discard every sample of the survey
    #[serde(rename = "clear_session")]
    ClearSession,

    /// Return the current area without changing the survey
    #[serde(rename = "report")]
    Report,
}

impl SessionCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SessionCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::AddSample { .. } => "Add a geotagged boundary photo and recompute the field area",
            Self::ClearSession => "Discard all samples and start a new field",
            Self::Report => "Report the current field area and boundary",
        }
    }
}

/// What the host application receives after each command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct SessionResponse {
    pub accepted: bool,
    pub sample_count: usize,
    pub report: Option<AreaReport>,
    /// Present once the boundary has enough points to draw
    pub coordinates: Option<Vec<Coordinate>>,
    pub error: Option<SessionErrorKind>,
    pub message: Option<String>,
}

impl SessionResponse {
    fn rejected(sample_count: usize, error: &FieldAreaError) -> Self {
        Self {
            accepted: false,
            sample_count,
            report: None,
            coordinates: None,
            error: error.kind(),
            message: Some(error.to_string()),
        }
    }
}

/// One field survey. Sessions are independent values; the host owns them.
#[derive(Debug, Clone, Default)]
pub struct FieldSession {
    collector: SampleCollector,
}

impl FieldSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute(&mut self, command: SessionCommand) -> SessionResponse {
        match command {
            SessionCommand::AddSample { .. } if self.collector.is_full() => {
                let error = FieldAreaError::CapacityExceeded { capacity: MAX_SAMPLES };
                SessionResponse::rejected(self.collector.len(), &error)
            }
            SessionCommand::AddSample { sample } => match Sample::try_from(sample) {
                Ok(sample) => self.add_sample(sample),
                Err(e) => {
                    let count = self.collector.len();
                    SessionResponse::rejected(count, &e.at_index(count))
                }
            },
            SessionCommand::ClearSession => {
                self.clear_session();
                self.current()
            }
            SessionCommand::Report => self.current(),
        }
    }

    /// Admit a sample; rejections are reported in the response, never raised
    pub fn add_sample(&mut self, sample: Sample) -> SessionResponse {
        match self.collector.add_sample(sample) {
            Ok(outcome) => SessionResponse {
                accepted: true,
                sample_count: outcome.count,
                report: Some(outcome.estimate.report),
                coordinates: outcome.recomputed().then_some(outcome.estimate.coordinates),
                error: None,
                message: None,
            },
            Err(e) => SessionResponse::rejected(self.collector.len(), &e),
        }
    }

    pub fn clear_session(&mut self) {
        self.collector.clear();
    }

    pub fn collector(&self) -> &SampleCollector {
        &self.collector
    }

    pub fn samples(&self) -> &[Sample] {
        self.collector.samples()
    }

    /// Whether the survey has enough samples to be submitted
    pub fn is_complete(&self) -> bool {
        self.collector.len() >= MIN_POLYGON_POINTS
    }

    /// The record to persist for this field
    pub fn record(&self) -> FieldRecord {
        let estimate = self.collector.last_estimate();
        FieldRecord {
            report: estimate.report,
            coordinates: estimate.coordinates.clone(),
        }
    }

    fn current(&self) -> SessionResponse {
        let estimate = self.collector.last_estimate();
        SessionResponse {
            accepted: true,
            sample_count: self.collector.len(),
            report: Some(estimate.report),
            coordinates: estimate.is_polygon().then(|| estimate.coordinates.clone()),
            error: None,
            message: None,
        }
    }
}

/// A session shared between handlers that may run concurrently.
///
/// Each command runs under the lock, so admission, capacity check and
/// recomputation happen as one critical section.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<FieldSession>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute(&self, command: SessionCommand) -> SessionResponse {
        let mut session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        session.execute(command)
    }

    pub fn add_sample(&self, sample: Sample) -> SessionResponse {
        let mut session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        session.add_sample(sample)
    }

    pub fn clear_session(&self) {
        let mut session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        session.clear_session();
    }

    pub fn record(&self) -> FieldRecord {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).record()
    }

    pub fn sample_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).collector().len()
    }

    /// Samples still accepted before the limit
    pub fn remaining(&self) -> usize {
        MAX_SAMPLES - self.sample_count()
    }
}
