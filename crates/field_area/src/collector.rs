use tracing::{info, warn};

use crate::{
    error::{FieldAreaError, Result},
    estimator::{AreaEstimate, AreaEstimator, MIN_POLYGON_POINTS},
    types::Sample,
};

/// Most photos a single field survey may hold
pub const MAX_SAMPLES: usize = 8;

/// Result of admitting one sample
#[derive(Debug, Clone, PartialEq)]
pub struct SampleOutcome {
    /// Number of samples held after the append
    pub count: usize,
    pub estimate: AreaEstimate,
}

impl SampleOutcome {
    /// True once enough samples are held for a real area
    pub fn recomputed(&self) -> bool {
        self.count >= MIN_POLYGON_POINTS
    }
}

/// Bounded, append-only list of boundary samples for one field survey.
///
/// Insertion order is the vertex order of the walked polygon. The estimate is
/// recomputed from the full list on every accepted sample.
#[derive(Debug, Clone)]
pub struct SampleCollector {
    samples: Vec<Sample>,
    estimator: AreaEstimator,
    last_estimate: AreaEstimate,
}

impl SampleCollector {
    pub fn new() -> Self {
        Self::with_estimator(AreaEstimator::new())
    }

    pub fn with_estimator(estimator: AreaEstimator) -> Self {
        Self {
            samples: Vec::with_capacity(MAX_SAMPLES),
            estimator,
            last_estimate: AreaEstimate::empty(Vec::new()),
        }
    }

    /// Append a sample and recompute the estimate.
    ///
    /// Fails without touching the collector when [`MAX_SAMPLES`] are already
    /// held, whatever the sample, or when the sample's position is invalid.
    pub fn add_sample(&mut self, sample: Sample) -> Result<SampleOutcome> {
        if self.is_full() {
            warn!(identifier = sample.identifier(), capacity = MAX_SAMPLES, "Sample limit reached");
            return Err(FieldAreaError::CapacityExceeded { capacity: MAX_SAMPLES });
        }
        if let Err(e) = sample.coordinate().validate() {
            warn!(identifier = sample.identifier(), error = %e, "Rejected sample");
            return Err(e.at_index(self.samples.len()));
        }

        self.samples.push(sample);
        let count = self.samples.len();

        let estimate = if count >= MIN_POLYGON_POINTS {
            match self.estimator.estimate_samples(&self.samples) {
                Ok(estimate) => estimate,
                Err(e) => {
                    self.samples.pop();
                    return Err(e);
                }
            }
        } else {
            AreaEstimate::empty(Vec::new())
        };
        self.last_estimate = estimate.clone();

        info!(count, hectare = estimate.report.hectare, "Accepted sample");
        Ok(SampleOutcome { count, estimate })
    }

    /// Drop every sample, e.g. after a submission or when the survey is discarded
    pub fn clear(&mut self) {
        info!(discarded = self.samples.len(), "Cleared samples");
        self.samples.clear();
        self.last_estimate = AreaEstimate::empty(Vec::new());
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The estimate produced by the last accepted sample
    pub fn last_estimate(&self) -> &AreaEstimate {
        &self.last_estimate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= MAX_SAMPLES
    }

    pub fn remaining(&self) -> usize {
        MAX_SAMPLES - self.samples.len()
    }
}

impl Default for SampleCollector {
    fn default() -> Self {
        Self::new()
    }
}
