use field_area::{
    AreaReport, AreaUnit, FieldAreaError, FieldRecord, FieldSession, SampleRecord,
    SessionCommand, SessionResponse,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum FieldCliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    FieldArea(#[from] FieldAreaError),
    #[error("Survey '{0}' has no samples")]
    EmptySurvey(String),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// A walked field boundary, one record per photo in capture order
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Survey {
    pub name: String,
    pub description: Option<String>,
    pub samples: Vec<SampleRecord>,
}

/// Per-photo responses and the final record of a replayed survey
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SurveyOutcome {
    pub responses: Vec<SessionResponse>,
    pub record: FieldRecord,
    pub rejected: usize,
}

impl Survey {
    /// Load a survey from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, FieldCliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, FieldCliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a survey from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, FieldCliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, FieldCliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load the survey
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FieldCliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(FieldCliError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String, FieldCliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json(&self) -> Result<String, FieldCliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Save the survey, picking the format from the extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FieldCliError> {
        let path_ref = path.as_ref();
        let content = match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(FieldCliError::UnsupportedFileFormat),
        };
        fs::write(path_ref, content)?;
        Ok(())
    }

    /// Feed every sample through a fresh session the way the capture screen would.
    ///
    /// Rejected photos are logged and skipped; the survey keeps going.
    pub fn replay(&self) -> Result<(FieldSession, SurveyOutcome), FieldCliError> {
        if self.samples.is_empty() {
            return Err(FieldCliError::EmptySurvey(self.name.clone()));
        }

        let mut session = FieldSession::new();
        let mut responses = Vec::with_capacity(self.samples.len());
        let mut rejected = 0;

        for sample in &self.samples {
            let response = session.execute(SessionCommand::AddSample { sample: sample.clone() });
            if response.accepted {
                info!(
                    identifier = %sample.identifier,
                    count = response.sample_count,
                    "Photo accepted"
                );
            } else {
                rejected += 1;
                warn!(
                    identifier = %sample.identifier,
                    error = ?response.error,
                    "{}",
                    response.message.clone().unwrap_or_default()
                );
            }
            responses.push(response);
        }

        let record = session.record();
        Ok((session, SurveyOutcome { responses, record, rejected }))
    }
}

/// One line per unit, at the precision the report carries
pub fn report_lines(report: &AreaReport) -> Vec<String> {
    AreaUnit::iter()
        .map(|unit| {
            format!(
                "{:>8}: {:.*} {}",
                unit.to_string(),
                unit.precision() as usize,
                report.get(unit),
                unit.symbol()
            )
        })
        .collect()
}
