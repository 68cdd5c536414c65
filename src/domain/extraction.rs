use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one completion call.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Success(String),
    Failure(String),
}

impl Extraction {
    pub fn is_success(&self) -> bool {
        matches!(self, Extraction::Success(_))
    }

    /// The text shown to the user, failures read as `Error: <reason>`.
    pub fn into_text(self) -> String {
        match self {
            Extraction::Success(text) => text,
            Extraction::Failure(reason) => format!("Error: {}", reason),
        }
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extraction::Success(text) => write!(f, "{}", text),
            Extraction::Failure(reason) => write!(f, "Error: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    #[serde(rename = "Entity")]
    pub entity: String,
    #[serde(rename = "Extracted Info")]
    pub extracted_info: String,
}

impl ExtractionRecord {
    pub fn new(entity: impl Into<String>, extracted_info: impl Into<String>) -> Self {
        ExtractionRecord {
            entity: entity.into(),
            extracted_info: extracted_info.into(),
        }
    }

    /// Rebuilds a record carried through a form, both fields are required.
    pub fn from_parts(entity: Option<&str>, extracted_info: Option<&str>) -> Option<Self> {
        match (entity, extracted_info) {
            (Some(entity), Some(info)) if !entity.is_empty() && !info.is_empty() => {
                Some(ExtractionRecord::new(entity, info))
            }
            _ => None,
        }
    }

    pub fn as_row(&self) -> Vec<String> {
        vec![self.entity.clone(), self.extracted_info.clone()]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("Csv output is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Renders records as csv with an `Entity,Extracted Info` header.
pub fn records_to_csv(records: &[ExtractionRecord]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;

    Ok(String::from_utf8(bytes)?)
}
