use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

use crate::parameter::{AnalyzerParameter, ParameterShape};

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Failed to release analyzer resources: {0}")]
    FailedDestruct(String),

    #[error("Failed to initialize analyzer: {0}")]
    FailedInitialize(String),

    #[error("Input image {path:?} is not readable: {reason}")]
    BadInput { path: PathBuf, reason: String },

    #[error("Output {path:?} cannot be created: {reason}")]
    BadOutput { path: PathBuf, reason: String },

    #[error("Parameter {kind} does not accept a {shape} value for the {analyzer} analyzer")]
    BadParameterType {
        analyzer: &'static str,
        kind: AnalyzerParameter,
        shape: ParameterShape,
    },

    #[error("Parameter {kind} value out of range: {reason}")]
    BadParameterValue {
        kind: AnalyzerParameter,
        reason: String,
    },
}

impl AnalyzerError {
    pub fn status(&self) -> AnalyzerStatus {
        match self {
            Self::FailedDestruct(_) => AnalyzerStatus::FailedDestruct,
            Self::FailedInitialize(_) => AnalyzerStatus::FailedInitialize,
            Self::BadInput { .. } => AnalyzerStatus::BadInput,
            Self::BadOutput { .. } => AnalyzerStatus::BadOutput,
            Self::BadParameterType { .. } => AnalyzerStatus::BadParameterType,
            Self::BadParameterValue { .. } => AnalyzerStatus::BadParameterValue,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Return codes exposed across the C boundary. Exactly one code per call.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize,
    Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalyzerStatus {
    /// Successful function call
    Ok = 0,
    /// Resource deallocation failed
    FailedDestruct = 1,
    /// Allocation failed on initialization
    FailedInitialize = 2,
    /// The input file does not exist or is not an image
    BadInput = 3,
    /// The output file could not be created
    BadOutput = 4,
    /// Parameter invalid for the analyzer type
    BadParameterType = 5,
    /// Parameter value out of range
    BadParameterValue = 6,
}

impl AnalyzerStatus {
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl<T> From<&Result<T>> for AnalyzerStatus {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => AnalyzerStatus::Ok,
            Err(err) => err.status(),
        }
    }
}

impl From<&AnalyzerError> for AnalyzerStatus {
    fn from(err: &AnalyzerError) -> Self {
        err.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_status_codes_are_stable() {
        let codes: Vec<i32> = AnalyzerStatus::iter().map(|s| s as i32).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_each_error_maps_to_one_status() {
        let err = AnalyzerError::BadParameterType {
            analyzer: "fiber",
            kind: AnalyzerParameter::RoiDimensions,
            shape: ParameterShape::Size,
        };
        assert_eq!(err.status(), AnalyzerStatus::BadParameterType);

        let result: Result<()> = Err(AnalyzerError::FailedDestruct("twice".into()));
        assert_eq!(AnalyzerStatus::from(&result), AnalyzerStatus::FailedDestruct);

        let ok: Result<()> = Ok(());
        assert!(AnalyzerStatus::from(&ok).is_ok());
    }

    #[test]
    fn test_error_message_names_the_pairing() {
        let err = AnalyzerError::BadParameterType {
            analyzer: "fiber",
            kind: AnalyzerParameter::DefineRoi,
            shape: ParameterShape::Int,
        };
        let message = err.to_string();
        assert!(message.contains("define_roi"));
        assert!(message.contains("int"));
        assert!(message.contains("fiber"));
    }
}
