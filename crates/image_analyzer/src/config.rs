use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    error::AnalyzerError,
    fiber::{FIBER_ANALYZER_NAME, FiberAnalyzer},
    parameter::{AnalyzerParameter, ParameterValue},
    registry::{AnalyzerRegistry, RegistryError},
    traits::Analyzer,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// One parameter assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParameterSetting {
    pub kind: AnalyzerParameter,
    pub value: ParameterValue,
}

/// Declarative description of an analyzer run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisConfig {
    /// Registered variant name
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Enable the ROI parameters on the fiber variant
    #[serde(default)]
    pub accept_roi_parameters: bool,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    #[serde(default)]
    pub parameters: Vec<ParameterSetting>,
}

fn default_variant() -> String {
    FIBER_ANALYZER_NAME.to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            accept_roi_parameters: false,
            input_path: None,
            output_path: None,
            parameters: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AnalysisConfig)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&fs::read_to_string(path)?),
            Some("json") => Self::from_json(&fs::read_to_string(path)?),
            _ => Err(ConfigError::UnsupportedFileFormat),
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Construct the configured variant. The analyzer is not yet initialized.
    pub fn build(&self, registry: &AnalyzerRegistry) -> Result<Box<dyn Analyzer>, ConfigError> {
        if self.accept_roi_parameters && self.variant == FIBER_ANALYZER_NAME {
            return Ok(Box::new(FiberAnalyzer::with_roi_parameters()));
        }
        Ok(registry.create(&self.variant)?)
    }

    /// Apply paths, then parameters in order. Stops at the first failure.
    pub fn apply(&self, analyzer: &mut dyn Analyzer) -> Result<(), AnalyzerError> {
        if let Some(input) = &self.input_path {
            analyzer.set_input_path(input)?;
        }
        if let Some(output) = &self.output_path {
            analyzer.set_output_path(output)?;
        }
        for setting in &self.parameters {
            analyzer.set_parameter(setting.kind, setting.value.clone())?;
        }
        info!(
            analyzer = analyzer.name(),
            parameters = self.parameters.len(),
            "configuration applied"
        );
        Ok(())
    }
}
