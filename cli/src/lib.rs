use std::path::{Path, PathBuf};

use image_analyzer::{
    AnalysisConfig, AnalyzerError, AnalyzerExt, AnalyzerHandle, AnalyzerParameter, AnalyzerRegistry,
    AnalyzerStatus, ConfigError, FiberAnalyzer, LifecycleState, ParameterShape, Point, Roi, Size,
    fiber::FIBER_ANALYZER_NAME,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

impl CliError {
    /// Status code to report for this failure
    pub fn status(&self) -> Option<AnalyzerStatus> {
        match self {
            Self::Analyzer(err) | Self::Config(ConfigError::Analyzer(err)) => Some(err.status()),
            Self::Config(_) => None,
        }
    }
}

/// One (kind, shape) pairing a variant accepts
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParameterReport {
    pub kind: AnalyzerParameter,
    pub shape: ParameterShape,
    pub description: &'static str,
}

/// What a registered variant accepts
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VariantReport {
    pub name: String,
    pub parameters: Vec<ParameterReport>,
    pub steps: Vec<&'static str>,
}

/// Analyzer state captured after configuration
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConfigureReport {
    pub variant: &'static str,
    pub state: LifecycleState,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub region_of_interest: Option<Roi>,
}

pub fn variant_reports(registry: &AnalyzerRegistry) -> Result<Vec<VariantReport>, CliError> {
    registry
        .names()
        .map(|name| {
            let analyzer = registry
                .create(name)
                .map_err(|e| CliError::Config(ConfigError::Registry(e)))?;
            let steps = if name == FIBER_ANALYZER_NAME {
                FiberAnalyzer::steps().to_vec()
            } else {
                Vec::new()
            };
            Ok(VariantReport {
                name: name.to_string(),
                parameters: parameter_reports(analyzer.accepted_parameters()),
                steps,
            })
        })
        .collect()
}

fn parameter_reports(bindings: &[image_analyzer::ParameterBinding]) -> Vec<ParameterReport> {
    bindings
        .iter()
        .map(|binding| ParameterReport {
            kind: binding.kind,
            shape: binding.shape,
            description: binding.kind.description(),
        })
        .collect()
}

/// Build the configured variant, apply the configuration and destroy it again
pub fn configure(config: &AnalysisConfig, registry: &AnalyzerRegistry) -> Result<ConfigureReport, CliError> {
    let mut analyzer = AnalyzerHandle::initialized(config.build(registry)?)?;
    config.apply(&mut *analyzer)?;

    let report = ConfigureReport {
        variant: analyzer.name(),
        state: analyzer.state(),
        input_path: analyzer.input_path().map(Path::to_path_buf),
        output_path: analyzer.output_path().map(Path::to_path_buf),
        region_of_interest: analyzer.region_of_interest(),
    };
    analyzer.release()?;
    Ok(report)
}

/// Effective ROI for an input image, using the fiber variant's ROI parameters
pub fn roi_preview(
    input: &Path,
    origin: Option<Point>,
    size: Option<Size>,
) -> Result<Option<Roi>, CliError> {
    let mut analyzer = AnalyzerHandle::initialized(Box::new(FiberAnalyzer::with_roi_parameters()))?;
    analyzer.set_input_path(input)?;

    match (origin, size) {
        (Some(origin), Some(size)) => analyzer.set_roi(AnalyzerParameter::DefineRoi, origin, size)?,
        (Some(origin), None) => analyzer.set(AnalyzerParameter::RoiCoordinates, origin)?,
        (None, Some(size)) => analyzer.set(AnalyzerParameter::RoiDimensions, size)?,
        (None, None) => {}
    }

    let roi = analyzer.region_of_interest();
    analyzer.release()?;
    Ok(roi)
}
