//! Collagen fiber analyzer for confocal reflection microscopy images.

use std::path::Path;

use serde::Serialize;
use strum::{Display, EnumIter, IntoStaticStr, VariantNames};
use tracing::{debug, warn};

use crate::{
    error::{AnalyzerError, Result},
    lifecycle::LifecycleState,
    parameter::{AnalyzerParameter, ParameterBinding, ParameterValue, ROI_BINDINGS},
    settings::AnalyzerSettings,
    traits::{Analyzer, AnalyzerExt},
    types::Roi,
};

pub const FIBER_ANALYZER_NAME: &str = "fiber";

/// Analysis steps for collagen fiber matrix images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumIter, VariantNames, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FiberAnalysisStep {
    /// Filtering routine that identifies fibers
    Filter,
    /// Binary image of the fiber matrix
    Binary,
}

#[derive(Debug, Default)]
pub struct FiberAnalyzer {
    state: LifecycleState,
    settings: AnalyzerSettings,
    bindings: &'static [ParameterBinding],
}

impl FiberAnalyzer {
    /// Fiber analyzer recognizing no parameter kinds
    pub fn new() -> Self {
        Self::default()
    }

    /// Fiber analyzer that accepts the region-of-interest parameters
    pub fn with_roi_parameters() -> Self {
        Self {
            bindings: ROI_BINDINGS,
            ..Self::default()
        }
    }

    pub fn steps() -> &'static [&'static str] {
        <FiberAnalysisStep as VariantNames>::VARIANTS
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }
}

impl Analyzer for FiberAnalyzer {
    fn name(&self) -> &'static str {
        FIBER_ANALYZER_NAME
    }

    fn state(&self) -> LifecycleState {
        self.state
    }

    fn initialize(&mut self) -> Result<()> {
        self.state.initialize()?;
        self.settings = AnalyzerSettings::new();
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        self.state.destroy()?;
        self.settings = AnalyzerSettings::new();
        Ok(())
    }

    fn set_input_path(&mut self, path: &Path) -> Result<()> {
        self.state.ensure_ready()?;
        self.settings.set_input_path(path)
    }

    fn set_output_path(&mut self, path: &Path) -> Result<()> {
        self.state.ensure_ready()?;
        self.settings.set_output_path(path)
    }

    fn set_parameter(&mut self, kind: AnalyzerParameter, value: ParameterValue) -> Result<()> {
        self.state.ensure_ready()?;

        if !self.accepts(kind, &value) {
            warn!(analyzer = FIBER_ANALYZER_NAME, %kind, shape = %value.shape(), "parameter rejected");
            return Err(AnalyzerError::BadParameterType {
                analyzer: FIBER_ANALYZER_NAME,
                kind,
                shape: value.shape(),
            });
        }

        debug!(analyzer = FIBER_ANALYZER_NAME, %kind, "setting parameter");
        self.settings.apply_roi(FIBER_ANALYZER_NAME, kind, &value)
    }

    fn accepted_parameters(&self) -> &[ParameterBinding] {
        self.bindings
    }

    fn input_path(&self) -> Option<&Path> {
        self.settings.input_path()
    }

    fn output_path(&self) -> Option<&Path> {
        self.settings.output_path()
    }

    fn region_of_interest(&self) -> Option<Roi> {
        self.settings.region_of_interest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerStatus;
    use crate::parameter::ParameterShape;
    use crate::types::{Point, Size};
    use image::GrayImage;
    use std::path::PathBuf;
    use strum::IntoEnumIterator;
    use tempfile::TempDir;

    fn every_shape() -> Vec<ParameterValue> {
        vec![
            ParameterValue::Short(1),
            ParameterValue::Int(1),
            ParameterValue::Float(1.0),
            ParameterValue::Double(1.0),
            ParameterValue::ShortArray(vec![1, 2]),
            ParameterValue::IntArray(vec![1, 2]),
            ParameterValue::FloatArray(vec![1.0]),
            ParameterValue::DoubleArray(vec![1.0]),
            ParameterValue::Point(Point::new(1, 1)),
            ParameterValue::Size(Size::new(1, 1)),
            ParameterValue::PointAndSize(Point::new(1, 1), Size::new(1, 1)),
        ]
    }

    fn fixture_image(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("matrix.png");
        GrayImage::new(200, 150).save(&path).unwrap();
        path
    }

    #[test]
    fn test_initialize_then_destroy() {
        let mut analyzer = FiberAnalyzer::new();
        assert_eq!(analyzer.state(), LifecycleState::Uninitialized);
        assert!(analyzer.initialize().is_ok());
        assert!(analyzer.destroy().is_ok());
        assert_eq!(analyzer.state(), LifecycleState::Destroyed);
    }

    #[test]
    fn test_roi_dimensions_rejected_by_default() {
        let mut analyzer = FiberAnalyzer::new();
        analyzer.initialize().unwrap();

        let err = analyzer
            .set(AnalyzerParameter::RoiDimensions, Size::new(100, 100))
            .unwrap_err();
        assert_eq!(err.status(), AnalyzerStatus::BadParameterType);
    }

    #[test]
    fn test_every_kind_and_shape_rejected_by_default() {
        let mut analyzer = FiberAnalyzer::new();
        analyzer.initialize().unwrap();

        for kind in AnalyzerParameter::iter() {
            for value in every_shape() {
                let err = analyzer.set_parameter(kind, value).unwrap_err();
                assert_eq!(err.status(), AnalyzerStatus::BadParameterType);
            }
            let err = analyzer
                .set_roi(kind, Point::new(0, 0), Size::new(10, 10))
                .unwrap_err();
            assert_eq!(err.status(), AnalyzerStatus::BadParameterType);
        }

        assert!(analyzer.settings().requested_roi().is_none());
        assert_eq!(analyzer.settings(), &AnalyzerSettings::new());
    }

    #[test]
    fn test_paths_accepted_by_default_variant() {
        let dir = TempDir::new().unwrap();
        let input = fixture_image(&dir);
        let output = dir.path().join("out").join("binary.png");

        let mut analyzer = FiberAnalyzer::new();
        analyzer.initialize().unwrap();
        analyzer.set_input_path(&input).unwrap();
        analyzer.set_output_path(&output).unwrap();

        assert_eq!(analyzer.input_path(), Some(input.as_path()));
        assert_eq!(analyzer.output_path(), Some(output.as_path()));
        assert_eq!(analyzer.region_of_interest(), Some(Roi::full(Size::new(200, 150))));
    }

    #[test]
    fn test_configuration_requires_initialize() {
        let dir = TempDir::new().unwrap();
        let input = fixture_image(&dir);

        let mut analyzer = FiberAnalyzer::with_roi_parameters();
        let err = analyzer.set_input_path(&input).unwrap_err();
        assert_eq!(err.status(), AnalyzerStatus::FailedInitialize);
        let err = analyzer
            .set(AnalyzerParameter::RoiDimensions, Size::new(10, 10))
            .unwrap_err();
        assert_eq!(err.status(), AnalyzerStatus::FailedInitialize);
    }

    #[test]
    fn test_calls_after_destroy_fail() {
        let dir = TempDir::new().unwrap();
        let input = fixture_image(&dir);

        let mut analyzer = FiberAnalyzer::with_roi_parameters();
        analyzer.initialize().unwrap();
        analyzer.destroy().unwrap();

        assert_eq!(
            analyzer.set_input_path(&input).unwrap_err().status(),
            AnalyzerStatus::FailedDestruct
        );
        assert_eq!(
            analyzer.initialize().unwrap_err().status(),
            AnalyzerStatus::FailedInitialize
        );
        assert_eq!(
            analyzer.destroy().unwrap_err().status(),
            AnalyzerStatus::FailedDestruct
        );
    }

    #[test]
    fn test_roi_variant_pairs_kinds_with_shapes() {
        let dir = TempDir::new().unwrap();
        let input = fixture_image(&dir);

        let mut analyzer = FiberAnalyzer::with_roi_parameters();
        analyzer.initialize().unwrap();
        analyzer.set_input_path(&input).unwrap();

        analyzer
            .set(AnalyzerParameter::RoiCoordinates, Point::new(150, 100))
            .unwrap();
        assert_eq!(
            analyzer.region_of_interest(),
            Some(Roi::new(Point::new(150, 100), Size::new(50, 50)))
        );

        analyzer
            .set(AnalyzerParameter::RoiDimensions, Size::new(20, 500))
            .unwrap();
        assert_eq!(
            analyzer.region_of_interest(),
            Some(Roi::new(Point::new(150, 100), Size::new(20, 50)))
        );

        analyzer
            .set_roi(AnalyzerParameter::DefineRoi, Point::new(10, 10), Size::new(30, 40))
            .unwrap();
        assert_eq!(
            analyzer.region_of_interest(),
            Some(Roi::new(Point::new(10, 10), Size::new(30, 40)))
        );

        let err = analyzer
            .set(AnalyzerParameter::DefineRoi, Size::new(10, 10))
            .unwrap_err();
        assert_eq!(err.status(), AnalyzerStatus::BadParameterType);
        let err = analyzer
            .set(AnalyzerParameter::RoiDimensions, 5i32)
            .unwrap_err();
        assert_eq!(err.status(), AnalyzerStatus::BadParameterType);
    }

    #[test]
    fn test_roi_variant_rejects_out_of_range() {
        let dir = TempDir::new().unwrap();
        let input = fixture_image(&dir);

        let mut analyzer = FiberAnalyzer::with_roi_parameters();
        analyzer.initialize().unwrap();
        analyzer.set_input_path(&input).unwrap();

        let err = analyzer
            .set_roi(AnalyzerParameter::DefineRoi, Point::new(200, 0), Size::new(10, 10))
            .unwrap_err();
        assert_eq!(err.status(), AnalyzerStatus::BadParameterValue);
        assert_eq!(analyzer.region_of_interest(), Some(Roi::full(Size::new(200, 150))));
    }

    #[test]
    fn test_accepted_parameters() {
        assert!(FiberAnalyzer::new().accepted_parameters().is_empty());
        let shapes: Vec<ParameterShape> = FiberAnalyzer::with_roi_parameters()
            .accepted_parameters()
            .iter()
            .map(|b| b.shape)
            .collect();
        assert_eq!(
            shapes,
            vec![ParameterShape::Size, ParameterShape::Point, ParameterShape::PointAndSize]
        );
    }

    #[test]
    fn test_steps() {
        assert_eq!(FiberAnalyzer::steps(), &["filter", "binary"]);
        assert_eq!(FiberAnalysisStep::iter().count(), 2);
    }
}
