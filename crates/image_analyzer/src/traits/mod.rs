use std::path::Path;

use crate::{
    error::Result,
    lifecycle::LifecycleState,
    parameter::{AnalyzerParameter, ParameterBinding, ParameterValue},
    types::{Point, Roi, Size},
};

/// Contract every analysis strategy implements.
///
/// Calls follow a linear lifecycle: `initialize`, then any number of
/// configuration calls, then `destroy`. Configuring an uninitialized analyzer
/// fails with `FailedInitialize`; any call after `destroy` fails with
/// `FailedDestruct`.
pub trait Analyzer: Send {
    /// Registry name of the variant
    fn name(&self) -> &'static str;

    fn state(&self) -> LifecycleState;

    /// Allocate internal state and set default parameter values
    fn initialize(&mut self) -> Result<()>;

    /// Free resources. The analyzer must not be used afterwards.
    fn destroy(&mut self) -> Result<()>;

    /// Path to the raw image to analyze. Fails with `BadInput` unless the
    /// path references a readable image.
    fn set_input_path(&mut self, path: &Path) -> Result<()>;

    /// Destination for results. Missing parent directories are created.
    fn set_output_path(&mut self, path: &Path) -> Result<()>;

    /// Set or update an analysis parameter. Fails with `BadParameterType`
    /// when the variant does not recognize `kind` for this value shape and
    /// with `BadParameterValue` when the value is out of range.
    fn set_parameter(&mut self, kind: AnalyzerParameter, value: ParameterValue) -> Result<()>;

    /// Point-plus-size form, used to define an ROI in a single call
    fn set_roi(&mut self, kind: AnalyzerParameter, point: Point, size: Size) -> Result<()> {
        self.set_parameter(kind, ParameterValue::PointAndSize(point, size))
    }

    /// (kind, shape) pairings this variant recognizes
    fn accepted_parameters(&self) -> &[ParameterBinding];

    fn input_path(&self) -> Option<&Path>;

    fn output_path(&self) -> Option<&Path>;

    /// Region the analysis is restricted to, once an input image is known
    fn region_of_interest(&self) -> Option<Roi>;
}

/// Typed convenience over [`Analyzer::set_parameter`]
pub trait AnalyzerExt: Analyzer {
    fn set<V>(&mut self, kind: AnalyzerParameter, value: V) -> Result<()>
    where
        V: Into<ParameterValue>,
    {
        self.set_parameter(kind, value.into())
    }

    fn accepts(&self, kind: AnalyzerParameter, value: &ParameterValue) -> bool {
        let shape = value.shape();
        self.accepted_parameters()
            .iter()
            .any(|binding| binding.kind == kind && binding.shape == shape)
    }
}

impl<A: Analyzer + ?Sized> AnalyzerExt for A {}
