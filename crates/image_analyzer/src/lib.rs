//! # Image Analyzer Engine
//!
//! A plugin-style contract for pluggable image-analysis strategies. Each
//! strategy implements the [`Analyzer`] trait and is handed out by a factory,
//! either directly, through the [`AnalyzerRegistry`], or across a C ABI.
//!
//! ## Core Features
//!
//! - **Trait-based Architecture**: variants implement [`Analyzer`]
//! - **Typed Parameters**: one setter over a [`ParameterValue`] sum type
//! - **Region of Interest**: ROIs are cropped to the image boundary
//! - **C ABI**: `CreateFiberAnalyzer` plus status-code entry points
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use image_analyzer::{AnalyzerExt, AnalyzerHandle, AnalyzerParameter, Size, create_fiber_analyzer};
//! use std::path::Path;
//!
//! let mut analyzer = AnalyzerHandle::initialized(create_fiber_analyzer())?;
//! analyzer.set_input_path(Path::new("matrix.tif"))?;
//! analyzer.set_output_path(Path::new("results/binary.tif"))?;
//!
//! // The fiber variant recognizes no parameter kinds by default
//! assert!(analyzer.set(AnalyzerParameter::RoiDimensions, Size::new(100, 100)).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod ffi;
pub mod fiber;
pub mod handle;
pub mod lifecycle;
pub mod parameter;
pub mod registry;
pub mod settings;
pub mod traits;
pub mod types;

pub use config::{AnalysisConfig, ConfigError, ParameterSetting};
pub use error::{AnalyzerError, AnalyzerStatus, Result};
pub use fiber::{FiberAnalysisStep, FiberAnalyzer};
pub use handle::AnalyzerHandle;
pub use lifecycle::LifecycleState;
pub use parameter::{AnalyzerParameter, ParameterBinding, ParameterShape, ParameterValue};
pub use registry::{AnalyzerRegistry, RegistryError, create_fiber_analyzer};
pub use settings::AnalyzerSettings;
pub use traits::*;
pub use types::{Point, Roi, Size};

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;
    use tempfile::TempDir;

    #[test]
    fn test_factory_lifecycle() {
        let mut analyzer = create_fiber_analyzer();
        assert!(analyzer.initialize().is_ok());
        assert!(analyzer.destroy().is_ok());
    }

    #[test]
    fn test_registry_to_handle_workflow() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("matrix.png");
        GrayImage::new(32, 32).save(&input).unwrap();

        let registry = AnalyzerRegistry::with_builtin();
        let mut analyzer = AnalyzerHandle::initialized(registry.create("fiber").unwrap()).unwrap();
        analyzer.set_input_path(&input).unwrap();
        analyzer.set_output_path(&dir.path().join("binary.png")).unwrap();

        let err = analyzer
            .set(AnalyzerParameter::RoiDimensions, Size::new(100, 100))
            .unwrap_err();
        assert_eq!(err.status(), AnalyzerStatus::BadParameterType);
        assert_eq!(analyzer.region_of_interest(), Some(Roi::full(Size::new(32, 32))));
        assert!(analyzer.release().is_ok());
    }
}
