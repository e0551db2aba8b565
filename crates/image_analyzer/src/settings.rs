use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    error::{AnalyzerError, Result},
    parameter::{AnalyzerParameter, ParameterValue},
    types::{Point, Roi, Size},
};

/// Configuration shared by analyzer variants: paths, input image bounds and
/// the requested region of interest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzerSettings {
    input_path: Option<PathBuf>,
    image_bounds: Option<Size>,
    output_path: Option<PathBuf>,
    roi_origin: Option<Point>,
    roi_size: Option<Size>,
}

impl AnalyzerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_path(&self) -> Option<&Path> {
        self.input_path.as_deref()
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Dimensions of the current input image
    pub fn image_bounds(&self) -> Option<Size> {
        self.image_bounds
    }

    /// Record the input image after probing its header for dimensions
    pub fn set_input_path(&mut self, path: &Path) -> Result<()> {
        let bad_input = |reason: String| AnalyzerError::BadInput {
            path: path.to_path_buf(),
            reason,
        };

        if path.as_os_str().is_empty() {
            return Err(bad_input("path is empty".to_string()));
        }

        let (width, height) =
            image::image_dimensions(path).map_err(|e| bad_input(e.to_string()))?;
        let bounds = match (i32::try_from(width), i32::try_from(height)) {
            (Ok(w), Ok(h)) => Size::new(w, h),
            _ => return Err(bad_input(format!("image of {width}x{height} is too large"))),
        };

        if let Some(origin) = self.roi_origin {
            if !bounds.contains(origin) {
                warn!(
                    ?path,
                    x = origin.x(),
                    y = origin.y(),
                    "requested ROI origin lies outside the new input image"
                );
            }
        }

        debug!(?path, width, height, "input image accepted");
        self.input_path = Some(path.to_path_buf());
        self.image_bounds = Some(bounds);
        Ok(())
    }

    /// Record the output destination, creating its parent directories
    pub fn set_output_path(&mut self, path: &Path) -> Result<()> {
        let bad_output = |reason: String| AnalyzerError::BadOutput {
            path: path.to_path_buf(),
            reason,
        };

        if path.as_os_str().is_empty() {
            return Err(bad_output("path is empty".to_string()));
        }
        if path.is_dir() {
            return Err(bad_output("path names an existing directory".to_string()));
        }

        let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent,
            None => Path::new("."),
        };
        if !parent.is_dir() {
            std::fs::create_dir_all(parent).map_err(|e| bad_output(e.to_string()))?;
            debug!(?parent, "created output directory");
        }
        // The directory must accept new files; the scratch file is removed on drop
        tempfile::NamedTempFile::new_in(parent).map_err(|e| bad_output(e.to_string()))?;

        debug!(?path, "output path accepted");
        self.output_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Apply an ROI parameter. The caller has already checked that the
    /// variant recognizes the (kind, shape) pairing.
    pub fn apply_roi(
        &mut self,
        analyzer: &'static str,
        kind: AnalyzerParameter,
        value: &ParameterValue,
    ) -> Result<()> {
        match (kind, value) {
            (AnalyzerParameter::RoiDimensions, ParameterValue::Size(size)) => {
                validate_size(kind, *size)?;
                self.roi_size = Some(*size);
            }
            (AnalyzerParameter::RoiCoordinates, ParameterValue::Point(point)) => {
                self.validate_origin(kind, *point)?;
                self.roi_origin = Some(*point);
            }
            (AnalyzerParameter::DefineRoi, ParameterValue::PointAndSize(point, size)) => {
                self.validate_origin(kind, *point)?;
                validate_size(kind, *size)?;
                self.roi_origin = Some(*point);
                self.roi_size = Some(*size);
            }
            _ => {
                return Err(AnalyzerError::BadParameterType {
                    analyzer,
                    kind,
                    shape: value.shape(),
                });
            }
        }

        debug!(%kind, ?value, "ROI parameter applied");
        Ok(())
    }

    /// The ROI exactly as requested, before cropping
    pub fn requested_roi(&self) -> Option<Roi> {
        if self.roi_origin.is_none() && self.roi_size.is_none() {
            return None;
        }
        let origin = self.roi_origin.unwrap_or_default();
        let size = match (self.roi_size, self.image_bounds) {
            (Some(size), _) => size,
            (None, Some(bounds)) => Size::new(bounds.width() - origin.x(), bounds.height() - origin.y()),
            (None, None) => Size::new(i32::MAX, i32::MAX),
        };
        Some(Roi::new(origin, size))
    }

    /// The region analysis is restricted to: the whole image when no ROI was
    /// requested, otherwise the request cropped to the image boundary.
    pub fn region_of_interest(&self) -> Option<Roi> {
        let bounds = self.image_bounds?;
        match self.requested_roi() {
            None => Some(Roi::full(bounds)),
            Some(roi) => roi.crop_to(bounds),
        }
    }

    fn validate_origin(&self, kind: AnalyzerParameter, point: Point) -> Result<()> {
        if point.x() < 0 || point.y() < 0 {
            return Err(AnalyzerError::BadParameterValue {
                kind,
                reason: format!("coordinates ({}, {}) must not be negative", point.x(), point.y()),
            });
        }
        if let Some(bounds) = self.image_bounds {
            if !bounds.contains(point) {
                return Err(AnalyzerError::BadParameterValue {
                    kind,
                    reason: format!(
                        "coordinates ({}, {}) lie outside the {}x{} image",
                        point.x(),
                        point.y(),
                        bounds.width(),
                        bounds.height()
                    ),
                });
            }
        }
        Ok(())
    }
}

fn validate_size(kind: AnalyzerParameter, size: Size) -> Result<()> {
    if size.is_empty() {
        return Err(AnalyzerError::BadParameterValue {
            kind,
            reason: format!("dimensions {}x{} must be positive", size.width(), size.height()),
        });
    }
    Ok(())
}
