use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr, VariantNames};

use crate::types::{Point, Roi, Size};

/// Parameter list. Not all parameters are pertinent to all analyzer types.
#[repr(i32)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr, FromRepr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalyzerParameter {
    /// Override the image dimensions to create an ROI within the image.
    /// For an image stack the ROI applies to every image.
    RoiDimensions = 0,
    /// ROI coordinates from the lower left corner of the image. Without
    /// dimensions the ROI extends to the remainder of the image.
    RoiCoordinates = 1,
    /// Lower left corner and dimensions in one call. An ROI overrunning the
    /// image is cropped to the image boundary.
    DefineRoi = 2,
}

impl AnalyzerParameter {
    pub fn description(&self) -> &'static str {
        match self {
            Self::RoiDimensions => "Width and height of the analysis region",
            Self::RoiCoordinates => "Lower left corner of the analysis region",
            Self::DefineRoi => "Lower left corner and dimensions of the analysis region",
        }
    }
}

/// Shape of a parameter value, one per setter overload
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParameterShape {
    Short,
    Int,
    Float,
    Double,
    ShortArray,
    IntArray,
    FloatArray,
    DoubleArray,
    Point,
    Size,
    PointAndSize,
}

/// A parameter value of any supported shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum ParameterValue {
    Short(i16),
    Int(i32),
    Float(f32),
    Double(f64),
    ShortArray(Vec<i16>),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    Point(Point),
    Size(Size),
    PointAndSize(Point, Size),
}

impl ParameterValue {
    pub fn shape(&self) -> ParameterShape {
        match self {
            Self::Short(_) => ParameterShape::Short,
            Self::Int(_) => ParameterShape::Int,
            Self::Float(_) => ParameterShape::Float,
            Self::Double(_) => ParameterShape::Double,
            Self::ShortArray(_) => ParameterShape::ShortArray,
            Self::IntArray(_) => ParameterShape::IntArray,
            Self::FloatArray(_) => ParameterShape::FloatArray,
            Self::DoubleArray(_) => ParameterShape::DoubleArray,
            Self::Point(_) => ParameterShape::Point,
            Self::Size(_) => ParameterShape::Size,
            Self::PointAndSize(..) => ParameterShape::PointAndSize,
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ParameterValue {
                fn from(value: $ty) -> Self {
                    ParameterValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_value! {
    i16 => Short,
    i32 => Int,
    f32 => Float,
    f64 => Double,
    Vec<i16> => ShortArray,
    Vec<i32> => IntArray,
    Vec<f32> => FloatArray,
    Vec<f64> => DoubleArray,
    Point => Point,
    Size => Size,
}

macro_rules! impl_from_slice {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<&[$ty]> for ParameterValue {
                fn from(values: &[$ty]) -> Self {
                    ParameterValue::$variant(values.to_vec())
                }
            }
        )*
    };
}

impl_from_slice! {
    i16 => ShortArray,
    i32 => IntArray,
    f32 => FloatArray,
    f64 => DoubleArray,
}

impl From<(Point, Size)> for ParameterValue {
    fn from((point, size): (Point, Size)) -> Self {
        ParameterValue::PointAndSize(point, size)
    }
}

impl From<Roi> for ParameterValue {
    fn from(roi: Roi) -> Self {
        ParameterValue::PointAndSize(roi.origin, roi.size)
    }
}

/// A recognized (kind, shape) pairing for an analyzer variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ParameterBinding {
    pub kind: AnalyzerParameter,
    pub shape: ParameterShape,
}

impl ParameterBinding {
    pub const fn new(kind: AnalyzerParameter, shape: ParameterShape) -> Self {
        Self { kind, shape }
    }
}

/// Bindings for the region-of-interest parameters
pub const ROI_BINDINGS: &[ParameterBinding] = &[
    ParameterBinding::new(AnalyzerParameter::RoiDimensions, ParameterShape::Size),
    ParameterBinding::new(AnalyzerParameter::RoiCoordinates, ParameterShape::Point),
    ParameterBinding::new(AnalyzerParameter::DefineRoi, ParameterShape::PointAndSize),
];
