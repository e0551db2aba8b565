use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// X/Y coordinates of a pixel within an image, measured from the lower left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn set_x(&mut self, x: i32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    /// Update both coordinates at once
    pub fn set(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Width/height of an image or sub-image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Size {
    width: i32,
    height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn set_width(&mut self, width: i32) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: i32) {
        self.height = height;
    }

    /// Update both dimensions at once
    pub fn set(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check whether a point lies inside an image of this size
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0 && point.y >= 0 && point.x < self.width && point.y < self.height
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self::new(width, height)
    }
}

/// Region of interest: lower left corner plus dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Roi {
    pub origin: Point,
    pub size: Size,
}

impl Roi {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// ROI covering a whole image
    pub fn full(bounds: Size) -> Self {
        Self::new(Point::default(), bounds)
    }

    /// Crop to the largest region that respects the image bounds.
    ///
    /// Returns `None` when the origin lies outside the image or the region
    /// is degenerate, since nothing of it remains to analyze.
    pub fn crop_to(&self, bounds: Size) -> Option<Roi> {
        if self.size.is_empty() || !bounds.contains(self.origin) {
            return None;
        }

        let width = self.size.width.min(bounds.width - self.origin.x);
        let height = self.size.height.min(bounds.height - self.origin.y);

        Some(Roi::new(self.origin, Size::new(width, height)))
    }

}
