//! Geometric primitives for detection fusion.
//!
//! This module provides the axis-aligned bounding box used throughout the
//! fusion pipeline, along with the overlap metrics (intersection area, IoU)
//! that drive cross-source region matching.

use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned bounding box in pixel coordinates.
///
/// This matches the wire format both OCR adapters produce: a top-left
/// corner plus width and height, all in the source's analysis frame (or in
/// canonical original-image space after normalization).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    /// X-coordinate of the top-left corner.
    pub x: f32,
    /// Y-coordinate of the top-left corner.
    pub y: f32,
    /// Width of the box.
    pub width: f32,
    /// Height of the box.
    pub height: f32,
}

impl BoundingBox {
    /// Creates a new bounding box from a top-left corner and dimensions.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a bounding box from corner coordinates.
    ///
    /// # Arguments
    ///
    /// * `x1` - The x-coordinate of the top-left corner.
    /// * `y1` - The y-coordinate of the top-left corner.
    /// * `x2` - The x-coordinate of the bottom-right corner.
    /// * `y2` - The y-coordinate of the bottom-right corner.
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// X-coordinate of the right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Y-coordinate of the bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Area of the box. Degenerate boxes report 0.0.
    pub fn area(&self) -> f32 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return 0.0;
        }
        self.width * self.height
    }

    /// Geometric center of the box.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns true if the box has non-positive width or height.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Returns true if any coordinate or dimension is not a finite number.
    pub fn has_non_finite(&self) -> bool {
        !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
    }

    /// Computes the area of intersection between this box and another.
    ///
    /// # Returns
    ///
    /// The area of the intersection rectangle. Returns 0.0 if the boxes do
    /// not overlap.
    pub fn intersection_area(&self, other: &BoundingBox) -> f32 {
        let inter_x_min = self.x.max(other.x);
        let inter_y_min = self.y.max(other.y);
        let inter_x_max = self.right().min(other.right());
        let inter_y_max = self.bottom().min(other.bottom());

        if inter_x_min >= inter_x_max || inter_y_min >= inter_y_max {
            return 0.0;
        }

        (inter_x_max - inter_x_min) * (inter_y_max - inter_y_min)
    }

    /// Computes the Intersection over Union (IoU) between this box and another.
    ///
    /// # Returns
    ///
    /// The IoU value between 0.0 and 1.0. Returns 0.0 if there is no
    /// intersection or if the union has zero area.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let inter_area = self.intersection_area(other);

        if inter_area <= 0.0 {
            return 0.0;
        }

        let union_area = self.area() + other.area() - inter_area;
        if union_area <= 0.0 {
            return 0.0;
        }

        inter_area / union_area
    }

    /// Returns a new box with its height grown by `ratio` about the
    /// vertical center.
    ///
    /// Used to compensate for bbox model differences between sources:
    /// multimodal boxes are typically tight to glyph ink while traditional
    /// OCR boxes include line-height padding.
    pub fn expand_height(&self, ratio: f32) -> Self {
        let delta = self.height * ratio;
        Self {
            x: self.x,
            y: self.y - delta / 2.0,
            width: self.width,
            height: self.height + delta,
        }
    }

    /// Returns a new box with its height shrunk by `ratio` about the
    /// vertical center. The inverse of [`BoundingBox::expand_height`].
    pub fn shrink_height(&self, ratio: f32) -> Self {
        let delta = self.height * ratio;
        Self {
            x: self.x,
            y: self.y + delta / 2.0,
            width: self.width,
            height: self.height - delta,
        }
    }
}
