//! Viewport geometry: points and axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box for an element, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Build a normalized box from two opposite corners.
    ///
    /// Width and height are always non-negative regardless of which
    /// corner the drag anchor was.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            top: a.y.min(b.y),
            left: a.x.min(b.x),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Pixel area of this box.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if a point is inside this bounding box (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Axis-aligned overlap test. Boxes that merely touch at an edge or
    /// corner do not intersect (zero-area overlap).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    /// Pixel area of the overlap between this box and `other`.
    pub fn intersection_area(&self, other: &BoundingBox) -> f64 {
        if !self.intersects(other) {
            return 0.0;
        }
        let w = self.right().min(other.right()) - self.left.max(other.left);
        let h = self.bottom().min(other.bottom()) - self.top.max(other.top);
        w * h
    }
}
