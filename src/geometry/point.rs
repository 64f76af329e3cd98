use serde::{Deserialize, Serialize};

use crate::math::{Point2, Vector2};

/// A coordinate on the ground plane.
///
/// Equality is exact floating-point equality on both coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are exactly equal.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn equals(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        nalgebra::distance(&Point2::from(*self), &Point2::from(*other))
    }

    /// Returns the point `offset` units away in direction `angle` (radians).
    #[must_use]
    pub fn translate(&self, angle: f64, offset: f64) -> Self {
        Self::new(self.x + angle.cos() * offset, self.y + angle.sin() * offset)
    }

    /// Angle (radians) of the vector from `other` to `self`.
    #[must_use]
    pub fn angle_from(&self, other: &Self) -> f64 {
        (self.y - other.y).atan2(self.x - other.x)
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        nalgebra::center(&Point2::from(*self), &Point2::from(*other)).into()
    }

    /// Returns `self` displaced by `v`.
    #[must_use]
    pub fn offset_by(&self, v: &Vector2) -> Self {
        Self::new(self.x + v.x, self.y + v.y)
    }
}

impl From<Point2> for Point {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point> for Point2 {
    fn from(p: Point) -> Self {
        Point2::new(p.x, p.y)
    }
}
