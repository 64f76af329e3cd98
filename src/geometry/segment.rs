use crate::error::{GeometryError, Result};
use crate::math::bezier_2d::sample_quadratic;
use crate::math::distance_2d::project_onto_line;
use crate::math::intersect_2d::{segment_intersection, SegmentHit};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::Point;

/// Number of subdivisions used when sampling a curved segment.
pub const CURVE_SUBDIVISIONS: usize = 10;

/// Orthogonal projection of a point onto a segment's supporting line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// The projected point.
    pub point: Point,
    /// Parameter along `p1 → p2`: 0 at `p1`, 1 at `p2`, outside `[0, 1]`
    /// beyond the endpoints.
    pub offset: f64,
}

/// An edge between two points, optionally bent by a quadratic control point.
///
/// Two segments are equal when they join the same pair of points in either
/// order; the control point does not take part in equality.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
    pub control_point: Option<Point>,
    pub curve: bool,
}

impl Segment {
    /// Creates a straight segment.
    #[must_use]
    pub const fn new(p1: Point, p2: Point) -> Self {
        Self {
            p1,
            p2,
            control_point: None,
            curve: false,
        }
    }

    /// Creates a curved segment bent towards `control`.
    #[must_use]
    pub const fn curved(p1: Point, p2: Point, control: Point) -> Self {
        Self {
            p1,
            p2,
            control_point: Some(control),
            curve: true,
        }
    }

    /// Euclidean distance between the endpoints.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.p1.distance(&self.p2)
    }

    /// Unit vector from `p1` to `p2`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DegenerateSegment` if the endpoints coincide.
    pub fn direction_vector(&self) -> Result<Vector2> {
        let d = Point2::from(self.p2) - Point2::from(self.p1);
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::DegenerateSegment {
                x: self.p1.x,
                y: self.p1.y,
            }
            .into());
        }
        Ok(d / len)
    }

    /// Returns `true` if `point` equals either endpoint.
    #[must_use]
    pub fn includes(&self, point: &Point) -> bool {
        self.p1.equals(point) || self.p2.equals(point)
    }

    /// Order-independent endpoint equality.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.includes(&other.p1) && self.includes(&other.p2)
    }

    /// Midpoint of the chord `p1 → p2`.
    #[must_use]
    pub fn midpoint(&self) -> Point {
        self.p1.midpoint(&self.p2)
    }

    /// Distance from `point` to the segment.
    #[must_use]
    pub fn distance_to_point(&self, point: &Point) -> f64 {
        let proj = self.project_point(point);
        if proj.offset > 0.0 && proj.offset < 1.0 {
            return point.distance(&proj.point);
        }
        point.distance(&self.p1).min(point.distance(&self.p2))
    }

    /// Projects `point` onto the infinite line through `p1` and `p2`.
    #[must_use]
    pub fn project_point(&self, point: &Point) -> Projection {
        let (proj, offset) = project_onto_line(&(*point).into(), &self.p1.into(), &self.p2.into());
        Projection {
            point: proj.into(),
            offset,
        }
    }

    /// Intersects the straight chords of two segments (endpoints inclusive).
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<SegmentHit> {
        segment_intersection(
            &self.p1.into(),
            &self.p2.into(),
            &other.p1.into(),
            &other.p2.into(),
        )
    }

    /// Samples the quadratic Bezier through `[start, control, end]` at
    /// [`CURVE_SUBDIVISIONS`] steps.
    #[must_use]
    pub fn spline_points(points: [Point; 3]) -> Vec<Point> {
        let [start, control, end] = points;
        sample_quadratic(&start.into(), &control.into(), &end.into(), CURVE_SUBDIVISIONS)
            .into_iter()
            .map(Point::from)
            .collect()
    }

    /// Returns the polyline the segment follows: the spline samples when
    /// curved, otherwise just the two endpoints.
    #[must_use]
    pub fn curve_points(&self) -> Vec<Point> {
        match (self.curve, self.control_point) {
            (true, Some(control)) => Self::spline_points([self.p1, control, self.p2]),
            _ => vec![self.p1, self.p2],
        }
    }

    /// Flattened `[x0, y0, x1, y1, ...]` coordinates of [`Self::curve_points`].
    #[must_use]
    pub fn flat_coords(&self) -> Vec<f64> {
        self.curve_points().iter().flat_map(|p| [p.x, p.y]).collect()
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}
