use super::{Point2, TOLERANCE};

/// Relative threshold below which two segments are treated as parallel.
const PARALLEL_EPS: f64 = 1e-9;

/// A bounded segment-segment intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// The intersection point.
    pub point: Point2,
    /// Parameter along the first segment, in `[0, 1]`.
    pub t: f64,
    /// Parameter along the second segment, in `[0, 1]`.
    pub u: f64,
}

impl SegmentHit {
    /// Returns `true` if the hit lies strictly inside the first segment.
    #[must_use]
    pub fn interior_to_first(&self) -> bool {
        self.t > TOLERANCE && self.t < 1.0 - TOLERANCE
    }

    /// Returns `true` if the hit lies strictly inside the second segment.
    #[must_use]
    pub fn interior_to_second(&self) -> bool {
        self.u > TOLERANCE && self.u < 1.0 - TOLERANCE
    }
}

/// Bounded segment-segment intersection in 2D.
///
/// Endpoints are inclusive. Parallel and collinear pairs never intersect;
/// the parallel test is relative to the segment lengths so it behaves the
/// same at any coordinate scale.
#[must_use]
pub fn segment_intersection(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<SegmentHit> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.x * db.y - da.y * db.x;
    let scale = da.norm() * db.norm();
    if scale < TOLERANCE || cross.abs() <= PARALLEL_EPS * scale {
        return None;
    }

    let d = b0 - a0;
    let t = (d.x * db.y - d.y * db.x) / cross;
    let u = (d.x * da.y - d.y * da.x) / cross;

    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        Some(SegmentHit {
            point: a0 + da * t,
            t,
            u: u.clamp(0.0, 1.0),
        })
    } else {
        None
    }
}
