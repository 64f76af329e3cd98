use super::{Point2, Vector2};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// An axis-aligned bounding box in the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point2,
    /// Maximum corner of the bounding box.
    pub max: Point2,
}

impl Aabb {
    /// Computes the bounding box of a point set, or `None` if it is empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bb = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bb.min.x = bb.min.x.min(p.x);
            bb.min.y = bb.min.y.min(p.y);
            bb.max.x = bb.max.x.max(p.x);
            bb.max.y = bb.max.y.max(p.y);
        }
        Some(bb)
    }

    /// Returns the length of the box diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        nalgebra::distance(&self.min, &self.max)
    }

    /// Returns a point guaranteed to lie outside the box by at least one
    /// diagonal length, on neither axis through any corner.
    #[must_use]
    pub fn far_outside(&self) -> Point2 {
        let reach = self.diagonal() + 1.0;
        self.min - Vector2::new(reach, reach * 0.618)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn signed_area_ccw_square() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert_abs_diff_eq!(signed_area_2d(&pts), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn signed_area_cw_square() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        assert_abs_diff_eq!(signed_area_2d(&pts), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn bounding_box_and_far_point() {
        let pts = [Point2::new(-3.0, 2.0), Point2::new(4.0, -1.0), Point2::new(0.0, 6.0)];
        let bb = Aabb::from_points(&pts).unwrap();
        assert_eq!(bb.min, Point2::new(-3.0, -1.0));
        assert_eq!(bb.max, Point2::new(4.0, 6.0));
        let far = bb.far_outside();
        assert!(far.x < bb.min.x - bb.diagonal());
        assert!(far.y < bb.min.y);
    }

    #[test]
    fn bounding_box_of_nothing() {
        assert!(Aabb::from_points(std::iter::empty::<&Point2>()).is_none());
    }
}
