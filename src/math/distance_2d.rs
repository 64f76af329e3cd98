use super::Point2;

/// Orthogonally projects `p` onto the infinite line through `a` and `b`.
///
/// Returns the projected point and its parameter along `a → b`
/// (0 at `a`, 1 at `b`, outside `[0, 1]` beyond the endpoints).
/// A zero-length line projects everything onto `a` with parameter 0.
#[must_use]
pub fn project_onto_line(p: &Point2, a: &Point2, b: &Point2) -> (Point2, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-20 {
        return (*a, 0.0);
    }
    let t = (p - a).dot(&ab) / len_sq;
    (a + ab * t, t)
}

/// Returns the minimum distance from `p` to the line segment `a → b`.
///
/// When the projection falls inside the segment the perpendicular distance
/// is returned, otherwise the distance to the nearer endpoint.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let (proj, t) = project_onto_line(p, a, b);
    if t > 0.0 && t < 1.0 {
        return nalgebra::distance(p, &proj);
    }
    nalgebra::distance(p, a).min(nalgebra::distance(p, b))
}
