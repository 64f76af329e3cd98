use super::Point2;

/// Evaluates the quadratic Bezier `start → control → end` at parameter `t`.
#[must_use]
pub fn quadratic_point(start: &Point2, control: &Point2, end: &Point2, t: f64) -> Point2 {
    let u = 1.0 - t;
    Point2::from(start.coords * (u * u) + control.coords * (2.0 * u * t) + end.coords * (t * t))
}

/// Samples a quadratic Bezier at `subdivisions` equal parameter steps.
///
/// Returns `subdivisions + 1` points; the first and last are exactly
/// `start` and `end`.
#[must_use]
pub fn sample_quadratic(
    start: &Point2,
    control: &Point2,
    end: &Point2,
    subdivisions: usize,
) -> Vec<Point2> {
    let n = subdivisions.max(1);
    let mut points = Vec::with_capacity(n + 1);
    points.push(*start);
    for i in 1..n {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 / n as f64;
        points.push(quadratic_point(start, control, end, t));
    }
    points.push(*end);
    points
}

/// Splits a quadratic Bezier at `t` (de Casteljau).
///
/// Returns `(point, first_control, second_control)`: the curve point at `t`
/// and the control points of the `start → point` and `point → end` halves.
#[must_use]
pub fn split_quadratic(
    start: &Point2,
    control: &Point2,
    end: &Point2,
    t: f64,
) -> (Point2, Point2, Point2) {
    let c1 = start + (control - start) * t;
    let c2 = control + (end - control) * t;
    let point = c1 + (c2 - c1) * t;
    (point, c1, c2)
}

/// Returns the distance between the curve's apex (`t = 0.5`) and the
/// chord midpoint. Zero for a control point lying on the chord midpoint.
#[must_use]
pub fn apex_deviation(start: &Point2, control: &Point2, end: &Point2) -> f64 {
    let apex = quadratic_point(start, control, end, 0.5);
    nalgebra::distance(&apex, &nalgebra::center(start, end))
}
