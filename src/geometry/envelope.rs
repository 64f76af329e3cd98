use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{GeometryError, Result};

use super::{Point, Polygon, Segment};

/// The road-width area around a skeleton segment.
///
/// A straight skeleton yields one capsule polygon. A curved skeleton is
/// sampled along its spline and yields one small capsule per sample pair,
/// so the chain of capsules approximates the curved ribbon.
#[derive(Debug, Clone)]
pub struct Envelope {
    skeleton: Segment,
    polys: Vec<Polygon>,
}

impl Envelope {
    /// Builds the envelope of `skeleton` at `width`, with `roundness`
    /// angular steps per half-turn on each end cap.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidParameter` for a non-positive width and
    /// `GeometryError::DegenerateSegment` for a zero-length skeleton.
    pub fn new(skeleton: Segment, width: f64, roundness: u32) -> Result<Self> {
        if width.is_nan() || width <= 0.0 {
            return Err(GeometryError::InvalidParameter {
                parameter: "width",
                value: width,
            }
            .into());
        }
        skeleton.direction_vector()?;

        let samples = skeleton.curve_points();
        let mut polys = Vec::with_capacity(samples.len() - 1);
        for pair in samples.windows(2) {
            if pair[0].equals(&pair[1]) {
                continue;
            }
            polys.push(capsule(pair[0], pair[1], width, roundness)?);
        }

        Ok(Self { skeleton, polys })
    }

    /// The centerline the envelope was built around.
    #[must_use]
    pub fn skeleton(&self) -> &Segment {
        &self.skeleton
    }

    /// The capsule polygons making up the envelope.
    #[must_use]
    pub fn polys(&self) -> &[Polygon] {
        &self.polys
    }

    /// Returns `true` if `point` lies inside any of the envelope's polygons.
    #[must_use]
    pub fn contains_point(&self, point: &Point) -> bool {
        self.polys.iter().any(|poly| poly.contains_point(point))
    }

    /// Minimum distance from `point` to the envelope's edges.
    #[must_use]
    pub fn distance_to_point(&self, point: &Point) -> f64 {
        self.polys
            .iter()
            .map(|poly| poly.distance_to_point(point))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Builds a capsule around `p1 → p2`.
///
/// Each end cap sweeps half a turn facing away from the other endpoint in
/// `roundness` steps, so `roundness = 1` gives a plain rectangle.
fn capsule(p1: Point, p2: Point, width: f64, roundness: u32) -> Result<Polygon> {
    let radius = width / 2.0;
    let alpha = p1.angle_from(&p2);
    let alpha_ccw = alpha - FRAC_PI_2;
    let steps = roundness.max(1);
    let step = PI / f64::from(steps);

    let mut points = Vec::with_capacity(2 * (steps as usize + 1));
    for k in 0..=steps {
        points.push(p1.translate(alpha_ccw + step * f64::from(k), radius));
    }
    for k in 0..=steps {
        points.push(p2.translate(PI + alpha_ccw + step * f64::from(k), radius));
    }
    Polygon::new(points)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn skeleton() -> Segment {
        Segment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0))
    }

    #[test]
    fn roundness_one_is_a_rectangle() {
        let env = Envelope::new(skeleton(), 20.0, 1).unwrap();
        assert_eq!(env.polys().len(), 1);
        let pts = env.polys()[0].points();
        assert_eq!(pts.len(), 4);
        for p in pts {
            assert_abs_diff_eq!(p.y.abs(), 10.0, epsilon = 1e-9);
            assert!(p.x.abs() < 1e-9 || (p.x - 100.0).abs() < 1e-9);
        }
        assert_abs_diff_eq!(env.polys()[0].signed_area().abs(), 2000.0, epsilon = 1e-6);
    }

    #[test]
    fn caps_bulge_beyond_the_endpoints() {
        let env = Envelope::new(skeleton(), 20.0, 10).unwrap();
        let pts = env.polys()[0].points();
        assert_eq!(pts.len(), 22);
        let min_x = pts.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = pts.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert_abs_diff_eq!(min_x, -10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(max_x, 110.0, epsilon = 1e-9);
        for p in pts {
            assert!(skeleton().distance_to_point(p) <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn curved_skeleton_yields_a_capsule_chain() {
        let curved = Segment::curved(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 80.0),
        );
        let env = Envelope::new(curved, 10.0, 4).unwrap();
        assert_eq!(env.polys().len(), crate::geometry::segment::CURVE_SUBDIVISIONS);
        assert!(env.contains_point(&Point::new(50.0, 40.0)));
        assert!(!env.contains_point(&Point::new(50.0, 0.0)));
    }

    #[test]
    fn crossing_capsules_union_to_a_plus_outline() {
        let a = Envelope::new(skeleton(), 20.0, 1).unwrap();
        let b = Envelope::new(
            Segment::new(Point::new(50.0, -50.0), Point::new(50.0, 50.0)),
            20.0,
            1,
        )
        .unwrap();
        let border = Polygon::union([a.polys(), b.polys()]);
        // 16 edges after breaking at the 4 crossings; the 4 inner ones go.
        assert_eq!(border.len(), 12);
        assert!(!border.iter().any(|s| s.midpoint().distance(&Point::new(50.0, 10.0)) < 1e-6));
        assert!(!border.iter().any(|s| s.midpoint().distance(&Point::new(40.0, 0.0)) < 1e-6));
    }

    #[test]
    fn right_angle_joint_caps_collapse_into_one_arc() {
        let a = Envelope::new(skeleton(), 20.0, 10).unwrap();
        let b = Envelope::new(
            Segment::new(Point::new(100.0, 0.0), Point::new(100.0, 100.0)),
            20.0,
            10,
        )
        .unwrap();
        let border = Polygon::union([a.polys(), b.polys()]);
        // 44 edges plus 2 from the inner-corner split; the arc inside the
        // other capsule goes from each, the shared outer arc is kept once,
        // and the inner halves of the split sides go.
        assert_eq!(border.len(), 29);
        for (i, s) in border.iter().enumerate() {
            assert!(!border[i + 1..].iter().any(|o| o.equals(s)));
            for p in [s.p1, s.p2] {
                let degree = border.iter().filter(|o| o.includes(&p)).count();
                assert_eq!(degree, 2, "dangling vertex at {p:?}");
            }
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Envelope::new(skeleton(), 0.0, 3).is_err());
        let p = Point::new(1.0, 1.0);
        assert!(Envelope::new(Segment::new(p, p), 5.0, 3).is_err());
    }
}
