use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{signed_area_2d, Aabb};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{Point, Segment};

/// Distance, relative to an edge's length, at which its two sides are
/// sampled when deciding whether a shared edge is on the border.
const SIDE_OFFSET: f64 = 1e-4;

/// A closed ring of points.
///
/// The ring's edges are kept as an explicit segment list so that
/// [`Polygon::break_edges`] can split them in place; after breaking, the edge
/// list may hold more segments than there are ring points.
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<Point>,
    segments: Vec<Segment>,
}

impl Polygon {
    /// Creates a polygon from its ring points (implicitly closed).
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if fewer than 3 points are given.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < 3 {
            return Err(GeometryError::Degenerate(format!(
                "polygon needs at least 3 points, got {}",
                points.len()
            ))
            .into());
        }
        let n = points.len();
        let segments = (0..n)
            .map(|i| Segment::new(points[i], points[(i + 1) % n]))
            .collect();
        Ok(Self { points, segments })
    }

    /// The ring points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The ring edges, including any splits introduced by breaking.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Signed shoelace area of the ring (positive when counter-clockwise).
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let pts: Vec<Point2> = self.points.iter().map(|&p| p.into()).collect();
        signed_area_2d(&pts)
    }

    /// Axis-aligned bounding box of the ring.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let pts: Vec<Point2> = self.points.iter().map(|&p| p.into()).collect();
        // A polygon always has at least three points.
        Aabb::from_points(&pts).unwrap_or(Aabb {
            min: Point2::origin(),
            max: Point2::origin(),
        })
    }

    /// Ray-casting containment test.
    ///
    /// The ray runs from a point well outside the bounding box to `point`.
    /// An edge is crossed when its endpoints lie on opposite sides of the
    /// ray's line and the crossing falls within the ray. An endpoint exactly
    /// on the line counts as lying on the negative side, so a ray through a
    /// vertex never counts both edges meeting there as crossings. A point
    /// exactly on an edge counts that edge as crossed.
    #[must_use]
    pub fn contains_point(&self, point: &Point) -> bool {
        let origin = self.bounding_box().far_outside();
        let ray = Point2::from(*point) - origin;
        let crossings = self
            .segments
            .iter()
            .filter(|seg| {
                let a = Point2::from(seg.p1) - origin;
                let b = Point2::from(seg.p2) - origin;
                if (ray.perp(&a) > 0.0) == (ray.perp(&b) > 0.0) {
                    return false;
                }
                let edge = b - a;
                let reach = a.perp(&edge) / ray.perp(&edge);
                (0.0..=1.0 + TOLERANCE).contains(&reach)
            })
            .count();
        crossings % 2 == 1
    }

    /// Returns `true` if the segment's midpoint is inside the polygon.
    #[must_use]
    pub fn contains_segment(&self, segment: &Segment) -> bool {
        self.contains_point(&segment.midpoint())
    }

    /// Minimum distance from `point` to any edge.
    #[must_use]
    pub fn distance_to_point(&self, point: &Point) -> f64 {
        self.segments
            .iter()
            .map(|s| s.distance_to_point(point))
            .fold(f64::INFINITY, f64::min)
    }

    /// Minimum distance from this polygon's points to `other`'s edges.
    #[must_use]
    pub fn distance_to_poly(&self, other: &Self) -> f64 {
        self.points
            .iter()
            .map(|p| other.distance_to_point(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Returns `true` if any edge of `self` crosses any edge of `other`.
    #[must_use]
    pub fn intersects_poly(&self, other: &Self) -> bool {
        self.segments
            .iter()
            .any(|a| other.segments.iter().any(|b| a.intersect(b).is_some()))
    }

    /// Splits the edges of both polygons at every crossing point.
    ///
    /// Each crossing that falls strictly inside an edge splits that edge in
    /// two, with the new vertex shared by both polygons. Crossings at an
    /// existing endpoint leave that edge untouched.
    pub fn break_edges(a: &mut Self, b: &mut Self) {
        let mut i = 0;
        while i < a.segments.len() {
            let mut j = 0;
            while j < b.segments.len() {
                let (sa, sb) = (a.segments[i], b.segments[j]);
                if let Some(hit) = sa.intersect(&sb) {
                    let split_a = hit.interior_to_first();
                    let split_b = hit.interior_to_second();
                    let point = if !split_a {
                        if hit.t < 0.5 {
                            sa.p1
                        } else {
                            sa.p2
                        }
                    } else if !split_b {
                        if hit.u < 0.5 {
                            sb.p1
                        } else {
                            sb.p2
                        }
                    } else {
                        Point::from(hit.point)
                    };
                    if split_a {
                        let tail = a.segments[i].p2;
                        a.segments[i].p2 = point;
                        a.segments.insert(i + 1, Segment::new(point, tail));
                    }
                    if split_b {
                        let tail = b.segments[j].p2;
                        b.segments[j].p2 = point;
                        b.segments.insert(j + 1, Segment::new(point, tail));
                    }
                }
                j += 1;
            }
            i += 1;
        }
    }

    /// Applies [`Polygon::break_edges`] to every pair of polygons.
    pub fn multi_break(polys: &mut [Self]) {
        for j in 1..polys.len() {
            let (left, right) = polys.split_at_mut(j);
            for poly in left.iter_mut() {
                Self::break_edges(poly, &mut right[0]);
            }
        }
    }

    /// Computes the outer border of a set of polygon groups.
    ///
    /// The groups are flattened and broken against each other, and endpoints
    /// that differ only by rounding are merged. An edge survives when no
    /// other polygon contains it. An edge that another polygon also traces
    /// survives once, and only if it separates the union from the outside.
    /// The result is the list of surviving edges, not a closed ring.
    #[must_use]
    pub fn union<'a, I>(groups: I) -> Vec<Segment>
    where
        I: IntoIterator<Item = &'a [Polygon]>,
    {
        let mut polys: Vec<Self> = groups.into_iter().flatten().cloned().collect();
        Self::multi_break(&mut polys);
        snap_vertices(&mut polys);

        let mut kept: Vec<Segment> = Vec::new();
        for (i, poly) in polys.iter().enumerate() {
            for seg in &poly.segments {
                if seg.p1.equals(&seg.p2) || kept.iter().any(|k| k.equals(seg)) {
                    continue;
                }
                let mut shared = false;
                let mut covered = false;
                for (j, other) in polys.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    if other.has_edge(seg) {
                        shared = true;
                    } else if other.contains_segment(seg) {
                        covered = true;
                        break;
                    }
                }
                if covered || (shared && !bounds_region(&polys, seg)) {
                    continue;
                }
                kept.push(*seg);
            }
        }
        kept
    }

    fn has_edge(&self, seg: &Segment) -> bool {
        self.segments.iter().any(|s| s.equals(seg))
    }
}

/// Moves every edge endpoint onto the first endpoint seen within
/// `TOLERANCE` of the largest coordinate magnitude.
fn snap_vertices(polys: &mut [Polygon]) {
    let scale = polys
        .iter()
        .flat_map(|poly| &poly.segments)
        .flat_map(|s| [s.p1, s.p2])
        .fold(1.0_f64, |m, p| m.max(p.x.abs()).max(p.y.abs()));
    let eps = TOLERANCE * scale;

    let mut seen: Vec<Point> = Vec::new();
    for seg in polys.iter_mut().flat_map(|poly| poly.segments.iter_mut()) {
        for end in [&mut seg.p1, &mut seg.p2] {
            if let Some(snapped) = seen.iter().copied().find(|s| s.distance(end) <= eps) {
                *end = snapped;
            } else {
                seen.push(*end);
            }
        }
    }
}

/// Returns `true` if exactly one side of `seg` lies inside some polygon.
fn bounds_region(polys: &[Polygon], seg: &Segment) -> bool {
    let along = Point2::from(seg.p2) - Point2::from(seg.p1);
    let offset = Vector2::new(-along.y, along.x) * SIDE_OFFSET;
    let mid = seg.midpoint();
    let inside = |p: Point| polys.iter().any(|poly| poly.contains_point(&p));
    inside(mid.offset_by(&offset)) != inside(mid.offset_by(&-offset))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
        .unwrap()
    }

    /// Checks every endpoint is shared by exactly two segments.
    fn is_closed_loop(segs: &[Segment]) -> bool {
        segs.iter().all(|s| {
            [s.p1, s.p2].iter().all(|p| {
                let degree = segs
                    .iter()
                    .map(|o| usize::from(o.p1.equals(p)) + usize::from(o.p2.equals(p)))
                    .sum::<usize>();
                degree == 2
            })
        })
    }

    #[test]
    fn too_few_points_is_degenerate() {
        assert!(Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).is_err());
    }

    #[test]
    fn square_containment() {
        let sq = rect(0.0, 0.0, 10.0, 10.0);
        assert!(sq.contains_point(&Point::new(5.0, 5.0)));
        assert!(!sq.contains_point(&Point::new(15.0, 5.0)));
        assert!(!sq.contains_point(&Point::new(-1.0, -1.0)));
    }

    #[test]
    fn boundary_point_counts_as_inside() {
        // The ray ends on the bottom edge, which registers as one crossing.
        let sq = rect(0.0, 0.0, 10.0, 10.0);
        assert!(sq.contains_point(&Point::new(5.0, 0.0)));
    }

    #[test]
    fn ray_through_a_vertex_crosses_once() {
        let sq = rect(0.0, 0.0, 10.0, 10.0);
        let outer = sq.bounding_box().far_outside();
        // On the line from the ray origin through the (0, 0) corner.
        let p = Point::new(-outer.x * 0.4, -outer.y * 0.4);
        assert!(p.x > 0.0 && p.x < 10.0 && p.y > 0.0 && p.y < 10.0);
        assert!(sq.contains_point(&p));
        assert!(!sq.contains_point(&Point::new(-outer.x * 1.5, -outer.y * 1.5)));
    }

    #[test]
    fn containment_works_far_from_the_origin() {
        let sq = rect(50_000.0, 50_000.0, 50_010.0, 50_010.0);
        assert!(sq.contains_point(&Point::new(50_005.0, 50_005.0)));
        assert!(!sq.contains_point(&Point::new(49_990.0, 50_005.0)));
    }

    #[test]
    fn distances() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(13.0, 0.0, 20.0, 10.0);
        assert_abs_diff_eq!(a.distance_to_point(&Point::new(5.0, 12.0)), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.distance_to_poly(&b), 3.0, epsilon = 1e-12);
        assert!(!a.intersects_poly(&b));
        assert!(a.intersects_poly(&rect(5.0, 5.0, 15.0, 15.0)));
        assert_abs_diff_eq!(a.signed_area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn break_inserts_shared_vertices() {
        let mut a = rect(0.0, 0.0, 10.0, 10.0);
        let mut b = rect(5.0, 5.0, 15.0, 15.0);
        Polygon::break_edges(&mut a, &mut b);
        assert_eq!(a.segments().len(), 6);
        assert_eq!(b.segments().len(), 6);
        let shared = Point::new(10.0, 5.0);
        assert!(a.segments().iter().any(|s| s.includes(&shared)));
        assert!(b.segments().iter().any(|s| s.includes(&shared)));
    }

    #[test]
    fn union_of_single_polygon_is_itself() {
        let sq = rect(0.0, 0.0, 10.0, 10.0);
        let border = Polygon::union([std::slice::from_ref(&sq)]);
        assert_eq!(border.len(), 4);
        for (kept, original) in border.iter().zip(sq.segments()) {
            assert!(kept.equals(original));
        }
    }

    #[test]
    fn union_of_disjoint_polygons_keeps_everything() {
        let a = vec![rect(0.0, 0.0, 10.0, 10.0)];
        let b = vec![rect(20.0, 0.0, 30.0, 10.0)];
        let border = Polygon::union([a.as_slice(), b.as_slice()]);
        assert_eq!(border.len(), 8);
    }

    #[test]
    fn union_of_overlapping_polygons_drops_interior_edges() {
        let a = vec![rect(0.0, 0.0, 10.0, 10.0)];
        let b = vec![rect(5.0, 5.0, 15.0, 15.0)];
        let border = Polygon::union([a.as_slice(), b.as_slice()]);
        // 12 edges after breaking, 4 of them inside the other square.
        assert_eq!(border.len(), 8);
        assert!(is_closed_loop(&border));
        assert!(!border
            .iter()
            .any(|s| s.equals(&Segment::new(Point::new(10.0, 5.0), Point::new(10.0, 10.0)))));
    }

    #[test]
    fn union_drops_an_edge_between_adjacent_polygons() {
        let a = vec![rect(0.0, 0.0, 10.0, 10.0)];
        let b = vec![rect(10.0, 0.0, 20.0, 10.0)];
        let border = Polygon::union([a.as_slice(), b.as_slice()]);
        assert_eq!(border.len(), 6);
        assert!(is_closed_loop(&border));
        assert!(!border.iter().any(|s| s.midpoint().distance(&Point::new(10.0, 5.0)) < 1e-9));
    }

    #[test]
    fn union_merges_vertices_that_differ_by_rounding() {
        let a = vec![rect(0.0, 0.0, 10.0, 10.0)];
        let b = vec![Polygon::new(vec![
            Point::new(1e-13, 0.0),
            Point::new(10.0, -1e-13),
            Point::new(10.0, 10.0 + 1e-13),
            Point::new(0.0, 10.0),
        ])
        .unwrap()];
        let border = Polygon::union([a.as_slice(), b.as_slice()]);
        assert_eq!(border.len(), 4);
        assert!(is_closed_loop(&border));
    }
}
