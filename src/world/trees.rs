use rand::Rng;

use crate::geometry::{Point, Polygon, Segment};
use crate::math::polygon_2d::Aabb;
use crate::math::{lerp, Point2};

use super::WorldParams;

/// Rejection-samples tree positions inside the bounding box of the road
/// borders and building zones.
///
/// A sample is kept only if it is outside every obstacle with half a tree of
/// clearance, at least one tree size from every kept tree, and within two
/// tree sizes of some obstacle edge, so trees line the developed area rather
/// than filling open ground. Sampling stops after `max_trees` trees or
/// `max_tree_misses` consecutive rejections.
pub(super) fn place_trees<R: Rng + ?Sized>(
    rng: &mut R,
    borders: &[Segment],
    obstacles: &[&Polygon],
    params: &WorldParams,
) -> Vec<Point> {
    let extent: Vec<Point2> = borders
        .iter()
        .flat_map(|s| [s.p1, s.p2])
        .chain(obstacles.iter().flat_map(|poly| poly.points().iter().copied()))
        .map(Point2::from)
        .collect();
    let Some(bbox) = Aabb::from_points(&extent) else {
        return Vec::new();
    };

    let mut trees: Vec<Point> = Vec::new();
    let mut misses = 0;
    while misses < params.max_tree_misses && trees.len() < params.max_trees {
        let p = Point::new(
            lerp(bbox.min.x, bbox.max.x, rng.random::<f64>()),
            lerp(bbox.min.y, bbox.max.y, rng.random::<f64>()),
        );
        if accepts(&p, &trees, obstacles, params) {
            trees.push(p);
            misses = 0;
        } else {
            misses += 1;
        }
    }
    trees
}

fn accepts(p: &Point, trees: &[Point], obstacles: &[&Polygon], params: &WorldParams) -> bool {
    let clear = obstacles.iter().all(|poly| {
        !poly.contains_point(p) && poly.distance_to_point(p) >= params.tree_size / 2.0
    });
    if !clear {
        return false;
    }
    if trees.iter().any(|t| t.distance(p) < params.tree_size) {
        return false;
    }
    obstacles
        .iter()
        .any(|poly| poly.distance_to_point(p) < params.tree_size * 2.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(x0, y0),
            Point::new(x0 + size, y0),
            Point::new(x0 + size, y0 + size),
            Point::new(x0, y0 + size),
        ])
        .unwrap()
    }

    #[test]
    fn trees_respect_every_placement_rule() {
        let params = WorldParams::default();
        let a = square(0.0, 0.0, 100.0);
        let b = square(1000.0, 1000.0, 100.0);
        let obstacles = [&a, &b];
        let mut rng = StdRng::seed_from_u64(7);
        let trees = place_trees(&mut rng, &[], &obstacles, &params);
        assert!(!trees.is_empty());
        for (i, t) in trees.iter().enumerate() {
            assert!(obstacles.iter().all(|o| !o.contains_point(t)));
            assert!(obstacles.iter().all(|o| o.distance_to_point(t) >= params.tree_size / 2.0));
            assert!(obstacles.iter().any(|o| o.distance_to_point(t) < params.tree_size * 2.0));
            for other in &trees[i + 1..] {
                assert!(t.distance(other) >= params.tree_size);
            }
        }
    }

    #[test]
    fn tree_count_is_capped() {
        let params = WorldParams {
            max_trees: 3,
            ..WorldParams::default()
        };
        let a = square(0.0, 0.0, 100.0);
        let b = square(1000.0, 1000.0, 100.0);
        let mut rng = StdRng::seed_from_u64(7);
        let trees = place_trees(&mut rng, &[], &[&a, &b], &params);
        assert!(trees.len() <= 3);
    }

    #[test]
    fn nothing_to_bound_means_no_trees() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(place_trees(&mut rng, &[], &[], &WorldParams::default()).is_empty());
    }
}
