use super::{Point3, Vector3, TOLERANCE};

/// A half-line `origin + t * direction` with `t >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray3 {
    pub origin: Point3,
    pub direction: Vector3,
}

/// Relationship of a ray with a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayPlaneRelation {
    /// The ray crosses the plane at a single point.
    Point { point: Point3, t: f64 },
    /// The ray runs parallel to the plane.
    Parallel,
    /// The supporting line crosses the plane behind the ray origin.
    Behind,
}

/// Intersects `ray` with the plane through `plane_origin` with normal
/// `plane_normal`.
#[must_use]
pub fn ray_plane_intersect(
    ray: &Ray3,
    plane_origin: &Point3,
    plane_normal: &Vector3,
) -> RayPlaneRelation {
    let denom = plane_normal.dot(&ray.direction);
    if denom.abs() < TOLERANCE {
        return RayPlaneRelation::Parallel;
    }
    let t = plane_normal.dot(&(plane_origin - ray.origin)) / denom;
    if t < 0.0 {
        return RayPlaneRelation::Behind;
    }
    RayPlaneRelation::Point {
        point: ray.origin + ray.direction * t,
        t,
    }
}
