use std::collections::{HashMap, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{RenderError, Result};
use crate::geometry::Point;

use super::TriangleMesh;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates the interior of a simple ring of points.
///
/// Concave rings are handled; the ring is inserted as constraint edges into
/// a constrained Delaunay triangulation and only faces enclosed by an odd
/// number of constraints are kept.
#[derive(Debug)]
pub struct TriangulateRing<'a> {
    ring: &'a [Point],
}

impl<'a> TriangulateRing<'a> {
    #[must_use]
    pub fn new(ring: &'a [Point]) -> Self {
        Self { ring }
    }

    /// # Errors
    ///
    /// Returns `RenderError::Triangulation` for fewer than three points or a
    /// coordinate the triangulation cannot accept.
    pub fn execute(&self) -> Result<TriangleMesh> {
        if self.ring.len() < 3 {
            return Err(RenderError::Triangulation("ring needs at least 3 points".into()).into());
        }
        let cdt = constrain_ring(self.ring)?;
        let inside = face_parity(&cdt);

        let mut mesh = TriangleMesh::default();
        let mut remap: HashMap<usize, u32> = HashMap::new();
        let kept = cdt
            .inner_faces()
            .filter(|face| inside.get(face.fix().index()).copied().flatten() == Some(true));
        for face in kept {
            let tri = face.vertices().map(|vh| {
                *remap.entry(vh.fix().index()).or_insert_with(|| {
                    let pos = vh.position();
                    mesh.vertices.push(Point::new(pos.x, pos.y));
                    #[allow(clippy::cast_possible_truncation)]
                    let index = (mesh.vertices.len() - 1) as u32;
                    index
                })
            });
            mesh.indices.push(tri);
        }
        Ok(mesh)
    }
}

/// Builds a triangulation of the ring's points with every ring edge that
/// does not cross an earlier one added as a constraint.
fn constrain_ring(ring: &[Point]) -> Result<Cdt> {
    let mut cdt = Cdt::new();
    let handles = ring
        .iter()
        .map(|p| cdt.insert(SpadePoint2::new(p.x, p.y)))
        .collect::<std::result::Result<Vec<_>, InsertionError>>()
        .map_err(|e| RenderError::Triangulation(format!("CDT insert: {e}")))?;

    for (&from, &to) in handles.iter().zip(handles.iter().cycle().skip(1)) {
        if from != to && cdt.can_add_constraint(from, to) {
            cdt.add_constraint(from, to);
        }
    }
    Ok(cdt)
}

/// Labels each inner face by whether an odd number of constraint edges
/// separate it from the outer face. Indexed by fixed face index; the outer
/// face stays `None`.
fn face_parity(cdt: &Cdt) -> Vec<Option<bool>> {
    let mut parity = vec![None; cdt.num_all_faces()];
    let mut queue: VecDeque<FixedFaceHandle<InnerTag>> = VecDeque::new();

    let hull = cdt.directed_edges().filter(|edge| edge.face().is_outer());
    let seeds = hull.filter_map(|edge| {
        let face = edge.rev().face().as_inner()?;
        Some((face.fix(), cdt.is_constraint_edge(edge.as_undirected().fix())))
    });
    for (face, inside) in seeds {
        label(&mut parity, &mut queue, face, inside);
    }

    while let Some(face) = queue.pop_front() {
        let inside = parity.get(face.index()).copied().flatten() == Some(true);
        for edge in cdt.face(face).adjacent_edges() {
            if let Some(next) = edge.rev().face().as_inner() {
                let crossed = cdt.is_constraint_edge(edge.as_undirected().fix());
                label(&mut parity, &mut queue, next.fix(), inside != crossed);
            }
        }
    }
    parity
}

fn label(
    parity: &mut [Option<bool>],
    queue: &mut VecDeque<FixedFaceHandle<InnerTag>>,
    face: FixedFaceHandle<InnerTag>,
    inside: bool,
) {
    if let Some(slot) = parity.get_mut(face.index()).filter(|slot| slot.is_none()) {
        *slot = Some(inside);
        queue.push_back(face);
    }
}
