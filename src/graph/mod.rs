pub mod persist;

pub use persist::{FileStore, GraphRecord, KeyValueStore, MemoryStore, SegmentRecord, STORAGE_KEY};

use slotmap::SlotMap;
use tracing::trace;

use crate::error::{GraphError, Result};
use crate::geometry::{Point, Projection, Segment};
use crate::math::bezier_2d::split_quadratic;

slotmap::new_key_type! {
    /// Unique identifier for a point in the graph.
    pub struct PointId;
}

slotmap::new_key_type! {
    /// Unique identifier for a segment in the graph.
    pub struct SegmentId;
}

/// A graph edge: two point handles plus an optional bend.
///
/// Segments reference points by handle, so moving a point moves every
/// segment attached to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentData {
    pub p1: PointId,
    pub p2: PointId,
    pub control_point: Option<Point>,
    pub curve: bool,
}

impl SegmentData {
    /// Returns `true` if the segment starts or ends at `id`.
    #[must_use]
    pub fn touches(&self, id: PointId) -> bool {
        self.p1 == id || self.p2 == id
    }

    fn joins(&self, a: PointId, b: PointId) -> bool {
        (self.p1 == a && self.p2 == b) || (self.p1 == b && self.p2 == a)
    }
}

/// The mutable planar road graph.
///
/// Points are unique by value at insertion time; segments are unique
/// regardless of direction and never join a point to itself.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    points: SlotMap<PointId, Point>,
    segments: SlotMap<SegmentId, SegmentData>,
    point_order: Vec<PointId>,
    segment_order: Vec<SegmentId>,
}

impl Graph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the graph has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    // --- Point operations ---

    /// Iterates over points in insertion order.
    pub fn points(&self) -> impl Iterator<Item = (PointId, Point)> + '_ {
        self.point_order
            .iter()
            .filter_map(|&id| self.points.get(id).map(|&p| (id, p)))
    }

    /// Returns the point stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::PointNotFound` for a stale or foreign handle.
    pub fn point(&self, id: PointId) -> Result<Point> {
        self.points
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::PointNotFound.into())
    }

    /// Finds the point exactly equal to `point`.
    #[must_use]
    pub fn find_point(&self, point: &Point) -> Option<PointId> {
        self.points().find(|(_, p)| p.equals(point)).map(|(id, _)| id)
    }

    /// Returns `true` if a point equal to `point` exists.
    #[must_use]
    pub fn contains_point(&self, point: &Point) -> bool {
        self.find_point(point).is_some()
    }

    /// Adds `point` unless an equal point already exists.
    ///
    /// Returns the new handle, or `None` if the point was a duplicate.
    pub fn try_add_point(&mut self, point: Point) -> Option<PointId> {
        if self.contains_point(&point) {
            return None;
        }
        let id = self.points.insert(point);
        self.point_order.push(id);
        trace!(x = point.x, y = point.y, "point added");
        Some(id)
    }

    /// Returns the handle of the point equal to `point`, adding it if needed.
    pub fn add_or_get_point(&mut self, point: Point) -> PointId {
        match self.find_point(&point) {
            Some(id) => id,
            None => {
                let id = self.points.insert(point);
                self.point_order.push(id);
                id
            }
        }
    }

    /// Moves a point; every attached segment follows.
    ///
    /// Moving onto another point merges the two: the moved point's segments
    /// are re-attached to the one already there, those that would join a
    /// point to itself or repeat an existing segment are dropped, and the
    /// moved point is removed. Returns the handle now holding `to`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::PointNotFound` for a stale or foreign handle.
    pub fn move_point(&mut self, id: PointId, to: Point) -> Result<PointId> {
        if let Some(existing) = self.find_point(&to).filter(|&other| other != id) {
            self.merge_point(id, existing)?;
            return Ok(existing);
        }
        let p = self.points.get_mut(id).ok_or(GraphError::PointNotFound)?;
        *p = to;
        Ok(id)
    }

    fn merge_point(&mut self, from: PointId, into: PointId) -> Result<()> {
        if !self.points.contains_key(from) {
            return Err(GraphError::PointNotFound.into());
        }
        let relink = |p: PointId| if p == from { into } else { p };
        for seg in self.segments_with_point(from) {
            let data = self.remove_segment(seg)?;
            let moved = SegmentData {
                p1: relink(data.p1),
                p2: relink(data.p2),
                ..data
            };
            if self.insert_segment(moved)?.is_none() {
                trace!("segment dropped by point merge");
            }
        }
        self.remove_point(from)?;
        Ok(())
    }

    /// Removes a point together with every segment attached to it.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::PointNotFound` for a stale or foreign handle.
    pub fn remove_point(&mut self, id: PointId) -> Result<Point> {
        let point = self.points.remove(id).ok_or(GraphError::PointNotFound)?;
        self.point_order.retain(|&p| p != id);
        for seg in self.segments_with_point(id) {
            self.remove_segment(seg)?;
        }
        trace!(x = point.x, y = point.y, "point removed");
        Ok(point)
    }

    /// Returns the nearest point within `max_dist` of `to`.
    #[must_use]
    pub fn nearest_point(&self, to: &Point, max_dist: f64) -> Option<PointId> {
        self.points()
            .map(|(id, p)| (id, p.distance(to)))
            .filter(|&(_, d)| d < max_dist)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    // --- Segment operations ---

    /// Iterates over segment handles in insertion order.
    pub fn segment_ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.segment_order
            .iter()
            .copied()
            .filter(|&id| self.segments.contains_key(id))
    }

    /// Returns the raw handle data of a segment.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::SegmentNotFound` for a stale or foreign handle.
    pub fn segment_data(&self, id: SegmentId) -> Result<&SegmentData> {
        self.segments
            .get(id)
            .ok_or_else(|| GraphError::SegmentNotFound.into())
    }

    /// Resolves a segment into point values.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::SegmentNotFound` for a stale or foreign handle.
    pub fn segment(&self, id: SegmentId) -> Result<Segment> {
        let data = self.segment_data(id)?;
        Ok(Segment {
            p1: self.point(data.p1)?,
            p2: self.point(data.p2)?,
            control_point: data.control_point,
            curve: data.curve,
        })
    }

    /// Iterates over resolved segments in insertion order.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentId, Segment)> + '_ {
        self.segment_ids()
            .filter_map(|id| self.segment(id).ok().map(|s| (id, s)))
    }

    /// Finds the segment joining `a` and `b` in either direction.
    #[must_use]
    pub fn find_segment(&self, a: PointId, b: PointId) -> Option<SegmentId> {
        self.segment_ids()
            .find(|&id| self.segments.get(id).is_some_and(|s| s.joins(a, b)))
    }

    /// Adds a straight segment between two existing points.
    ///
    /// Returns `Ok(None)` if the segment would be degenerate or already exists.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::PointNotFound` if either handle is unknown.
    pub fn try_add_segment(&mut self, p1: PointId, p2: PointId) -> Result<Option<SegmentId>> {
        self.insert_segment(SegmentData {
            p1,
            p2,
            control_point: None,
            curve: false,
        })
    }

    /// Adds a curved segment between two existing points, bent towards `control`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::PointNotFound` if either handle is unknown.
    pub fn try_add_curve(
        &mut self,
        p1: PointId,
        p2: PointId,
        control: Point,
    ) -> Result<Option<SegmentId>> {
        self.insert_segment(SegmentData {
            p1,
            p2,
            control_point: Some(control),
            curve: true,
        })
    }

    pub(crate) fn insert_segment(&mut self, data: SegmentData) -> Result<Option<SegmentId>> {
        let a = self.point(data.p1)?;
        let b = self.point(data.p2)?;
        if data.p1 == data.p2 || a.equals(&b) {
            return Ok(None);
        }
        if self.find_segment(data.p1, data.p2).is_some() {
            return Ok(None);
        }
        let id = self.segments.insert(data);
        self.segment_order.push(id);
        trace!(curve = data.curve, "segment added");
        Ok(Some(id))
    }

    /// Removes a segment, leaving its points in place.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::SegmentNotFound` for a stale or foreign handle.
    pub fn remove_segment(&mut self, id: SegmentId) -> Result<SegmentData> {
        let data = self.segments.remove(id).ok_or(GraphError::SegmentNotFound)?;
        self.segment_order.retain(|&s| s != id);
        Ok(data)
    }

    /// Returns every segment attached to `point`.
    #[must_use]
    pub fn segments_with_point(&self, point: PointId) -> Vec<SegmentId> {
        self.segment_ids()
            .filter(|&id| self.segments.get(id).is_some_and(|s| s.touches(point)))
            .collect()
    }

    /// Returns the nearest straight segment within `max_dist` of `to` whose
    /// projection of `to` falls inside its span.
    #[must_use]
    pub fn nearest_segment(&self, to: &Point, max_dist: f64) -> Option<(SegmentId, Projection)> {
        self.segments()
            .filter(|(_, seg)| !seg.curve)
            .filter_map(|(id, seg)| {
                let proj = seg.project_point(to);
                let dist = proj.point.distance(to);
                ((0.0..=1.0).contains(&proj.offset) && dist < max_dist).then_some((id, proj, dist))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(id, proj, _)| (id, proj))
    }

    /// Splits a segment in two at `at`, returning the shared point.
    ///
    /// Straight segments are split at the projection of `at` onto their
    /// chord. Curved segments are split on the curve at the chord parameter
    /// of `at`, and both halves keep a matching bend. Splitting at an
    /// endpoint returns that endpoint unchanged.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::SegmentNotFound` for a stale or foreign handle.
    pub fn split_segment(&mut self, id: SegmentId, at: Point) -> Result<PointId> {
        let data = *self.segment_data(id)?;
        let seg = self.segment(id)?;
        let t = seg.project_point(&at).offset.clamp(0.0, 1.0);

        let (point, controls) = match (data.curve, data.control_point) {
            (true, Some(c)) => {
                let (p, c1, c2) = split_quadratic(&seg.p1.into(), &c.into(), &seg.p2.into(), t);
                (Point::from(p), Some((Point::from(c1), Point::from(c2))))
            }
            _ if at.equals(&seg.p1) || at.equals(&seg.p2) => (at, None),
            _ => (seg.project_point(&at).point, None),
        };
        if point.equals(&seg.p1) {
            return Ok(data.p1);
        }
        if point.equals(&seg.p2) {
            return Ok(data.p2);
        }

        self.remove_segment(id)?;
        let mid = self.add_or_get_point(point);
        match controls {
            Some((c1, c2)) => {
                self.try_add_curve(data.p1, mid, c1)?;
                self.try_add_curve(mid, data.p2, c2)?;
            }
            None => {
                self.try_add_segment(data.p1, mid)?;
                self.try_add_segment(mid, data.p2)?;
            }
        }
        trace!(x = point.x, y = point.y, "segment split");
        Ok(mid)
    }

    /// Change-detection token: the graph's JSON serialization.
    #[must_use]
    pub fn hash(&self) -> String {
        serde_json::to_string(&self.to_record()).unwrap_or_default()
    }

    /// Removes every point and segment.
    pub fn dispose(&mut self) {
        self.points.clear();
        self.segments.clear();
        self.point_order.clear();
        self.segment_order.clear();
    }
}
