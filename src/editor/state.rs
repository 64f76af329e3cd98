use crate::geometry::Point;
use crate::graph::{PointId, SegmentId};

/// Divisor turning the camera zoom distance into a hover radius.
pub const HOVER_DIVISOR: f64 = 20.0;

/// Tunable editor behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Hover radius is `zoom / hover_divisor`.
    pub hover_divisor: f64,
    /// Number of straight pieces a confirmed curve is rasterized into.
    pub curve_resolution: usize,
    /// Sideways offset of a fresh curve handle, as a fraction of the chord.
    pub preview_nudge: f64,
    /// Smallest apex deviation, as a fraction of the chord, that still
    /// counts as a curve on confirm.
    pub min_bend_ratio: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hover_divisor: HOVER_DIVISOR,
            curve_resolution: 10,
            preview_nudge: 0.001,
            min_bend_ratio: 0.02,
        }
    }
}

/// A pending curved road: both ends exist in the graph, the bend does not yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveIntent {
    pub start: PointId,
    pub end: PointId,
    pub control: Point,
}

/// What the pointer is currently snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverTarget {
    /// An existing graph point.
    Point(PointId),
    /// A spot on a straight segment, not yet a graph point.
    Segment { id: SegmentId, at: Point },
}

/// The editor's interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    /// A point follows the pointer until the primary button is released.
    Dragging(PointId),
    /// The curve handle follows the pointer.
    CurvePreview(CurveIntent),
    /// The curve is shaped; waiting for confirm or cancel.
    AwaitingConfirm(CurveIntent),
}

impl EditorState {
    /// The pending curve, if any.
    #[must_use]
    pub fn curve_intent(&self) -> Option<&CurveIntent> {
        match self {
            Self::CurvePreview(intent) | Self::AwaitingConfirm(intent) => Some(intent),
            Self::Idle | Self::Dragging(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Input events, already projected onto the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorInput {
    PointerDown { at: Point, button: PointerButton },
    PointerMove { at: Point },
    PointerUp { at: Point, button: PointerButton },
    /// Accept the pending curve.
    Confirm,
    /// Drop the pending curve.
    Cancel,
}

/// Side effects for the host to act on after an input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEffect {
    /// The graph was mutated; derived geometry is stale.
    GraphChanged,
    /// The preview (selection, hover, pending segment) changed.
    PreviewChanged,
    /// Show the confirm/cancel prompt at `anchor`.
    ShowConfirm { anchor: Point },
    HideConfirm,
    /// The click belongs to the camera.
    StartPanning,
}
