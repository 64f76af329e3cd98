mod state;

pub use state::{
    CurveIntent, EditorConfig, EditorEffect, EditorInput, EditorState, HoverTarget, PointerButton,
    HOVER_DIVISOR,
};

use std::f64::consts::FRAC_PI_2;

use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::{Point, Segment};
use crate::graph::{Graph, PointId, SegmentId};
use crate::math::bezier_2d::{apex_deviation, sample_quadratic};

/// Everything the host draws on top of the world while editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorPreview {
    pub selected: Option<Point>,
    pub hovered: Option<Point>,
    /// The segment that would be added next.
    pub intent: Option<Segment>,
    /// The draggable handle of a pending curve.
    pub control: Option<Point>,
}

/// Interactive road-graph editor.
#[derive(Debug, Clone)]
pub struct GraphEditor {
    config: EditorConfig,
    state: EditorState,
    selected: Option<PointId>,
    hovered: Option<HoverTarget>,
    pointer: Option<Point>,
    hover_radius: f64,
}

impl Default for GraphEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl GraphEditor {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            state: EditorState::Idle,
            selected: None,
            hovered: None,
            pointer: None,
            hover_radius: 0.0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    #[must_use]
    pub fn selected(&self) -> Option<PointId> {
        self.selected
    }

    #[must_use]
    pub fn hovered(&self) -> Option<HoverTarget> {
        self.hovered
    }

    #[must_use]
    pub fn hover_radius(&self) -> f64 {
        self.hover_radius
    }

    /// Scales the hover radius with the camera distance.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.hover_radius = zoom / self.config.hover_divisor;
    }

    /// Drops selection, hover and any pending curve, e.g. after the graph
    /// was replaced wholesale.
    pub fn reset(&mut self) {
        self.state = EditorState::Idle;
        self.selected = None;
        self.hovered = None;
    }

    /// Applies one input to `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error if a handle held by the editor no longer resolves in
    /// `graph`, which happens when the graph is mutated behind its back
    /// without calling [`Self::reset`].
    pub fn handle(&mut self, graph: &mut Graph, input: EditorInput) -> Result<Vec<EditorEffect>> {
        trace!(?input, state = ?self.state, "editor input");
        match input {
            EditorInput::PointerMove { at } => self.pointer_move(graph, at),
            EditorInput::PointerDown {
                at,
                button: PointerButton::Primary,
            } => self.primary_down(graph, at),
            EditorInput::PointerDown {
                at,
                button: PointerButton::Secondary,
            } => self.secondary_down(graph, at),
            EditorInput::PointerUp {
                button: PointerButton::Primary,
                ..
            } => self.primary_up(graph),
            EditorInput::PointerUp {
                button: PointerButton::Secondary,
                ..
            } => Ok(Vec::new()),
            EditorInput::Confirm => self.confirm(graph),
            EditorInput::Cancel => Ok(self.cancel()),
        }
    }

    fn pointer_move(&mut self, graph: &mut Graph, at: Point) -> Result<Vec<EditorEffect>> {
        self.pointer = Some(at);
        if let EditorState::Dragging(id) = self.state {
            let kept = graph.move_point(id, at)?;
            if kept != id {
                debug!("dragged point merged into an existing one");
                self.state = EditorState::Idle;
                self.selected = Some(kept);
                self.hovered = Some(HoverTarget::Point(kept));
            }
            return Ok(vec![EditorEffect::GraphChanged, EditorEffect::PreviewChanged]);
        }
        if let EditorState::CurvePreview(intent) = &mut self.state {
            intent.control = at;
            return Ok(vec![EditorEffect::PreviewChanged]);
        }
        let before = self.hovered;
        self.update_hover(graph, at);
        if before != self.hovered || self.selected.is_some() {
            Ok(vec![EditorEffect::PreviewChanged])
        } else {
            Ok(Vec::new())
        }
    }

    fn primary_down(&mut self, graph: &mut Graph, at: Point) -> Result<Vec<EditorEffect>> {
        self.pointer = Some(at);
        match self.state {
            EditorState::AwaitingConfirm(intent) => {
                if intent.control.distance(&at) < self.hover_radius {
                    self.state = EditorState::CurvePreview(intent);
                    return Ok(vec![EditorEffect::HideConfirm, EditorEffect::PreviewChanged]);
                }
                return Ok(Vec::new());
            }
            EditorState::Dragging(_) | EditorState::CurvePreview(_) => return Ok(Vec::new()),
            EditorState::Idle => {}
        }

        let mut effects = Vec::new();
        self.update_hover(graph, at);
        let target = match self.hovered {
            Some(HoverTarget::Point(id)) => Some(id),
            Some(HoverTarget::Segment { id, at: snap }) => {
                let mid = graph.split_segment(id, snap)?;
                self.hovered = Some(HoverTarget::Point(mid));
                effects.push(EditorEffect::GraphChanged);
                Some(mid)
            }
            None => None,
        };

        match (target, self.selected) {
            (Some(end), Some(start)) if end != start => {
                let control = self.initial_control(graph.point(start)?, graph.point(end)?);
                self.state = EditorState::CurvePreview(CurveIntent {
                    start,
                    end,
                    control,
                });
                debug!("curve preview started");
            }
            (Some(id), _) => {
                self.selected = Some(id);
                self.state = EditorState::Dragging(id);
            }
            (None, previous) => {
                let id = graph.add_or_get_point(at);
                if let Some(previous) = previous {
                    graph.try_add_segment(previous, id)?;
                }
                self.selected = Some(id);
                self.hovered = Some(HoverTarget::Point(id));
                self.state = EditorState::Dragging(id);
                effects.push(EditorEffect::GraphChanged);
            }
        }
        effects.push(EditorEffect::PreviewChanged);
        Ok(effects)
    }

    fn secondary_down(&mut self, graph: &mut Graph, at: Point) -> Result<Vec<EditorEffect>> {
        self.pointer = Some(at);
        if self.selected.is_some() {
            let had_prompt = matches!(self.state, EditorState::AwaitingConfirm(_));
            self.selected = None;
            self.state = EditorState::Idle;
            let mut effects = vec![EditorEffect::PreviewChanged];
            if had_prompt {
                effects.push(EditorEffect::HideConfirm);
            }
            return Ok(effects);
        }

        self.update_hover(graph, at);
        if let Some(HoverTarget::Point(id)) = self.hovered {
            graph.remove_point(id)?;
            self.hovered = None;
            return Ok(vec![EditorEffect::GraphChanged, EditorEffect::PreviewChanged]);
        }
        Ok(vec![EditorEffect::StartPanning])
    }

    fn primary_up(&mut self, graph: &Graph) -> Result<Vec<EditorEffect>> {
        match self.state {
            EditorState::Dragging(_) => {
                self.state = EditorState::Idle;
                Ok(Vec::new())
            }
            EditorState::CurvePreview(intent) => {
                self.state = EditorState::AwaitingConfirm(intent);
                Ok(vec![EditorEffect::ShowConfirm {
                    anchor: graph.point(intent.end)?,
                }])
            }
            EditorState::Idle | EditorState::AwaitingConfirm(_) => Ok(Vec::new()),
        }
    }

    fn confirm(&mut self, graph: &mut Graph) -> Result<Vec<EditorEffect>> {
        let Some(intent) = self.state.curve_intent().copied() else {
            return Ok(Vec::new());
        };
        self.commit_curve(graph, &intent)?;
        self.state = EditorState::Idle;
        self.selected = Some(intent.end);
        Ok(vec![
            EditorEffect::HideConfirm,
            EditorEffect::GraphChanged,
            EditorEffect::PreviewChanged,
        ])
    }

    fn cancel(&mut self) -> Vec<EditorEffect> {
        if self.state.curve_intent().is_none() {
            return Vec::new();
        }
        self.state = EditorState::Idle;
        vec![EditorEffect::HideConfirm, EditorEffect::PreviewChanged]
    }

    /// Snaps to the nearest point within the hover radius, else to the
    /// nearest straight segment.
    fn update_hover(&mut self, graph: &Graph, at: Point) {
        self.hovered = graph
            .nearest_point(&at, self.hover_radius)
            .map(HoverTarget::Point)
            .or_else(|| {
                graph
                    .nearest_segment(&at, self.hover_radius)
                    .map(|(id, proj)| HoverTarget::Segment { id, at: proj.point })
            });
    }

    /// The chord midpoint, pushed slightly sideways so the handle is
    /// distinguishable from a straight segment's midpoint.
    fn initial_control(&self, start: Point, end: Point) -> Point {
        let chord = start.distance(&end);
        start
            .midpoint(&end)
            .translate(end.angle_from(&start) + FRAC_PI_2, chord * self.config.preview_nudge)
    }

    /// Adds the pending curve as a chain of straight segments, splitting
    /// every straight road the chain crosses. A nearly flat curve becomes a
    /// single straight segment.
    fn commit_curve(&self, graph: &mut Graph, intent: &CurveIntent) -> Result<()> {
        let a = graph.point(intent.start)?;
        let b = graph.point(intent.end)?;
        let bend = apex_deviation(&a.into(), &intent.control.into(), &b.into());
        if bend < self.config.min_bend_ratio * a.distance(&b) {
            graph.try_add_segment(intent.start, intent.end)?;
            debug!(bend, "curve too flat, added straight segment");
            return Ok(());
        }

        let samples = sample_quadratic(
            &a.into(),
            &intent.control.into(),
            &b.into(),
            self.config.curve_resolution,
        );
        let last = samples.len() - 1;
        let mut prev = intent.start;
        for (i, sample) in samples.into_iter().enumerate().skip(1) {
            let next = if i == last {
                intent.end
            } else {
                graph.add_or_get_point(Point::from(sample))
            };
            splice_piece(graph, prev, next)?;
            prev = next;
        }
        debug!(pieces = last, "curve committed");
        Ok(())
    }

    /// What to draw for the current selection, hover and pending segment.
    ///
    /// # Errors
    ///
    /// Returns an error if a held handle no longer resolves in `graph`.
    pub fn preview(&self, graph: &Graph) -> Result<EditorPreview> {
        let hovered = match self.hovered {
            Some(HoverTarget::Point(id)) => graph.point(id).ok(),
            Some(HoverTarget::Segment { at, .. }) => Some(at),
            None => None,
        };
        Ok(EditorPreview {
            selected: self.selected.map(|id| graph.point(id)).transpose()?,
            hovered,
            intent: self.intent_segment(graph)?,
            control: self.state.curve_intent().map(|intent| intent.control),
        })
    }

    /// The segment that would be added next: the pending curve, or a
    /// straight segment from the selected point to the hover target or
    /// pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if a held handle no longer resolves in `graph`.
    pub fn intent_segment(&self, graph: &Graph) -> Result<Option<Segment>> {
        if let Some(intent) = self.state.curve_intent() {
            return Ok(Some(Segment::curved(
                graph.point(intent.start)?,
                graph.point(intent.end)?,
                intent.control,
            )));
        }
        if matches!(self.state, EditorState::Dragging(_)) {
            return Ok(None);
        }
        let Some(selected) = self.selected else {
            return Ok(None);
        };
        let start = graph.point(selected)?;
        let end = match self.hovered {
            Some(HoverTarget::Point(id)) => graph.point(id).ok(),
            Some(HoverTarget::Segment { at, .. }) => Some(at),
            None => self.pointer,
        };
        Ok(end
            .filter(|end| !end.equals(&start))
            .map(|end| Segment::new(start, end)))
    }
}

/// Adds `from → to` as straight segments, splitting each straight road the
/// piece crosses and routing the piece through the split points.
fn splice_piece(graph: &mut Graph, from: PointId, to: PointId) -> Result<()> {
    let piece = Segment::new(graph.point(from)?, graph.point(to)?);
    let mut crossings: Vec<(f64, SegmentId, Point)> = graph
        .segments()
        .filter(|(_, seg)| !seg.curve)
        .filter_map(|(id, seg)| {
            piece
                .intersect(&seg)
                .filter(|hit| hit.interior_to_first() && hit.interior_to_second())
                .map(|hit| (hit.t, id, Point::from(hit.point)))
        })
        .collect();
    crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut prev = from;
    for (_, id, at) in crossings {
        let mid = graph.split_segment(id, at)?;
        graph.try_add_segment(prev, mid)?;
        prev = mid;
    }
    graph.try_add_segment(prev, to)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn editor() -> GraphEditor {
        let mut editor = GraphEditor::default();
        editor.set_zoom(200.0);
        editor
    }

    fn click(editor: &mut GraphEditor, graph: &mut Graph, at: Point) -> Vec<EditorEffect> {
        let mut effects = editor
            .handle(
                graph,
                EditorInput::PointerDown {
                    at,
                    button: PointerButton::Primary,
                },
            )
            .unwrap();
        effects.extend(
            editor
                .handle(
                    graph,
                    EditorInput::PointerUp {
                        at,
                        button: PointerButton::Primary,
                    },
                )
                .unwrap(),
        );
        effects
    }

    fn right_click(editor: &mut GraphEditor, graph: &mut Graph, at: Point) -> Vec<EditorEffect> {
        editor
            .handle(
                graph,
                EditorInput::PointerDown {
                    at,
                    button: PointerButton::Secondary,
                },
            )
            .unwrap()
    }

    fn move_to(editor: &mut GraphEditor, graph: &mut Graph, at: Point) {
        editor.handle(graph, EditorInput::PointerMove { at }).unwrap();
    }

    #[test]
    fn zoom_sets_hover_radius() {
        assert!((editor().hover_radius() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clicks_on_empty_ground_chain_straight_roads() {
        let mut graph = Graph::new();
        let mut ed = editor();
        let effects = click(&mut ed, &mut graph, p(0.0, 0.0));
        assert!(effects.contains(&EditorEffect::GraphChanged));
        assert_eq!(graph.point_count(), 1);
        assert_eq!(*ed.state(), EditorState::Idle);

        click(&mut ed, &mut graph, p(100.0, 0.0));
        click(&mut ed, &mut graph, p(100.0, 100.0));
        assert_eq!(graph.point_count(), 3);
        assert_eq!(graph.segment_count(), 2);
        assert_eq!(graph.point(ed.selected().unwrap()).unwrap(), p(100.0, 100.0));
    }

    #[test]
    fn dragging_moves_the_point_and_its_roads() {
        let mut graph = Graph::new();
        let mut ed = editor();
        click(&mut ed, &mut graph, p(0.0, 0.0));
        click(&mut ed, &mut graph, p(100.0, 0.0));
        right_click(&mut ed, &mut graph, p(500.0, 500.0));

        ed.handle(
            &mut graph,
            EditorInput::PointerDown {
                at: p(2.0, 1.0),
                button: PointerButton::Primary,
            },
        )
        .unwrap();
        assert!(matches!(ed.state(), EditorState::Dragging(_)));
        move_to(&mut ed, &mut graph, p(0.0, 50.0));
        ed.handle(
            &mut graph,
            EditorInput::PointerUp {
                at: p(0.0, 50.0),
                button: PointerButton::Primary,
            },
        )
        .unwrap();

        assert_eq!(*ed.state(), EditorState::Idle);
        assert_eq!(graph.point_count(), 2);
        let (_, seg) = graph.segments().next().unwrap();
        assert!(seg.includes(&p(0.0, 50.0)));
    }

    #[test]
    fn dropping_a_point_onto_another_merges_them() {
        let mut graph = Graph::new();
        let mut ed = editor();
        click(&mut ed, &mut graph, p(0.0, 0.0));
        click(&mut ed, &mut graph, p(100.0, 0.0));
        click(&mut ed, &mut graph, p(100.0, 100.0));
        right_click(&mut ed, &mut graph, p(500.0, 500.0));
        let a = graph.find_point(&p(0.0, 0.0)).unwrap();

        ed.handle(
            &mut graph,
            EditorInput::PointerDown {
                at: p(100.0, 100.0),
                button: PointerButton::Primary,
            },
        )
        .unwrap();
        move_to(&mut ed, &mut graph, p(0.0, 0.0));

        assert_eq!(*ed.state(), EditorState::Idle);
        assert_eq!(ed.selected(), Some(a));
        assert_eq!(graph.point_count(), 2);
        assert_eq!(graph.segment_count(), 1);
        assert!(graph.segments().all(|(_, s)| !s.p1.equals(&s.p2)));

        // The rest of the gesture no longer drags anything.
        move_to(&mut ed, &mut graph, p(300.0, 300.0));
        assert_eq!(graph.point(a).unwrap(), p(0.0, 0.0));
    }

    #[test]
    fn right_click_clears_selection_then_deletes() {
        let mut graph = Graph::new();
        let mut ed = editor();
        click(&mut ed, &mut graph, p(0.0, 0.0));
        click(&mut ed, &mut graph, p(100.0, 0.0));

        // First right-click only drops the pending road.
        right_click(&mut ed, &mut graph, p(0.0, 0.0));
        assert!(ed.selected().is_none());
        assert_eq!(graph.point_count(), 2);

        let effects = right_click(&mut ed, &mut graph, p(1.0, 0.0));
        assert!(effects.contains(&EditorEffect::GraphChanged));
        assert_eq!(graph.point_count(), 1);
        assert_eq!(graph.segment_count(), 0);
    }

    #[test]
    fn right_click_on_nothing_pans() {
        let mut graph = Graph::new();
        let mut ed = editor();
        let effects = right_click(&mut ed, &mut graph, p(500.0, 500.0));
        assert_eq!(effects, vec![EditorEffect::StartPanning]);
    }

    #[test]
    fn clicking_a_road_splits_it() {
        let mut graph = Graph::new();
        let mut ed = editor();
        click(&mut ed, &mut graph, p(0.0, 0.0));
        click(&mut ed, &mut graph, p(100.0, 0.0));
        right_click(&mut ed, &mut graph, p(500.0, 500.0));

        click(&mut ed, &mut graph, p(50.0, 3.0));
        assert_eq!(graph.point_count(), 3);
        assert_eq!(graph.segment_count(), 2);
        let selected = graph.point(ed.selected().unwrap()).unwrap();
        assert_eq!(selected, p(50.0, 0.0));
    }

    #[test]
    fn straight_preview_follows_the_pointer() {
        let mut graph = Graph::new();
        let mut ed = editor();
        click(&mut ed, &mut graph, p(0.0, 0.0));
        move_to(&mut ed, &mut graph, p(30.0, 40.0));
        let seg = ed.intent_segment(&graph).unwrap().unwrap();
        assert!(!seg.curve);
        assert_eq!(seg.p2, p(30.0, 40.0));
        assert!((seg.length() - 50.0).abs() < 1e-9);
    }

    /// Two unconnected points with the second one selected.
    fn two_points(graph: &mut Graph, ed: &mut GraphEditor) {
        click(ed, graph, p(0.0, 0.0));
        right_click(ed, graph, p(500.0, 500.0));
        click(ed, graph, p(100.0, 0.0));
        assert_eq!(graph.segment_count(), 0);
    }

    #[test]
    fn curve_workflow_adds_a_chain() {
        let mut graph = Graph::new();
        let mut ed = editor();
        two_points(&mut graph, &mut ed);

        ed.handle(
            &mut graph,
            EditorInput::PointerDown {
                at: p(0.0, 0.0),
                button: PointerButton::Primary,
            },
        )
        .unwrap();
        assert!(matches!(ed.state(), EditorState::CurvePreview(_)));
        move_to(&mut ed, &mut graph, p(50.0, 50.0));
        let effects = ed
            .handle(
                &mut graph,
                EditorInput::PointerUp {
                    at: p(50.0, 50.0),
                    button: PointerButton::Primary,
                },
            )
            .unwrap();
        assert_eq!(
            effects,
            vec![EditorEffect::ShowConfirm {
                anchor: p(0.0, 0.0)
            }]
        );
        let preview = ed.preview(&graph).unwrap();
        assert!(preview.intent.unwrap().curve);
        assert_eq!(preview.control, Some(p(50.0, 50.0)));
        // Nothing is added before confirming.
        assert_eq!(graph.segment_count(), 0);

        let effects = ed.handle(&mut graph, EditorInput::Confirm).unwrap();
        assert!(effects.contains(&EditorEffect::HideConfirm));
        assert_eq!(graph.segment_count(), 10);
        assert_eq!(graph.point_count(), 11);
        assert_eq!(*ed.state(), EditorState::Idle);
        assert_eq!(graph.point(ed.selected().unwrap()).unwrap(), p(0.0, 0.0));
    }

    #[test]
    fn flat_curve_becomes_a_straight_road() {
        let mut graph = Graph::new();
        let mut ed = editor();
        two_points(&mut graph, &mut ed);
        click(&mut ed, &mut graph, p(0.0, 0.0));
        ed.handle(&mut graph, EditorInput::Confirm).unwrap();
        assert_eq!(graph.segment_count(), 1);
        assert_eq!(graph.point_count(), 2);
    }

    #[test]
    fn cancel_discards_the_curve() {
        let mut graph = Graph::new();
        let mut ed = editor();
        two_points(&mut graph, &mut ed);
        click(&mut ed, &mut graph, p(0.0, 0.0));
        assert!(matches!(ed.state(), EditorState::AwaitingConfirm(_)));
        let effects = ed.handle(&mut graph, EditorInput::Cancel).unwrap();
        assert!(effects.contains(&EditorEffect::HideConfirm));
        assert_eq!(*ed.state(), EditorState::Idle);
        assert_eq!(graph.segment_count(), 0);
        assert!(ed.handle(&mut graph, EditorInput::Confirm).unwrap().is_empty());
    }

    #[test]
    fn handle_can_be_grabbed_again_before_confirming() {
        let mut graph = Graph::new();
        let mut ed = editor();
        two_points(&mut graph, &mut ed);
        click(&mut ed, &mut graph, p(0.0, 0.0));
        let control = ed.state().curve_intent().unwrap().control;

        ed.handle(
            &mut graph,
            EditorInput::PointerDown {
                at: control,
                button: PointerButton::Primary,
            },
        )
        .unwrap();
        assert!(matches!(ed.state(), EditorState::CurvePreview(_)));
        move_to(&mut ed, &mut graph, p(50.0, -40.0));
        assert_eq!(ed.state().curve_intent().unwrap().control, p(50.0, -40.0));
    }

    #[test]
    fn confirmed_curve_splices_into_crossed_roads() {
        let mut graph = Graph::new();
        let c = graph.add_or_get_point(p(45.0, -100.0));
        let d = graph.add_or_get_point(p(45.0, 100.0));
        graph.try_add_segment(c, d).unwrap();

        let mut ed = editor();
        click(&mut ed, &mut graph, p(100.0, 0.0));
        right_click(&mut ed, &mut graph, p(500.0, 500.0));
        click(&mut ed, &mut graph, p(0.0, 0.0));
        ed.handle(
            &mut graph,
            EditorInput::PointerDown {
                at: p(100.0, 0.0),
                button: PointerButton::Primary,
            },
        )
        .unwrap();
        move_to(&mut ed, &mut graph, p(50.0, 50.0));
        ed.handle(
            &mut graph,
            EditorInput::PointerUp {
                at: p(50.0, 50.0),
                button: PointerButton::Primary,
            },
        )
        .unwrap();
        ed.handle(&mut graph, EditorInput::Confirm).unwrap();

        // The crossed road is split in two and the chain runs through the
        // split point.
        assert!(graph.find_segment(c, d).is_none());
        assert_eq!(graph.segment_count(), 2 + 11);
        assert_eq!(graph.point_count(), 2 + 2 + 9 + 1);
        let joint = graph
            .points()
            .find(|(id, q)| (q.x - 45.0).abs() < 1e-9 && graph.segments_with_point(*id).len() == 4)
            .map(|(_, q)| q);
        assert!(joint.is_some_and(|q| q.y > 20.0 && q.y < 30.0));
    }
}
