use crate::editor::EditorPreview;
use crate::error::Result;
use crate::geometry::{Envelope, Point, Polygon, Segment};
use crate::graph::Graph;
use crate::world::World;

use super::{dash_polyline, DrawStyle, Renderable, Scene, TriangulateRing};

/// Styles for each layer of a [`World`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldStyle {
    pub roads: DrawStyle,
    pub road_borders: DrawStyle,
    pub lane_guides: DrawStyle,
    pub building_zones: DrawStyle,
    pub trees: DrawStyle,
}

impl Default for WorldStyle {
    fn default() -> Self {
        Self {
            roads: DrawStyle::preset(0x00bb_bbbb, 1.0, None, true),
            road_borders: DrawStyle::preset(0x00ff_ffff, 4.0, None, false),
            lane_guides: DrawStyle::preset(0x00ff_ffff, 4.0, Some((15.0, 20.0)), false),
            building_zones: DrawStyle::preset(0x00cc_9966, 1.0, None, true),
            trees: DrawStyle::preset(0x0033_8833, 160.0, None, false),
        }
    }
}

/// Styles for the editing overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewStyle {
    pub intent: DrawStyle,
    pub selected: DrawStyle,
    pub hovered: DrawStyle,
    pub control: DrawStyle,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            intent: DrawStyle::preset(0x0000_0000, 2.0, Some((3.0, 3.0)), false),
            selected: DrawStyle::preset(0x00ff_ff00, 18.0, None, false),
            hovered: DrawStyle::preset(0x0000_ffff, 18.0, None, false),
            control: DrawStyle::preset(0x00ff_0000, 12.0, None, false),
        }
    }
}

fn stroke(scene: &mut dyn Scene, points: &[Point], style: &DrawStyle) {
    match style.dash() {
        Some((dash, gap)) => {
            for piece in dash_polyline(points, dash, gap) {
                scene.line_strip(&piece, style);
            }
        }
        None => scene.line_strip(points, style),
    }
}

impl Renderable for Point {
    type Style = DrawStyle;

    fn draw(&self, scene: &mut dyn Scene, style: &DrawStyle) -> Result<()> {
        scene.marker(*self, style);
        Ok(())
    }
}

impl Renderable for Segment {
    type Style = DrawStyle;

    fn draw(&self, scene: &mut dyn Scene, style: &DrawStyle) -> Result<()> {
        stroke(scene, &self.curve_points(), style);
        Ok(())
    }
}

impl Renderable for Polygon {
    type Style = DrawStyle;

    fn draw(&self, scene: &mut dyn Scene, style: &DrawStyle) -> Result<()> {
        if style.fill() {
            let mesh = TriangulateRing::new(self.points()).execute()?;
            scene.triangles(&mesh, style);
        }
        if style.outline() {
            let mut ring = self.points().to_vec();
            ring.extend(self.points().first().copied());
            stroke(scene, &ring, style);
        }
        Ok(())
    }
}

impl Renderable for Envelope {
    type Style = DrawStyle;

    fn draw(&self, scene: &mut dyn Scene, style: &DrawStyle) -> Result<()> {
        for poly in self.polys() {
            poly.draw(scene, style)?;
        }
        Ok(())
    }
}

impl Renderable for Graph {
    type Style = DrawStyle;

    /// Segments as strokes, points as markers twice the stroke width.
    fn draw(&self, scene: &mut dyn Scene, style: &DrawStyle) -> Result<()> {
        for (_, seg) in self.segments() {
            seg.draw(scene, style)?;
        }
        let marker = DrawStyle::preset(style.color(), style.width() * 2.0, None, false);
        for (_, point) in self.points() {
            point.draw(scene, &marker)?;
        }
        Ok(())
    }
}

impl Renderable for World {
    type Style = WorldStyle;

    fn draw(&self, scene: &mut dyn Scene, style: &WorldStyle) -> Result<()> {
        for env in self.envelopes() {
            env.draw(scene, &style.roads)?;
        }
        for seg in self.road_borders() {
            seg.draw(scene, &style.road_borders)?;
        }
        for seg in self.lane_guides() {
            seg.draw(scene, &style.lane_guides)?;
        }
        for zone in self.building_zones() {
            zone.draw(scene, &style.building_zones)?;
        }
        for tree in self.trees() {
            tree.draw(scene, &style.trees)?;
        }
        Ok(())
    }
}

impl Renderable for EditorPreview {
    type Style = PreviewStyle;

    fn draw(&self, scene: &mut dyn Scene, style: &PreviewStyle) -> Result<()> {
        if let Some(intent) = &self.intent {
            intent.draw(scene, &style.intent)?;
        }
        if let Some(control) = self.control {
            control.draw(scene, &style.control)?;
        }
        if let Some(selected) = self.selected {
            selected.draw(scene, &style.selected)?;
        }
        if let Some(hovered) = self.hovered {
            hovered.draw(scene, &style.hovered)?;
        }
        Ok(())
    }
}
