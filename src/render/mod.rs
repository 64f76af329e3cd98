mod dash;
mod draw;
mod fill;
mod style;

pub use dash::dash_polyline;
pub use draw::{PreviewStyle, WorldStyle};
pub use fill::TriangulateRing;
pub use style::DrawStyle;

use crate::error::Result;
use crate::geometry::Point;

/// A flat triangle mesh on the ground plane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Point>,
    /// Each triple indexes `vertices`.
    pub indices: Vec<[u32; 3]>,
}

/// The rendering engine seam, implemented by the host on top of its engine.
pub trait Scene {
    /// An open polyline.
    fn line_strip(&mut self, points: &[Point], style: &DrawStyle);
    /// A filled mesh.
    fn triangles(&mut self, mesh: &TriangleMesh, style: &DrawStyle);
    /// A point marker of diameter `style.width()`.
    fn marker(&mut self, at: Point, style: &DrawStyle);
}

/// Something that can hand itself to a [`Scene`].
pub trait Renderable {
    type Style;

    /// # Errors
    ///
    /// Returns `RenderError::Triangulation` if a fill cannot be triangulated.
    fn draw(&self, scene: &mut dyn Scene, style: &Self::Style) -> Result<()>;
}

/// One recorded [`Scene`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    LineStrip { points: Vec<Point>, style: DrawStyle },
    Triangles { mesh: TriangleMesh, style: DrawStyle },
    Marker { at: Point, style: DrawStyle },
}

/// A [`Scene`] that keeps every call, for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    pub commands: Vec<DrawCommand>,
}

impl RecordingScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn line_strips(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::LineStrip { .. }))
            .count()
    }

    #[must_use]
    pub fn meshes(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Triangles { .. }))
            .count()
    }

    #[must_use]
    pub fn markers(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Marker { .. }))
            .count()
    }
}

impl Scene for RecordingScene {
    fn line_strip(&mut self, points: &[Point], style: &DrawStyle) {
        self.commands.push(DrawCommand::LineStrip {
            points: points.to_vec(),
            style: *style,
        });
    }

    fn triangles(&mut self, mesh: &TriangleMesh, style: &DrawStyle) {
        self.commands.push(DrawCommand::Triangles {
            mesh: mesh.clone(),
            style: *style,
        });
    }

    fn marker(&mut self, at: Point, style: &DrawStyle) {
        self.commands.push(DrawCommand::Marker { at, style: *style });
    }
}
