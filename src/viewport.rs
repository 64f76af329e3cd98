use nalgebra::{Isometry3, Perspective3};

use crate::editor::HOVER_DIVISOR;
use crate::error::{GeometryError, Result};
use crate::geometry::Point;
use crate::math::intersect_3d::{ray_plane_intersect, Ray3, RayPlaneRelation};
use crate::math::{Matrix4, Point2, Point3, Vector3};

/// Maps a screen position onto the ground plane.
pub trait GroundProjector {
    /// Returns the ground point under `screen` (pixels, origin top-left),
    /// or `None` if the view ray does not reach the ground.
    fn screen_to_ground(&self, screen: &Point2) -> Option<Point>;
}

/// Camera limits and step sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Relative zoom change per wheel notch.
    pub zoom_step: f64,
    /// Keyboard pan distance as a fraction of the zoom distance.
    pub pan_step: f64,
    /// Vertical field of view, in radians.
    pub fov_y: f64,
    /// Camera elevation above the ground plane, in radians.
    pub tilt: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 2000.0,
            min_zoom: 100.0,
            max_zoom: 20_000.0,
            zoom_step: 0.1,
            pan_step: 0.05,
            fov_y: 45_f64.to_radians(),
            tilt: 60_f64.to_radians(),
            near: 1.0,
            far: 1.0e6,
        }
    }
}

impl ViewportConfig {
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidParameter` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("min_zoom", self.min_zoom, self.min_zoom > 0.0),
            ("max_zoom", self.max_zoom, self.max_zoom >= self.min_zoom),
            (
                "initial_zoom",
                self.initial_zoom,
                (self.min_zoom..=self.max_zoom).contains(&self.initial_zoom),
            ),
            ("zoom_step", self.zoom_step, self.zoom_step > 0.0 && self.zoom_step < 1.0),
            ("pan_step", self.pan_step, self.pan_step > 0.0),
            (
                "fov_y",
                self.fov_y,
                self.fov_y > 0.0 && self.fov_y < std::f64::consts::PI,
            ),
            (
                "tilt",
                self.tilt,
                self.tilt > 0.0 && self.tilt <= std::f64::consts::FRAC_PI_2,
            ),
            ("near", self.near, self.near > 0.0),
            ("far", self.far, self.far > self.near),
        ];
        for (parameter, value, ok) in checks {
            if !ok {
                return Err(GeometryError::InvalidParameter { parameter, value }.into());
            }
        }
        Ok(())
    }
}

/// Keyboard pan directions, relative to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

/// An orbit camera looking down at a ground target.
///
/// Ground coordinates `(x, y)` live on the 3D plane `Y = 0` as `(x, 0, y)`.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    target: Point,
    zoom: f64,
    width: f64,
    height: f64,
    pan_anchor: Option<Point>,
}

impl Viewport {
    /// Creates a viewport of `width × height` pixels centred on the origin.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidParameter` for an invalid config or a
    /// non-positive screen size.
    pub fn new(config: ViewportConfig, width: f64, height: f64) -> Result<Self> {
        config.validate()?;
        let mut viewport = Self {
            config,
            target: Point::default(),
            zoom: config.initial_zoom,
            width: 1.0,
            height: 1.0,
            pan_anchor: None,
        };
        viewport.resize(width, height)?;
        Ok(viewport)
    }

    #[must_use]
    pub fn target(&self) -> Point {
        self.target
    }

    /// Distance from the camera to its ground target.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Pick radius for the editor at the current zoom.
    #[must_use]
    pub fn hover_radius(&self) -> f64 {
        self.zoom / HOVER_DIVISOR
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// # Errors
    ///
    /// Returns `GeometryError::InvalidParameter` for a non-positive size.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        for (parameter, value) in [("width", width), ("height", height)] {
            if value.is_nan() || value <= 0.0 {
                return Err(GeometryError::InvalidParameter { parameter, value }.into());
            }
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Zooms in for a negative `delta` and out for a positive one, one step
    /// per call, clamped to the configured range.
    pub fn zoom_by(&mut self, delta: f64) {
        if delta.abs() < f64::EPSILON {
            return;
        }
        let factor = 1.0 + self.config.zoom_step * delta.signum();
        self.zoom = (self.zoom * factor).clamp(self.config.min_zoom, self.config.max_zoom);
    }

    /// Moves the target one keyboard step, scaled by the zoom distance.
    pub fn pan_by_key(&mut self, direction: PanDirection) {
        let step = self.config.pan_step * self.zoom;
        let (dx, dy) = match direction {
            PanDirection::Up => (0.0, -step),
            PanDirection::Down => (0.0, step),
            PanDirection::Left => (-step, 0.0),
            PanDirection::Right => (step, 0.0),
        };
        self.target = Point::new(self.target.x + dx, self.target.y + dy);
    }

    /// Starts a drag pan; the ground point under `screen` stays under the
    /// cursor until [`Self::end_pan`].
    pub fn start_pan(&mut self, screen: &Point2) {
        self.pan_anchor = self.screen_to_ground(screen);
    }

    /// Moves the target so the pan anchor is under `screen` again.
    pub fn update_pan(&mut self, screen: &Point2) {
        let Some(anchor) = self.pan_anchor else {
            return;
        };
        if let Some(now) = self.screen_to_ground(screen) {
            self.target = Point::new(
                self.target.x + anchor.x - now.x,
                self.target.y + anchor.y - now.y,
            );
        }
    }

    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    /// Camera position in world space.
    #[must_use]
    pub fn eye(&self) -> Point3 {
        let (sin, cos) = self.config.tilt.sin_cos();
        self.target3() + Vector3::new(0.0, sin, cos) * self.zoom
    }

    /// Combined projection × view matrix.
    #[must_use]
    pub fn view_projection(&self) -> Matrix4 {
        let up = if self.config.tilt >= std::f64::consts::FRAC_PI_2 {
            -Vector3::z()
        } else {
            Vector3::y()
        };
        let view = Isometry3::look_at_rh(&self.eye(), &self.target3(), &up);
        let proj = Perspective3::new(
            self.width / self.height,
            self.config.fov_y,
            self.config.near,
            self.config.far,
        );
        proj.to_homogeneous() * view.to_homogeneous()
    }

    fn target3(&self) -> Point3 {
        Point3::new(self.target.x, 0.0, self.target.y)
    }

    fn view_ray(&self, screen: &Point2) -> Option<Ray3> {
        let inverse = self.view_projection().try_inverse()?;
        let ndc_x = 2.0 * screen.x / self.width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / self.height;
        let near = inverse.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc_x, ndc_y, 1.0));
        Some(Ray3 {
            origin: near,
            direction: far - near,
        })
    }
}

impl GroundProjector for Viewport {
    fn screen_to_ground(&self, screen: &Point2) -> Option<Point> {
        let ray = self.view_ray(screen)?;
        match ray_plane_intersect(&ray, &Point3::origin(), &Vector3::y()) {
            RayPlaneRelation::Point { point, .. } => Some(Point::new(point.x, point.z)),
            RayPlaneRelation::Parallel | RayPlaneRelation::Behind => None,
        }
    }
}
