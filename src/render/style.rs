use crate::error::{RenderError, Result};

/// How a primitive is handed to the [`Scene`](super::Scene).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    color: u32,
    width: f64,
    opacity: f64,
    dash: Option<(f64, f64)>,
    fill: bool,
    outline: bool,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            color: 0x00ff_ffff,
            width: 1.0,
            opacity: 1.0,
            dash: None,
            fill: false,
            outline: true,
        }
    }
}

impl DrawStyle {
    /// Unchecked constructor for built-in presets.
    pub(super) const fn preset(color: u32, width: f64, dash: Option<(f64, f64)>, fill: bool) -> Self {
        Self {
            color,
            width,
            opacity: 1.0,
            dash,
            fill,
            outline: !fill,
        }
    }

    /// Creates an outline-only style.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` is not positive or `color` is not a
    /// `0xRRGGBB` value.
    pub fn new(color: u32, width: f64) -> Result<Self> {
        if color > 0x00ff_ffff {
            return Err(RenderError::InvalidStyle(format!("color {color:#x} is not 0xRRGGBB")).into());
        }
        if width.is_nan() || width <= 0.0 {
            return Err(RenderError::InvalidStyle("stroke width must be positive".to_owned()).into());
        }
        Ok(Self {
            color,
            width,
            ..Self::default()
        })
    }

    /// # Errors
    ///
    /// Returns an error if `opacity` is outside `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(RenderError::InvalidStyle(format!("opacity {opacity} outside [0, 1]")).into());
        }
        Ok(Self { opacity, ..self })
    }

    /// Dashed strokes: `dash` drawn, `gap` skipped, repeating.
    ///
    /// # Errors
    ///
    /// Returns an error if either length is not positive.
    pub fn with_dash(self, dash: f64, gap: f64) -> Result<Self> {
        if dash.is_nan() || gap.is_nan() || dash <= 0.0 || gap <= 0.0 {
            return Err(
                RenderError::InvalidStyle("dash and gap lengths must be positive".to_owned()).into(),
            );
        }
        Ok(Self {
            dash: Some((dash, gap)),
            ..self
        })
    }

    /// Fills closed shapes; `outline` keeps or drops their edge strokes.
    #[must_use]
    pub fn filled(self, outline: bool) -> Self {
        Self {
            fill: true,
            outline,
            ..self
        }
    }

    #[must_use]
    pub fn color(&self) -> u32 {
        self.color
    }

    /// Stroke width, or marker diameter.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    #[must_use]
    pub fn dash(&self) -> Option<(f64, f64)> {
        self.dash
    }

    #[must_use]
    pub fn fill(&self) -> bool {
        self.fill
    }

    #[must_use]
    pub fn outline(&self) -> bool {
        self.outline
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_with_valid_width() {
        let style = DrawStyle::new(0x33_66_99, 2.0).unwrap();
        assert!((style.width() - 2.0).abs() < f64::EPSILON);
        assert_eq!(style.color(), 0x33_66_99);
        assert!(style.outline());
        assert!(!style.fill());
    }

    #[test]
    fn new_with_bad_width_or_color_fails() {
        assert!(DrawStyle::new(0xffffff, 0.0).is_err());
        assert!(DrawStyle::new(0xffffff, -1.0).is_err());
        assert!(DrawStyle::new(0x0100_0000, 1.0).is_err());
    }

    #[test]
    fn builders_validate() {
        let style = DrawStyle::default();
        assert!(style.with_opacity(1.5).is_err());
        assert!(style.with_dash(0.0, 1.0).is_err());
        let dashed = style.with_opacity(0.5).unwrap().with_dash(4.0, 2.0).unwrap();
        assert_eq!(dashed.dash(), Some((4.0, 2.0)));
        assert!((dashed.opacity() - 0.5).abs() < f64::EPSILON);
        let filled = dashed.filled(false);
        assert!(filled.fill() && !filled.outline());
    }
}
