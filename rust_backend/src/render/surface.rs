//! Drawing primitives and the surface abstraction the render engine targets.
//!
//! A [`DrawSurface`] is an immediate-mode 2D target: SVG documents, a browser
//! canvas, or an in-memory recorder for tests. Every primitive returns a
//! [`RenderResult`] so a single bad element can be skipped without ending
//! the frame.

use serde::{Deserialize, Serialize};

use crate::render::color::Color;

/// Failure of a single drawing operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("cannot measure text '{0}'")]
    UnmeasurableText(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("surface error: {0}")]
    Surface(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict containment: points on the edges are outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x && x < self.right() && y > self.y && y < self.bottom()
    }

    /// Rejects non-finite coordinates and non-positive sizes.
    pub fn validate(&self) -> RenderResult<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width <= 0.0 || self.height <= 0.0 {
            return Err(RenderError::DegenerateGeometry(format!(
                "rect {:.1},{:.1} {:.1}x{:.1}",
                self.x, self.y, self.width, self.height
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Fill {
    Solid(Color),
    /// Top-to-bottom linear gradient across the filled shape.
    VerticalGradient { top: Color, bottom: Color },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// CSS shorthand, e.g. `italic bold 14px Cinzel`.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        if self.italic {
            css.push_str("italic ");
        }
        if self.bold {
            css.push_str("bold ");
        }
        css.push_str(&format!("{}px {}", self.size, self.family));
        css
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans-serif", 10.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextBaseline {
    Top,
    Middle,
    Alphabetic,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: Font,
    pub fill: Color,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    /// Outline drawn under the fill, with round joins.
    pub outline: Option<Stroke>,
    pub shadow: Option<Shadow>,
}

impl TextStyle {
    pub fn new(font: Font, fill: Color) -> Self {
        Self {
            font,
            fill,
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
            outline: None,
            shadow: None,
        }
    }

    pub fn aligned(mut self, align: TextAlign, baseline: TextBaseline) -> Self {
        self.align = align;
        self.baseline = baseline;
        self
    }

    pub fn with_outline(mut self, outline: Stroke) -> Self {
        self.outline = Some(outline);
        self
    }

    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }
}

/// An immediate-mode drawing target.
///
/// Coordinates are CSS pixels with the origin at the top-left corner.
/// Clips nest: each `push_clip` must be matched by a `pop_clip`.
pub trait DrawSurface {
    /// Current width and height.
    fn size(&self) -> (f64, f64);

    fn resize(&mut self, width: f64, height: f64) -> RenderResult<()>;

    /// Erase everything drawn so far.
    fn clear(&mut self) -> RenderResult<()>;

    fn fill_rect(&mut self, rect: Rect, fill: &Fill, shadow: Option<&Shadow>) -> RenderResult<()>;

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke) -> RenderResult<()>;

    fn fill_polygon(
        &mut self,
        points: &[Point],
        fill: &Fill,
        stroke: Option<&Stroke>,
    ) -> RenderResult<()>;

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) -> RenderResult<()>;

    fn circle(
        &mut self,
        center: Point,
        radius: f64,
        fill: Color,
        stroke: Option<&Stroke>,
    ) -> RenderResult<()>;

    /// Width of `text` in pixels when drawn with `font`.
    fn measure_text(&self, text: &str, font: &Font) -> RenderResult<f64>;

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) -> RenderResult<()>;

    fn push_clip(&mut self, rect: Rect) -> RenderResult<()>;

    fn pop_clip(&mut self) -> RenderResult<()>;
}

/// Width estimate for surfaces without a font rasterizer.
///
/// Uses an average glyph advance of 0.55em (0.6em for bold).
pub fn estimate_text_width(text: &str, font: &Font) -> f64 {
    let advance = if font.bold { 0.6 } else { 0.55 };
    text.chars().count() as f64 * font.size * advance
}

pub(crate) fn validate_points(points: &[Point]) -> RenderResult<()> {
    if points.len() < 3 || points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(RenderError::DegenerateGeometry(format!(
            "polygon with {} points",
            points.len()
        )));
    }
    Ok(())
}
