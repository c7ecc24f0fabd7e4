//! In-memory surface that records draw commands instead of rasterizing them.
//!
//! Used by tests and by headless callers that want to inspect a frame.
//! Failures can be injected to exercise the engine's per-element recovery.

use crate::render::color::Color;
use crate::render::surface::{
    estimate_text_width, validate_points, DrawSurface, Fill, Font, Point, Rect, RenderError,
    RenderResult, Shadow, Stroke, TextStyle,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Resize {
        width: f64,
        height: f64,
    },
    FillRect {
        rect: Rect,
        fill: Fill,
        shadow: Option<Shadow>,
    },
    StrokeRect {
        rect: Rect,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Point>,
        fill: Fill,
        stroke: Option<Stroke>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
    },
    PushClip(Rect),
    PopClip,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
    clip_depth: usize,
    /// Text containing this fragment cannot be measured.
    unmeasurable: Option<String>,
    /// Resizing taller than this fails, like a canvas past its size cap.
    max_height: Option<f64>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Make every `measure_text` call fail for text containing `fragment`.
    pub fn fail_measuring(mut self, fragment: impl Into<String>) -> Self {
        self.unmeasurable = Some(fragment.into());
        self
    }

    /// Make `resize` fail for any height above `max_height`.
    pub fn limit_height(mut self, max_height: f64) -> Self {
        self.max_height = Some(max_height);
        self
    }

    /// Commands recorded since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    /// Every string drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count<F: Fn(&DrawCommand) -> bool>(&self, predicate: F) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) -> RenderResult<()> {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(RenderError::Surface(format!(
                "invalid size {}x{}",
                width, height
            )));
        }
        if let Some(max) = self.max_height.filter(|max| height > *max) {
            return Err(RenderError::Surface(format!(
                "height {} exceeds the surface limit {}",
                height, max
            )));
        }
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize { width, height });
        Ok(())
    }

    fn clear(&mut self) -> RenderResult<()> {
        self.commands.clear();
        self.clip_depth = 0;
        self.commands.push(DrawCommand::Clear);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill, shadow: Option<&Shadow>) -> RenderResult<()> {
        rect.validate()?;
        self.commands.push(DrawCommand::FillRect {
            rect,
            fill: *fill,
            shadow: shadow.copied(),
        });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke) -> RenderResult<()> {
        rect.validate()?;
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            stroke: *stroke,
        });
        Ok(())
    }

    fn fill_polygon(
        &mut self,
        points: &[Point],
        fill: &Fill,
        stroke: Option<&Stroke>,
    ) -> RenderResult<()> {
        validate_points(points)?;
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            fill: *fill,
            stroke: stroke.copied(),
        });
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) -> RenderResult<()> {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            stroke: *stroke,
        });
        Ok(())
    }

    fn circle(
        &mut self,
        center: Point,
        radius: f64,
        fill: Color,
        stroke: Option<&Stroke>,
    ) -> RenderResult<()> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(RenderError::DegenerateGeometry(format!(
                "circle radius {}",
                radius
            )));
        }
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
            stroke: stroke.copied(),
        });
        Ok(())
    }

    fn measure_text(&self, text: &str, font: &Font) -> RenderResult<f64> {
        match &self.unmeasurable {
            Some(fragment) if text.contains(fragment.as_str()) => {
                Err(RenderError::UnmeasurableText(text.to_string()))
            }
            _ => Ok(estimate_text_width(text, font)),
        }
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) -> RenderResult<()> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            style: style.clone(),
        });
        Ok(())
    }

    fn push_clip(&mut self, rect: Rect) -> RenderResult<()> {
        self.clip_depth += 1;
        self.commands.push(DrawCommand::PushClip(rect));
        Ok(())
    }

    fn pop_clip(&mut self) -> RenderResult<()> {
        if self.clip_depth == 0 {
            return Err(RenderError::Surface("clip stack underflow".to_string()));
        }
        self.clip_depth -= 1;
        self.commands.push(DrawCommand::PopClip);
        Ok(())
    }
}
