//! Browser canvas surface backed by `CanvasRenderingContext2d`.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::render::color::Color;
use crate::render::surface::{
    validate_points, DrawSurface, Fill, Font, Point, Rect, RenderError, RenderResult, Shadow,
    Stroke, TextAlign, TextBaseline, TextStyle,
};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    clip_depth: usize,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            canvas,
            ctx,
            clip_depth: 0,
        }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn set_style(&self, property: &str, value: &JsValue) -> RenderResult<()> {
        js_sys::Reflect::set(self.ctx.as_ref(), &JsValue::from_str(property), value)
            .map(|_| ())
            .map_err(js_error)
    }

    fn set_fill(&self, fill: &Fill, top: f64, bottom: f64) -> RenderResult<()> {
        match fill {
            Fill::Solid(color) => self.set_style("fillStyle", &JsValue::from_str(&color.to_css())),
            Fill::VerticalGradient {
                top: top_color,
                bottom: bottom_color,
            } => {
                let gradient = self.ctx.create_linear_gradient(0.0, top, 0.0, bottom);
                gradient
                    .add_color_stop(0.0, &top_color.to_css())
                    .map_err(js_error)?;
                gradient
                    .add_color_stop(1.0, &bottom_color.to_css())
                    .map_err(js_error)?;
                self.set_style("fillStyle", gradient.as_ref())
            }
        }
    }

    fn set_stroke(&self, stroke: &Stroke) -> RenderResult<()> {
        self.set_style("strokeStyle", &JsValue::from_str(&stroke.color.to_css()))?;
        self.ctx.set_line_width(stroke.width);
        Ok(())
    }

    fn set_shadow(&self, shadow: Option<&Shadow>) {
        match shadow {
            Some(shadow) => {
                self.ctx.set_shadow_color(&shadow.color.to_css());
                self.ctx.set_shadow_blur(shadow.blur);
                self.ctx.set_shadow_offset_x(shadow.offset_x);
                self.ctx.set_shadow_offset_y(shadow.offset_y);
            }
            None => {
                self.ctx.set_shadow_color("transparent");
                self.ctx.set_shadow_blur(0.0);
                self.ctx.set_shadow_offset_x(0.0);
                self.ctx.set_shadow_offset_y(0.0);
            }
        }
    }
}

fn js_error(value: JsValue) -> RenderError {
    RenderError::Surface(
        value
            .as_string()
            .unwrap_or_else(|| "canvas call failed".to_string()),
    )
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn resize(&mut self, width: f64, height: f64) -> RenderResult<()> {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(RenderError::Surface(format!(
                "invalid size {}x{}",
                width, height
            )));
        }
        self.canvas.set_width(width.round() as u32);
        self.canvas.set_height(height.round() as u32);
        Ok(())
    }

    fn clear(&mut self) -> RenderResult<()> {
        while self.clip_depth > 0 {
            self.ctx.restore();
            self.clip_depth -= 1;
        }
        let (width, height) = self.size();
        self.ctx.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill, shadow: Option<&Shadow>) -> RenderResult<()> {
        rect.validate()?;
        self.set_fill(fill, rect.y, rect.bottom())?;
        self.set_shadow(shadow);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
        self.set_shadow(None);
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke) -> RenderResult<()> {
        rect.validate()?;
        self.set_stroke(stroke)?;
        self.ctx
            .stroke_rect(rect.x, rect.y, rect.width, rect.height);
        Ok(())
    }

    fn fill_polygon(
        &mut self,
        points: &[Point],
        fill: &Fill,
        stroke: Option<&Stroke>,
    ) -> RenderResult<()> {
        validate_points(points)?;
        let top = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let bottom = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        self.set_fill(fill, top, bottom)?;

        self.ctx.begin_path();
        self.ctx.move_to(points[0].x, points[0].y);
        for point in &points[1..] {
            self.ctx.line_to(point.x, point.y);
        }
        self.ctx.close_path();
        self.ctx.fill();

        if let Some(stroke) = stroke {
            self.set_stroke(stroke)?;
            self.ctx.stroke();
        }
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) -> RenderResult<()> {
        self.set_stroke(stroke)?;
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
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
        self.set_style("fillStyle", &JsValue::from_str(&fill.to_css()))?;
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius, 0.0, 2.0 * PI)
            .map_err(js_error)?;
        self.ctx.fill();
        if let Some(stroke) = stroke {
            self.set_stroke(stroke)?;
            self.ctx.stroke();
        }
        Ok(())
    }

    fn measure_text(&self, text: &str, font: &Font) -> RenderResult<f64> {
        self.ctx.set_font(&font.to_css());
        let metrics = self
            .ctx
            .measure_text(text)
            .map_err(|_| RenderError::UnmeasurableText(text.to_string()))?;
        let width = metrics.width();
        if width.is_finite() {
            Ok(width)
        } else {
            Err(RenderError::UnmeasurableText(text.to_string()))
        }
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) -> RenderResult<()> {
        self.ctx.set_font(&style.font.to_css());
        self.ctx.set_text_align(match style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        self.ctx.set_text_baseline(match style.baseline {
            TextBaseline::Top => "top",
            TextBaseline::Middle => "middle",
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Bottom => "bottom",
        });
        self.set_shadow(style.shadow.as_ref());

        if let Some(outline) = &style.outline {
            self.set_stroke(outline)?;
            self.ctx.set_line_join("round");
            self.ctx.stroke_text(text, at.x, at.y).map_err(js_error)?;
        }
        self.set_style("fillStyle", &JsValue::from_str(&style.fill.to_css()))?;
        let drawn = self.ctx.fill_text(text, at.x, at.y).map_err(js_error);
        self.set_shadow(None);
        drawn
    }

    fn push_clip(&mut self, rect: Rect) -> RenderResult<()> {
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(rect.x, rect.y, rect.width, rect.height);
        self.ctx.clip();
        self.clip_depth += 1;
        Ok(())
    }

    fn pop_clip(&mut self) -> RenderResult<()> {
        if self.clip_depth == 0 {
            return Err(RenderError::Surface("clip stack underflow".to_string()));
        }
        self.ctx.restore();
        self.clip_depth -= 1;
        Ok(())
    }
}
