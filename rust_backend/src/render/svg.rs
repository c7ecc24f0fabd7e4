//! SVG document surface.
//!
//! Draw commands are appended as SVG elements. Gradients, drop shadows and
//! clip rectangles become `<defs>` entries referenced by id.

use std::fmt::Write as _;

use crate::render::color::Color;
use crate::render::surface::{
    estimate_text_width, validate_points, DrawSurface, Fill, Font, Point, Rect, RenderError,
    RenderResult, Shadow, Stroke, TextAlign, TextBaseline, TextStyle,
};

#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    background: Option<Color>,
    defs: String,
    body: String,
    next_id: usize,
    open_clips: usize,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Paint this color under everything on every frame.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// The complete document for everything drawn since the last clear.
    pub fn to_svg_string(&self) -> String {
        let mut doc = String::with_capacity(self.defs.len() + self.body.len() + 256);
        let _ = write!(
            doc,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = num(self.width),
            h = num(self.height)
        );
        if !self.defs.is_empty() {
            doc.push_str("<defs>\n");
            doc.push_str(&self.defs);
            doc.push_str("</defs>\n");
        }
        if let Some(background) = self.background {
            let _ = writeln!(
                doc,
                "<rect width=\"100%\" height=\"100%\" {}/>",
                paint("fill", background)
            );
        }
        doc.push_str(&self.body);
        for _ in 0..self.open_clips {
            doc.push_str("</g>\n");
        }
        doc.push_str("</svg>\n");
        doc
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn fill_attrs(&mut self, fill: &Fill) -> String {
        match fill {
            Fill::Solid(color) => paint("fill", *color),
            Fill::VerticalGradient { top, bottom } => {
                let id = self.next_id("grad");
                let _ = write!(
                    self.defs,
                    "<linearGradient id=\"{}\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\"><stop offset=\"0\" {}/><stop offset=\"1\" {}/></linearGradient>\n",
                    id,
                    stop(*top),
                    stop(*bottom)
                );
                format!("fill=\"url(#{})\"", id)
            }
        }
    }

    fn shadow_attr(&mut self, shadow: Option<&Shadow>) -> String {
        let Some(shadow) = shadow else {
            return String::new();
        };
        let id = self.next_id("shadow");
        let _ = write!(
            self.defs,
            "<filter id=\"{}\" x=\"-20%\" y=\"-20%\" width=\"140%\" height=\"140%\"><feDropShadow dx=\"{}\" dy=\"{}\" stdDeviation=\"{}\" flood-color=\"{}\" flood-opacity=\"{}\"/></filter>\n",
            id,
            num(shadow.offset_x),
            num(shadow.offset_y),
            num(shadow.blur / 2.0),
            shadow.color.to_hex(),
            num(shadow.color.a)
        );
        format!(" filter=\"url(#{})\"", id)
    }
}

impl DrawSurface for SvgSurface {
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
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn clear(&mut self) -> RenderResult<()> {
        self.defs.clear();
        self.body.clear();
        self.next_id = 0;
        self.open_clips = 0;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill, shadow: Option<&Shadow>) -> RenderResult<()> {
        rect.validate()?;
        let fill = self.fill_attrs(fill);
        let filter = self.shadow_attr(shadow);
        let _ = writeln!(
            self.body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {}{}/>",
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height),
            fill,
            filter
        );
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke) -> RenderResult<()> {
        rect.validate()?;
        let _ = writeln!(
            self.body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" {}/>",
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height),
            stroke_attrs(stroke)
        );
        Ok(())
    }

    fn fill_polygon(
        &mut self,
        points: &[Point],
        fill: &Fill,
        stroke: Option<&Stroke>,
    ) -> RenderResult<()> {
        validate_points(points)?;
        let fill = self.fill_attrs(fill);
        let coords: Vec<String> = points
            .iter()
            .map(|p| format!("{},{}", num(p.x), num(p.y)))
            .collect();
        let stroke = stroke.map(stroke_attrs).unwrap_or_default();
        let _ = writeln!(
            self.body,
            "<polygon points=\"{}\" {} {}/>",
            coords.join(" "),
            fill,
            stroke
        );
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) -> RenderResult<()> {
        let _ = writeln!(
            self.body,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {}/>",
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            stroke_attrs(stroke)
        );
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
        let stroke = stroke.map(stroke_attrs).unwrap_or_default();
        let _ = writeln!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {} {}/>",
            num(center.x),
            num(center.y),
            num(radius),
            paint("fill", fill),
            stroke
        );
        Ok(())
    }

    fn measure_text(&self, text: &str, font: &Font) -> RenderResult<f64> {
        Ok(estimate_text_width(text, font))
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) -> RenderResult<()> {
        let anchor = match style.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let baseline = match style.baseline {
            TextBaseline::Top => "hanging",
            TextBaseline::Middle => "central",
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Bottom => "text-after-edge",
        };
        let outline = style
            .outline
            .map(|o| {
                format!(
                    " paint-order=\"stroke\" stroke-linejoin=\"round\" {}",
                    stroke_attrs(&o)
                )
            })
            .unwrap_or_default();
        let filter = self.shadow_attr(style.shadow.as_ref());
        let _ = writeln!(
            self.body,
            "<text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\"{}{} text-anchor=\"{}\" dominant-baseline=\"{}\" {}{}{}>{}</text>",
            num(at.x),
            num(at.y),
            escape(&style.font.family),
            num(style.font.size),
            if style.font.bold { " font-weight=\"bold\"" } else { "" },
            if style.font.italic { " font-style=\"italic\"" } else { "" },
            anchor,
            baseline,
            paint("fill", style.fill),
            outline,
            filter,
            escape(text)
        );
        Ok(())
    }

    fn push_clip(&mut self, rect: Rect) -> RenderResult<()> {
        let id = self.next_id("clip");
        let _ = writeln!(
            self.defs,
            "<clipPath id=\"{}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath>",
            id,
            num(rect.x),
            num(rect.y),
            num(rect.width.max(0.0)),
            num(rect.height.max(0.0))
        );
        let _ = writeln!(self.body, "<g clip-path=\"url(#{})\">", id);
        self.open_clips += 1;
        Ok(())
    }

    fn pop_clip(&mut self) -> RenderResult<()> {
        if self.open_clips == 0 {
            return Err(RenderError::Surface("clip stack underflow".to_string()));
        }
        self.open_clips -= 1;
        self.body.push_str("</g>\n");
        Ok(())
    }
}

fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

fn paint(attr: &str, color: Color) -> String {
    if color.a >= 1.0 {
        format!("{}=\"{}\"", attr, color.to_hex())
    } else {
        format!(
            "{}=\"{}\" {}-opacity=\"{}\"",
            attr,
            color.to_hex(),
            attr,
            num(color.a)
        )
    }
}

fn stop(color: Color) -> String {
    format!(
        "stop-color=\"{}\" stop-opacity=\"{}\"",
        color.to_hex(),
        num(color.a)
    )
}

fn stroke_attrs(stroke: &Stroke) -> String {
    format!(
        "{} stroke-width=\"{}\"",
        paint("stroke", stroke.color),
        num(stroke.width)
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
