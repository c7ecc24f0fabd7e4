//! Frame rendering.
//!
//! [`render`] is a pure function of its inputs: the same surface size,
//! scale, viewport and layout always produce the same draw calls. It never
//! fails as a whole. A primitive that errors is logged, counted in
//! [`FrameStats::skipped`], and the rest of the frame is drawn.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::domain::{ContinentGroup, LayoutResult, TimelineEntity, ViewportState};
use crate::parsing::chronology::format_year_value;
use crate::render::color::{Color, EventPalette};
use crate::render::scale::{nice_ticks, visible_extent, PlotArea, Snapping, TimeScale};
use crate::render::surface::{
    DrawSurface, Fill, Font, Point, Rect, RenderResult, Shadow, Stroke, TextAlign, TextBaseline,
    TextStyle,
};

/// Bar drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStyle {
    /// Gradient rectangles snapped to whole pixels.
    Strata,
    /// Flat outlined bands.
    Rivers,
}

/// A named historical era drawn as a background strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBand {
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub color: Color,
}

impl PeriodBand {
    pub fn new(name: &str, start: f64, end: f64, color: Color) -> Self {
        Self {
            name: name.to_string(),
            start,
            end,
            color,
        }
    }
}

pub fn default_periods() -> Vec<PeriodBand> {
    vec![
        PeriodBand::new("Neolítico", -10000.0, -4500.0, Color::rgba(188, 212, 188, 0.15)),
        PeriodBand::new("Calcolítico", -4500.0, -3300.0, Color::rgba(218, 188, 150, 0.15)),
        PeriodBand::new("Edad del Bronce", -3300.0, -1200.0, Color::rgba(205, 150, 80, 0.15)),
        PeriodBand::new("Edad del Hierro", -1200.0, -500.0, Color::rgba(180, 180, 190, 0.15)),
        PeriodBand::new("Antigüedad Clásica", -500.0, 500.0, Color::rgba(173, 216, 230, 0.18)),
        PeriodBand::new("Periodo Tardío", 500.0, 750.0, Color::rgba(210, 180, 222, 0.15)),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFonts {
    pub continent: Font,
    pub region: Font,
    pub label: Font,
    pub axis: Font,
    pub message: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderColors {
    pub separator: Color,
    pub region_label: Color,
    pub period_label: Color,
    pub period_line: Color,
    pub axis_text: Color,
    pub grid: Color,
    pub label_fill: Color,
    pub label_outline: Stroke,
    pub message: Color,
}

/// Hover emphasis drawn over the active bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    pub fill: Option<Color>,
    pub shadow: Option<Shadow>,
    pub stroke: Stroke,
    /// Bars narrower than this get no highlight.
    pub min_width: f64,
    pub marker_stroke: Stroke,
}

/// Everything the engine needs besides the layout and viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub style: TimelineStyle,
    pub margin_left: f64,
    pub margin_right: f64,
    pub plot_top: f64,
    pub axis_height: f64,
    pub continent_label_x: f64,
    pub region_label_x: f64,
    pub show_period_bands: bool,
    pub show_separators: bool,
    pub show_region_labels: bool,
    pub show_axis: bool,
    pub show_event_markers: bool,
    pub period_label_min_width: f64,
    pub marker_radius: f64,
    pub min_label_bar_height: f64,
    pub label_padding: f64,
    /// Minimum tick spacing in pixels.
    pub tick_spacing: f64,
    pub fonts: RenderFonts,
    pub colors: RenderColors,
    pub highlight: HighlightStyle,
    pub periods: Vec<PeriodBand>,
    pub event_colors: EventPalette,
}

const BODY_FONT: &str = "Source Sans Pro";
const TITLE_FONT: &str = "Cinzel";

impl RenderConfig {
    pub fn strata() -> Self {
        let margin_left = 170.0;
        Self {
            style: TimelineStyle::Strata,
            margin_left,
            margin_right: 20.0,
            plot_top: 10.0,
            axis_height: 30.0,
            continent_label_x: margin_left / 8.0,
            region_label_x: margin_left / 4.0,
            show_period_bands: true,
            show_separators: true,
            show_region_labels: true,
            show_axis: true,
            show_event_markers: true,
            period_label_min_width: 55.0,
            marker_radius: 4.0,
            min_label_bar_height: 8.0,
            label_padding: 6.0,
            tick_spacing: 90.0,
            fonts: RenderFonts {
                continent: Font::new(TITLE_FONT, 14.0).bold(),
                region: Font::new(BODY_FONT, 11.0).italic(),
                label: Font::new(BODY_FONT, 10.5),
                axis: Font::new(BODY_FONT, 10.0),
                message: Font::new(BODY_FONT, 14.0),
            },
            colors: RenderColors {
                separator: Color::rgba(180, 180, 180, 0.5),
                region_label: Color::rgb(0x6f, 0x61, 0x51),
                period_label: Color::rgba(0, 0, 0, 0.55),
                period_line: Color::rgba(0, 0, 0, 0.08),
                axis_text: Color::rgb(0x44, 0x44, 0x44),
                grid: Color::rgba(200, 200, 200, 0.3),
                label_fill: Color::WHITE,
                label_outline: Stroke::new(Color::BLACK, 1.5),
                message: Color::rgb(0x6f, 0x61, 0x51),
            },
            highlight: HighlightStyle {
                fill: Some(Color::rgba(0, 0, 0, 0.06)),
                shadow: Some(Shadow {
                    color: Color::rgba(0, 0, 0, 0.3),
                    blur: 6.0,
                    offset_x: 0.0,
                    offset_y: 1.0,
                }),
                stroke: Stroke::new(Color::rgba(0, 0, 0, 0.6), 1.5),
                min_width: 1.0,
                marker_stroke: Stroke::new(Color::rgba(255, 255, 255, 0.9), 1.0),
            },
            periods: default_periods(),
            event_colors: EventPalette::default(),
        }
    }

    pub fn rivers() -> Self {
        let margin_left = 150.0;
        let strata = Self::strata();
        Self {
            style: TimelineStyle::Rivers,
            margin_left,
            continent_label_x: margin_left / 6.0,
            region_label_x: margin_left / 4.0,
            show_period_bands: false,
            show_separators: false,
            show_region_labels: false,
            fonts: RenderFonts {
                continent: Font::new(TITLE_FONT, 12.0).bold(),
                label: Font::new(BODY_FONT, 10.0),
                ..strata.fonts
            },
            colors: RenderColors {
                label_outline: Stroke::new(Color::rgba(0, 0, 0, 0.7), 1.5),
                ..strata.colors
            },
            highlight: HighlightStyle {
                fill: None,
                shadow: None,
                stroke: Stroke::new(Color::rgba(0, 0, 0, 0.7), 2.0),
                min_width: 0.0,
                marker_stroke: Stroke::new(Color::WHITE, 0.5),
            },
            ..strata
        }
    }

    /// Strata bars sit on whole pixels; rivers keep exact geometry.
    pub fn snapping(&self) -> Snapping {
        match self.style {
            TimelineStyle::Strata => Snapping::WholePixels,
            TimelineStyle::Rivers => Snapping::Exact,
        }
    }

    /// Plot rectangle for a surface of the given size.
    pub fn plot_area(&self, width: f64, height: f64) -> PlotArea {
        PlotArea {
            left: self.margin_left,
            right: width - self.margin_right,
            top: self.plot_top,
            bottom: height - self.axis_height,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::strata()
    }
}

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub bands: usize,
    pub bars: usize,
    pub labels: usize,
    pub markers: usize,
    pub highlighted: bool,
    /// Elements dropped because a draw call failed.
    pub skipped: usize,
}

/// Draw one complete frame.
pub fn render(
    surface: &mut dyn DrawSurface,
    scale: &TimeScale,
    viewport: &ViewportState,
    layout: &LayoutResult,
    config: &RenderConfig,
) -> FrameStats {
    let (width, height) = surface.size();
    let plot = PlotArea {
        left: scale.left,
        right: scale.right,
        ..config.plot_area(width, height)
    };
    let mut frame = Frame {
        surface,
        scale,
        plot,
        config,
        stats: FrameStats::default(),
    };

    frame.guard("clear", |s| s.clear());
    if !plot.is_usable() {
        return frame.stats;
    }

    if config.show_period_bands {
        frame.draw_period_bands();
    }
    if config.show_axis {
        frame.draw_axis();
    }
    for continent in &layout.continents {
        frame.draw_continent(continent, layout);
    }
    if !viewport.is_interacting {
        if let Some(id) = &viewport.hovered_entity_id {
            if let Some(entity) = layout.find(id) {
                frame.draw_highlight(entity);
            }
        }
    }
    frame.stats
}

/// Clear the surface and show `message` centered on it.
pub fn render_message(surface: &mut dyn DrawSurface, message: &str, config: &RenderConfig) {
    let (width, height) = surface.size();
    let style = TextStyle::new(config.fonts.message.clone(), config.colors.message)
        .aligned(TextAlign::Center, TextBaseline::Middle);
    let drawn = surface
        .clear()
        .and_then(|_| surface.text(message, Point::new(width / 2.0, height / 2.0), &style));
    if let Err(e) = drawn {
        warn!("Could not draw message '{}': {}", message, e);
    }
}

struct Frame<'a> {
    surface: &'a mut dyn DrawSurface,
    scale: &'a TimeScale,
    plot: PlotArea,
    config: &'a RenderConfig,
    stats: FrameStats,
}

/// Horizontal extent of a bar after clipping to the plot.
struct Span {
    x: f64,
    width: f64,
}

impl<'a> Frame<'a> {
    /// Run one draw step; on failure log it and count a skipped element.
    fn guard<F>(&mut self, what: &str, draw: F) -> bool
    where
        F: FnOnce(&mut dyn DrawSurface) -> RenderResult<()>,
    {
        match draw(&mut *self.surface) {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping {}: {}", what, e);
                self.stats.skipped += 1;
                false
            }
        }
    }

    /// Projects `[start, end]` onto the plot, or `None` when it is off-screen.
    fn visible_span(&self, start: f64, end: f64, snapping: Snapping) -> Option<Span> {
        visible_extent(self.scale, &self.plot, start, end, snapping).map(|(x, width)| Span { x, width })
    }

    fn draw_period_bands(&mut self) {
        let config = self.config;
        let top = self.plot.top;
        let height = self.plot.height();

        for period in &config.periods {
            let Some(span) = self.visible_span(period.start, period.end, Snapping::WholePixels) else {
                continue;
            };
            if span.width <= 0.0 {
                continue;
            }
            let rect = Rect::new(span.x, top, span.width, height);
            let fill = Fill::Solid(period.color.with_alpha(period.color.a * 0.8));
            if !self.guard(&period.name, |s| s.fill_rect(rect, &fill, None)) {
                continue;
            }
            self.stats.bands += 1;

            let line = Stroke::new(config.colors.period_line, 0.5);
            self.guard("period top line", |s| {
                s.line(
                    Point::new(span.x, top + 0.5),
                    Point::new(span.x + span.width, top + 0.5),
                    &line,
                )
            });

            if span.width > config.period_label_min_width {
                let style = TextStyle::new(config.fonts.axis.clone().italic(), config.colors.period_label)
                    .aligned(TextAlign::Center, TextBaseline::Top)
                    .with_shadow(Shadow {
                        color: Color::rgba(255, 255, 255, 0.6),
                        blur: 2.0,
                        offset_x: 0.0,
                        offset_y: 0.0,
                    });
                let at = Point::new(span.x + span.width / 2.0, (top + 6.0).max(16.0));
                self.guard("period label", |s| s.text(&period.name, at, &style));
            }
        }
    }

    fn draw_axis(&mut self) {
        let config = self.config;
        let plot = self.plot;
        let max_ticks = ((plot.width() / config.tick_spacing).floor() as usize).max(2);
        let grid = Stroke::new(config.colors.grid, 1.0);
        let style = TextStyle::new(config.fonts.axis.clone(), config.colors.axis_text)
            .aligned(TextAlign::Center, TextBaseline::Top);

        for tick in nice_ticks(self.scale.domain, max_ticks) {
            let x = self.scale.pixel_for(tick).round() + 0.5;
            if x < plot.left || x > plot.right {
                continue;
            }
            self.guard("grid line", |s| {
                s.line(Point::new(x, plot.top), Point::new(x, plot.bottom), &grid)
            });
            let label = format_year_value(tick);
            self.guard("tick label", |s| {
                s.text(&label, Point::new(x, plot.bottom + 4.0), &style)
            });
        }
    }

    fn draw_continent(&mut self, continent: &ContinentGroup, layout: &LayoutResult) {
        let config = self.config;
        let spacing = layout.spacing;

        if config.show_separators {
            self.draw_separator(
                continent.start_y,
                spacing.continent_gap,
                spacing.margin_top,
                config.continent_label_x,
                0.75,
            );
        }
        let style = TextStyle::new(config.fonts.continent.clone(), continent.color)
            .aligned(TextAlign::Left, TextBaseline::Bottom);
        let at = Point::new(config.continent_label_x, continent.label_y);
        self.guard("continent label", |s| s.text(&continent.name, at, &style));

        for region in &continent.regions {
            if config.show_separators {
                self.draw_separator(
                    region.start_y,
                    spacing.region_gap,
                    spacing.margin_top,
                    config.region_label_x,
                    0.5,
                );
            }
            if config.show_region_labels {
                let style = TextStyle::new(config.fonts.region.clone(), config.colors.region_label)
                    .aligned(TextAlign::Left, TextBaseline::Bottom);
                let at = Point::new(config.region_label_x, region.label_y);
                self.guard("region label", |s| s.text(&region.name, at, &style));
            }
            for entity in &region.entities {
                match config.style {
                    TimelineStyle::Strata => self.draw_strata_bar(entity, continent.color),
                    TimelineStyle::Rivers => self.draw_river(entity, continent.color),
                }
            }
        }
    }

    fn draw_separator(&mut self, y: f64, gap: f64, margin_top: f64, x_start: f64, width: f64) {
        if y <= margin_top + gap {
            return;
        }
        let line_y = (y - gap / 2.0).round() + 0.5;
        let stroke = Stroke::new(self.config.colors.separator, width);
        let x_end = self.plot.right;
        self.guard("separator", |s| {
            s.line(Point::new(x_start, line_y), Point::new(x_end, line_y), &stroke)
        });
    }

    fn draw_strata_bar(&mut self, entity: &TimelineEntity, color: Color) {
        let snapping = self.config.snapping();
        let Some(span) =
            self.visible_span(f64::from(entity.start_year), f64::from(entity.end_year), snapping)
        else {
            return;
        };
        if span.width < 0.5 {
            return;
        }
        let y = snapping.apply(entity.y_position);
        let base = color.with_alpha(0.6 + entity.confidence * 0.35);
        let fill = Fill::VerticalGradient {
            top: base.adjust_lightness(6.0),
            bottom: base.adjust_lightness(-6.0),
        };
        let rect = Rect::new(span.x, y, span.width, entity.bar_height);
        if !self.guard(&entity.name, |s| s.fill_rect(rect, &fill, None)) {
            return;
        }
        self.stats.bars += 1;
        self.draw_strata_label(&entity.name, rect);
    }

    fn draw_strata_label(&mut self, text: &str, bar: Rect) {
        let config = self.config;
        if bar.height < config.min_label_bar_height {
            return;
        }
        let padding = config.label_padding;
        let available = bar.width - padding * 2.0;
        if available <= 5.0 {
            return;
        }

        let font = &config.fonts.label;
        let label = match fit_label(&*self.surface, text, font, available) {
            Ok(Some(label)) => label,
            Ok(None) => return,
            Err(e) => {
                warn!("Skipping label '{}': {}", text, e);
                self.stats.skipped += 1;
                return;
            }
        };

        let clip = Rect::new(bar.x + padding / 2.0, bar.y, available, bar.height);
        let at = Point::new(bar.x + bar.width / 2.0, bar.y + bar.height / 2.0 + 1.0);
        self.draw_clipped_label(&label, clip, at);
    }

    fn draw_river(&mut self, entity: &TimelineEntity, color: Color) {
        let Some(span) =
            self.visible_span(
                f64::from(entity.start_year),
                f64::from(entity.end_year),
                self.config.snapping(),
            )
        else {
            return;
        };
        if span.width <= 0.0 {
            return;
        }
        let top = entity.y_position;
        let bottom = entity.bottom();
        let points = [
            Point::new(span.x, top),
            Point::new(span.x + span.width, top),
            Point::new(span.x + span.width, bottom),
            Point::new(span.x, bottom),
        ];
        let alpha = 0.5 + entity.confidence * 0.4;
        let fill = Fill::Solid(color.with_alpha(alpha));
        let outline = Stroke::new(color.with_alpha(alpha + 0.1), 0.5);
        if !self.guard(&entity.name, |s| s.fill_polygon(&points, &fill, Some(&outline))) {
            return;
        }
        self.stats.bars += 1;

        let text_width = match self.surface.measure_text(&entity.name, &self.config.fonts.label) {
            Ok(width) => width,
            Err(e) => {
                warn!("Skipping label '{}': {}", entity.name, e);
                self.stats.skipped += 1;
                return;
            }
        };
        if span.width > text_width + 8.0 {
            let clip = Rect::new(span.x, top, span.width, entity.bar_height);
            let at = Point::new(span.x + span.width / 2.0, top + entity.bar_height / 2.0 + 1.0);
            self.draw_clipped_label(&entity.name, clip, at);
        }
    }

    fn draw_clipped_label(&mut self, label: &str, clip: Rect, at: Point) {
        let config = self.config;
        let style = TextStyle::new(config.fonts.label.clone(), config.colors.label_fill)
            .aligned(TextAlign::Center, TextBaseline::Middle)
            .with_outline(config.colors.label_outline);

        if !self.guard("label clip", |s| s.push_clip(clip)) {
            return;
        }
        if self.guard(label, |s| s.text(label, at, &style)) {
            self.stats.labels += 1;
        }
        self.guard("label clip", |s| s.pop_clip());
    }

    fn draw_highlight(&mut self, entity: &TimelineEntity) {
        let config = self.config;
        let highlight = &config.highlight;
        let snapping = config.snapping();
        let Some(span) =
            self.visible_span(f64::from(entity.start_year), f64::from(entity.end_year), snapping)
        else {
            return;
        };
        if span.width <= 0.0 || span.width < highlight.min_width {
            return;
        }
        let y = snapping.apply(entity.y_position);
        let rect = Rect::new(span.x, y, span.width, entity.bar_height);

        if let Some(fill) = highlight.fill {
            self.guard("highlight fill", |s| {
                s.fill_rect(rect, &Fill::Solid(fill), highlight.shadow.as_ref())
            });
        }
        if self.guard("highlight outline", |s| s.stroke_rect(rect, &highlight.stroke)) {
            self.stats.highlighted = true;
        }
        if config.show_event_markers {
            self.draw_event_markers(entity, y);
        }
    }

    fn draw_event_markers(&mut self, entity: &TimelineEntity, y: f64) {
        let config = self.config;
        let radius = config.marker_radius;
        let center_y = (y + entity.bar_height / 2.0).round();
        let start = self
            .scale
            .pixel_for(f64::from(entity.start_year))
            .round()
            .max(self.plot.left)
            + radius;
        let end = self
            .scale
            .pixel_for(f64::from(entity.end_year))
            .round()
            .min(self.plot.right)
            - radius;

        for event in &entity.events {
            let x = self.scale.pixel_for(event.year).round();
            if x < start || x > end {
                continue;
            }
            let fill = config.event_colors.color_for(event.kind);
            let stroke = config.highlight.marker_stroke;
            if self.guard(&event.name, |s| {
                s.circle(Point::new(x, center_y), radius, fill, Some(&stroke))
            }) {
                self.stats.markers += 1;
            }
        }
    }
}

/// Shorten `text` with a trailing ellipsis until it fits `available` pixels.
///
/// Returns the text unchanged when it already fits. At least one character
/// is kept; the label clip hides any remaining overflow.
pub fn fit_label(
    surface: &dyn DrawSurface,
    text: &str,
    font: &Font,
    available: f64,
) -> RenderResult<Option<String>> {
    if text.is_empty() {
        return Ok(None);
    }
    if surface.measure_text(text, font)? <= available {
        return Ok(Some(text.to_string()));
    }
    let mut chars: Vec<char> = text.chars().collect();
    loop {
        let candidate: String = chars.iter().collect::<String>() + "...";
        if chars.len() <= 1 || surface.measure_text(&candidate, font)? <= available {
            return Ok(Some(candidate));
        }
        chars.pop();
    }
}
