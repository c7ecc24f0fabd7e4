//! Drawing: colors, the time scale, drawing surfaces, and the frame engine.
//!
//! The engine only talks to [`surface::DrawSurface`], so the same frame can
//! go to an SVG document, a browser canvas (feature `web-canvas`), or the
//! in-memory [`recording::RecordingSurface`].

pub mod color;
pub mod engine;
pub mod recording;
pub mod scale;
pub mod surface;
pub mod svg;

#[cfg(feature = "web-canvas")]
pub mod canvas;


pub use color::{Color, ColorScheme, ContinentPalette, EventPalette, LegendEntry};
pub use engine::{render, render_message, FrameStats, PeriodBand, RenderConfig, TimelineStyle};
pub use recording::RecordingSurface;
pub use scale::{PlotArea, Snapping, TimeScale, YEAR_LIMIT};
pub use surface::{DrawSurface, RenderError, RenderResult};
pub use svg::SvgSurface;
