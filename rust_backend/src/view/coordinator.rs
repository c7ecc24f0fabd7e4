//! One timeline visualization instance: its surface, layout, viewport and
//! interaction state.
//!
//! A view owns its hover and pan/zoom state, so two views over the same
//! records never interfere. The layout is held behind an [`Arc`] and replaced
//! whole on every update; a frame always draws one complete layout.

use std::fmt;
use std::sync::Arc;

use log::{debug, error, info};

use crate::algorithms::layout::layout;
use crate::config::ViewConfig;
use crate::core::domain::{LayoutResult, RawRecord, TimelineEntity, ViewportState};
use crate::error::{AtlasError, AtlasResult};
use crate::interaction::controller::{
    Cursor, InteractionConfig, InteractionController, InteractionEvent, Response, TooltipUpdate,
    ZoomDirection,
};
use crate::interaction::tooltip::{place_tooltip, TooltipState};
use crate::render::color::ContinentPalette;
use crate::render::engine::{render, FrameStats};
use crate::render::scale::{PlotArea, TimeScale};
use crate::render::surface::{DrawSurface, Point};

/// Receives the entity a user clicked.
pub trait DetailPresenter {
    fn show_details(&mut self, entity: &TimelineEntity);
}

/// Plain-text fallback used when the host has no detail view.
///
/// The text goes to the sink given at construction; [`AlertPresenter::logging`]
/// writes it to the log.
pub struct AlertPresenter {
    sink: Box<dyn FnMut(&str)>,
}

impl AlertPresenter {
    pub fn new(sink: impl FnMut(&str) + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    pub fn logging() -> Self {
        Self::new(|text| info!("{}", text))
    }
}

impl DetailPresenter for AlertPresenter {
    fn show_details(&mut self, entity: &TimelineEntity) {
        (self.sink)(&detail_text(entity));
    }
}

/// Summary shown by [`AlertPresenter`].
pub fn detail_text(entity: &TimelineEntity) -> String {
    let record = &entity.record;
    let or_na = |value: &str| {
        if value.trim().is_empty() {
            "N/A".to_string()
        } else {
            value.to_string()
        }
    };
    format!(
        "CIVILIZACIÓN:\n- Nombre: {}\n- Cronología: {}\n- Región: {} ({})\n- Subsistencia: {}\n\n(Detalles completos en App principal)",
        entity.name,
        or_na(&record.chronology),
        or_na(RawRecord::field(&record.region)),
        record.continent,
        or_na(RawRecord::field(&record.subsistence)),
    )
}

/// Settings shared by every view of an application.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub default_domain: (f64, f64),
    pub interaction: InteractionConfig,
    pub colors: ContinentPalette,
}

/// A view that could not be created, with the surface handed back so the
/// caller can show the failure on it.
pub struct InitError<S> {
    pub error: AtlasError,
    pub surface: S,
}

impl<S> fmt::Debug for InitError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<S> fmt::Display for InitError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

pub struct TimelineView<S: DrawSurface> {
    surface: S,
    config: ViewConfig,
    settings: ViewSettings,
    layout: Arc<LayoutResult>,
    viewport: ViewportState,
    controller: InteractionController,
    presenter: Box<dyn DetailPresenter>,
    tooltip: TooltipState,
    cursor: Cursor,
    last_frame: FrameStats,
}

impl<S: DrawSurface> fmt::Debug for TimelineView<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineView")
            .field("style", &self.config.render.style)
            .field("entities", &self.layout.entity_count())
            .field("viewport", &self.viewport)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<S: DrawSurface> TimelineView<S> {
    /// Create a view on `surface` and draw its first, empty frame.
    ///
    /// Fails with an environment error when the surface has no area or is
    /// too narrow for the configured margins.
    pub fn init(
        surface: S,
        config: ViewConfig,
        settings: ViewSettings,
        presenter: Box<dyn DetailPresenter>,
    ) -> Result<Self, InitError<S>> {
        let (width, height) = surface.size();
        if !(width > 0.0 && height > 0.0) {
            return Err(InitError {
                error: AtlasError::EnvironmentError(format!(
                    "drawing surface has no area ({}x{})",
                    width, height
                )),
                surface,
            });
        }
        let plot = config.render.plot_area(width, height);
        if plot.width() <= 0.0 {
            return Err(InitError {
                error: AtlasError::EnvironmentError(format!(
                    "surface width {} leaves no room for a plot",
                    width
                )),
                surface,
            });
        }

        let empty = layout(&[], &config.layout, &settings.colors);
        let mut view = Self {
            surface,
            viewport: ViewportState::new(settings.default_domain),
            controller: InteractionController::new(settings.interaction.clone())
                .with_snapping(config.render.snapping()),
            config,
            settings,
            layout: Arc::new(empty),
            presenter,
            tooltip: TooltipState::Hidden,
            cursor: Cursor::Default,
            last_frame: FrameStats::default(),
        };
        view.redraw();
        info!("Initialised {:?} view ({}x{})", view.config.render.style, width, height);
        Ok(view)
    }

    /// Lay out `records`, resize the surface to fit, and redraw.
    pub fn update(&mut self, records: &[RawRecord]) -> AtlasResult<()> {
        let next = layout(records, &self.config.layout, &self.settings.colors);
        let (width, _) = self.surface.size();
        self.surface.resize(width, next.content_height)?;

        if let Some(id) = &self.viewport.hovered_entity_id {
            if next.find(id).is_none() {
                self.viewport.hovered_entity_id = None;
                self.tooltip = TooltipState::Hidden;
                self.cursor = Cursor::Default;
            }
        }
        self.layout = Arc::new(next);
        self.redraw();
        Ok(())
    }

    /// Release the view and return its surface.
    pub fn destroy(self) -> S {
        debug!("Destroying {:?} view", self.config.render.style);
        self.surface
    }

    pub fn zoom(&mut self, direction: ZoomDirection) {
        self.controller.zoom(&mut self.viewport, direction);
        self.redraw();
    }

    pub fn reset_zoom(&mut self) {
        self.controller
            .reset(&mut self.viewport, self.settings.default_domain);
        self.redraw();
    }

    /// Feed one input event through the interaction controller.
    ///
    /// Redraws when needed and hands clicked entities to the presenter.
    pub fn handle_event(&mut self, event: InteractionEvent) -> Response {
        let plot = self.plot_area();
        let response = self
            .controller
            .handle(event, &mut self.viewport, &self.layout, &plot);

        if let Some(cursor) = response.cursor {
            self.cursor = cursor;
        }
        match &response.tooltip {
            Some(TooltipUpdate::Show(state)) => self.tooltip = state.clone(),
            Some(TooltipUpdate::Hide) => self.tooltip = TooltipState::Hidden,
            None => {}
        }
        if let Some(id) = &response.activated {
            match self.layout.find(id) {
                Some(entity) => {
                    debug!("Activated {}", entity.name);
                    self.presenter.show_details(entity);
                }
                None => error!("Activated entity {} is not in the layout", id),
            }
        }
        if response.redraw {
            self.redraw();
        }
        response
    }

    /// Draw the current layout and viewport.
    pub fn redraw(&mut self) -> FrameStats {
        let plot = self.plot_area();
        let scale = TimeScale::for_plot(self.viewport.domain, &plot);
        self.last_frame = render(
            &mut self.surface,
            &scale,
            &self.viewport,
            &self.layout,
            &self.config.render,
        );
        self.last_frame
    }

    /// Immutable copy of what the next frame will draw.
    pub fn snapshot(&self) -> (Arc<LayoutResult>, ViewportState) {
        (Arc::clone(&self.layout), self.viewport.clone())
    }

    /// Where to put a tooltip of `size` inside a `viewport` of the host page.
    pub fn tooltip_position(&self, size: (f64, f64), viewport: (f64, f64)) -> Option<Point> {
        match &self.tooltip {
            TooltipState::Visible { pointer, .. } => Some(place_tooltip(
                *pointer,
                size,
                viewport,
                self.controller.config().tooltip_margin,
            )),
            TooltipState::Hidden => None,
        }
    }

    pub fn plot_area(&self) -> PlotArea {
        let (width, height) = self.surface.size();
        self.config.render.plot_area(width, height)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }
}
