//! Application state: the loaded records, the active filter, and the two
//! timeline views built from them.
//!
//! A view that fails to start is recorded as [`ViewSlot::Failed`] and shows
//! its message on its own surface; the other view keeps working.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::algorithms::analysis::{compute_summary, DatasetSummary};
use crate::config::{AtlasConfig, ViewConfig};
use crate::core::domain::RawRecord;
use crate::error::{AtlasError, AtlasResult};
use crate::interaction::controller::{InteractionEvent, Response, ZoomDirection};
use crate::render::color::{legend_entries, LegendEntry};
use crate::render::engine::render_message;
use crate::render::surface::DrawSurface;
use crate::transformations::filtering::{filter_options, filter_records, FilterCriteria, FilterOptions};
use crate::view::coordinator::{DetailPresenter, InitError, TimelineView, ViewSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Strata,
    Rivers,
}

impl ViewKind {
    pub const ALL: [ViewKind; 2] = [ViewKind::Strata, ViewKind::Rivers];
}

pub enum ViewSlot<S: DrawSurface> {
    Uninitialised,
    Ready(TimelineView<S>),
    Failed { message: String, surface: Option<S> },
}

/// Lifecycle of a view slot, without the view itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Uninitialised,
    Ready,
    Failed(String),
}

pub struct AtlasApp<S: DrawSurface> {
    config: AtlasConfig,
    records: Arc<Vec<RawRecord>>,
    filter: FilterCriteria,
    filtered: Arc<Vec<RawRecord>>,
    strata: ViewSlot<S>,
    rivers: ViewSlot<S>,
}

impl<S: DrawSurface> AtlasApp<S> {
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            config,
            records: Arc::new(Vec::new()),
            filter: FilterCriteria::default(),
            filtered: Arc::new(Vec::new()),
            strata: ViewSlot::Uninitialised,
            rivers: ViewSlot::Uninitialised,
        }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Start a view on `surface`.
    ///
    /// `None` stands for a missing drawing surface. On failure the slot keeps
    /// the error message, draws it on the surface when there is one, and the
    /// error is returned for the caller to log.
    pub fn init_view(
        &mut self,
        kind: ViewKind,
        surface: Option<S>,
        presenter: Box<dyn DetailPresenter>,
    ) -> AtlasResult<()> {
        let view_config = self.view_config(kind).clone();
        let settings = ViewSettings {
            default_domain: self.config.default_domain,
            interaction: self.config.interaction.clone(),
            colors: self.config.continent_colors.clone(),
        };
        let filtered = Arc::clone(&self.filtered);

        let Some(surface) = surface else {
            let error = AtlasError::EnvironmentError(format!("no drawing surface for {:?}", kind));
            self.fail(kind, &error, None, &view_config);
            return Err(error);
        };

        match TimelineView::init(surface, view_config.clone(), settings, presenter) {
            Ok(mut view) => {
                if !filtered.is_empty() {
                    if let Err(error) = view.update(&filtered) {
                        let surface = view.destroy();
                        self.fail(kind, &error, Some(surface), &view_config);
                        return Err(error);
                    }
                }
                *self.slot_mut(kind) = ViewSlot::Ready(view);
                Ok(())
            }
            Err(InitError { error, surface }) => {
                self.fail(kind, &error, Some(surface), &view_config);
                Err(error)
            }
        }
    }

    fn fail(&mut self, kind: ViewKind, error: &AtlasError, surface: Option<S>, config: &ViewConfig) {
        error!("{:?} view failed: {}", kind, error);
        let message = format!("Error al inicializar la visualización: {}", error);
        let surface = surface.map(|mut surface| {
            render_message(&mut surface, &message, &config.render);
            surface
        });
        *self.slot_mut(kind) = ViewSlot::Failed { message, surface };
    }

    /// Replace the record set and refresh every ready view.
    pub fn load_records(&mut self, records: Vec<RawRecord>) -> AtlasResult<()> {
        info!("Loaded {} records", records.len());
        self.records = Arc::new(records);
        self.refresh()
    }

    /// Apply a new filter and refresh every ready view.
    pub fn apply_filter(&mut self, criteria: FilterCriteria) -> AtlasResult<()> {
        self.filter = criteria;
        self.refresh()
    }

    fn refresh(&mut self) -> AtlasResult<()> {
        self.filtered = Arc::new(if self.filter.is_empty() {
            self.records.as_ref().clone()
        } else {
            filter_records(&self.records, &self.filter)
        });
        info!(
            "{} of {} records pass the filter",
            self.filtered.len(),
            self.records.len()
        );

        let filtered = Arc::clone(&self.filtered);
        let mut first_error = None;
        for kind in ViewKind::ALL {
            if let ViewSlot::Ready(view) = self.slot_mut(kind) {
                if let Err(e) = view.update(&filtered) {
                    warn!("{:?} view update failed: {}", kind, e);
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn filtered_records(&self) -> &[RawRecord] {
        &self.filtered
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    /// Values offered by the filter controls, from the full record set.
    pub fn filter_options(&self) -> FilterOptions {
        filter_options(&self.records)
    }

    /// Statistics over the records that pass the filter.
    pub fn summary(&self) -> Result<DatasetSummary> {
        compute_summary(&self.filtered).context("Failed to summarise records")
    }

    /// Continent swatches and event marker colors.
    pub fn legend(&self) -> (Vec<LegendEntry>, Vec<LegendEntry>) {
        legend_entries(
            &self.config.continent_colors,
            &self.config.strata.render.event_colors,
        )
    }

    pub fn status(&self, kind: ViewKind) -> ViewStatus {
        match self.slot(kind) {
            ViewSlot::Uninitialised => ViewStatus::Uninitialised,
            ViewSlot::Ready(_) => ViewStatus::Ready,
            ViewSlot::Failed { message, .. } => ViewStatus::Failed(message.clone()),
        }
    }

    pub fn view(&self, kind: ViewKind) -> Option<&TimelineView<S>> {
        match self.slot(kind) {
            ViewSlot::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn view_mut(&mut self, kind: ViewKind) -> Option<&mut TimelineView<S>> {
        match self.slot_mut(kind) {
            ViewSlot::Ready(view) => Some(view),
            _ => None,
        }
    }

    /// The surface of a failed view, showing its error message.
    pub fn failed_surface(&self, kind: ViewKind) -> Option<&S> {
        match self.slot(kind) {
            ViewSlot::Failed { surface, .. } => surface.as_ref(),
            _ => None,
        }
    }

    /// Route an input event to one view. Events for views that are not
    /// ready are dropped.
    pub fn handle_event(&mut self, kind: ViewKind, event: InteractionEvent) -> Option<Response> {
        self.view_mut(kind).map(|view| view.handle_event(event))
    }

    pub fn zoom(&mut self, kind: ViewKind, direction: ZoomDirection) {
        if let Some(view) = self.view_mut(kind) {
            view.zoom(direction);
        }
    }

    pub fn reset_zoom(&mut self, kind: ViewKind) {
        if let Some(view) = self.view_mut(kind) {
            view.reset_zoom();
        }
    }

    /// Tear a view down and hand back its surface.
    pub fn destroy_view(&mut self, kind: ViewKind) -> Option<S> {
        match std::mem::replace(self.slot_mut(kind), ViewSlot::Uninitialised) {
            ViewSlot::Ready(view) => Some(view.destroy()),
            ViewSlot::Failed { surface, .. } => surface,
            ViewSlot::Uninitialised => None,
        }
    }

    fn view_config(&self, kind: ViewKind) -> &ViewConfig {
        match kind {
            ViewKind::Strata => &self.config.strata,
            ViewKind::Rivers => &self.config.rivers,
        }
    }

    fn slot(&self, kind: ViewKind) -> &ViewSlot<S> {
        match kind {
            ViewKind::Strata => &self.strata,
            ViewKind::Rivers => &self.rivers,
        }
    }

    fn slot_mut(&mut self, kind: ViewKind) -> &mut ViewSlot<S> {
        match kind {
            ViewKind::Strata => &mut self.strata,
            ViewKind::Rivers => &mut self.rivers,
        }
    }
}
