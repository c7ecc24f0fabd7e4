//! Per-view interaction state machine.
//!
//! Hover runs `Idle -> Hovering(id) -> Idle`. Pan and zoom gestures run
//! orthogonally and raise [`ViewportState::is_interacting`] for their whole
//! duration plus one animation frame, during which hover is frozen.
//!
//! The controller owns no surface. Each event returns a [`Response`] telling
//! the caller whether to redraw, which cursor to show, what to do with the
//! tooltip and which entity was activated.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::domain::{LayoutResult, ViewportState};
use crate::interaction::hit_test::hit_test;
use crate::interaction::tooltip::{TooltipContent, TooltipState};
use crate::render::color::Color;
use crate::render::scale::{pan_domain, zoom_domain, PlotArea, Snapping, TimeScale};
use crate::render::surface::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Meta,
}

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub fn has(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Ctrl => self.ctrl,
            Modifier::Shift => self.shift,
            Modifier::Alt => self.alt,
            Modifier::Meta => self.meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

/// Input delivered to a view, with pointer coordinates in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    PointerMove { x: f64, y: f64, timestamp_ms: f64 },
    PointerDown { x: f64, y: f64, modifiers: Modifiers },
    PointerUp { x: f64, y: f64 },
    PointerLeave,
    Click { x: f64, y: f64 },
    /// Negative `delta_y` scrolls up and zooms in.
    Wheel { x: f64, delta_y: f64 },
    PinchStart { x: f64 },
    /// `scale` is the cumulative pinch scale since `PinchStart`.
    Pinch { x: f64, scale: f64 },
    PinchEnd,
    /// Fired once per display frame by the host scheduler.
    AnimationFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    Default,
    Pointer,
}

/// Tooltip change requested by an event.
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipUpdate {
    Show(TooltipState),
    Hide,
}

/// What the caller must do after an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub redraw: bool,
    pub cursor: Option<Cursor>,
    pub tooltip: Option<TooltipUpdate>,
    /// Id of the entity the user clicked.
    pub activated: Option<String>,
}

impl Response {
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Default::default()
        }
    }
}

/// Tunables for hover, pan and zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub hover_throttle_ms: f64,
    /// Horizontal drag distance before a press becomes a pan.
    pub pan_threshold_px: f64,
    pub pan_modifier: Modifier,
    /// Fractional zoom per wheel notch.
    pub wheel_speed: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub min_span_years: f64,
    pub tooltip_margin: f64,
    pub tooltip_field_chars: usize,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hover_throttle_ms: 16.0,
            pan_threshold_px: 5.0,
            pan_modifier: Modifier::Ctrl,
            wheel_speed: 0.1,
            zoom_in_factor: 1.15,
            zoom_out_factor: 0.85,
            min_span_years: 10.0,
            tooltip_margin: 15.0,
            tooltip_field_chars: 45,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    None,
    Pressed { start_x: f64 },
    Panning { last_x: f64 },
    Pinching { last_scale: f64 },
}

/// Interaction state of one view.
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: InteractionConfig,
    gesture: Gesture,
    last_move_ms: Option<f64>,
    /// Clear `is_interacting` on the next animation frame.
    release_pending: bool,
    /// Rounding the renderer applies to bars; hit areas follow it.
    snapping: Snapping,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            gesture: Gesture::None,
            last_move_ms: None,
            release_pending: false,
            snapping: Snapping::Exact,
        }
    }

    /// Hit-test against bars rounded the same way they are drawn.
    pub fn with_snapping(mut self, snapping: Snapping) -> Self {
        self.snapping = snapping;
        self
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    /// Apply `event` to `viewport`.
    ///
    /// `layout` and `plot` describe the frame currently on screen; the time
    /// scale is derived from `viewport.domain`.
    pub fn handle(
        &mut self,
        event: InteractionEvent,
        viewport: &mut ViewportState,
        layout: &LayoutResult,
        plot: &PlotArea,
    ) -> Response {
        match event {
            InteractionEvent::PointerMove { x, y, timestamp_ms } => {
                if let Some(response) = self.drag(x, viewport, plot) {
                    return response;
                }
                if viewport.is_interacting || self.throttled(timestamp_ms) {
                    return Response::default();
                }
                self.hover(x, y, viewport, layout, plot)
            }
            InteractionEvent::PointerDown { x, modifiers, .. } => {
                if self.gesture == Gesture::None && modifiers.has(self.config.pan_modifier) {
                    self.gesture = Gesture::Pressed { start_x: x };
                }
                Response::default()
            }
            InteractionEvent::PointerUp { .. } => self.end_drag(viewport),
            InteractionEvent::PointerLeave => {
                let mut response = self.end_drag(viewport);
                viewport.hovered_entity_id = None;
                response.redraw = true;
                response.cursor = Some(Cursor::Default);
                response.tooltip = Some(TooltipUpdate::Hide);
                response
            }
            InteractionEvent::Click { x, y } => {
                if viewport.is_interacting {
                    return Response::default();
                }
                let scale = TimeScale::for_plot(viewport.domain, plot);
                Response {
                    activated: hit_test(layout, &scale, plot, self.snapping, x, y)
                        .map(|e| e.id.clone()),
                    ..Default::default()
                }
            }
            InteractionEvent::Wheel { x, delta_y } => {
                let factor = if delta_y < 0.0 {
                    1.0 + self.config.wheel_speed
                } else {
                    1.0 - self.config.wheel_speed
                };
                self.begin_gesture(viewport);
                self.zoom_at(viewport, plot, factor, x);
                self.release_pending = true;
                Response::redraw()
            }
            InteractionEvent::PinchStart { .. } => {
                self.gesture = Gesture::Pinching { last_scale: 1.0 };
                self.begin_gesture(viewport);
                Response::default()
            }
            InteractionEvent::Pinch { x, scale } => {
                let Gesture::Pinching { last_scale } = self.gesture else {
                    return Response::default();
                };
                if !(scale.is_finite() && scale > 0.0) {
                    return Response::default();
                }
                self.gesture = Gesture::Pinching { last_scale: scale };
                self.zoom_at(viewport, plot, scale / last_scale, x);
                Response::redraw()
            }
            InteractionEvent::PinchEnd => {
                if matches!(self.gesture, Gesture::Pinching { .. }) {
                    self.gesture = Gesture::None;
                }
                self.release_pending |= viewport.is_interacting;
                Response::default()
            }
            InteractionEvent::AnimationFrame => {
                if !self.release_pending {
                    return Response::default();
                }
                self.release_pending = false;
                viewport.is_interacting = false;
                debug!("Gesture finished, domain {:?}", viewport.domain);
                Response {
                    redraw: viewport.hovered_entity_id.is_some(),
                    ..Default::default()
                }
            }
        }
    }

    /// Zoom buttons: a fixed step anchored at the middle of the domain.
    pub fn zoom(&self, viewport: &mut ViewportState, direction: ZoomDirection) {
        let factor = match direction {
            ZoomDirection::In => self.config.zoom_in_factor,
            ZoomDirection::Out => self.config.zoom_out_factor,
        };
        let (min, max) = viewport.domain;
        viewport.domain = zoom_domain(
            viewport.domain,
            factor,
            (min + max) / 2.0,
            self.config.min_span_years,
        );
    }

    /// Restore `default_domain` and drop any gesture in progress.
    pub fn reset(&mut self, viewport: &mut ViewportState, default_domain: (f64, f64)) {
        self.gesture = Gesture::None;
        self.release_pending = false;
        viewport.domain = default_domain;
        viewport.is_interacting = false;
    }

    fn throttled(&mut self, timestamp_ms: f64) -> bool {
        if let Some(last) = self.last_move_ms {
            if timestamp_ms - last < self.config.hover_throttle_ms {
                return true;
            }
        }
        self.last_move_ms = Some(timestamp_ms);
        false
    }

    fn hover(
        &mut self,
        x: f64,
        y: f64,
        viewport: &mut ViewportState,
        layout: &LayoutResult,
        plot: &PlotArea,
    ) -> Response {
        let scale = TimeScale::for_plot(viewport.domain, plot);
        let hit = hit_test(layout, &scale, plot, self.snapping, x, y);

        match hit {
            Some(entity) if viewport.hovered_entity_id.as_deref() == Some(entity.id.as_str()) => {
                Response::default()
            }
            Some(entity) => {
                viewport.hovered_entity_id = Some(entity.id.clone());
                let color = layout
                    .find_with_color(&entity.id)
                    .map(|(_, color)| color)
                    .unwrap_or(Color::BLACK);
                let content =
                    TooltipContent::for_entity(entity, color, self.config.tooltip_field_chars);
                Response {
                    redraw: true,
                    cursor: Some(Cursor::Pointer),
                    tooltip: Some(TooltipUpdate::Show(TooltipState::Visible {
                        content,
                        pointer: Point::new(x, y),
                    })),
                    activated: None,
                }
            }
            None if viewport.hovered_entity_id.is_some() => {
                viewport.hovered_entity_id = None;
                Response {
                    redraw: true,
                    cursor: Some(Cursor::Default),
                    tooltip: Some(TooltipUpdate::Hide),
                    activated: None,
                }
            }
            None => Response::default(),
        }
    }

    /// Advances a modifier-drag. Returns `None` when no drag is active.
    fn drag(&mut self, x: f64, viewport: &mut ViewportState, plot: &PlotArea) -> Option<Response> {
        match self.gesture {
            Gesture::Pressed { start_x } => {
                if (x - start_x).abs() <= self.config.pan_threshold_px {
                    return Some(Response::default());
                }
                self.begin_gesture(viewport);
                self.gesture = Gesture::Panning { last_x: start_x };
                Some(self.pan_to(x, viewport, plot))
            }
            Gesture::Panning { .. } => Some(self.pan_to(x, viewport, plot)),
            _ => None,
        }
    }

    fn pan_to(&mut self, x: f64, viewport: &mut ViewportState, plot: &PlotArea) -> Response {
        if let Gesture::Panning { last_x } = self.gesture {
            viewport.domain = pan_domain(viewport.domain, x - last_x, plot.width());
            self.gesture = Gesture::Panning { last_x: x };
        }
        Response::redraw()
    }

    /// Finish a press or pan. Any gesture left with the interacting flag set
    /// gets released on the next animation frame.
    fn end_drag(&mut self, viewport: &ViewportState) -> Response {
        match self.gesture {
            Gesture::Pinching { .. } => return Response::default(),
            Gesture::Panning { .. } | Gesture::Pressed { .. } => self.gesture = Gesture::None,
            Gesture::None => {}
        }
        self.release_pending |= viewport.is_interacting;
        Response::default()
    }

    fn begin_gesture(&mut self, viewport: &mut ViewportState) {
        viewport.is_interacting = true;
        self.release_pending = false;
    }

    fn zoom_at(&self, viewport: &mut ViewportState, plot: &PlotArea, factor: f64, x: f64) {
        let scale = TimeScale::for_plot(viewport.domain, plot);
        let anchor = scale.value_for(x.clamp(plot.left, plot.right));
        viewport.domain = zoom_domain(viewport.domain, factor, anchor, self.config.min_span_years);
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}
