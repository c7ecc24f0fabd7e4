//! Horizontal time axis: mapping between years and pixels, and the domain
//! arithmetic behind pan and zoom.

use serde::Serialize;

/// Drawable region inside the surface margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotArea {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Inclusive containment.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn is_usable(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }
}

/// Linear mapping of a year domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeScale {
    pub domain: (f64, f64),
    pub left: f64,
    pub right: f64,
}

impl TimeScale {
    pub fn new(domain: (f64, f64), left: f64, right: f64) -> Self {
        Self {
            domain,
            left,
            right,
        }
    }

    pub fn for_plot(domain: (f64, f64), plot: &PlotArea) -> Self {
        Self::new(domain, plot.left, plot.right)
    }

    pub fn span(&self) -> f64 {
        self.domain.1 - self.domain.0
    }

    pub fn pixel_for(&self, year: f64) -> f64 {
        let span = self.span();
        if span == 0.0 {
            return self.left;
        }
        self.left + (year - self.domain.0) / span * (self.right - self.left)
    }

    pub fn value_for(&self, pixel: f64) -> f64 {
        let width = self.right - self.left;
        if width == 0.0 {
            return self.domain.0;
        }
        self.domain.0 + (pixel - self.left) / width * self.span()
    }
}

/// Pixel rounding applied to bar geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Snapping {
    #[default]
    Exact,
    /// Round to whole pixels for crisp rectangle edges.
    WholePixels,
}

impl Snapping {
    pub fn apply(self, px: f64) -> f64 {
        match self {
            Snapping::Exact => px,
            Snapping::WholePixels => px.round(),
        }
    }
}

/// Horizontal `(x, width)` of the years `[start, end]` clipped to the plot,
/// or `None` when none of it is on screen. Drawing and hit-testing both go
/// through here so a hover matches what was drawn.
pub fn visible_extent(
    scale: &TimeScale,
    plot: &PlotArea,
    start: f64,
    end: f64,
    snapping: Snapping,
) -> Option<(f64, f64)> {
    let start_x = snapping.apply(scale.pixel_for(start));
    let end_x = snapping.apply(scale.pixel_for(end));
    if !(end_x > plot.left && start_x < plot.right) {
        return None;
    }
    let x = start_x.max(plot.left);
    Some((x, end_x.min(plot.right) - x))
}

/// Years a viewport may reach in either direction.
pub const YEAR_LIMIT: f64 = 1.0e6;

/// Place a window of `span` years starting at `start` inside
/// `[-YEAR_LIMIT, YEAR_LIMIT]`.
fn within_limits(start: f64, span: f64) -> (f64, f64) {
    if !(start.is_finite() && span.is_finite()) {
        return (start, start + span);
    }
    let span = span.min(2.0 * YEAR_LIMIT);
    let start = start.clamp(-YEAR_LIMIT, YEAR_LIMIT - span);
    (start, start + span)
}

/// Scale `domain` by `factor` around `anchor` (a year).
///
/// A factor above 1 zooms in. The anchor keeps its relative position, and the
/// resulting span never drops below `min_span`. The result stays within
/// [`YEAR_LIMIT`].
pub fn zoom_domain(domain: (f64, f64), factor: f64, anchor: f64, min_span: f64) -> (f64, f64) {
    let span = domain.1 - domain.0;
    if factor <= 0.0 || !factor.is_finite() || span <= 0.0 {
        return domain;
    }
    let new_span = (span / factor).max(min_span);
    let ratio = ((anchor - domain.0) / span).clamp(0.0, 1.0);
    within_limits(anchor - ratio * new_span, new_span)
}

/// Shift `domain` by a horizontal drag of `delta_px` over a plot `width` pixels
/// wide. Dragging right moves the view toward earlier years.
pub fn pan_domain(domain: (f64, f64), delta_px: f64, width: f64) -> (f64, f64) {
    if width <= 0.0 {
        return domain;
    }
    let span = domain.1 - domain.0;
    let shift = delta_px / width * span;
    within_limits(domain.0 - shift, span)
}

/// Round-number tick positions covering `domain`, about `max_ticks` of them.
pub fn nice_ticks(domain: (f64, f64), max_ticks: usize) -> Vec<f64> {
    let (min, max) = domain;
    if !(min.is_finite() && max.is_finite()) || max <= min || max_ticks < 2 {
        return Vec::new();
    }

    let range = nice_number(max - min, false);
    let step = nice_number(range / (max_ticks - 1) as f64, true);
    if step <= 0.0 {
        return Vec::new();
    }

    let first = (min / step).ceil() * step;
    let mut ticks: Vec<f64> = Vec::with_capacity(max_ticks + 1);
    for i in 0..=max_ticks * 2 {
        let tick = first + i as f64 * step;
        if tick > max + step * 1e-9 {
            break;
        }
        // Steps below the precision of `tick` repeat the same value
        if ticks.last().is_some_and(|last| *last >= tick) {
            continue;
        }
        // Normalize -0.0 so labels read "Año 0"
        ticks.push(if tick == 0.0 { 0.0 } else { tick });
    }
    ticks
}

fn nice_number(value: f64, round: bool) -> f64 {
    let exponent = value.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = value / magnitude;
    let nice = if round {
        match fraction {
            f if f < 1.5 => 1.0,
            f if f < 3.0 => 2.0,
            f if f < 7.0 => 5.0,
            _ => 10.0,
        }
    } else {
        match fraction {
            f if f <= 1.0 => 1.0,
            f if f <= 2.0 => 2.0,
            f if f <= 5.0 => 5.0,
            _ => 10.0,
        }
    };
    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_and_value_are_inverse() {
        let scale = TimeScale::new((-10000.0, 750.0), 170.0, 1080.0);
        assert_eq!(scale.pixel_for(-10000.0), 170.0);
        assert_eq!(scale.pixel_for(750.0), 1080.0);
        let px = scale.pixel_for(-3500.0);
        assert!((scale.value_for(px) + 3500.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_keeps_anchor_position() {
        let zoomed = zoom_domain((-10000.0, 750.0), 1.15, -2000.0, 10.0);
        let before = (-2000.0 - -10000.0) / 10750.0;
        let after = (-2000.0 - zoomed.0) / (zoomed.1 - zoomed.0);
        assert!((before - after).abs() < 1e-9);
        assert!(((zoomed.1 - zoomed.0) - 10750.0 / 1.15).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_respects_min_span() {
        let zoomed = zoom_domain((0.0, 20.0), 100.0, 10.0, 10.0);
        assert!((zoomed.1 - zoomed.0 - 10.0).abs() < 1e-9);
        assert_eq!(zoom_domain((0.0, 20.0), 0.0, 10.0, 10.0), (0.0, 20.0));
    }

    #[test]
    fn test_pan_moves_toward_earlier_years() {
        let panned = pan_domain((0.0, 1000.0), 100.0, 500.0);
        assert_eq!(panned, (-200.0, 800.0));
    }

    #[test]
    fn test_nice_ticks() {
        let ticks = nice_ticks((-10000.0, 750.0), 10);
        assert_eq!(ticks.first(), Some(&-10000.0));
        assert!(ticks.contains(&0.0));
        assert!(ticks.windows(2).all(|w| (w[1] - w[0] - 2000.0).abs() < 1e-9));
        assert!(nice_ticks((5.0, 5.0), 10).is_empty());
    }

    #[test]
    fn test_nice_ticks_far_from_zero_terminates() {
        let ticks = nice_ticks((1e20, 1e20 + 16384.0), 10);
        assert!(ticks.len() <= 21);
        assert!(ticks.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_zoom_and_pan_stay_within_limits() {
        let mut domain = (-10000.0, 750.0);
        for _ in 0..500 {
            domain = zoom_domain(domain, 0.5, 0.0, 10.0);
        }
        assert_eq!(domain, (-YEAR_LIMIT, YEAR_LIMIT));

        let mut domain = (-10000.0, 750.0);
        for _ in 0..1000 {
            domain = pan_domain(domain, 500.0, 500.0);
        }
        assert_eq!(domain.0, -YEAR_LIMIT);
        assert!((domain.1 - domain.0 - 10750.0).abs() < 1e-6);
    }
}
