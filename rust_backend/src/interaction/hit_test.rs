//! Pointer hit-testing against a laid-out timeline.

use crate::core::domain::{LayoutResult, TimelineEntity};
use crate::render::scale::{visible_extent, PlotArea, Snapping, TimeScale};
use crate::render::surface::Rect;

/// Pixel rectangle covered by an entity's bar, clipped to the plot area and
/// rounded the way the bar is drawn.
///
/// Returns `None` when the bar is entirely outside the plot.
pub fn bar_rect(
    entity: &TimelineEntity,
    scale: &TimeScale,
    plot: &PlotArea,
    snapping: Snapping,
) -> Option<Rect> {
    let (x, width) = visible_extent(
        scale,
        plot,
        f64::from(entity.start_year),
        f64::from(entity.end_year),
        snapping,
    )?;
    if width <= 0.0 {
        return None;
    }
    Some(Rect::new(
        x,
        snapping.apply(entity.y_position),
        width,
        entity.bar_height,
    ))
}

/// Entity under the pointer at `(x, y)`, in surface pixels.
///
/// Continents and regions whose vertical span misses `y` are skipped whole.
/// Within a region the last-stacked entity is checked first, so the topmost
/// bar wins. Containment is strict: a pointer on a bar's edge misses it.
pub fn hit_test<'a>(
    layout: &'a LayoutResult,
    scale: &TimeScale,
    plot: &PlotArea,
    snapping: Snapping,
    x: f64,
    y: f64,
) -> Option<&'a TimelineEntity> {
    if !plot.contains(x, y) {
        return None;
    }

    for continent in &layout.continents {
        if y < continent.start_y || y > continent.start_y + continent.height {
            continue;
        }
        for region in &continent.regions {
            if y < region.start_y || y > region.start_y + region.height {
                continue;
            }
            let hit = region.entities.iter().rev().find(|entity| {
                bar_rect(entity, scale, plot, snapping).is_some_and(|rect| rect.contains(x, y))
            });
            if hit.is_some() {
                return hit;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::layout::{layout, LayoutConfig};
    use crate::core::domain::{RawRecord, ViewportState};
    use crate::render::color::ContinentPalette;
    use crate::render::engine::{render, RenderConfig};
    use crate::render::recording::{DrawCommand, RecordingSurface};
    use crate::render::surface::Fill;

    fn plot() -> PlotArea {
        PlotArea {
            left: 170.0,
            right: 980.0,
            top: 10.0,
            bottom: 670.0,
        }
    }

    fn single_entity() -> LayoutResult {
        let records = vec![RawRecord::new("Asia", "X", "3500-2000 a.C.")];
        layout(&records, &LayoutConfig::strata(), &ContinentPalette::default())
    }

    #[test]
    fn test_hit_inside_and_one_pixel_outside() {
        let result = single_entity();
        let plot = plot();
        let scale = TimeScale::for_plot((-4000.0, 0.0), &plot);
        let entity = result.entities().next().unwrap();
        let rect = bar_rect(entity, &scale, &plot, Snapping::WholePixels).unwrap();

        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        assert_eq!(
            hit_test(&result, &scale, &plot, Snapping::WholePixels, cx, cy).map(|e| e.id.as_str()),
            Some(entity.id.as_str())
        );

        let outside = [
            (rect.x - 1.0, cy),
            (rect.right() + 1.0, cy),
            (cx, rect.y - 1.0),
            (cx, rect.bottom() + 1.0),
        ];
        for (x, y) in outside {
            assert!(
                hit_test(&result, &scale, &plot, Snapping::WholePixels, x, y).is_none(),
                "unexpected hit at ({x}, {y})"
            );
        }
    }

    #[test]
    fn test_hit_is_clipped_to_plot() {
        let result = single_entity();
        let plot = plot();
        // The bar starts left of the plot; the margin must not hit it.
        let scale = TimeScale::for_plot((-3000.0, 0.0), &plot);
        let entity = result.entities().next().unwrap();
        let y = entity.y_position + entity.bar_height / 2.0;

        assert!(hit_test(&result, &scale, &plot, Snapping::WholePixels, plot.left - 10.0, y).is_none());
        assert!(hit_test(&result, &scale, &plot, Snapping::WholePixels, plot.left + 10.0, y).is_some());
    }

    #[test]
    fn test_off_screen_bar_is_not_hit() {
        let result = single_entity();
        let plot = plot();
        let scale = TimeScale::for_plot((0.0, 750.0), &plot);
        let entity = result.entities().next().unwrap();
        assert!(bar_rect(entity, &scale, &plot, Snapping::WholePixels).is_none());
        let y = entity.y_position + entity.bar_height / 2.0;
        assert!(hit_test(&result, &scale, &plot, Snapping::WholePixels, 500.0, y).is_none());
    }

    #[test]
    fn test_hit_picks_the_right_row() {
        let records = vec![
            RawRecord::new("Asia", "Sumeria", "3500-2000 a.C."),
            RawRecord::new("Asia", "Elam", "3200-539 a.C."),
        ];
        let result = layout(&records, &LayoutConfig::strata(), &ContinentPalette::default());
        let plot = plot();
        let scale = TimeScale::for_plot((-4000.0, 0.0), &plot);
        let x = scale.pixel_for(-2500.0);

        for entity in result.entities() {
            let y = entity.y_position + entity.bar_height / 2.0;
            let hit = hit_test(&result, &scale, &plot, Snapping::WholePixels, x, y).unwrap();
            assert_eq!(hit.name, entity.name);
        }

        // Gap between the two rows
        let first = result.entities().next().unwrap();
        let gap_y = first.bottom() + 1.0;
        assert!(hit_test(&result, &scale, &plot, Snapping::WholePixels, x, gap_y).is_none());
    }

    #[test]
    fn test_hit_area_matches_drawn_bar() {
        let mut result = single_entity();
        let entity = &mut result.continents[0].regions[0].entities[0];
        entity.y_position = entity.y_position.ceil() + 0.4;

        let config = RenderConfig::strata();
        let mut surface = RecordingSurface::new(1000.0, 700.0);
        let plot = config.plot_area(1000.0, 700.0);
        assert_eq!(plot, self::plot());
        // -3500 projects to x = 271.25
        let scale = TimeScale::for_plot((-4000.0, 0.0), &plot);
        render(&mut surface, &scale, &ViewportState::new((-4000.0, 0.0)), &result, &config);

        let drawn: Vec<Rect> = surface
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillRect {
                    rect,
                    fill: Fill::VerticalGradient { .. },
                    ..
                } => Some(*rect),
                _ => None,
            })
            .collect();
        let entity = result.entities().next().unwrap();
        let hit_area = bar_rect(entity, &scale, &plot, config.snapping()).unwrap();
        assert_eq!(drawn, vec![hit_area]);

        // Inside the drawn bar, outside the unrounded geometry
        let (x, y) = (hit_area.x + 0.1, hit_area.y + 0.2);
        assert!(hit_test(&result, &scale, &plot, config.snapping(), x, y).is_some());
        assert!(hit_test(&result, &scale, &plot, Snapping::Exact, x, y).is_none());
    }

    #[test]
    fn test_empty_layout_has_no_hits() {
        let result = layout(&[], &LayoutConfig::strata(), &ContinentPalette::default());
        let plot = plot();
        let scale = TimeScale::for_plot((-10000.0, 750.0), &plot);
        assert!(hit_test(&result, &scale, &plot, Snapping::WholePixels, 500.0, 100.0).is_none());
    }
}
