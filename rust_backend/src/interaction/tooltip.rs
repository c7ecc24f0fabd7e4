//! Hover tooltip: what it says and where it goes.

use serde::Serialize;

use crate::core::domain::{RawRecord, TimelineEntity};
use crate::render::color::Color;
use crate::render::surface::Point;

const NO_EVIDENCE: &str = "no evid";

/// One labelled descriptor line, e.g. `Tec: Cerámica, metalurgia del cobre...`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipLine {
    pub label: &'static str,
    pub text: String,
}

/// Structured tooltip text for a hovered entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub title: String,
    pub title_color: Color,
    /// `Region (Continent)`
    pub location: String,
    pub chronology: String,
    pub subsistence: String,
    pub details: Vec<TooltipLine>,
    /// Comma-separated event types, e.g. `writing, state`.
    pub milestones: Option<String>,
}

impl TooltipContent {
    /// Build the tooltip for `entity`, truncating descriptors to `max_chars`.
    pub fn for_entity(entity: &TimelineEntity, color: Color, max_chars: usize) -> Self {
        let record = &entity.record;
        let described = [
            ("Tec", &record.technology),
            ("Arq", &record.architecture),
            ("Soc", &record.hierarchy),
            ("Escr", &record.writing),
        ];
        let details = described
            .into_iter()
            .filter_map(|(label, value)| {
                informative(value).map(|text| TooltipLine {
                    label,
                    text: truncate(text, max_chars),
                })
            })
            .collect();

        let milestones = if entity.events.is_empty() {
            None
        } else {
            Some(
                entity
                    .events
                    .iter()
                    .map(|event| event.kind.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        };

        Self {
            title: entity.name.clone(),
            title_color: color,
            location: format!(
                "{} ({})",
                RawRecord::field(&record.region),
                record.continent
            ),
            chronology: record.chronology.clone(),
            subsistence: record
                .subsistence
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or("N/A")
                .to_string(),
            details,
            milestones,
        }
    }

    /// Plain-text rendering, one line per entry.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.title.clone(),
            self.location.clone(),
            self.chronology.clone(),
            self.subsistence.clone(),
        ];
        lines.extend(
            self.details
                .iter()
                .map(|line| format!("{}: {}", line.label, line.text)),
        );
        if let Some(milestones) = &self.milestones {
            lines.push(format!("Hitos: {}", milestones));
        }
        lines
    }
}

/// Descriptor text worth showing: longer than three characters and not a
/// "no evidence" placeholder.
fn informative(value: &Option<String>) -> Option<&str> {
    let text = value.as_deref()?.trim();
    if text.chars().count() > 3 && !text.to_lowercase().contains(NO_EVIDENCE) {
        Some(text)
    } else {
        None
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Tooltip visibility.
///
/// `pointer` is where the hover happened; the host measures the rendered
/// tooltip and positions it with [`place_tooltip`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TooltipState {
    Hidden,
    Visible {
        content: TooltipContent,
        pointer: Point,
    },
}

impl TooltipState {
    pub fn is_visible(&self) -> bool {
        matches!(self, TooltipState::Visible { .. })
    }
}

/// Place a tooltip of `size` next to `pointer` inside `viewport`.
///
/// The tooltip sits `margin` below and right of the pointer, flips to the
/// other side of the pointer on an axis where it would overflow, and is
/// finally clamped so it never starts closer than `margin` to the top-left.
pub fn place_tooltip(pointer: Point, size: (f64, f64), viewport: (f64, f64), margin: f64) -> Point {
    let (width, height) = size;
    let (view_width, view_height) = viewport;

    let mut left = pointer.x + margin;
    let mut top = pointer.y + margin;
    if left + width > view_width - margin {
        left = pointer.x - width - margin;
    }
    if top + height > view_height - margin {
        top = pointer.y - height - margin;
    }
    Point::new(left.max(margin), top.max(margin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::layout::{layout, LayoutConfig};
    use crate::render::color::ContinentPalette;

    fn entity_for(record: RawRecord) -> TimelineEntity {
        let result = layout(&[record], &LayoutConfig::strata(), &ContinentPalette::default());
        let entity = result.entities().next().unwrap().clone();
        entity
    }

    #[test]
    fn test_content_fields() {
        let record = RawRecord::new("Asia", "Sumeria", "3500-2000 a.C.")
            .with_region("Asia Occidental")
            .with_technology("Rueda, arado, metalurgia del bronce y del cobre arsenical en talleres")
            .with_architecture("No evidencia")
            .with_writing("Cuneiforme")
            .with_hierarchy("Estado");
        let content = TooltipContent::for_entity(&entity_for(record), Color::BLACK, 45);

        assert_eq!(content.title, "Sumeria");
        assert_eq!(content.location, "Asia Occidental (Asia)");
        assert_eq!(content.subsistence, "N/A");

        let labels: Vec<&str> = content.details.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Tec", "Soc", "Escr"]);
        let tec = &content.details[0].text;
        assert!(tec.ends_with("..."));
        assert_eq!(tec.chars().count(), 48);

        let lines = content.lines();
        assert_eq!(lines[0], "Sumeria");
        assert!(lines.iter().any(|l| l == "Escr: Cuneiforme"));
        assert!(lines.last().unwrap().starts_with("Hitos: "));
    }

    #[test]
    fn test_short_descriptors_are_omitted() {
        let record = RawRecord::new("Europa", "Aldea", "3000-2000 a.C.").with_writing("No");
        let content = TooltipContent::for_entity(&entity_for(record), Color::BLACK, 45);
        assert!(content.details.is_empty());
        assert!(content.milestones.is_none());
    }

    #[test]
    fn test_placement_default_offset() {
        let at = place_tooltip(Point::new(100.0, 100.0), (200.0, 80.0), (1000.0, 800.0), 15.0);
        assert_eq!(at, Point::new(115.0, 115.0));
    }

    #[test]
    fn test_placement_flips_on_overflow() {
        let at = place_tooltip(Point::new(900.0, 750.0), (200.0, 80.0), (1000.0, 800.0), 15.0);
        assert_eq!(at, Point::new(685.0, 655.0));
    }

    #[test]
    fn test_placement_is_clamped() {
        // Too large to fit on either side
        let at = place_tooltip(Point::new(50.0, 40.0), (990.0, 790.0), (1000.0, 800.0), 15.0);
        assert_eq!(at, Point::new(15.0, 15.0));
    }
}
