//! Domain models for civilization records and their timeline geometry.
//!
//! A [`RawRecord`] is one row of the source table. The layout engine turns a
//! set of records into a [`LayoutResult`]: continents, regions and entities
//! with their vertical positions fixed for one layout pass.

use serde::{Deserialize, Serialize};

use crate::render::color::Color;

/// One civilization row as loaded from the source table.
///
/// Continent and culture are required; rows missing either never reach the
/// engine. The chronology text may be empty, in which case the record is
/// undatable and left out of the timelines (but not out of the data set).
///
/// # Examples
///
/// ```
/// use atlas_rust::core::domain::RawRecord;
///
/// let record = RawRecord::new("Asia", "Harappa", "2600-1900 a.C.")
///     .with_region("Asia Meridional")
///     .with_writing("Escritura del Indo (sin descifrar)");
///
/// assert_eq!(record.region.as_deref(), Some("Asia Meridional"));
/// assert!(record.architecture.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub continent: String,
    pub region: Option<String>,
    pub area: Option<String>,
    pub culture: String,
    pub chronology: String,
    pub subsistence: Option<String>,
    pub settlement: Option<String>,
    pub architecture: Option<String>,
    pub technology: Option<String>,
    pub hierarchy: Option<String>,
    pub exchange: Option<String>,
    pub writing: Option<String>,
}

impl RawRecord {
    /// Creates a record with only the required fields set.
    pub fn new(
        continent: impl Into<String>,
        culture: impl Into<String>,
        chronology: impl Into<String>,
    ) -> Self {
        Self {
            continent: continent.into(),
            culture: culture.into(),
            chronology: chronology.into(),
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn with_subsistence(mut self, subsistence: impl Into<String>) -> Self {
        self.subsistence = Some(subsistence.into());
        self
    }

    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = Some(architecture.into());
        self
    }

    pub fn with_technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = Some(technology.into());
        self
    }

    pub fn with_hierarchy(mut self, hierarchy: impl Into<String>) -> Self {
        self.hierarchy = Some(hierarchy.into());
        self
    }

    pub fn with_writing(mut self, writing: impl Into<String>) -> Self {
        self.writing = Some(writing.into());
        self
    }

    /// Optional field as a string slice, empty when absent.
    pub fn field(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("")
    }
}

/// A year interval parsed from chronology text.
///
/// Years are astronomical: negative is BCE, zero is year zero. When both bounds
/// are present `start_year <= end_year` holds. Missing bounds mean the text
/// could not be dated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub confidence: f64,
}

impl DateRange {
    /// The value returned for text without a usable date.
    pub const fn undatable() -> Self {
        Self {
            start_year: None,
            end_year: None,
            confidence: 0.0,
        }
    }

    /// Both bounds, when the range is datable.
    pub fn bounds(&self) -> Option<(i32, i32)> {
        match (self.start_year, self.end_year) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    pub fn is_datable(&self) -> bool {
        self.bounds().is_some()
    }

    /// Length of the range in years.
    pub fn span(&self) -> Option<i32> {
        self.bounds().map(|(start, end)| end - start)
    }
}

/// Kind of milestone attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Writing,
    Metal,
    Architecture,
    State,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::Writing,
        EventType::Metal,
        EventType::Architecture,
        EventType::State,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Writing => "writing",
            EventType::Metal => "metal",
            EventType::Architecture => "architecture",
            EventType::State => "state",
        }
    }
}

/// A dated milestone derived from a record's descriptive fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub year: f64,
    #[serde(rename = "type")]
    pub kind: EventType,
}

/// A record placed on the timeline.
///
/// `y_position` and `bar_height` are fixed by the layout engine; a new layout
/// pass builds new entities instead of editing these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntity {
    pub id: String,
    pub name: String,
    pub record: RawRecord,
    pub start_year: i32,
    pub end_year: i32,
    pub confidence: f64,
    pub significance: f64,
    pub events: Vec<Event>,
    pub bar_height: f64,
    pub y_position: f64,
}

impl TimelineEntity {
    /// Bottom edge of the bar.
    pub fn bottom(&self) -> f64 {
        self.y_position + self.bar_height
    }

    /// Region name as shown to users, falling back to `N/A`.
    pub fn region_label(&self) -> &str {
        self.record.region.as_deref().unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionGroup {
    pub name: String,
    pub start_y: f64,
    pub label_y: f64,
    /// Height from `start_y` to the bottom of the last bar.
    pub height: f64,
    pub entities: Vec<TimelineEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinentGroup {
    pub name: String,
    pub color: Color,
    pub start_y: f64,
    pub label_y: f64,
    pub height: f64,
    pub regions: Vec<RegionGroup>,
}

/// Vertical spacing a layout was computed with.
///
/// Carried on the result so drawing and hit-testing agree with the layout
/// that produced the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spacing {
    pub margin_top: f64,
    pub bar_gap: f64,
    pub region_gap: f64,
    pub continent_gap: f64,
}

/// Complete renderable geometry for one visualization instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub continents: Vec<ContinentGroup>,
    pub spacing: Spacing,
    /// Total drawing height, bottom padding and minimum height included.
    pub content_height: f64,
}

impl LayoutResult {
    /// A layout with no groups, as produced for an empty data set.
    pub fn empty(spacing: Spacing, content_height: f64) -> Self {
        Self {
            continents: Vec::new(),
            spacing,
            content_height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.continents.is_empty()
    }

    /// All entities in drawing order.
    pub fn entities(&self) -> impl Iterator<Item = &TimelineEntity> {
        self.continents
            .iter()
            .flat_map(|continent| continent.regions.iter())
            .flat_map(|region| region.entities.iter())
    }

    pub fn entity_count(&self) -> usize {
        self.entities().count()
    }

    pub fn find(&self, id: &str) -> Option<&TimelineEntity> {
        self.entities().find(|entity| entity.id == id)
    }

    /// Entity together with the color of its continent.
    pub fn find_with_color(&self, id: &str) -> Option<(&TimelineEntity, Color)> {
        self.continents.iter().find_map(|continent| {
            continent
                .regions
                .iter()
                .flat_map(|region| region.entities.iter())
                .find(|entity| entity.id == id)
                .map(|entity| (entity, continent.color))
        })
    }
}

/// Interactive state of one view, read by the renderer every frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportState {
    /// Visible years, `[min, max]`.
    pub domain: (f64, f64),
    pub hovered_entity_id: Option<String>,
    pub is_interacting: bool,
}

impl ViewportState {
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            hovered_entity_id: None,
            is_interacting: false,
        }
    }
}
