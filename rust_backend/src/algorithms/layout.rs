//! Vertical layout of timeline entities.
//!
//! Records are grouped by continent and region, each group sorted, and a
//! single top-to-bottom sweep assigns every bar its `y_position`. Bars never
//! share a row: entities whose time ranges overlap are stacked, not packed
//! side by side. The sweep is deterministic for a given input order and
//! configuration.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithms::significance::{extract_events, significance};
use crate::core::domain::{
    ContinentGroup, LayoutResult, RawRecord, RegionGroup, Spacing, TimelineEntity,
};
use crate::parsing::chronology::parse_date_range;
use crate::render::color::ColorScheme;

/// How records are grouped into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Continent, then region within the continent.
    ContinentAndRegion,
    /// Continent only; each continent holds a single region named after it.
    ContinentOnly,
}

/// Spacing and sizing used by one layout pass. All values are pixels.
///
/// Fields missing from a configuration file take the strata defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub grouping: Grouping,
    pub base_bar_height: f64,
    pub min_bar_height: f64,
    pub bar_gap: f64,
    pub region_gap: f64,
    /// Offset of a region's first bar below the region start.
    pub region_lead: f64,
    pub continent_gap: f64,
    pub margin_top: f64,
    /// Continent labels sit this far above the continent start...
    pub continent_label_lift: f64,
    /// ...but never above `margin_top` plus this.
    pub continent_label_floor: f64,
    pub region_label_lift: f64,
    /// Region labels stay at least this far below the continent label.
    pub region_label_floor: f64,
    pub bottom_padding: f64,
    pub min_height: f64,
    pub unknown_continent: String,
    pub unknown_region: String,
}

impl LayoutConfig {
    /// Banded chart grouped by continent and region.
    pub fn strata() -> Self {
        Self {
            grouping: Grouping::ContinentAndRegion,
            base_bar_height: 16.0,
            min_bar_height: 10.0,
            bar_gap: 3.0,
            region_gap: 20.0,
            region_lead: 20.0 / 1.5,
            continent_gap: 30.0,
            margin_top: 30.0,
            continent_label_lift: 10.0,
            continent_label_floor: 15.0,
            region_label_lift: 3.0,
            region_label_floor: 15.0,
            bottom_padding: 40.0,
            min_height: 600.0,
            unknown_continent: "Unknown".to_string(),
            unknown_region: "Unknown region".to_string(),
        }
    }

    /// Flow chart grouped by continent only.
    pub fn rivers() -> Self {
        Self {
            grouping: Grouping::ContinentOnly,
            base_bar_height: 15.0,
            bar_gap: 6.0,
            region_gap: 0.0,
            region_lead: 0.0,
            margin_top: 20.0,
            continent_label_lift: 8.0,
            continent_label_floor: 12.0,
            region_label_lift: 0.0,
            region_label_floor: 0.0,
            bottom_padding: 30.0,
            min_height: 500.0,
            ..Self::strata()
        }
    }

    pub fn spacing(&self) -> Spacing {
        Spacing {
            margin_top: self.margin_top,
            bar_gap: self.bar_gap,
            region_gap: self.region_gap,
            continent_gap: self.continent_gap,
        }
    }

    /// Bar height for a significance score.
    pub fn bar_height(&self, significance: f64) -> f64 {
        (self.base_bar_height * (0.8 + significance * 0.4))
            .round()
            .max(self.min_bar_height)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::strata()
    }
}

type Grouped = BTreeMap<String, BTreeMap<String, Vec<TimelineEntity>>>;

/// Compute the layout of `records`.
///
/// Undatable records are left out of the result. Continents and regions are
/// visited in name order and entities within a region by ascending start
/// year, ties keeping input order.
pub fn layout(
    records: &[RawRecord],
    config: &LayoutConfig,
    colors: &dyn ColorScheme,
) -> LayoutResult {
    let mut grouped: Grouped = BTreeMap::new();
    let mut undatable = 0;

    for (index, record) in records.iter().enumerate() {
        let continent = group_name(Some(&record.continent), &config.unknown_continent);
        let region = match config.grouping {
            Grouping::ContinentAndRegion => {
                group_name(record.region.as_ref(), &config.unknown_region)
            }
            Grouping::ContinentOnly => continent.clone(),
        };

        let id = match config.grouping {
            Grouping::ContinentAndRegion => {
                format!("{}-{}-{}-{}", continent, region, record.culture, index)
            }
            Grouping::ContinentOnly => format!("{}-{}-{}", continent, record.culture, index),
        };

        let Some(entity) = build_entity(id, record, config) else {
            undatable += 1;
            continue;
        };

        grouped
            .entry(continent)
            .or_default()
            .entry(region)
            .or_default()
            .push(entity);
    }

    let result = sweep(grouped, config, colors);
    debug!(
        "Layout pass: {} entities in {} continents, {} undatable records skipped",
        result.entity_count(),
        result.continents.len(),
        undatable
    );
    result
}

fn group_name(name: Option<&String>, fallback: &str) -> String {
    match name.map(|n| n.trim()) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => fallback.to_string(),
    }
}

fn build_entity(id: String, record: &RawRecord, config: &LayoutConfig) -> Option<TimelineEntity> {
    let range = parse_date_range(&record.chronology);
    let (start_year, end_year) = range.bounds()?;
    let significance = significance(Some(record));

    let name = if record.culture.trim().is_empty() {
        "Unnamed".to_string()
    } else {
        record.culture.clone()
    };

    Some(TimelineEntity {
        id,
        name,
        record: record.clone(),
        start_year,
        end_year,
        confidence: range.confidence,
        significance,
        events: extract_events(record),
        bar_height: config.bar_height(significance),
        y_position: 0.0,
    })
}

fn sweep(grouped: Grouped, config: &LayoutConfig, colors: &dyn ColorScheme) -> LayoutResult {
    let mut cursor = config.margin_top + config.continent_gap;
    let mut continents = Vec::with_capacity(grouped.len());

    for (name, regions) in grouped {
        let start_y = cursor;
        let label_y =
            (config.margin_top + config.continent_label_floor).max(cursor - config.continent_label_lift);
        let mut content = 0.0;
        let mut placed_regions = Vec::with_capacity(regions.len());

        for (region_name, mut entities) in regions {
            entities.sort_by_key(|entity| entity.start_year);

            let region_start = cursor;
            let region_label_y =
                (label_y + config.region_label_floor).max(cursor - config.region_label_lift);

            let mut offset = config.region_lead;
            for entity in entities.iter_mut() {
                entity.y_position = region_start + offset;
                offset += entity.bar_height + config.bar_gap;
            }
            let height = if entities.is_empty() {
                0.0
            } else {
                offset - config.bar_gap
            };

            cursor += height + config.region_gap;
            content += height + config.region_gap;

            placed_regions.push(RegionGroup {
                name: region_name,
                start_y: region_start,
                label_y: region_label_y,
                height,
                entities,
            });
        }

        cursor += config.continent_gap - config.region_gap;

        continents.push(ContinentGroup {
            color: colors.continent_color(&name),
            name,
            start_y,
            label_y,
            height: if content > 0.0 {
                content - config.region_gap
            } else {
                0.0
            },
            regions: placed_regions,
        });
    }

    LayoutResult {
        continents,
        spacing: config.spacing(),
        content_height: (cursor + config.bottom_padding).max(config.min_height),
    }
}
