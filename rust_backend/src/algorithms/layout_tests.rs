#[cfg(test)]
mod tests {
    use crate::algorithms::layout::{layout, Grouping, LayoutConfig};
    use crate::core::domain::{LayoutResult, RawRecord};
    use crate::render::color::{Color, ColorScheme, ContinentPalette};
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn palette() -> ContinentPalette {
        ContinentPalette::default()
    }

    fn asia_records() -> Vec<RawRecord> {
        vec![
            RawRecord::new("Asia", "Elam", "3200-539 a.C.").with_region("Asia Occidental"),
            RawRecord::new("Asia", "Sumeria", "3500-2000 a.C.").with_region("Asia Occidental"),
        ]
    }

    /// Every pair of bars in the layout must be vertically disjoint
    fn assert_no_overlaps(result: &LayoutResult) {
        let mut spans: Vec<(f64, f64)> = result
            .entities()
            .map(|e| (e.y_position, e.bottom()))
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in spans.windows(2) {
            assert!(
                pair[0].1 <= pair[1].0 + EPS,
                "bars overlap: {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    /// Test the strata sweep positions for a single region
    #[test]
    fn test_strata_positions() {
        let result = layout(&asia_records(), &LayoutConfig::strata(), &palette());

        assert_eq!(result.continents.len(), 1);
        let continent = &result.continents[0];
        assert_eq!(continent.name, "Asia");
        assert!((continent.start_y - 60.0).abs() < EPS);
        assert!((continent.label_y - 50.0).abs() < EPS);

        let region = &continent.regions[0];
        assert_eq!(region.name, "Asia Occidental");
        assert!((region.label_y - 65.0).abs() < EPS);

        let names: Vec<&str> = region.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Sumeria", "Elam"]);

        let first = &region.entities[0];
        let second = &region.entities[1];
        assert_eq!(first.bar_height, 19.0);
        assert!((first.y_position - (60.0 + 20.0 / 1.5)).abs() < EPS);
        assert!((second.y_position - (first.y_position + 19.0 + 3.0)).abs() < EPS);
        assert!((region.height - (20.0 / 1.5 + 19.0 + 3.0 + 19.0)).abs() < EPS);
        assert!((continent.height - region.height).abs() < EPS);
        assert_eq!(result.content_height, 600.0);
    }

    /// Test the bar lies inside the region span
    #[test]
    fn test_entities_inside_region_span() {
        let result = layout(&asia_records(), &LayoutConfig::strata(), &palette());
        for continent in &result.continents {
            for region in &continent.regions {
                for entity in &region.entities {
                    assert!(entity.y_position >= region.start_y);
                    assert!(entity.bottom() <= region.start_y + region.height + EPS);
                }
            }
        }
    }

    /// Test two layouts of the same input are identical
    #[test]
    fn test_layout_is_idempotent() {
        let records = asia_records();
        let config = LayoutConfig::strata();
        assert_eq!(
            layout(&records, &config, &palette()),
            layout(&records, &config, &palette())
        );
    }

    /// Test undatable records are skipped and empty groups dropped
    #[test]
    fn test_undatable_records_are_skipped() {
        let mut records = asia_records();
        records.push(RawRecord::new("Europa", "Desconocidos", "sin datos"));
        let result = layout(&records, &LayoutConfig::strata(), &palette());

        assert_eq!(result.entity_count(), 2);
        assert!(result.continents.iter().all(|c| c.name != "Europa"));
    }

    /// Test an empty input still yields the minimum height
    #[test]
    fn test_empty_layout() {
        let result = layout(&[], &LayoutConfig::strata(), &palette());
        assert!(result.is_empty());
        assert_eq!(result.content_height, 600.0);

        let rivers = layout(&[], &LayoutConfig::rivers(), &palette());
        assert_eq!(rivers.content_height, 500.0);
    }

    /// Test missing region falls back to the unknown region name
    #[test]
    fn test_missing_region_name() {
        let records = vec![RawRecord::new("África", "Nok", "1000-300 a.C.")];
        let result = layout(&records, &LayoutConfig::strata(), &palette());
        assert_eq!(result.continents[0].regions[0].name, "Unknown region");
        assert_eq!(
            result.continents[0].regions[0].entities[0].id,
            "África-Unknown region-Nok-0"
        );
    }

    /// Test blank continent names group under the unknown continent
    #[test]
    fn test_blank_continent_name() {
        let records = vec![RawRecord::new("  ", "Anónima", "1000-300 a.C.")];
        let result = layout(&records, &LayoutConfig::strata(), &palette());
        assert_eq!(result.continents[0].name, "Unknown");
    }

    /// Test continents and regions are ordered by name
    #[test]
    fn test_group_ordering() {
        let records = vec![
            RawRecord::new("Europa", "Minoica", "2000-1450 a.C.").with_region("Egeo"),
            RawRecord::new("Asia", "Shang", "1600-1046 a.C.").with_region("Asia Oriental"),
            RawRecord::new("Asia", "Harappa", "2600-1900 a.C.").with_region("Asia Meridional"),
        ];
        let result = layout(&records, &LayoutConfig::strata(), &palette());
        let continents: Vec<&str> = result.continents.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(continents, vec!["Asia", "Europa"]);
        let regions: Vec<&str> = result.continents[0]
            .regions
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(regions, vec!["Asia Meridional", "Asia Oriental"]);
        assert!(result.continents[1].start_y > result.continents[0].start_y);
        assert_no_overlaps(&result);
    }

    /// Test equal start years keep input order
    #[test]
    fn test_sort_is_stable() {
        let records = vec![
            RawRecord::new("Asia", "B", "3000-2000 a.C."),
            RawRecord::new("Asia", "A", "3000-2500 a.C."),
        ];
        let result = layout(&records, &LayoutConfig::strata(), &palette());
        let names: Vec<&str> = result.entities().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    /// Test the rivers grouping collapses regions
    #[test]
    fn test_rivers_grouping() {
        let records = vec![
            RawRecord::new("Europa", "Minoica", "2000-1450 a.C.").with_region("Egeo"),
            RawRecord::new("Asia", "Shang", "1600-1046 a.C.").with_region("Asia Oriental"),
            RawRecord::new("Asia", "Harappa", "2600-1900 a.C.").with_region("Asia Meridional"),
        ];
        let config = LayoutConfig::rivers();
        assert_eq!(config.grouping, Grouping::ContinentOnly);
        let result = layout(&records, &config, &palette());

        let asia = &result.continents[0];
        assert_eq!(asia.regions.len(), 1);
        assert_eq!(asia.regions[0].name, "Asia");
        assert_eq!(asia.regions[0].entities[0].id, "Asia-Harappa-2");
        assert!((asia.regions[0].entities[0].y_position - 50.0).abs() < EPS);

        // 50 + 18 + 6 + 18, then the continent gap
        let europa = &result.continents[1];
        assert!((europa.start_y - 122.0).abs() < EPS);
        assert!((europa.label_y - 114.0).abs() < EPS);
        assert_no_overlaps(&result);
    }

    /// Test bar heights follow significance with a floor
    #[test]
    fn test_bar_height_floor() {
        let config = LayoutConfig {
            base_bar_height: 8.0,
            ..LayoutConfig::strata()
        };
        assert_eq!(config.bar_height(0.6), 10.0);
        assert_eq!(LayoutConfig::strata().bar_height(0.6), 17.0);
        assert_eq!(LayoutConfig::strata().bar_height(1.6), 23.0);
    }

    /// Test continent colors come from the color scheme
    #[test]
    fn test_continent_colors_from_scheme() {
        struct Flat;
        impl ColorScheme for Flat {
            fn continent_color(&self, _continent: &str) -> Color {
                Color::rgb(1, 2, 3)
            }
        }
        let result = layout(&asia_records(), &LayoutConfig::strata(), &Flat);
        assert_eq!(result.continents[0].color, Color::rgb(1, 2, 3));
    }

    /// Test a partial config file falls back to the strata values
    #[test]
    fn test_partial_config_deserializes() {
        let config: LayoutConfig = toml::from_str("bar_gap = 5.0\ngrouping = \"continent_only\"").unwrap();
        assert_eq!(config.bar_gap, 5.0);
        assert_eq!(config.grouping, Grouping::ContinentOnly);
        assert_eq!(config.base_bar_height, 16.0);
    }

    fn record_strategy() -> impl Strategy<Value = RawRecord> {
        (
            prop::sample::select(vec!["Asia", "Europa", "África", ""]),
            prop::sample::select(vec!["Norte", "Sur", ""]),
            0u32..9000,
            0u32..3000,
            prop::sample::select(vec![" a.C.", " d.C.", "", "?"]),
        )
            .prop_map(|(continent, region, start, length, era)| {
                let record = RawRecord::new(
                    continent,
                    "Cultura",
                    format!("{}-{}{}", start + length, start, era),
                );
                if region.is_empty() {
                    record
                } else {
                    record.with_region(region)
                }
            })
    }

    proptest! {
        #[test]
        fn prop_layout_never_overlaps(records in prop::collection::vec(record_strategy(), 0..40)) {
            for config in [LayoutConfig::strata(), LayoutConfig::rivers()] {
                let result = layout(&records, &config, &ContinentPalette::default());
                assert_no_overlaps(&result);
                for entity in result.entities() {
                    prop_assert!(entity.start_year <= entity.end_year);
                    prop_assert!(entity.bottom() <= result.content_height);
                }
            }
        }

        #[test]
        fn prop_regions_are_sorted_by_start(records in prop::collection::vec(record_strategy(), 0..40)) {
            let result = layout(&records, &LayoutConfig::strata(), &ContinentPalette::default());
            for continent in &result.continents {
                for region in &continent.regions {
                    prop_assert!(!region.entities.is_empty());
                    for pair in region.entities.windows(2) {
                        prop_assert!(pair[0].start_year <= pair[1].start_year);
                    }
                }
            }
        }
    }
}
