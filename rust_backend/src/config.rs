//! Configuration file support.
//!
//! Settings are read from `atlas.toml`. Every section is optional; a view
//! section only needs the keys that differ from that view's preset:
//!
//! ```toml
//! default_domain = [-10000, 750]
//!
//! [strata.layout]
//! bar_gap = 4.0
//!
//! [rivers.render]
//! margin_left = 160.0
//!
//! [interaction]
//! pan_modifier = "shift"
//!
//! [continent_colors]
//! "Asia" = "#b8860b"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::algorithms::layout::LayoutConfig;
use crate::error::{AtlasError, AtlasResult};
use crate::interaction::controller::InteractionConfig;
use crate::render::color::{Color, ContinentPalette, EventPalette};
use crate::render::engine::{PeriodBand, RenderConfig};
use crate::render::scale::YEAR_LIMIT;

/// Years shown before any zoom or pan.
pub const DEFAULT_DOMAIN: (f64, f64) = (-10000.0, 750.0);

/// Layout and drawing settings of one timeline view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl ViewConfig {
    pub fn strata() -> Self {
        Self {
            layout: LayoutConfig::strata(),
            render: RenderConfig::strata(),
        }
    }

    pub fn rivers() -> Self {
        Self {
            layout: LayoutConfig::rivers(),
            render: RenderConfig::rivers(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasConfig {
    pub default_domain: (f64, f64),
    pub strata: ViewConfig,
    pub rivers: ViewConfig,
    pub interaction: InteractionConfig,
    pub continent_colors: ContinentPalette,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            default_domain: DEFAULT_DOMAIN,
            strata: ViewConfig::strata(),
            rivers: ViewConfig::rivers(),
            interaction: InteractionConfig::default(),
            continent_colors: ContinentPalette::default(),
        }
    }
}

/// File layout before presets are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtlasConfigFile {
    default_domain: Option<(f64, f64)>,
    strata: Option<toml::Value>,
    rivers: Option<toml::Value>,
    #[serde(default)]
    interaction: InteractionConfig,
    periods: Option<Vec<PeriodBand>>,
    continent_colors: Option<BTreeMap<String, Color>>,
    event_colors: Option<EventPalette>,
}

impl AtlasConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AtlasConfig)` if successful
    /// * `Err(AtlasError::ConfigurationError)` if the file cannot be read,
    ///   parsed, or holds invalid values
    pub fn from_file<P: AsRef<Path>>(path: P) -> AtlasResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AtlasError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> AtlasResult<Self> {
        let file: AtlasConfigFile = toml::from_str(content).map_err(|e| {
            AtlasError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })?;

        let mut config = AtlasConfig {
            default_domain: file.default_domain.unwrap_or(DEFAULT_DOMAIN),
            strata: overlay_section(ViewConfig::strata(), file.strata.as_ref(), "strata")?,
            rivers: overlay_section(ViewConfig::rivers(), file.rivers.as_ref(), "rivers")?,
            interaction: file.interaction,
            continent_colors: ContinentPalette::default(),
        };

        if let Some(periods) = file.periods {
            config.strata.render.periods = periods.clone();
            config.rivers.render.periods = periods;
        }
        if let Some(events) = file.event_colors {
            config.strata.render.event_colors = events;
            config.rivers.render.event_colors = events;
        }
        if let Some(colors) = file.continent_colors {
            let mut merged: BTreeMap<String, Color> = config
                .continent_colors
                .entries()
                .map(|(name, color)| (name.to_string(), color))
                .collect();
            merged.extend(colors);
            config.continent_colors = ContinentPalette::new(merged);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `atlas.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    ///
    /// Falls back to the built-in defaults when no file exists. A file that
    /// exists but does not parse is an error.
    pub fn load_default() -> AtlasResult<Self> {
        let search_paths = [
            PathBuf::from("atlas.toml"),
            PathBuf::from("rust_backend/atlas.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        info!("No atlas.toml found, using built-in defaults");
        Ok(Self::default())
    }

    /// Reject values that would make layout or rendering meaningless.
    pub fn validate(&self) -> AtlasResult<()> {
        let (min, max) = self.default_domain;
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(AtlasError::ConfigurationError(format!(
                "default_domain must be an increasing pair of years, got [{}, {}]",
                min, max
            )));
        }
        if min < -YEAR_LIMIT || max > YEAR_LIMIT {
            return Err(AtlasError::ConfigurationError(format!(
                "default_domain must lie within ±{} years, got [{}, {}]",
                YEAR_LIMIT, min, max
            )));
        }

        for (name, view) in [("strata", &self.strata), ("rivers", &self.rivers)] {
            let layout = &view.layout;
            if layout.base_bar_height <= 0.0 || layout.min_bar_height <= 0.0 {
                return Err(AtlasError::ConfigurationError(format!(
                    "{}.layout: bar heights must be positive",
                    name
                )));
            }
            let negative_gap = [layout.bar_gap, layout.region_gap, layout.continent_gap]
                .iter()
                .any(|gap| *gap < 0.0);
            if negative_gap {
                return Err(AtlasError::ConfigurationError(format!(
                    "{}.layout: gaps cannot be negative",
                    name
                )));
            }
            if view.render.margin_left < 0.0 || view.render.margin_right < 0.0 {
                return Err(AtlasError::ConfigurationError(format!(
                    "{}.render: margins cannot be negative",
                    name
                )));
            }
            if let Some(period) = view.render.periods.iter().find(|p| p.start >= p.end) {
                return Err(AtlasError::ConfigurationError(format!(
                    "period '{}' ends before it starts",
                    period.name
                )));
            }
        }

        let interaction = &self.interaction;
        if interaction.zoom_in_factor <= 1.0 || !(0.0..1.0).contains(&interaction.zoom_out_factor)
        {
            return Err(AtlasError::ConfigurationError(
                "interaction: zoom_in_factor must exceed 1 and zoom_out_factor lie in (0, 1)"
                    .to_string(),
            ));
        }
        if !(0.0..1.0).contains(&interaction.wheel_speed) || interaction.min_span_years <= 0.0 {
            return Err(AtlasError::ConfigurationError(
                "interaction: wheel_speed must lie in [0, 1) and min_span_years be positive"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Period bands shared by both views.
    pub fn periods(&self) -> &[PeriodBand] {
        &self.strata.render.periods
    }
}

/// Apply the keys of `patch` on top of `preset`.
///
/// Tables merge recursively; any other value replaces the preset's.
fn overlay_section<T>(preset: T, patch: Option<&toml::Value>, section: &str) -> AtlasResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let Some(patch) = patch else {
        return Ok(preset);
    };
    let mut base = toml::Value::try_from(&preset).map_err(|e| {
        AtlasError::ConfigurationError(format!("Cannot encode [{}] preset: {}", section, e))
    })?;
    merge(&mut base, patch);
    base.try_into().map_err(|e| {
        AtlasError::ConfigurationError(format!("Invalid [{}] section: {}", section, e))
    })
}

fn merge(base: &mut toml::Value, patch: &toml::Value) {
    match (base, patch) {
        (toml::Value::Table(base), toml::Value::Table(patch)) => {
            for (key, value) in patch {
                match base.get_mut(key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::layout::Grouping;
    use crate::interaction::controller::Modifier;
    use crate::render::color::ColorScheme;
    use crate::render::engine::{default_periods, TimelineStyle};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AtlasConfig::from_toml_str("").unwrap();
        assert_eq!(config, AtlasConfig::default());
        assert_eq!(config.default_domain, (-10000.0, 750.0));
        assert_eq!(config.periods().len(), 6);
    }

    #[test]
    fn test_partial_view_section_keeps_preset() {
        let config = AtlasConfig::from_toml_str(
            r#"
            [rivers.layout]
            bar_gap = 8.0

            [rivers.render]
            margin_left = 160.0

            [rivers.render.fonts.label]
            size = 11.0
            "#,
        )
        .unwrap();

        let rivers = &config.rivers;
        assert_eq!(rivers.layout.bar_gap, 8.0);
        assert_eq!(rivers.layout.base_bar_height, 15.0);
        assert_eq!(rivers.layout.grouping, Grouping::ContinentOnly);
        assert_eq!(rivers.render.style, TimelineStyle::Rivers);
        assert_eq!(rivers.render.margin_left, 160.0);
        assert_eq!(rivers.render.fonts.label.size, 11.0);
        assert_eq!(rivers.render.fonts.label.family, "Source Sans Pro");
        assert_eq!(config.strata, ViewConfig::strata());
    }

    #[test]
    fn test_shared_sections() {
        let config = AtlasConfig::from_toml_str(
            r##"
            default_domain = [-5000, 0]

            [interaction]
            pan_modifier = "shift"
            hover_throttle_ms = 32.0

            [[periods]]
            name = "Bronce"
            start = -3000.0
            end = -1000.0
            color = "rgba(205, 150, 80, 0.15)"

            [continent_colors]
            "Atlántida" = "#123456"

            [event_colors]
            writing = "#000000"
            "##,
        )
        .unwrap();

        assert_eq!(config.default_domain, (-5000.0, 0.0));
        assert_eq!(config.interaction.pan_modifier, Modifier::Shift);
        assert_eq!(config.interaction.hover_throttle_ms, 32.0);
        assert_eq!(config.interaction.pan_threshold_px, 5.0);
        assert_eq!(config.strata.render.periods.len(), 1);
        assert_eq!(config.rivers.render.periods.len(), 1);
        assert_eq!(
            config.continent_colors.continent_color("Atlántida"),
            Color::rgb(0x12, 0x34, 0x56)
        );
        // Built-in entries survive
        assert_eq!(
            config.continent_colors.continent_color("Asia"),
            ContinentPalette::default().continent_color("Asia")
        );
        assert_eq!(config.strata.render.event_colors.writing, Color::BLACK);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for toml in [
            "default_domain = [750, -10000]",
            "default_domain = [-1e20, 0.0]",
            "[strata.layout]\nbase_bar_height = 0.0",
            "[interaction]\nzoom_in_factor = 0.5",
            "[[periods]]\nname = \"x\"\nstart = 10.0\nend = 0.0\ncolor = \"#ffffff\"",
            "unknown_key = 1",
        ] {
            let err = AtlasConfig::from_toml_str(toml).unwrap_err();
            assert!(
                matches!(err, AtlasError::ConfigurationError(_)),
                "expected configuration error for {toml:?}"
            );
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[strata.layout]\nmargin_top = 40.0").unwrap();
        file.flush().unwrap();

        let config = AtlasConfig::from_file(file.path()).unwrap();
        assert_eq!(config.strata.layout.margin_top, 40.0);

        let missing = AtlasConfig::from_file("/nonexistent/atlas.toml");
        assert!(missing.is_err());
    }

    #[test]
    fn test_sample_file_parses() {
        let config = AtlasConfig::from_toml_str(include_str!("../atlas.toml")).unwrap();
        let defaults = AtlasConfig::default();

        assert_eq!(config.strata.layout, defaults.strata.layout);
        assert_eq!(config.rivers.render.style, TimelineStyle::Rivers);
        assert_eq!(config.interaction, defaults.interaction);
        assert_eq!(config.periods().len(), 6);
        assert_eq!(config.periods()[2].name, "Edad del Bronce");
        assert_eq!(
            config.continent_colors.continent_color("Asia"),
            defaults.continent_colors.continent_color("Asia")
        );
    }

    #[test]
    fn test_builtin_periods_cover_default_domain() {
        let periods = default_periods();
        assert_eq!(periods.first().unwrap().start, DEFAULT_DOMAIN.0);
        assert_eq!(periods.last().unwrap().end, DEFAULT_DOMAIN.1);
    }
}
