use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::domain::RawRecord;
use crate::parsing::chronology::parse_date_range;

/// User-selected filters. Empty strings behave like unset fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Exact continent name
    pub continent: Option<String>,
    /// Exact region name
    pub region: Option<String>,
    /// Case-insensitive substring of the subsistence column
    pub subsistence: Option<String>,
    /// Period value such as `"4000-2000"` or `"0-500"`
    pub period: Option<String>,
    /// Free text searched in culture, technology, architecture and area
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn with_continent(mut self, continent: impl Into<String>) -> Self {
        self.continent = Some(continent.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_subsistence(mut self, subsistence: impl Into<String>) -> Self {
        self.subsistence = Some(subsistence.into());
        self
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        [
            &self.continent,
            &self.region,
            &self.subsistence,
            &self.period,
            &self.search,
        ]
        .iter()
        .all(|value| active(value).is_none())
    }

    /// Whether `record` passes every active criterion.
    pub fn matches(&self, record: &RawRecord) -> bool {
        if let Some(continent) = active(&self.continent) {
            if record.continent != continent {
                return false;
            }
        }
        if let Some(region) = active(&self.region) {
            if RawRecord::field(&record.region) != region {
                return false;
            }
        }
        if let Some(subsistence) = active(&self.subsistence) {
            let haystack = RawRecord::field(&record.subsistence).to_lowercase();
            if !haystack.contains(&subsistence.to_lowercase()) {
                return false;
            }
        }
        if let Some(period) = active(&self.period) {
            if !matches_period(&record.chronology, period) {
                return false;
            }
        }
        if let Some(search) = active(&self.search) {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() && !search_target(record).contains(&needle) {
                return false;
            }
        }
        true
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn search_target(record: &RawRecord) -> String {
    [
        record.culture.as_str(),
        RawRecord::field(&record.technology),
        RawRecord::field(&record.architecture),
        RawRecord::field(&record.area),
    ]
    .join(" ")
    .to_lowercase()
}

/// Records passing `criteria`, in input order.
pub fn filter_records(records: &[RawRecord], criteria: &FilterCriteria) -> Vec<RawRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// Resolve a period value like `"2000-1000"` to signed year bounds.
///
/// Unsigned values are read the way the period selector writes them:
/// a descending pair is BCE, `"N-0"` runs from N BCE to year zero, and an
/// ascending pair of positive years is CE. Returns `None` when either side
/// has no leading digits.
pub fn parse_period(value: &str) -> Option<(i32, i32)> {
    let mut parts = value.split('-');
    let start = leading_int(parts.next()?)?;
    let end = leading_int(parts.next()?)?;

    let (start, end) = if start > end {
        (-start, -end)
    } else if start > 0 && end == 0 {
        (-start, 0)
    } else if start >= 0 && end > 0 {
        (start, end)
    } else {
        (-start.abs(), -end.abs())
    };

    Some((start.min(end), start.max(end)))
}

fn leading_int(text: &str) -> Option<i32> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Whether the chronology text overlaps the period value.
///
/// Undatable chronologies and malformed periods never match.
pub fn matches_period(chronology: &str, period: &str) -> bool {
    let Some((period_start, period_end)) = parse_period(period) else {
        return false;
    };
    let Some((start, end)) = parse_date_range(chronology).bounds() else {
        return false;
    };
    !(end < period_start || start > period_end)
}

/// Distinct non-empty values a host UI can offer as filter choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub continents: Vec<String>,
    pub regions: Vec<String>,
    pub subsistences: Vec<String>,
}

/// Sorted distinct continent, region and subsistence values.
pub fn filter_options(records: &[RawRecord]) -> FilterOptions {
    let mut continents = BTreeSet::new();
    let mut regions = BTreeSet::new();
    let mut subsistences = BTreeSet::new();

    for record in records {
        if !record.continent.is_empty() {
            continents.insert(record.continent.clone());
        }
        if let Some(region) = active(&record.region) {
            regions.insert(region.to_string());
        }
        if let Some(subsistence) = active(&record.subsistence) {
            subsistences.insert(subsistence.to_string());
        }
    }

    FilterOptions {
        continents: continents.into_iter().collect(),
        regions: regions.into_iter().collect(),
        subsistences: subsistences.into_iter().collect(),
    }
}
