use std::collections::BTreeSet;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::domain::RawRecord;
use crate::parsing::chronology::parse_date_range;

/// Record counts for one continent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinentCount {
    pub continent: String,
    pub records: usize,
    pub datable: usize,
}

/// Dataset-level summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub datable_records: usize,
    pub undatable_records: usize,
    pub continent_count: usize,
    pub region_count: usize,
    pub earliest_year: Option<i32>,
    pub latest_year: Option<i32>,
    /// Mean parse confidence over datable records
    pub mean_confidence: f64,
    pub continents: Vec<ContinentCount>,
}

/// Build a DataFrame with one row per record and its parsed date range
///
/// Columns: `continent`, `region`, `culture`, `start_year`, `end_year`, `confidence`,
/// `datable`. Bounds and confidence are null for undatable records.
pub fn records_to_dataframe(records: &[RawRecord]) -> PolarsResult<DataFrame> {
    let ranges: Vec<_> = records
        .iter()
        .map(|r| parse_date_range(&r.chronology))
        .collect();

    let continents: Vec<String> = records.iter().map(|r| r.continent.clone()).collect();
    let regions: Vec<Option<String>> = records.iter().map(|r| r.region.clone()).collect();
    let cultures: Vec<String> = records.iter().map(|r| r.culture.clone()).collect();
    let starts: Vec<Option<i32>> = ranges.iter().map(|r| r.bounds().map(|b| b.0)).collect();
    let ends: Vec<Option<i32>> = ranges.iter().map(|r| r.bounds().map(|b| b.1)).collect();
    let confidences: Vec<Option<f64>> = ranges
        .iter()
        .map(|r| r.is_datable().then_some(r.confidence))
        .collect();
    let datable: Vec<bool> = ranges.iter().map(|r| r.is_datable()).collect();

    df!(
        "continent" => continents,
        "region" => regions,
        "culture" => cultures,
        "start_year" => starts,
        "end_year" => ends,
        "confidence" => confidences,
        "datable" => datable,
    )
}

/// Compute dataset-level summary statistics
///
/// # Arguments
/// * `records` - Loaded records, datable or not
///
/// # Returns
/// DatasetSummary with per-continent counts sorted by continent name
pub fn compute_summary(records: &[RawRecord]) -> PolarsResult<DatasetSummary> {
    let df = records_to_dataframe(records)?;
    let total_records = df.height();

    let datable_records = df.column("datable")?.bool()?.sum().unwrap_or(0) as usize;
    let earliest_year = df.column("start_year")?.i32()?.min();
    let latest_year = df.column("end_year")?.i32()?.max();
    let mean_confidence = df.column("confidence")?.f64()?.mean().unwrap_or(0.0);
    let region_count = df
        .column("region")?
        .str()?
        .into_iter()
        .flatten()
        .filter(|name| !name.is_empty())
        .collect::<BTreeSet<_>>()
        .len();

    let grouped = df
        .lazy()
        .group_by([col("continent")])
        .agg([
            len().cast(DataType::Int64).alias("records"),
            col("datable").cast(DataType::Int64).sum().alias("datable"),
        ])
        .sort(["continent"], SortMultipleOptions::default())
        .collect()?;

    let names = grouped.column("continent")?.str()?;
    let counts = grouped.column("records")?.i64()?;
    let datable_counts = grouped.column("datable")?.i64()?;

    let continents: Vec<ContinentCount> = (0..grouped.height())
        .map(|i| ContinentCount {
            continent: names.get(i).unwrap_or_default().to_string(),
            records: counts.get(i).unwrap_or(0) as usize,
            datable: datable_counts.get(i).unwrap_or(0) as usize,
        })
        .collect();

    Ok(DatasetSummary {
        total_records,
        datable_records,
        undatable_records: total_records - datable_records,
        continent_count: continents.len(),
        region_count,
        earliest_year,
        latest_year,
        mean_confidence,
        continents,
    })
}
