use anyhow::{Context, Result};
use log::{debug, info};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use crate::core::columns::{self, *};
use crate::core::domain::RawRecord;

/// Records read from a table plus the number of rows that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    pub records: Vec<RawRecord>,
    /// Rows missing a continent or culture name
    pub discarded: usize,
}

/// Parse CSV file into a Polars DataFrame with every column read as text
pub fn parse_table_csv(csv_path: &Path) -> Result<DataFrame> {
    let df = text_read_options()
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()
        .context("Failed to parse CSV into DataFrame")?;
    Ok(df)
}

/// Parse CSV content held in memory
pub fn parse_table_csv_str(content: &str) -> Result<DataFrame> {
    let df = text_read_options()
        .into_reader_with_file_handle(Cursor::new(content.as_bytes().to_vec()))
        .finish()
        .context("Failed to parse CSV content into DataFrame")?;
    Ok(df)
}

/// Parse CSV file and convert rows to records
pub fn parse_records_csv(csv_path: &Path) -> Result<RecordTable> {
    let df = parse_table_csv(csv_path)?;
    dataframe_to_records(&df)
}

/// Parse in-memory CSV content and convert rows to records
pub fn parse_records_csv_str(content: &str) -> Result<RecordTable> {
    let df = parse_table_csv_str(content)?;
    dataframe_to_records(&df)
}

// Schema inference is disabled so year-like cells stay text.
fn text_read_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Convert a DataFrame of text columns to records.
///
/// Headers are matched against the known aliases in [`crate::core::columns`].
/// The continent and culture columns are required; every other column is
/// optional. Rows with an empty continent or culture are discarded.
pub fn dataframe_to_records(df: &DataFrame) -> Result<RecordTable> {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let continent_name = columns::resolve(&headers, CONTINENT_KEYS)
        .context("Table has no continent column")?;
    let culture_name =
        columns::resolve(&headers, CULTURE_KEYS).context("Table has no culture column")?;

    let continents = df.column(continent_name)?.str()?;
    let cultures = df.column(culture_name)?.str()?;

    let regions = text_column(df, &headers, REGION_KEYS);
    let areas = text_column(df, &headers, AREA_KEYS);
    let chronologies = text_column(df, &headers, CHRONOLOGY_KEYS);
    let subsistences = text_column(df, &headers, SUBSISTENCE_KEYS);
    let settlements = text_column(df, &headers, SETTLEMENT_KEYS);
    let architectures = text_column(df, &headers, ARCHITECTURE_KEYS);
    let technologies = text_column(df, &headers, TECHNOLOGY_KEYS);
    let hierarchies = text_column(df, &headers, HIERARCHY_KEYS);
    let exchanges = text_column(df, &headers, EXCHANGE_KEYS);
    let writings = text_column(df, &headers, WRITING_KEYS);

    let mut table = RecordTable::default();

    for i in 0..df.height() {
        let (Some(continent), Some(culture)) =
            (cell(Some(continents), i), cell(Some(cultures), i))
        else {
            debug!("Discarding row {}: missing continent or culture", i + 1);
            table.discarded += 1;
            continue;
        };

        table.records.push(RawRecord {
            continent,
            region: cell(regions, i),
            area: cell(areas, i),
            culture,
            chronology: cell(chronologies, i).unwrap_or_default(),
            subsistence: cell(subsistences, i),
            settlement: cell(settlements, i),
            architecture: cell(architectures, i),
            technology: cell(technologies, i),
            hierarchy: cell(hierarchies, i),
            exchange: cell(exchanges, i),
            writing: cell(writings, i),
        });
    }

    info!(
        "Parsed {} records ({} rows discarded)",
        table.records.len(),
        table.discarded
    );

    Ok(table)
}

fn text_column<'a>(
    df: &'a DataFrame,
    headers: &[String],
    candidates: &[&str],
) -> Option<&'a StringChunked> {
    let name = columns::resolve(headers, candidates)?;
    df.column(name).ok().and_then(|c| c.str().ok())
}

fn cell(column: Option<&StringChunked>, row: usize) -> Option<String> {
    column
        .and_then(|c| c.get(row))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
