use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::core::domain::RawRecord;
use crate::parsing::csv_parser::{self, RecordTable};

/// Represents the source type of a civilization dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSourceType {
    Json,
    Csv,
}

impl DatasetSourceType {
    /// Source type from a file extension, case-insensitive.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .context("File has no extension")?;

        match extension.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }
}

/// Result of loading a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetLoadResult {
    pub records: Vec<RawRecord>,
    /// Rows dropped for missing a continent or culture name
    pub discarded: usize,
    pub source_type: DatasetSourceType,
}

impl DatasetLoadResult {
    fn new(table: RecordTable, source_type: DatasetSourceType) -> Self {
        info!(
            "Loaded {} records ({} discarded) from {:?}",
            table.records.len(),
            table.discarded,
            source_type
        );
        Self {
            records: table.records,
            discarded: table.discarded,
            source_type,
        }
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }
}

/// Unified interface for loading civilization tables from CSV or JSON
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load a dataset from a file (auto-detects JSON or CSV)
    pub fn load_from_file(path: &Path) -> Result<DatasetLoadResult> {
        match DatasetSourceType::from_path(path)? {
            DatasetSourceType::Json => Self::load_from_json(path),
            DatasetSourceType::Csv => Self::load_from_csv(path),
        }
    }

    /// Load a dataset from a CSV file
    pub fn load_from_csv(csv_path: &Path) -> Result<DatasetLoadResult> {
        let table = csv_parser::parse_records_csv(csv_path)
            .with_context(|| format!("Failed to parse CSV file {}", csv_path.display()))?;
        Ok(DatasetLoadResult::new(table, DatasetSourceType::Csv))
    }

    /// Load a dataset from CSV text
    pub fn load_from_csv_str(content: &str) -> Result<DatasetLoadResult> {
        let table =
            csv_parser::parse_records_csv_str(content).context("Failed to parse CSV content")?;
        Ok(DatasetLoadResult::new(table, DatasetSourceType::Csv))
    }

    /// Load a dataset from a JSON file holding an array of records
    pub fn load_from_json(json_path: &Path) -> Result<DatasetLoadResult> {
        let content = std::fs::read_to_string(json_path)
            .with_context(|| format!("Failed to read JSON file {}", json_path.display()))?;
        Self::load_from_json_str(&content)
    }

    /// Load a dataset from a JSON array of records.
    ///
    /// Records with a blank continent or culture are discarded, as for CSV.
    pub fn load_from_json_str(json_str: &str) -> Result<DatasetLoadResult> {
        let parsed: Vec<RawRecord> =
            serde_json::from_str(json_str).context("Failed to parse JSON records")?;
        let total = parsed.len();
        let records: Vec<RawRecord> = parsed
            .into_iter()
            .filter(|r| !r.continent.trim().is_empty() && !r.culture.trim().is_empty())
            .collect();
        let discarded = total - records.len();
        Ok(DatasetLoadResult::new(
            RecordTable { records, discarded },
            DatasetSourceType::Json,
        ))
    }

    /// Load a dataset without blocking the async runtime.
    ///
    /// The file is read with `tokio::fs`; parsing runs on the calling task.
    pub async fn load_from_file_async(path: &Path) -> Result<DatasetLoadResult> {
        let source_type = DatasetSourceType::from_path(path)?;
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        match source_type {
            DatasetSourceType::Json => Self::load_from_json_str(&content),
            DatasetSourceType::Csv => Self::load_from_csv_str(&content),
        }
    }
}
