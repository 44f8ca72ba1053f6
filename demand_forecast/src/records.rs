//! Forecast output records and their CSV form

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One projected day for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub entity_id: String,
    /// 1-based week of the horizon the day falls in
    pub forecast_week: u32,
    pub forecast_date: NaiveDate,
    pub forecast_quantity: f64,
    pub model_type: String,
}

/// All forecast rows of one run, handed to the risk stage in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastBatch {
    records: Vec<ForecastRecord>,
}

impl ForecastBatch {
    pub fn new(records: Vec<ForecastRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn extend(&mut self, records: Vec<ForecastRecord>) {
        self.records.extend(records);
    }

    /// Entity ids present in the batch, sorted
    pub fn entity_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.iter().map(|r| r.entity_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Forecast quantities per entity, in row order
    pub fn quantities_by_entity(&self) -> BTreeMap<&str, Vec<f64>> {
        let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in &self.records {
            grouped
                .entry(record.entity_id.as_str())
                .or_default()
                .push(record.forecast_quantity);
        }
        grouped
    }

    /// Render the batch as CSV with a header row
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer
            .into_inner()
            .map_err(|e| ForecastError::IoError(e.into_error()))
    }

    /// Read a batch previously written by [`crate::ForecastOutcome::write`]
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ForecastError::ConfigurationError(format!(
                "Forecast file not found: {}",
                path.display()
            )));
        }

        let mut reader = csv::Reader::from_path(path)?;
        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<ForecastRecord>, csv::Error>>()?;
        Ok(Self::new(records))
    }
}
