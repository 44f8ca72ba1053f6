//! Daily sales history handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Key column names accepted for the entity identifier, in priority order
pub const KEY_COLUMNS: [&str; 2] = ["entity_id", "product_id"];
pub const DATE_COLUMN: &str = "date";
pub const QUANTITY_COLUMN: &str = "quantity_sold";

const TABLE_NAME: &str = "daily sales table";

/// One observed (entity, day, quantity) row
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRow {
    pub entity_id: String,
    pub date: NaiveDate,
    pub quantity: f64,
}

/// Daily sales for every entity, as loaded from the upstream aggregate
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    rows: Vec<SalesRow>,
}

/// Gap-filled daily series for one entity.
///
/// Day `i` of the series is `start + i`, so dates are strictly increasing
/// with no duplicates by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    entity_id: String,
    start: NaiveDate,
    values: Vec<f64>,
}

/// Data loader for daily sales data
#[derive(Debug)]
pub struct SalesLoader;

impl SalesLoader {
    /// Load daily sales from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesTable> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ForecastError::ConfigurationError(format!(
                "Sales file not found: {}",
                path.display()
            )));
        }

        let df = CsvReader::from_path(path)?
            .has_header(true)
            .infer_schema(Some(1000))
            .finish()?;

        Self::from_dataframe(&df)
    }

    /// Build a sales table from an existing DataFrame
    pub fn from_dataframe(df: &DataFrame) -> Result<SalesTable> {
        let key = Self::detect_key_column(df)?;
        for required in [DATE_COLUMN, QUANTITY_COLUMN] {
            if df.column(required).is_err() {
                return Err(ForecastError::MissingColumn {
                    table: TABLE_NAME.to_string(),
                    column: required.to_string(),
                });
            }
        }

        let ids = df.column(key)?.cast(&DataType::Utf8)?;
        let dates = df.column(DATE_COLUMN)?.cast(&DataType::Utf8)?;
        let quantities = df.column(QUANTITY_COLUMN)?.cast(&DataType::Float64)?;

        let mut rows = Vec::with_capacity(df.height());
        let columns = ids
            .utf8()?
            .into_iter()
            .zip(dates.utf8()?.into_iter())
            .zip(quantities.f64()?.into_iter());

        for (index, ((id, date), quantity)) in columns.enumerate() {
            let (id, date, quantity) = match (id, date, quantity) {
                (Some(id), Some(date), Some(quantity)) => (id, date, quantity),
                _ => {
                    return Err(ForecastError::ConfigurationError(format!(
                        "Row {} of the {} has an empty id, date or quantity",
                        index + 1,
                        TABLE_NAME
                    )))
                }
            };
            rows.push(SalesRow {
                entity_id: id.to_string(),
                date: parse_date(date).ok_or_else(|| {
                    ForecastError::ConfigurationError(format!(
                        "Row {} has an unparseable date '{}'",
                        index + 1,
                        date
                    ))
                })?,
                quantity,
            });
        }

        SalesTable::from_rows(rows)
    }

    /// Detect the entity key column in a DataFrame
    fn detect_key_column(df: &DataFrame) -> Result<&'static str> {
        let column_names = df.get_column_names();
        KEY_COLUMNS
            .iter()
            .copied()
            .find(|key| column_names.contains(key))
            .ok_or_else(|| ForecastError::MissingColumn {
                table: TABLE_NAME.to_string(),
                column: KEY_COLUMNS[0].to_string(),
            })
    }
}

/// Parses `YYYY-MM-DD`, tolerating a trailing time component.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl SalesTable {
    /// Create a table from rows, rejecting non-finite or negative quantities
    pub fn from_rows(rows: Vec<SalesRow>) -> Result<Self> {
        if let Some(bad) = rows
            .iter()
            .find(|r| !r.quantity.is_finite() || r.quantity < 0.0)
        {
            return Err(ForecastError::ConfigurationError(format!(
                "Entity {} has invalid quantity {} on {}",
                bad.entity_id, bad.quantity, bad.date
            )));
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[SalesRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Groups rows by entity into gap-filled daily series, ordered by entity id.
    ///
    /// Quantities for the same entity and day are summed.
    pub fn daily_series(&self) -> Vec<DailySeries> {
        let mut grouped: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
        for row in &self.rows {
            *grouped
                .entry(row.entity_id.as_str())
                .or_default()
                .entry(row.date)
                .or_insert(0.0) += row.quantity;
        }

        grouped
            .into_iter()
            .filter_map(|(entity_id, days)| DailySeries::from_days(entity_id, &days))
            .collect()
    }
}

impl DailySeries {
    /// Create a series of consecutive days starting at `start`
    pub fn new(entity_id: impl Into<String>, start: NaiveDate, values: Vec<f64>) -> Self {
        Self {
            entity_id: entity_id.into(),
            start,
            values,
        }
    }

    /// Fills the span between the first and last observed day with zeros
    fn from_days(entity_id: &str, days: &BTreeMap<NaiveDate, f64>) -> Option<Self> {
        let (&start, _) = days.iter().next()?;
        let (&end, _) = days.iter().next_back()?;
        let span = (end - start).num_days() as usize + 1;

        let mut values = vec![0.0; span];
        for (date, quantity) in days {
            values[(*date - start).num_days() as usize] = *quantity;
        }

        Some(Self::new(entity_id, start, values))
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of days covered, gaps included
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    pub fn last_date(&self) -> NaiveDate {
        self.start + Duration::days(self.values.len().saturating_sub(1) as i64)
    }

    /// Dates of every point in the series
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.values.len()).map(move |i| self.start + Duration::days(i as i64))
    }

    /// Mean daily quantity, zero for an empty series
    pub fn mean(&self) -> f64 {
        stock_math::statistics::mean(&self.values).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn row(id: &str, date: &str, quantity: f64) -> SalesRow {
        SalesRow {
            entity_id: id.to_string(),
            date: day(date),
            quantity,
        }
    }

    #[test]
    fn test_gap_fill_and_duplicate_sum() {
        let table = SalesTable::from_rows(vec![
            row("A", "2024-01-01", 3.0),
            row("A", "2024-01-04", 5.0),
            row("A", "2024-01-01", 2.0),
            row("B", "2024-02-10", 1.0),
        ])
        .unwrap();

        let series = table.daily_series();
        assert_eq!(series.len(), 2);

        let a = &series[0];
        assert_eq!(a.entity_id(), "A");
        assert_eq!(a.values(), &[5.0, 0.0, 0.0, 5.0]);
        assert_eq!(a.last_date(), day("2024-01-04"));

        let dates: Vec<NaiveDate> = a.dates().collect();
        assert!(dates.windows(2).all(|w| w[1] - w[0] == Duration::days(1)));

        assert_eq!(series[1].len(), 1);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let result = SalesTable::from_rows(vec![row("A", "2024-01-01", -1.0)]);
        assert!(matches!(result, Err(ForecastError::ConfigurationError(_))));
    }

    #[test]
    fn test_parse_date_variants() {
        assert_eq!(parse_date("2024-03-05"), Some(day("2024-03-05")));
        assert_eq!(parse_date("2024-03-05 00:00:00"), Some(day("2024-03-05")));
        assert_eq!(parse_date("05/03/2024"), None);
    }

    #[test]
    fn test_series_mean() {
        let series = DailySeries::new("A", day("2024-01-01"), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.mean(), 2.0);
    }
}
