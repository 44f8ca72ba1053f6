//! Risk stage inputs: per-entity forecasts and the feature table

use crate::config::RiskConfig;
use crate::error::{Result, RiskError};
use demand_forecast::ForecastBatch;
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Key column names accepted for the entity identifier, in priority order
pub const KEY_COLUMNS: [&str; 2] = ["entity_id", "product_id"];
pub const QUANTITY_COLUMN: &str = "forecast_quantity";

pub const COST_COLUMNS: [&str; 2] = ["unit_cost", "cost"];
pub const PRICE_COLUMNS: [&str; 3] = ["price", "unit_price", "selling_price"];
pub const STOCK_COLUMNS: [&str; 2] = ["current_stock", "stock"];
pub const LEAD_TIME_COLUMNS: [&str; 1] = ["lead_time_days"];
pub const HOLDING_COST_COLUMNS: [&str; 1] = ["holding_cost_per_day"];

fn read_csv(path: &Path, what: &str) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(RiskError::ConfigurationError(format!(
            "{} file not found: {}",
            what,
            path.display()
        )));
    }
    Ok(CsvReader::from_path(path)?
        .has_header(true)
        .infer_schema(Some(1000))
        .finish()?)
}

fn key_column(df: &DataFrame, table: &str) -> Result<&'static str> {
    let names = df.get_column_names();
    KEY_COLUMNS
        .iter()
        .copied()
        .find(|key| names.contains(key))
        .ok_or_else(|| RiskError::MissingColumn {
            table: table.to_string(),
            column: KEY_COLUMNS[0].to_string(),
        })
}

/// Forecast quantities per entity, ordered by entity id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemandForecasts {
    by_entity: BTreeMap<String, Vec<f64>>,
}

impl DemandForecasts {
    pub fn new(by_entity: BTreeMap<String, Vec<f64>>) -> Self {
        Self { by_entity }
    }

    /// Load a forecast table; only the key and `forecast_quantity` are required
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let df = read_csv(path.as_ref(), "Forecast")?;
        Self::from_dataframe(&df)
    }

    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        const TABLE: &str = "forecast table";
        let key = key_column(df, TABLE)?;
        if df.column(QUANTITY_COLUMN).is_err() {
            return Err(RiskError::MissingColumn {
                table: TABLE.to_string(),
                column: QUANTITY_COLUMN.to_string(),
            });
        }

        let ids = df.column(key)?.cast(&DataType::Utf8)?;
        let quantities = df.column(QUANTITY_COLUMN)?.cast(&DataType::Float64)?;

        let mut by_entity: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (id, quantity) in ids.utf8()?.into_iter().zip(quantities.f64()?.into_iter()) {
            if let (Some(id), Some(quantity)) = (id, quantity) {
                by_entity.entry(id.to_string()).or_default().push(quantity);
            }
        }
        Ok(Self { by_entity })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.by_entity
            .iter()
            .map(|(id, quantities)| (id.as_str(), quantities.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    /// Total forecast rows across entities
    pub fn rows(&self) -> usize {
        self.by_entity.values().map(Vec::len).sum()
    }
}

impl From<&ForecastBatch> for DemandForecasts {
    fn from(batch: &ForecastBatch) -> Self {
        Self {
            by_entity: batch
                .quantities_by_entity()
                .into_iter()
                .map(|(id, quantities)| (id.to_string(), quantities))
                .collect(),
        }
    }
}

/// Numeric attributes of one entity; absent, empty and NaN cells are not stored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    values: HashMap<String, f64>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter; non-finite values are treated as missing
    pub fn with(mut self, column: &str, value: f64) -> Self {
        if value.is_finite() {
            self.values.insert(column.to_string(), value);
        }
        self
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    /// First present column among `candidates`, in order
    pub fn lookup(&self, candidates: &[&'static str]) -> Option<Resolved<f64>> {
        candidates.iter().find_map(|&column| {
            self.get(column).map(|value| Resolved {
                value,
                provenance: Provenance::Column(column),
            })
        })
    }
}

/// Feature rows keyed by entity id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    rows: HashMap<String, FeatureRow>,
}

impl FeatureTable {
    pub fn new(rows: HashMap<String, FeatureRow>) -> Self {
        Self { rows }
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let df = read_csv(path.as_ref(), "Features")?;
        Self::from_dataframe(&df)
    }

    /// Every non-key column is read as numeric. The first row of an entity wins.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let key = key_column(df, "feature table")?;
        let ids = df.column(key)?.cast(&DataType::Utf8)?;
        let ids = ids.utf8()?;

        let mut numeric: Vec<(String, Vec<Option<f64>>)> = Vec::new();
        for series in df.get_columns() {
            if series.name() == key {
                continue;
            }
            // non-numeric columns cast to all-null and contribute nothing
            let Ok(cast) = series.cast(&DataType::Float64) else {
                continue;
            };
            let values = cast.f64()?.into_iter().collect();
            numeric.push((series.name().to_string(), values));
        }

        let mut rows: HashMap<String, FeatureRow> = HashMap::new();
        for (index, id) in ids.into_iter().enumerate() {
            let Some(id) = id else { continue };
            if rows.contains_key(id) {
                continue;
            }
            let row = numeric
                .iter()
                .fold(FeatureRow::new(), |row, (column, values)| match values[index] {
                    Some(value) => row.with(column, value),
                    None => row,
                });
            rows.insert(id.to_string(), row);
        }

        Ok(Self { rows })
    }

    pub fn get(&self, entity_id: &str) -> Option<&FeatureRow> {
        self.rows.get(entity_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Where a resolved input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Read from the named feature column
    Column(&'static str),
    /// Computed from other inputs by the named rule
    Derived(&'static str),
    /// Hardcoded fallback from the configuration
    Default,
}

impl Provenance {
    pub fn is_column(&self) -> bool {
        matches!(self, Provenance::Column(_))
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Column(column) => write!(f, "column:{}", column),
            Provenance::Derived(rule) => write!(f, "derived:{}", rule),
            Provenance::Default => f.write_str("default"),
        }
    }
}

/// A value tagged with its provenance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Resolved<T> {
    pub fn derived(value: T, rule: &'static str) -> Self {
        Self {
            value,
            provenance: Provenance::Derived(rule),
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Default,
        }
    }
}

/// Simulation inputs of one entity after the fallback chains ran
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedInputs {
    pub unit_cost: Resolved<f64>,
    pub price: Resolved<f64>,
    pub available_stock: Resolved<f64>,
    pub lead_time_days: Resolved<f64>,
    pub holding_cost_per_day: Resolved<f64>,
}

impl ResolvedInputs {
    /// Resolve each input through its candidate columns, then its fallback
    pub fn resolve(row: &FeatureRow, demand_mean: f64, config: &RiskConfig) -> Self {
        let unit_cost = row
            .lookup(&COST_COLUMNS)
            .unwrap_or_else(|| Resolved::fallback(config.default_unit_cost));
        let price = row.lookup(&PRICE_COLUMNS).unwrap_or_else(|| {
            Resolved::derived(unit_cost.value * config.price_markup, "unit_cost * price_markup")
        });
        let available_stock = row.lookup(&STOCK_COLUMNS).unwrap_or_else(|| {
            Resolved::derived(
                demand_mean * config.stock_cover_days,
                "demand_mean * stock_cover_days",
            )
        });
        let lead_time_days = row
            .lookup(&LEAD_TIME_COLUMNS)
            .unwrap_or_else(|| Resolved::fallback(config.default_lead_time_days));
        let holding_cost_per_day = row.lookup(&HOLDING_COST_COLUMNS).unwrap_or_else(|| {
            Resolved::derived(
                unit_cost.value * config.holding_cost_rate,
                "unit_cost * holding_cost_rate",
            )
        });

        Self {
            unit_cost,
            price,
            available_stock,
            lead_time_days,
            holding_cost_per_day,
        }
    }

    /// Provenance of every input, by input name
    pub fn provenance(&self) -> [(&'static str, Provenance); 5] {
        [
            ("unit_cost", self.unit_cost.provenance),
            ("price", self.price.provenance),
            ("available_stock", self.available_stock.provenance),
            ("lead_time_days", self.lead_time_days.provenance),
            ("holding_cost_per_day", self.holding_cost_per_day.provenance),
        ]
    }

    /// Names of the inputs that were not read from a feature column
    pub fn fallbacks(&self) -> Vec<&'static str> {
        self.provenance()
            .into_iter()
            .filter(|(_, provenance)| !provenance.is_column())
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup_respects_priority() {
        let row = FeatureRow::new()
            .with("selling_price", 9.0)
            .with("unit_price", 8.0);
        let price = row.lookup(&PRICE_COLUMNS).unwrap();
        assert_eq!(price.value, 8.0);
        assert_eq!(price.provenance, Provenance::Column("unit_price"));
    }

    #[test]
    fn test_nan_is_missing() {
        let row = FeatureRow::new().with("unit_cost", f64::NAN).with("cost", 2.0);
        let cost = row.lookup(&COST_COLUMNS).unwrap();
        assert_eq!(cost.provenance, Provenance::Column("cost"));
    }

    #[test]
    fn test_all_fallbacks() {
        let inputs = ResolvedInputs::resolve(&FeatureRow::new(), 10.0, &RiskConfig::default());

        assert_eq!(inputs.unit_cost, Resolved::fallback(1.0));
        assert_relative_eq!(inputs.price.value, 1.3);
        assert!(matches!(inputs.price.provenance, Provenance::Derived(_)));
        assert_relative_eq!(inputs.available_stock.value, 70.0);
        assert_eq!(inputs.lead_time_days, Resolved::fallback(7.0));
        assert_relative_eq!(inputs.holding_cost_per_day.value, 0.01);
    }

    #[test]
    fn test_price_fallback_uses_resolved_cost() {
        let row = FeatureRow::new().with("cost", 4.0);
        let inputs = ResolvedInputs::resolve(&row, 1.0, &RiskConfig::default());
        assert_relative_eq!(inputs.price.value, 5.2);
        assert_relative_eq!(inputs.holding_cost_per_day.value, 0.04);
    }

    #[test]
    fn test_fallbacks_name_inputs_not_read_from_columns() {
        let row = FeatureRow::new()
            .with("unit_cost", 2.0)
            .with("selling_price", 3.0)
            .with("stock", 40.0)
            .with("lead_time_days", 4.0)
            .with("holding_cost_per_day", 0.1);
        let inputs = ResolvedInputs::resolve(&row, 10.0, &RiskConfig::default());
        assert!(inputs.fallbacks().is_empty());

        let row = FeatureRow::new().with("cost", 2.0);
        let inputs = ResolvedInputs::resolve(&row, 10.0, &RiskConfig::default());
        assert_eq!(
            inputs.fallbacks(),
            vec!["price", "available_stock", "lead_time_days", "holding_cost_per_day"]
        );
        assert_eq!(inputs.price.provenance.to_string(), "derived:unit_cost * price_markup");
        assert_eq!(inputs.unit_cost.provenance.to_string(), "column:cost");
        assert_eq!(inputs.lead_time_days.provenance.to_string(), "default");
    }

    #[test]
    fn test_forecasts_from_batch() {
        let batch = ForecastBatch::default();
        assert!(DemandForecasts::from(&batch).is_empty());
    }
}
