//! Pipeline configuration: both stage configs plus file locations

use crate::error::{DssError, Result};
use demand_forecast::ForecastConfig;
use risk_sim::RiskConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Input and output file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Daily sales table read by the forecast stage
    pub sales_csv: PathBuf,
    /// Feature table read by the risk stage
    pub features_csv: PathBuf,
    pub forecast_csv: PathBuf,
    pub evaluation_md: PathBuf,
    pub risk_csv: PathBuf,
    pub risk_md: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sales_csv: PathBuf::from("data/daily_product_sales.csv"),
            features_csv: PathBuf::from("data/inventory_features.csv"),
            forecast_csv: PathBuf::from("output/forecast_results.csv"),
            evaluation_md: PathBuf::from("output/forecast_evaluation.md"),
            risk_csv: PathBuf::from("output/product_risk_scores.csv"),
            risk_md: PathBuf::from("output/risk_assessment_report.md"),
        }
    }
}

/// Everything one `dss` invocation needs.
///
/// Loaded from JSON; every field is optional and falls back to its default.
///
/// ```
/// use dss::PipelineConfig;
///
/// let config: PipelineConfig =
///     serde_json::from_str(r#"{ "risk": { "seed": 7, "n_simulations": 500 } }"#).unwrap();
/// assert_eq!(config.risk.seed, Some(7));
/// assert_eq!(config.risk.n_simulations, 500);
/// assert_eq!(config.forecast.horizon_days, 28);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub forecast: ForecastConfig,
    pub risk: RiskConfig,
    pub paths: PathsConfig,
}

impl PipelineConfig {
    /// Read and validate a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DssError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| DssError::ConfigParse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate both stage configurations
    pub fn validate(&self) -> Result<()> {
        self.forecast.validate()?;
        self.risk.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_from_file_merges_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dss.json");
        fs::write(
            &path,
            r#"{
                "forecast": { "deadline_secs": 30 },
                "paths": { "sales_csv": "in/sales.csv" }
            }"#,
        )
        .unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.forecast.deadline_secs, Some(30));
        assert_eq!(config.forecast.min_history_days, 14);
        assert_eq!(config.paths.sales_csv, PathBuf::from("in/sales.csv"));
        assert_eq!(config.paths.risk_md, PathsConfig::default().risk_md);
        assert_eq!(config.risk, RiskConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let result = PipelineConfig::from_file("/nonexistent/dss.json");
        assert!(matches!(result, Err(DssError::ConfigRead { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dss.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PipelineConfig::from_file(&path),
            Err(DssError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dss.json");
        fs::write(&path, r#"{ "risk": { "n_simulations": 0 } }"#).unwrap();
        assert!(matches!(
            PipelineConfig::from_file(&path),
            Err(DssError::Risk(_))
        ));
    }
}
