use dss_core::RunContext;
use pretty_assertions::assert_eq;
use risk_sim::{
    run_risk_simulation, DemandForecasts, FeatureTable, RiskConfig, RiskError, RiskLevel,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FORECAST_CSV: &str = "\
entity_id,forecast_week,forecast_date,forecast_quantity,model_type
A,1,2024-02-01,10.0,Holt
A,1,2024-02-02,12.0,Holt
B,1,2024-02-01,40.0,Holt
B,1,2024-02-02,40.0,Holt
C,1,2024-02-01,3.0,Holt
C,1,2024-02-02,1.0,Holt
D,1,2024-02-01,7.0,Holt
";

const FEATURES_CSV: &str = "\
entity_id,unit_cost,price,current_stock,lead_time_days,holding_cost_per_day,category
A,2.0,5.0,50,5,0.1,x
B,9.5,10.0,20,14,2.0,y
C,,,,,,z
";

fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let forecast = dir.join("forecast_results.csv");
    let features = dir.join("model_features.csv");
    fs::write(&forecast, FORECAST_CSV).unwrap();
    fs::write(&features, FEATURES_CSV).unwrap();
    (forecast, features)
}

fn seeded() -> RiskConfig {
    RiskConfig {
        seed: Some(2024),
        ..RiskConfig::default()
    }
}

fn ctx() -> RunContext {
    RunContext::with_run_id("test-run").stage("RISK_SIMULATION")
}

#[test]
fn test_end_to_end_from_csv() {
    let dir = TempDir::new().unwrap();
    let (forecast_path, features_path) = write_inputs(dir.path());

    let forecasts = DemandForecasts::from_csv(&forecast_path).unwrap();
    let features = FeatureTable::from_csv(&features_path).unwrap();
    assert_eq!(forecasts.len(), 4);
    assert_eq!(features.len(), 3);

    let mut ctx = ctx();
    let outcome = run_risk_simulation(&forecasts, &features, &seeded(), &mut ctx).unwrap();

    // D has no feature row
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].entity_id, "D");
    assert_eq!(ctx.rows_in(), 7);
    assert_eq!(ctx.rows_out(), 3);

    let scores: Vec<f64> = outcome.records.iter().map(|r| r.risk_score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(scores[0], 1.0);
    assert_eq!(scores[2], 0.0);
    assert_eq!(outcome.records[0].risk_level, RiskLevel::High);
    assert_eq!(outcome.records[2].risk_level, RiskLevel::Low);

    for record in &outcome.records {
        assert!(record.ci_lower <= record.var_95);
        assert!(record.var_95 <= record.ci_upper);
        assert!(record.profit_std >= 0.0);
    }

    // B sells at a thin margin with heavy holding cost
    assert_eq!(outcome.records[0].entity_id, "B");
}

#[test]
fn test_seed_reproduces_run() {
    let dir = TempDir::new().unwrap();
    let (forecast_path, features_path) = write_inputs(dir.path());
    let forecasts = DemandForecasts::from_csv(&forecast_path).unwrap();
    let features = FeatureTable::from_csv(&features_path).unwrap();

    let first = run_risk_simulation(&forecasts, &features, &seeded(), &mut ctx()).unwrap();
    let second = run_risk_simulation(&forecasts, &features, &seeded(), &mut ctx()).unwrap();

    assert_eq!(first.records, second.records);
}

#[test]
fn test_outputs_written_in_rank_order() {
    let dir = TempDir::new().unwrap();
    let (forecast_path, features_path) = write_inputs(dir.path());
    let forecasts = DemandForecasts::from_csv(&forecast_path).unwrap();
    let features = FeatureTable::from_csv(&features_path).unwrap();

    let outcome = run_risk_simulation(&forecasts, &features, &seeded(), &mut ctx()).unwrap();
    let csv_path = dir.path().join("out/risk_results.csv");
    let md_path = dir.path().join("out/risk_assessment_report.md");
    outcome.write(&csv_path, &md_path).unwrap();

    let csv = fs::read_to_string(&csv_path).unwrap();
    let ids: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    let expected: Vec<&str> = outcome.records.iter().map(|r| r.entity_id.as_str()).collect();
    assert_eq!(ids, expected);

    let md = fs::read_to_string(&md_path).unwrap();
    assert!(md.contains("- Total products analysed: **3**"));
    // C has every input blank
    assert!(md.contains("- Products simulated with fallback inputs: **1**"));
    assert_eq!(outcome.fallbacks.keys().map(String::as_str).collect::<Vec<_>>(), vec!["C"]);
    assert!(md.contains("## Methodological Warning"));
}

#[test]
fn test_legacy_product_id_key() {
    let dir = TempDir::new().unwrap();
    let forecast = dir.path().join("forecast.csv");
    let features = dir.path().join("features.csv");
    fs::write(&forecast, "product_id,forecast_quantity\n101,4.0\n101,6.0\n").unwrap();
    fs::write(&features, "product_id,cost\n101,1.5\n").unwrap();

    let forecasts = DemandForecasts::from_csv(&forecast).unwrap();
    let features = FeatureTable::from_csv(&features).unwrap();
    let outcome = run_risk_simulation(&forecasts, &features, &seeded(), &mut ctx()).unwrap();

    assert_eq!(outcome.records[0].entity_id, "101");
    // a single entity has no spread to scale
    assert_eq!(outcome.records[0].risk_score, 0.0);
}

#[test]
fn test_missing_forecast_file() {
    let result = DemandForecasts::from_csv("/nonexistent/forecast_results.csv");
    assert!(matches!(result, Err(RiskError::ConfigurationError(_))));
}

#[test]
fn test_missing_quantity_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forecast.csv");
    fs::write(&path, "entity_id,quantity\nA,1.0\n").unwrap();

    match DemandForecasts::from_csv(&path) {
        Err(RiskError::MissingColumn { column, .. }) => assert_eq!(column, "forecast_quantity"),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn test_features_without_key_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("features.csv");
    fs::write(&path, "sku,unit_cost\nA,1.0\n").unwrap();

    assert!(matches!(
        FeatureTable::from_csv(&path),
        Err(RiskError::MissingColumn { .. })
    ));
}
