//! # dss
//!
//! Command line entry point for the decision-support pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Forecast only
//! dss forecast --sales data/daily_product_sales.csv
//!
//! # Risk only, from an existing forecast CSV, reproducible
//! dss risk --seed 42 --simulations 5000
//!
//! # Both stages with a config file and JSON logs
//! dss --config dss.json --json-logs run
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dss::{pipeline, PipelineConfig, RunContext};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "dss")]
#[command(about = "Demand forecasting and Monte Carlo profit risk for retail products")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true, env = "DSS_CONFIG")]
    config: Option<PathBuf>,

    /// Correlation id attached to every log line (generated when omitted)
    #[arg(long, global = true)]
    run_id: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit and project every product in the sales table
    Forecast {
        #[command(flatten)]
        forecast: ForecastArgs,
    },
    /// Score profit risk from an existing forecast table
    Risk {
        /// Forecast table produced by `dss forecast`
        #[arg(long)]
        forecast_csv: Option<PathBuf>,

        #[command(flatten)]
        risk: RiskArgs,
    },
    /// Forecast then score risk, handing the forecast over in memory
    Run {
        #[command(flatten)]
        forecast: ForecastArgs,

        #[command(flatten)]
        risk: RiskArgs,
    },
}

#[derive(Args, Debug)]
struct ForecastArgs {
    /// Daily sales table
    #[arg(long)]
    sales: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RiskArgs {
    /// Feature table
    #[arg(long)]
    features: Option<PathBuf>,

    /// Monte Carlo draws per product
    #[arg(long)]
    simulations: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

impl ForecastArgs {
    fn apply(self, config: &mut PipelineConfig) {
        if let Some(sales) = self.sales {
            config.paths.sales_csv = sales;
        }
    }
}

impl RiskArgs {
    fn apply(self, config: &mut PipelineConfig) {
        if let Some(features) = self.features {
            config.paths.features_csv = features;
        }
        if let Some(simulations) = self.simulations {
            config.risk.n_simulations = simulations;
        }
        if self.seed.is_some() {
            config.risk.seed = self.seed;
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn execute(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_ref())?;
    let ctx = match cli.run_id {
        Some(run_id) => RunContext::with_run_id(run_id),
        None => RunContext::new(),
    };

    match cli.command {
        Command::Forecast { forecast } => {
            forecast.apply(&mut config);
            let outcome = pipeline::forecast(&config, &ctx).context("forecast stage")?;
            println!(
                "Forecast {} products ({} skipped) -> {}",
                outcome.evaluation.entries.len(),
                outcome.evaluation.skipped.len(),
                config.paths.forecast_csv.display()
            );
        }
        Command::Risk { forecast_csv, risk } => {
            if let Some(path) = forecast_csv {
                config.paths.forecast_csv = path;
            }
            risk.apply(&mut config);
            let outcome = pipeline::risk(&config, &ctx).context("risk stage")?;
            println!(
                "Scored {} products ({} skipped) -> {}",
                outcome.records.len(),
                outcome.skipped.len(),
                config.paths.risk_csv.display()
            );
        }
        Command::Run { forecast, risk } => {
            forecast.apply(&mut config);
            risk.apply(&mut config);
            let summary = pipeline::run(&config, &ctx).context("pipeline run")?;
            println!(
                "Run {}: {} forecast, {} scored, {} high risk",
                summary.run_id, summary.forecast_entities, summary.risk_entities, summary.high_risk
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    dss::dss_core::logging::init(cli.json_logs);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
