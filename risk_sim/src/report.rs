//! Risk table CSV and the Markdown risk assessment

use crate::error::{Result, RiskError};
use crate::metrics::{RiskLevel, RiskRecord};
use std::fmt::Write as _;

/// Render the scored records as CSV in their given order
pub fn render_csv(records: &[RiskRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| RiskError::IoError(e.into_error()))
}

/// Portfolio figures shown in the executive summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskSummary {
    pub entities: usize,
    pub high_risk: usize,
    pub average_score: f64,
    /// Entities with at least one input taken from a fallback policy
    pub fallback_entities: usize,
}

impl RiskSummary {
    pub fn of(records: &[RiskRecord], fallback_entities: usize) -> Self {
        let entities = records.len();
        let high_risk = records
            .iter()
            .filter(|r| r.risk_level == RiskLevel::High)
            .count();
        let average_score = if entities == 0 {
            0.0
        } else {
            records.iter().map(|r| r.risk_score).sum::<f64>() / entities as f64
        };
        Self {
            entities,
            high_risk,
            average_score,
            fallback_entities,
        }
    }
}

/// Render the risk assessment as Markdown.
///
/// `records` must already be ranked; the table shows the first `top_n`.
pub fn render_markdown(records: &[RiskRecord], summary: &RiskSummary, top_n: usize) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = render(records, summary, top_n, &mut out);
    out
}

fn render(
    records: &[RiskRecord],
    summary: &RiskSummary,
    top_n: usize,
    out: &mut String,
) -> std::fmt::Result {
    writeln!(out, "# Risk Assessment Report\n")?;
    writeln!(out, "## Executive Summary\n")?;
    writeln!(out, "- Total products analysed: **{}**", summary.entities)?;
    writeln!(out, "- High risk products: **{}**", summary.high_risk)?;
    writeln!(out, "- Average risk score: **{:.4}**", summary.average_score)?;
    writeln!(
        out,
        "- Products simulated with fallback inputs: **{}**",
        summary.fallback_entities
    )?;

    writeln!(out, "\n## Top {} High-Risk Products\n", top_n)?;
    writeln!(out, "| entity_id | risk_score | VaR(95%) | CI |")?;
    writeln!(out, "|-----------|-----------:|---------:|----|")?;
    for record in records.iter().take(top_n) {
        writeln!(
            out,
            "| {} | {:.4} | {:.2} | [{:.2}, {:.2}] |",
            record.entity_id, record.risk_score, record.var_95, record.ci_lower, record.ci_upper
        )?;
    }

    writeln!(out, "\n## Decision Interpretation\n")?;
    writeln!(
        out,
        "Products classified as **High risk** with strongly negative VaR should be reviewed for:"
    )?;
    writeln!(out, "- safety stock adjustments")?;
    writeln!(out, "- reorder policy revisions")?;
    writeln!(out, "- pricing buffers or promotion controls")?;

    writeln!(out, "\n## Methodological Warning\n")?;
    writeln!(
        out,
        "This Monte Carlo simulation is based on simplified and independent probability \
         distributions. It does not capture tail risks, systemic shocks, supplier failures, \
         or extreme market disruptions."
    )?;
    writeln!(
        out,
        "Risk scores are relative to this run's portfolio and are not comparable across runs."
    )?;
    Ok(())
}
