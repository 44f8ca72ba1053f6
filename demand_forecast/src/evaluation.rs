//! Human-readable evaluation of a forecast run

use crate::models::holt::{Reliability, MODEL_LABEL};
use std::fmt::Write as _;

/// Fit summary for one processed entity
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationEntry {
    pub entity_id: String,
    pub points: usize,
    pub alpha: f64,
    pub beta: f64,
    pub mae: f64,
    pub reliability: Reliability,
}

/// Why an entity has no forecast
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    InsufficientHistory,
    Failed(String),
    DeadlineExceeded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntity {
    pub entity_id: String,
    /// History length in days, gaps included
    pub days: usize,
    pub reason: SkipReason,
}

/// Processed and skipped entities of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationReport {
    pub entries: Vec<EvaluationEntry>,
    pub skipped: Vec<SkippedEntity>,
    pub min_history_days: usize,
    pub horizon_days: usize,
}

impl EvaluationReport {
    pub fn new(min_history_days: usize, horizon_days: usize) -> Self {
        Self {
            min_history_days,
            horizon_days,
            ..Self::default()
        }
    }

    /// Entities skipped for too short a history, with their day counts
    pub fn insufficient(&self) -> impl Iterator<Item = &SkippedEntity> {
        self.skipped
            .iter()
            .filter(|s| s.reason == SkipReason::InsufficientHistory)
    }

    /// Render the report as Markdown
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.render(&mut out);
        out
    }

    fn render(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "# Short-Term Forecast Evaluation Report\n")?;
        writeln!(out, "## Processed Products\n")?;
        for entry in &self.entries {
            writeln!(out, "### Product {}", entry.entity_id)?;
            writeln!(out, "- Number of historical data points: {}", entry.points)?;
            writeln!(
                out,
                "- Model: {} (α={:.2}, β={:.2})",
                MODEL_LABEL, entry.alpha, entry.beta
            )?;
            writeln!(out, "- In-sample MAE: {:.2}", entry.mae)?;
            writeln!(out, "- Reliability comment: {}\n", entry.reliability)?;
        }

        let mut insufficient = self.insufficient().peekable();
        if insufficient.peek().is_some() {
            writeln!(out, "## Skipped Products (Insufficient Data)\n")?;
            for skipped in insufficient {
                writeln!(
                    out,
                    "- Product {}: only {} days available (< {})",
                    skipped.entity_id, skipped.days, self.min_history_days
                )?;
            }
            writeln!(out)?;
        }

        let mut other = self
            .skipped
            .iter()
            .filter(|s| s.reason != SkipReason::InsufficientHistory)
            .peekable();
        if other.peek().is_some() {
            writeln!(out, "## Skipped Products (Not Fitted)\n")?;
            for skipped in other {
                match &skipped.reason {
                    SkipReason::Failed(reason) => {
                        writeln!(out, "- Product {}: fit failed ({})", skipped.entity_id, reason)?
                    }
                    SkipReason::DeadlineExceeded => writeln!(
                        out,
                        "- Product {}: not reached before the deadline",
                        skipped.entity_id
                    )?,
                    SkipReason::InsufficientHistory => {}
                }
            }
            writeln!(out)?;
        }

        writeln!(out, "## Model Limitations\n")?;
        writeln!(
            out,
            "- Holt's Linear method captures level and linear trend but assumes no seasonality."
        )?;
        writeln!(
            out,
            "- May over/under-estimate if recent data shows non-linear changes or external shocks."
        )?;
        writeln!(
            out,
            "- Forecast quantity forced ≥ 0; negative trend extrapolations are clipped."
        )?;
        writeln!(
            out,
            "- Short-term ({} days) only - not suitable for long-term strategic planning.",
            self.horizon_days
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_sections() {
        let mut report = EvaluationReport::new(14, 28);
        report.entries.push(EvaluationEntry {
            entity_id: "P1".to_string(),
            points: 28,
            alpha: 0.1,
            beta: 0.05,
            mae: 0.0,
            reliability: Reliability::Limited,
        });
        report.skipped.push(SkippedEntity {
            entity_id: "P2".to_string(),
            days: 10,
            reason: SkipReason::InsufficientHistory,
        });
        report.skipped.push(SkippedEntity {
            entity_id: "P3".to_string(),
            days: 40,
            reason: SkipReason::DeadlineExceeded,
        });

        let md = report.to_markdown();
        assert!(md.contains("### Product P1"));
        assert!(md.contains("(α=0.10, β=0.05)"));
        assert!(md.contains("- Product P2: only 10 days available (< 14)"));
        assert!(md.contains("- Product P3: not reached before the deadline"));
        assert!(md.contains("## Model Limitations"));
        assert!(md.contains("- Short-term (28 days) only"));
        assert_eq!(report.insufficient().count(), 1);
    }

    #[test]
    fn test_limitations_follow_configured_horizon() {
        let md = EvaluationReport::new(14, 35).to_markdown();
        assert!(md.contains("- Short-term (35 days) only"));
        assert!(!md.contains("28 days"));
    }

    #[test]
    fn test_no_skipped_section_when_all_fitted() {
        let report = EvaluationReport::new(14, 28);
        assert!(!report.to_markdown().contains("Skipped Products"));
    }
}
