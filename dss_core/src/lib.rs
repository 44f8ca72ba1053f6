//! # DSS Core
//!
//! `dss_core` holds the pieces every pipeline stage shares: the [`RunContext`]
//! passed into each component call, and the process-wide tracing setup.
//!
//! ## Example
//!
//! ```
//! use dss_core::RunContext;
//!
//! let run = RunContext::with_run_id("run-42");
//! let mut stage = run.stage("FORECAST");
//! stage.add_rows_in(120);
//! assert_eq!(stage.run_id(), "run-42");
//! assert_eq!(stage.stage_name(), "FORECAST");
//! assert_eq!(stage.rows_in(), 120);
//! ```

pub mod fs;
pub mod logging;

use tracing::{info, Span};
use uuid::Uuid;

/// Stage name used by a context that has not been handed to a component yet.
pub const PIPELINE_STAGE: &str = "PIPELINE";

/// Structured logging context for one run of one stage.
///
/// Carries the correlation id that ties every log line of a run together,
/// the stage currently executing, and row counters the stage fills in as it
/// goes. The id has no behavioural effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    run_id: String,
    stage: String,
    rows_in: usize,
    rows_out: usize,
}

impl RunContext {
    /// Creates a context with a fresh UUID v4 correlation id.
    pub fn new() -> Self {
        Self::with_run_id(Uuid::new_v4().to_string())
    }

    /// Creates a context with a caller-supplied correlation id.
    ///
    /// # Examples
    ///
    /// ```
    /// use dss_core::RunContext;
    ///
    /// let ctx = RunContext::with_run_id("abc");
    /// assert_eq!(ctx.run_id(), "abc");
    /// assert_eq!(ctx.stage_name(), dss_core::PIPELINE_STAGE);
    /// ```
    pub fn with_run_id(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            stage: PIPELINE_STAGE.to_string(),
            rows_in: 0,
            rows_out: 0,
        }
    }

    /// Derives a context for a named stage of the same run, with zeroed counters.
    pub fn stage(&self, stage: &str) -> Self {
        Self {
            run_id: self.run_id.clone(),
            stage: stage.to_string(),
            rows_in: 0,
            rows_out: 0,
        }
    }

    /// Returns the correlation id.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Returns the stage name.
    pub fn stage_name(&self) -> &str {
        &self.stage
    }

    /// Rows read by the stage so far.
    pub fn rows_in(&self) -> usize {
        self.rows_in
    }

    /// Rows produced by the stage so far.
    pub fn rows_out(&self) -> usize {
        self.rows_out
    }

    pub fn add_rows_in(&mut self, rows: usize) {
        self.rows_in += rows;
    }

    pub fn add_rows_out(&mut self, rows: usize) {
        self.rows_out += rows;
    }

    /// Opens a span carrying the run id and stage. Events logged while the
    /// span is entered inherit both fields.
    pub fn span(&self) -> Span {
        tracing::info_span!("stage", run_id = %self.run_id, stage = %self.stage)
    }

    /// Logs the stage completion line with the row counters.
    pub fn finish(&self, status: &str) {
        info!(
            run_id = %self.run_id,
            stage = %self.stage,
            rows_in = self.rows_in,
            rows_out = self.rows_out,
            status,
            "stage finished"
        );
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_context_has_uuid_run_id() {
        let ctx = RunContext::new();
        assert!(Uuid::parse_str(ctx.run_id()).is_ok());
        assert_eq!(ctx.stage_name(), PIPELINE_STAGE);
    }

    #[test]
    fn test_stage_keeps_run_id_and_resets_counters() {
        let mut run = RunContext::with_run_id("r1");
        run.add_rows_in(10);
        run.add_rows_out(3);

        let stage = run.stage("RISK");
        assert_eq!(stage.run_id(), "r1");
        assert_eq!(stage.stage_name(), "RISK");
        assert_eq!(stage.rows_in(), 0);
        assert_eq!(stage.rows_out(), 0);
    }

    #[test]
    fn test_counters_accumulate() {
        let mut ctx = RunContext::with_run_id("r2");
        ctx.add_rows_in(5);
        ctx.add_rows_in(7);
        ctx.add_rows_out(2);
        assert_eq!(ctx.rows_in(), 12);
        assert_eq!(ctx.rows_out(), 2);
    }
}
