// src/report.rs
use std::path::Path;
use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tracing::info;

use crate::config::RunConfig;
use crate::engine::{Aggregation, Interval, IntervalSet};
use crate::error::{KempnerResult, KempnerError};

/// Summary of one partial sum run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub n: u64,
    pub ntasks: u64,
    pub workers: usize,
    pub intervals: Vec<Interval>,
    pub partials: Vec<f64>,
    pub total: f64,
    pub elapsed_seconds: f64,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn new(
        run: RunConfig,
        workers: usize,
        intervals: IntervalSet,
        aggregation: Aggregation,
        elapsed: Duration,
    ) -> Self {
        Self {
            n: run.n,
            ntasks: run.ntasks,
            workers,
            intervals: intervals.into_vec(),
            partials: aggregation.partials,
            total: aggregation.total,
            elapsed_seconds: elapsed.as_secs_f64(),
            finished_at: Utc::now(),
        }
    }

    /// Elapsed time rounded to milliseconds
    pub fn rounded_seconds(&self) -> f64 {
        (self.elapsed_seconds * 1000.0).round() / 1000.0
    }

    /// Write the report as pretty-printed JSON
    pub async fn save_json(&self, output_path: &Path) -> KempnerResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| KempnerError::SerializationError(format!("Failed to serialize report: {}", e)))?;

        tokio::fs::write(output_path, json).await
            .map_err(|e| KempnerError::FileError {
                path: output_path.to_path_buf(),
                message: format!("Failed to write file: {}", e),
            })?;

        info!("Report saved to {}", output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ParallelExecutor;

    async fn sample_report() -> RunReport {
        let run = RunConfig::new(20, 2);
        let intervals = run.partition().unwrap();
        let aggregation = ParallelExecutor::new(2).unwrap().aggregate(intervals.clone()).await.unwrap();
        RunReport::new(run, 2, intervals, aggregation, Duration::from_millis(1234))
    }

    #[tokio::test]
    async fn test_report_contents() {
        let report = sample_report().await;
        assert_eq!(report.intervals, vec![Interval::new(1, 10), Interval::new(11, 20)]);
        assert_eq!(report.partials.len(), 2);
        assert_eq!(report.total, report.partials[0] + report.partials[1]);
        assert_eq!(report.rounded_seconds(), 1.234);
    }

    #[tokio::test]
    async fn test_save_json() {
        let report = sample_report().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        report.save_json(&path).await.unwrap();

        let saved: RunReport = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.n, 20);
        assert_eq!(saved.intervals, report.intervals);
        assert!((saved.total - report.total).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_save_json_into_missing_directory() {
        let report = sample_report().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("run.json");

        let result = report.save_json(&path).await;
        assert!(matches!(result, Err(KempnerError::FileError { .. })));
    }
}
