//! Result aggregation across a benchmark batch.

pub mod writer;

pub use writer::{render_report, PersistedArtifacts, ReportError, Reporter};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal status of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Passed,
    Failed,
    /// An exception terminated the task before normal completion.
    Error,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Passed => f.write_str("passed"),
            TaskStatus::Failed => f.write_str("failed"),
            TaskStatus::Error => f.write_str("error"),
        }
    }
}

/// Outcome of one executed task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub test_id: String,
    pub status: TaskStatus,
    pub reward: f64,
    pub steps_taken: u32,
    pub cost: f64,
    /// Wall-clock duration in seconds.
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate figures over one run.
///
/// Always recomputed from the full result sequence, never patched
/// incrementally, so it cannot drift from the stored results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub pass_rate: f64,
    pub total_cost: f64,
    pub total_duration: f64,
    pub timestamp: DateTime<Utc>,
}

/// Ordered collection of task results for one batch.
///
/// Insertion order is execution order.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BenchmarkRun {
    results: Vec<TaskResult>,
}

impl BenchmarkRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result in execution order.
    pub fn record(&mut self, result: TaskResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[TaskResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Recompute the summary from the full sequence.
    ///
    /// An empty run yields `total = 0, pass_rate = 0.0`.
    pub fn summarize(&self) -> RunSummary {
        let total = self.results.len();
        let passed = self
            .results
            .iter()
            .filter(|r| r.status == TaskStatus::Passed)
            .count();
        let failed = self
            .results
            .iter()
            .filter(|r| r.status == TaskStatus::Failed)
            .count();
        let errors = self
            .results
            .iter()
            .filter(|r| r.status == TaskStatus::Error)
            .count();

        RunSummary {
            total,
            passed,
            failed,
            errors,
            pass_rate: if total > 0 {
                passed as f64 / total as f64
            } else {
                0.0
            },
            total_cost: self.results.iter().map(|r| r.cost).sum(),
            total_duration: self.results.iter().map(|r| r.duration).sum(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn result(test_id: &str, status: TaskStatus) -> TaskResult {
        TaskResult {
            test_id: test_id.to_string(),
            status,
            reward: 0.0,
            steps_taken: 3,
            cost: 0.01,
            duration: 1.5,
            error: match status {
                TaskStatus::Error => Some("boom".to_string()),
                _ => None,
            },
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_summarize_empty_run() {
        let run = BenchmarkRun::new();
        let summary = run.summarize();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pass_rate, 0.0);
        assert_eq!(summary.total_cost, 0.0);
    }

    #[test]
    fn test_summarize_counts_and_rate() {
        let mut run = BenchmarkRun::new();
        run.record(result("t1", TaskStatus::Passed));
        run.record(result("t2", TaskStatus::Passed));
        run.record(result("t3", TaskStatus::Error));

        let summary = run.summarize();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.errors, 1);
        assert!((summary.pass_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((summary.total_cost - 0.03).abs() < 1e-9);
        assert!((summary.total_duration - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_record_preserves_execution_order() {
        let mut run = BenchmarkRun::new();
        run.record(result("b", TaskStatus::Failed));
        run.record(result("a", TaskStatus::Passed));

        let ids: Vec<&str> = run.results().iter().map(|r| r.test_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&TaskStatus::Passed).unwrap();
        assert_eq!(json, "\"passed\"");
        let json = serde_json::to_string(&TaskStatus::Error).unwrap();
        assert_eq!(json, "\"error\"");
    }
}
