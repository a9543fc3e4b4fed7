//! Persistence of batch artifacts.
//!
//! The runner persists the full run after every task. Rewriting
//! everything each time is intentional: a crash mid-batch loses at most
//! the in-flight task.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::{BenchmarkRun, RunSummary, TaskResult, TaskStatus};

/// Artifact persistence errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode results: {0}")]
    Json(#[from] serde_json::Error),
}

/// Paths of the artifacts written by one persist call.
#[derive(Debug, Clone)]
pub struct PersistedArtifacts {
    pub results_path: PathBuf,
    pub report_path: PathBuf,
}

/// On-disk layout of the JSON snapshot.
#[derive(Serialize)]
struct RunArtifact<'a> {
    tests: &'a [TaskResult],
    summary: &'a RunSummary,
}

/// Writes run snapshots and human-readable reports.
pub struct Reporter {
    output_dir: PathBuf,
}

impl Reporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the full run so far as a timestamped JSON snapshot plus a
    /// Markdown report.
    pub fn persist(&self, run: &BenchmarkRun) -> Result<PersistedArtifacts, ReportError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let summary = run.summarize();
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");

        let results_path = self.output_dir.join(format!("results_{}.json", stamp));
        let artifact = RunArtifact {
            tests: run.results(),
            summary: &summary,
        };
        std::fs::write(&results_path, serde_json::to_string_pretty(&artifact)?)?;

        let report_path = self
            .output_dir
            .join(format!("SUBMISSION_REPORT_{}.md", stamp));
        std::fs::write(&report_path, render_report(run, &summary))?;

        info!(
            results = %results_path.display(),
            report = %report_path.display(),
            "persisted {} result(s)",
            run.len()
        );

        Ok(PersistedArtifacts {
            results_path,
            report_path,
        })
    }
}

fn status_icon(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Passed => "✅",
        TaskStatus::Failed => "❌",
        TaskStatus::Error => "⚠️",
    }
}

/// Render the fixed-structure Markdown report.
///
/// Tolerates any well-formed run including an empty one; report
/// generation has no failure modes.
pub fn render_report(run: &BenchmarkRun, summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("# Bridge Benchmark Results\n\n");
    out.push_str(&format!(
        "**Date:** {}\n\n",
        summary.timestamp.format("%Y-%m-%d %H:%M:%S")
    ));

    out.push_str("## Summary\n\n");
    out.push_str(&format!("- **Total Tests:** {}\n", summary.total));
    out.push_str(&format!("- **Passed:** {} ✅\n", summary.passed));
    out.push_str(&format!("- **Failed:** {} ❌\n", summary.failed));
    out.push_str(&format!("- **Errors:** {} ⚠️\n", summary.errors));
    out.push_str(&format!(
        "- **Pass Rate:** {:.1}%\n",
        summary.pass_rate * 100.0
    ));
    out.push_str(&format!("- **Total Cost:** ${:.2}\n", summary.total_cost));
    out.push_str(&format!(
        "- **Total Duration:** {:.1} minutes\n\n",
        summary.total_duration / 60.0
    ));

    out.push_str("## Individual Test Results\n\n");
    out.push_str("| Test ID | Status | Reward | Steps | Cost | Duration |\n");
    out.push_str("|---------|--------|--------|-------|------|----------|\n");

    for result in run.results() {
        out.push_str(&format!(
            "| {} | {} {} | {:.2} | {} | ${:.3} | {:.1}s |\n",
            result.test_id,
            status_icon(result.status),
            result.status,
            result.reward,
            result.steps_taken,
            result.cost,
            result.duration
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(test_id: &str, status: TaskStatus) -> TaskResult {
        TaskResult {
            test_id: test_id.to_string(),
            status,
            reward: 1.0,
            steps_taken: 4,
            cost: 0.123,
            duration: 2.0,
            error: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_render_empty_run() {
        let run = BenchmarkRun::new();
        let report = render_report(&run, &run.summarize());
        assert!(report.contains("**Total Tests:** 0"));
        assert!(report.contains("**Pass Rate:** 0.0%"));
        assert!(report.contains("| Test ID |"));
    }

    #[test]
    fn test_render_one_row_per_task() {
        let mut run = BenchmarkRun::new();
        run.record(result("osworld_001", TaskStatus::Passed));
        run.record(result("osworld_002", TaskStatus::Error));

        let report = render_report(&run, &run.summarize());
        assert!(report.contains("| osworld_001 | ✅ passed | 1.00 | 4 | $0.123 | 2.0s |"));
        assert!(report.contains("| osworld_002 | ⚠️ error |"));
    }
}
