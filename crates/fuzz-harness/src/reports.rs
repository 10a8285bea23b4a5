//! Fuzz test reporting and export
//!
//! Generates reports in various formats for CI/CD integration.

use crate::runner::FuzzResult;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

// ============================================================================
// Report Formats
// ============================================================================

/// Full test report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzReport {
    /// Report timestamp (Unix ms)
    pub timestamp_ms: i64,
    /// Git commit hash
    pub git_commit: Option<String>,
    /// Branch name
    pub git_branch: Option<String>,
    /// Test environment
    pub environment: String,
    /// Seed the run used (0 = random)
    pub seed: u64,
    /// Total duration in ms
    pub total_duration_ms: f64,
    /// All test results
    pub results: Vec<FuzzResult>,
    /// Summary stats
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_tests: u32,
    pub tests_passed: u32,
    pub tests_failed: u32,
    pub total_cases: u64,
    pub cases_passed: u64,
    pub cases_failed: u64,
    /// Average throughput in cases/sec
    pub avg_throughput: f64,
    /// 0-1
    pub pass_rate: f64,
}

impl ReportSummary {
    fn from_results(results: &[FuzzResult]) -> Self {
        let total_tests = results.len() as u32;
        let tests_passed = results.iter().filter(|r| r.passed).count() as u32;

        let total_cases: u64 = results.iter().map(|r| r.cases_run).sum();
        let cases_passed: u64 = results.iter().map(|r| r.cases_passed).sum();
        let cases_failed: u64 = results.iter().map(|r| r.cases_failed).sum();

        let avg_throughput = if total_tests > 0 {
            results.iter().map(|r| r.throughput).sum::<f64>() / total_tests as f64
        } else {
            0.0
        };

        let pass_rate = if total_cases > 0 {
            cases_passed as f64 / total_cases as f64
        } else {
            0.0
        };

        Self {
            total_tests,
            tests_passed,
            tests_failed: total_tests - tests_passed,
            total_cases,
            cases_passed,
            cases_failed,
            avg_throughput,
            pass_rate,
        }
    }
}

impl FuzzReport {
    pub fn new(results: Vec<FuzzResult>) -> Self {
        Self {
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            git_commit: git_commit(),
            git_branch: git_branch(),
            environment: environment_name(),
            seed: 0,
            total_duration_ms: results.iter().map(|r| r.duration_ms).sum(),
            summary: ReportSummary::from_results(&results),
            results,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn all_passed(&self) -> bool {
        self.summary.tests_failed == 0
    }

    /// Load a report previously written with [`FuzzReport::to_json`]
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Export as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Export as JUnit XML (for CI systems)
    pub fn to_junit_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            xml,
            "<testsuites tests=\"{}\" failures=\"{}\" time=\"{:.3}\">",
            self.summary.total_cases,
            self.summary.cases_failed,
            self.total_duration_ms / 1000.0
        );

        for result in &self.results {
            let seconds = result.duration_ms / 1000.0;
            let _ = writeln!(
                xml,
                "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" time=\"{:.3}\">",
                escape_xml(&result.name),
                result.cases_run,
                result.cases_failed,
                seconds
            );

            if result.passed {
                let _ = writeln!(
                    xml,
                    "    <testcase name=\"{}\" time=\"{:.3}\"/>",
                    escape_xml(&result.name),
                    seconds
                );
            } else {
                let _ = writeln!(
                    xml,
                    "    <testcase name=\"{}\" time=\"{:.3}\">",
                    escape_xml(&result.name),
                    seconds
                );
                for failure in &result.failures {
                    let _ = writeln!(
                        xml,
                        "      <failure message=\"{}\">{}</failure>",
                        escape_xml(&failure.message),
                        escape_xml(failure.input.as_deref().unwrap_or(""))
                    );
                }
                xml.push_str("    </testcase>\n");
            }

            xml.push_str("  </testsuite>\n");
        }

        xml.push_str("</testsuites>\n");
        xml
    }

    /// Export as Markdown summary
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# TLE Forge Fuzz Report\n\n");
        let date = chrono::DateTime::from_timestamp_millis(self.timestamp_ms)
            .unwrap_or_default()
            .format("%Y-%m-%d %H:%M:%S UTC");
        let _ = writeln!(md, "**Date:** {}", date);
        if let Some(ref commit) = self.git_commit {
            let _ = writeln!(md, "**Commit:** `{}`", commit);
        }
        if let Some(ref branch) = self.git_branch {
            let _ = writeln!(md, "**Branch:** `{}`", branch);
        }
        if self.seed != 0 {
            let _ = writeln!(md, "**Seed:** {}", self.seed);
        }
        let _ = writeln!(md, "**Environment:** {}\n", self.environment);

        md.push_str("## Summary\n\n");
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        let _ = writeln!(
            md,
            "| Tests | {} ({} passed, {} failed) |",
            self.summary.total_tests, self.summary.tests_passed, self.summary.tests_failed
        );
        let _ = writeln!(
            md,
            "| Cases | {} ({} passed, {} failed) |",
            self.summary.total_cases, self.summary.cases_passed, self.summary.cases_failed
        );
        let _ = writeln!(md, "| Pass Rate | {:.2}% |", self.summary.pass_rate * 100.0);
        let _ = writeln!(md, "| Throughput | {:.0} cases/sec |", self.summary.avg_throughput);
        let _ = writeln!(md, "| Duration | {:.0} ms |\n", self.total_duration_ms);

        md.push_str("## Results\n\n");
        md.push_str("| Test | Cases | Passed | Failed | Status |\n");
        md.push_str("|------|-------|--------|--------|--------|\n");

        for result in &self.results {
            let status = if result.passed { "✓" } else { "✗" };
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} |",
                result.name, result.cases_run, result.cases_passed, result.cases_failed, status
            );
        }

        // Failures section
        let failed_tests: Vec<_> = self.results.iter().filter(|r| !r.passed).collect();
        if !failed_tests.is_empty() {
            md.push_str("\n## Failures\n\n");
            for result in failed_tests {
                let _ = writeln!(md, "### {}\n", result.name);
                for (i, failure) in result.failures.iter().enumerate().take(3) {
                    let _ = writeln!(md, "{}. `{}`", i + 1, failure.message);
                    if let Some(ref input) = failure.input {
                        let shrunk = if failure.shrunk { " (shrunk)" } else { "" };
                        let _ = writeln!(md, "   - Input{}: `{}`", shrunk, input);
                    }
                }
                if result.failures.len() > 3 {
                    let _ = writeln!(md, "   - ... and {} more", result.failures.len() - 3);
                }
                md.push('\n');
            }
        }

        md
    }

    /// Plain-text report: one [`FuzzResult::summary`] per target, then totals
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for result in &self.results {
            let _ = writeln!(text, "{}", result.summary());
        }
        let _ = writeln!(
            text,
            "TOTAL: {} targets, {} cases, {} passed, {} failed",
            self.summary.total_tests,
            self.summary.total_cases,
            self.summary.cases_passed,
            self.summary.cases_failed
        );
        let overall = if self.all_passed() { "ALL PASSED" } else { "SOME FAILED" };
        let _ = writeln!(text, "OVERALL: {overall}");
        text
    }

    /// Print to console
    pub fn print(&self) {
        print!("{}", self.to_text());
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn git_output(args: &[&str]) -> Option<String> {
    std::process::Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn git_commit() -> Option<String> {
    git_output(&["rev-parse", "--short", "HEAD"])
}

fn git_branch() -> Option<String> {
    git_output(&["branch", "--show-current"])
}

fn environment_name() -> String {
    if std::env::var("CI").is_ok() {
        "CI".to_string()
    } else {
        "local".to_string()
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{FuzzFailure, FuzzResult};

    fn failing_result() -> FuzzResult {
        let mut result = FuzzResult::new("record_shape");
        result.cases_run = 1000;
        result.cases_passed = 990;
        result.cases_failed = 10;
        result.duration_ms = 500.0;
        result.throughput = 2000.0;
        result.passed = false;
        result.failures.push(FuzzFailure {
            message: "line 2 is 70 columns".to_string(),
            input: Some("OrbitalParameters { name: \"<A>\" }".to_string()),
            shrunk: true,
        });
        result
    }

    #[test]
    fn test_report_generation() {
        let report = FuzzReport::new(vec![failing_result()]);

        assert_eq!(report.summary.total_tests, 1);
        assert_eq!(report.summary.tests_failed, 1);
        assert!((report.summary.pass_rate - 0.99).abs() < 1e-12);
        assert!(!report.all_passed());

        let md = report.to_markdown();
        assert!(md.contains("| Pass Rate | 99.00% |"));
        assert!(md.contains("Input (shrunk)"));
    }

    #[test]
    fn test_text_report_lists_target_summaries() {
        let mut passing = FuzzResult::new("belt_layout");
        passing.cases_run = 20;
        passing.cases_passed = 20;

        let text = FuzzReport::new(vec![failing_result(), passing]).to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("FAILED record_shape: 990/1000 cases passed"));
        assert_eq!(lines[1], "  - line 2 is 70 columns");
        assert!(lines[2].starts_with("    shrunk input: OrbitalParameters"));
        assert_eq!(lines[3], "  ... 9 more failing cases");
        assert!(lines[4].starts_with("PASSED belt_layout: 20/20 cases passed"));
        assert_eq!(lines[5], "TOTAL: 2 targets, 1020 cases, 1010 passed, 10 failed");
        assert_eq!(lines[6], "OVERALL: SOME FAILED");
    }

    #[test]
    fn test_junit_escapes_inputs() {
        let xml = FuzzReport::new(vec![failing_result()]).to_junit_xml();
        assert!(xml.contains("&quot;&lt;A&gt;&quot;"));
        assert!(xml.contains("time=\"0.500\""));
        assert!(!xml.contains("\"<A>\""));
    }

    #[test]
    fn test_json_reload() {
        let report = FuzzReport::new(vec![failing_result()]).with_seed(42);
        let reloaded = FuzzReport::from_json(&report.to_json()).unwrap();
        assert_eq!(reloaded.seed, 42);
        assert_eq!(reloaded.summary.cases_failed, 10);
        assert_eq!(reloaded.results[0].failures.len(), 1);
    }
}
