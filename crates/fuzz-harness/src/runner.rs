//! Fuzz test runner
//!
//! Draws inputs from proptest strategies outside of `#[test]`, shrinks
//! failing inputs and keeps per-target pass/fail counts for the reports.

use proptest::strategy::{Strategy, ValueTree};
use proptest::test_runner::{Config, RngAlgorithm, TestRng, TestRunner};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Failures listed per target in [`FuzzResult::summary`]
const SUMMARY_FAILURES: usize = 5;

// ============================================================================
// Configuration
// ============================================================================

/// Fuzz test configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzConfig {
    /// Number of test cases to run
    pub cases: u64,
    /// Maximum shrink iterations on failure
    pub max_shrink_iters: u32,
    /// Random seed (0 = random)
    pub seed: u64,
    /// Failures kept per target; the rest are only counted
    pub max_failures_kept: usize,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            cases: 10_000,
            max_shrink_iters: 1000,
            seed: 0,
            max_failures_kept: 20,
        }
    }
}

impl FuzzConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cases(mut self, n: u64) -> Self {
        self.cases = n;
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = s;
        self
    }

    pub fn max_shrink_iters(mut self, n: u32) -> Self {
        self.max_shrink_iters = n;
        self
    }

    /// Generate proptest config from this
    pub fn to_proptest_config(&self) -> Config {
        let mut config = Config::default();
        config.cases = self.cases.min(u32::MAX as u64) as u32;
        config.max_shrink_iters = self.max_shrink_iters;
        if self.seed != 0 {
            config.rng_algorithm = RngAlgorithm::ChaCha;
        }
        config
    }

    /// Test runner seeded from `seed`, or from the OS when it is 0
    pub fn test_runner(&self) -> TestRunner {
        let config = self.to_proptest_config();
        if self.seed == 0 {
            return TestRunner::new(config);
        }
        let mut seed = [0u8; 32];
        seed[..8].copy_from_slice(&self.seed.to_le_bytes());
        TestRunner::new_with_rng(config, TestRng::from_seed(RngAlgorithm::ChaCha, &seed))
    }
}

// ============================================================================
// Results
// ============================================================================

/// Result of a fuzz test run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzResult {
    /// Test name
    pub name: String,
    /// Total cases run
    pub cases_run: u64,
    /// Cases that passed
    pub cases_passed: u64,
    /// Cases that failed
    pub cases_failed: u64,
    /// Duration in ms
    pub duration_ms: f64,
    /// Cases per second
    pub throughput: f64,
    /// Failure details if any
    pub failures: Vec<FuzzFailure>,
    /// Whether test passed overall
    pub passed: bool,
}

impl FuzzResult {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cases_run: 0,
            cases_passed: 0,
            cases_failed: 0,
            duration_ms: 0.0,
            throughput: 0.0,
            failures: Vec::new(),
            passed: true,
        }
    }

    pub fn record_pass(&mut self) {
        self.cases_run += 1;
        self.cases_passed += 1;
    }

    pub fn record_fail(&mut self, failure: FuzzFailure) {
        self.cases_run += 1;
        self.cases_failed += 1;
        self.passed = false;
        self.failures.push(failure);
    }

    pub fn finalize(&mut self, duration: Duration) {
        let secs = duration.as_secs_f64();
        self.duration_ms = secs * 1000.0;
        if secs > 0.0 {
            self.throughput = self.cases_run as f64 / secs;
        }
    }

    /// Status line plus up to five failures, as printed by `tle-fuzz run`
    pub fn summary(&self) -> String {
        let status = if self.passed { "PASSED" } else { "FAILED" };
        let mut text = format!(
            "{status} {}: {}/{} cases passed ({:.0} ms, {:.0} cases/sec)",
            self.name, self.cases_passed, self.cases_run, self.duration_ms, self.throughput
        );
        for failure in self.failures.iter().take(SUMMARY_FAILURES) {
            text.push_str("\n  - ");
            text.push_str(&failure.message);
            if let Some(input) = &failure.input {
                let label = if failure.shrunk { "shrunk input" } else { "input" };
                text.push_str(&format!("\n    {label}: {input}"));
            }
        }
        let hidden = self.cases_failed.saturating_sub(SUMMARY_FAILURES as u64);
        if hidden > 0 {
            text.push_str(&format!("\n  ... {hidden} more failing cases"));
        }
        text
    }
}

/// Details of a test failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzFailure {
    pub message: String,
    pub input: Option<String>,
    pub shrunk: bool,
}

// ============================================================================
// Runner
// ============================================================================

/// Main fuzz test runner
pub struct FuzzRunner {
    config: FuzzConfig,
    results: Vec<FuzzResult>,
}

impl FuzzRunner {
    pub fn new(config: FuzzConfig) -> Self {
        Self {
            config,
            results: Vec::new(),
        }
    }

    pub fn config(&self) -> &FuzzConfig {
        &self.config
    }

    /// Run `check` against `cases` values drawn from `strategy`
    ///
    /// Failing inputs are shrunk with the strategy's value tree before they
    /// are recorded.
    pub fn run_strategy<S, F>(&mut self, name: &str, strategy: S, check: F) -> &FuzzResult
    where
        S: Strategy,
        S::Value: Debug,
        F: Fn(&S::Value) -> Result<(), String>,
    {
        let mut runner = self.config.test_runner();
        let mut result = FuzzResult::new(name);
        let start = Instant::now();

        for _ in 0..self.config.cases {
            let mut tree = match strategy.new_tree(&mut runner) {
                Ok(tree) => tree,
                Err(reason) => {
                    let failure = FuzzFailure {
                        message: format!("strategy rejected input: {reason:?}"),
                        input: None,
                        shrunk: false,
                    };
                    self.record_failure(&mut result, failure);
                    continue;
                }
            };

            let value = tree.current();
            match check(&value) {
                Ok(()) => result.record_pass(),
                Err(message) => {
                    let failure = self.shrink(&mut tree, &check, value, message);
                    self.record_failure(&mut result, failure);
                }
            }
        }

        self.finish(result, start.elapsed())
    }

    fn shrink<T, F>(
        &self,
        tree: &mut T,
        check: &F,
        value: T::Value,
        message: String,
    ) -> FuzzFailure
    where
        T: ValueTree,
        T::Value: Debug,
        F: Fn(&T::Value) -> Result<(), String>,
    {
        let mut minimal = value;
        let mut message = message;
        let mut shrunk = false;
        let mut iterations = 0;

        // current() is always re-checked: a pass steps back up with
        // complicate(), a failure keeps narrowing with simplify()
        let mut more = tree.simplify();
        while more && iterations < self.config.max_shrink_iters {
            iterations += 1;
            let candidate = tree.current();
            match check(&candidate) {
                Err(m) => {
                    minimal = candidate;
                    message = m;
                    shrunk = true;
                    more = tree.simplify();
                }
                Ok(()) => more = tree.complicate(),
            }
        }
        debug!(iterations, shrunk, "shrink finished");

        FuzzFailure {
            message,
            input: Some(format!("{minimal:?}")),
            shrunk,
        }
    }

    fn record_failure(&self, result: &mut FuzzResult, failure: FuzzFailure) {
        if result.failures.len() < self.config.max_failures_kept {
            result.record_fail(failure);
        } else {
            result.cases_run += 1;
            result.cases_failed += 1;
            result.passed = false;
        }
    }

    fn finish(&mut self, mut result: FuzzResult, elapsed: Duration) -> &FuzzResult {
        result.finalize(elapsed);
        if !result.passed {
            warn!(target_name = %result.name, failed = result.cases_failed, "fuzz target failed");
        }
        self.results.push(result);
        &self.results[self.results.len() - 1]
    }

    /// Get all results
    pub fn results(&self) -> &[FuzzResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<FuzzResult> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = FuzzConfig::default();
        assert_eq!(config.cases, 10_000);
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn test_runner_counts_passes_and_failures() {
        let mut runner = FuzzRunner::new(FuzzConfig::new().cases(100).seed(3));
        let result = runner.run_strategy("even_only", 0u32..1000, |&v| {
            if v % 2 == 0 {
                Ok(())
            } else {
                Err(format!("{v} is odd"))
            }
        });

        assert_eq!(result.cases_run, 100);
        assert_eq!(result.cases_passed + result.cases_failed, 100);
        assert!(result.cases_failed > 0);
        assert!(!result.passed);
        assert_eq!(runner.results().len(), 1);
    }

    #[test]
    fn test_failures_beyond_limit_are_counted_not_kept() {
        let mut runner = FuzzRunner::new(FuzzConfig::new().cases(50).max_shrink_iters(0));
        let result = runner.run_strategy("always_fails", 0u32..10, |v| Err(format!("case {v}")));

        assert_eq!(result.cases_failed, 50);
        assert_eq!(result.failures.len(), 20);
        // no shrink budget, so inputs are recorded as drawn
        assert!(result.failures.iter().all(|f| !f.shrunk));

        let summary = result.summary();
        assert!(summary.starts_with("FAILED always_fails: 0/50 cases passed"));
        assert_eq!(summary.matches("\n  - case ").count(), 5);
        assert!(summary.ends_with("... 45 more failing cases"));
    }

    #[test]
    fn test_passing_summary_is_one_line() {
        let mut runner = FuzzRunner::new(FuzzConfig::new().cases(10));
        let summary = runner.run_strategy("always_passes", 0u8..=255, |_| Ok(())).summary();
        assert!(summary.starts_with("PASSED always_passes: 10/10 cases passed"));
        assert!(!summary.contains('\n'));
    }

    #[test]
    fn test_strategy_failure_is_shrunk() {
        let mut runner = FuzzRunner::new(FuzzConfig::new().cases(200).seed(7));
        let result = runner.run_strategy("below_100", 0u32..1000, |&v| {
            if v >= 100 {
                Err(format!("{v} too large"))
            } else {
                Ok(())
            }
        });

        assert!(!result.passed);
        assert!(result
            .failures
            .iter()
            .any(|f| f.shrunk && f.input.as_deref() == Some("100")));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let draw = || {
            let mut runner = FuzzConfig::new().seed(42).test_runner();
            (0..10)
                .map(|_| (0u64..u64::MAX).new_tree(&mut runner).unwrap().current())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(), draw());
    }
}
