//! 状态聚合 - 把套件树归约为计数

use serde::{Deserialize, Serialize};

use super::artifact::TestDetail;
use super::{SuiteNode, TestOutcome};

/// How flaky tests are counted.
///
/// `Overlay` treats flaky as a tag on top of passed: a flaky test bumps both
/// `passed` and `flaky`, and `total = passed + failed + skipped`.
/// `Separate` keeps flaky as its own bucket: `passed` excludes flaky tests and
/// `total = passed + flaky + failed + skipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlakyCounting {
    #[default]
    Overlay,
    Separate,
}

/// 运行汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub flaky: usize,
    pub total: usize,
    /// 计数方式（决定 passed 是否包含 flaky）
    #[serde(skip)]
    pub counting: FlakyCounting,
}

impl RunSummary {
    /// 从已知计数构造（overlay 语义，total = passed + failed + skipped）
    pub fn new(passed: usize, failed: usize, skipped: usize, flaky: usize) -> Self {
        Self {
            passed,
            failed,
            skipped,
            flaky,
            total: passed + failed + skipped,
            counting: FlakyCounting::Overlay,
        }
    }

    fn record(&mut self, outcome: TestOutcome) {
        self.total += 1;
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed => self.failed += 1,
            TestOutcome::Skipped => self.skipped += 1,
            TestOutcome::Flaky => {
                self.flaky += 1;
                if self.counting == FlakyCounting::Overlay {
                    self.passed += 1;
                }
            }
        }
    }

    /// 从报告明细聚合，规则与套件树一致
    pub fn from_details(details: &[TestDetail], counting: FlakyCounting) -> Self {
        let mut summary = Self {
            counting,
            ..Default::default()
        };
        for detail in details {
            summary.record(detail.status);
        }
        summary
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn count(&self, outcome: TestOutcome) -> usize {
        match outcome {
            TestOutcome::Passed => self.passed,
            TestOutcome::Failed => self.failed,
            TestOutcome::Skipped => self.skipped,
            TestOutcome::Flaky => self.flaky,
        }
    }

    /// Tests whose final classification is exactly `outcome`. Under `Overlay`
    /// flaky tests are removed from `passed`, so the four values sum to `total`.
    pub fn exclusive_count(&self, outcome: TestOutcome) -> usize {
        match (outcome, self.counting) {
            (TestOutcome::Passed, FlakyCounting::Overlay) => self.passed.saturating_sub(self.flaky),
            _ => self.count(outcome),
        }
    }

    /// Share of `count` in the run, `None` when the run is empty.
    pub fn percentage(&self, count: usize) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(count as f64 / self.total as f64 * 100.0)
    }
}

/// 深度优先遍历套件森林，统计各状态数量
pub fn aggregate(suites: &[SuiteNode], counting: FlakyCounting) -> RunSummary {
    let mut summary = RunSummary {
        counting,
        ..Default::default()
    };
    for suite in suites {
        walk(suite, &mut summary);
    }
    summary
}

fn walk(suite: &SuiteNode, summary: &mut RunSummary) {
    for test in &suite.tests {
        summary.record(test.outcome());
    }
    for child in &suite.suites {
        walk(child, summary);
    }
}
