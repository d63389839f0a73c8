//! 测试套件模型 - 测试运行器交给我们的层级结果树
//!
//! 套件可以任意嵌套，每个套件包含子套件和测试用例：
//! ```json
//! {
//!   "title": "root",
//!   "suites": [{ "title": "login.spec.ts", "tests": [{ "title": "logs in", "status": "passed" }] }],
//!   "tests": []
//! }
//! ```

pub mod aggregate;
pub mod artifact;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use aggregate::{aggregate, FlakyCounting, RunSummary};
pub use artifact::{load_test_details, TestDetail, DEFAULT_REPORT_PATH};

/// 单次执行的状态（运行器原始值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestStatus {
    Passed,
    Failed,
    TimedOut,
    Interrupted,
    Skipped,
    Flaky,
}

impl TestStatus {
    fn is_failure(&self) -> bool {
        matches!(self, TestStatus::Failed | TestStatus::TimedOut | TestStatus::Interrupted)
    }
}

/// Final classification of a test, the four buckets the card reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    Passed,
    Failed,
    Skipped,
    Flaky,
}

impl TestOutcome {
    /// 固定的分组顺序
    pub const ORDER: [TestOutcome; 4] = [
        TestOutcome::Passed,
        TestOutcome::Failed,
        TestOutcome::Skipped,
        TestOutcome::Flaky,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "Passed",
            TestOutcome::Failed => "Failed",
            TestOutcome::Skipped => "Skipped",
            TestOutcome::Flaky => "Flaky",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "✅",
            TestOutcome::Failed => "❌",
            TestOutcome::Skipped => "⏭️",
            TestOutcome::Flaky => "⚠️",
        }
    }
}

impl std::fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 测试用例
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub title: String,
    /// 最终状态
    pub status: TestStatus,
    /// 每次尝试（含重试）的状态，按时间顺序
    #[serde(default)]
    pub attempts: Vec<TestStatus>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl TestCase {
    pub fn new(title: impl Into<String>, status: TestStatus) -> Self {
        Self {
            title: title.into(),
            status,
            attempts: Vec::new(),
            duration_ms: 0,
        }
    }

    /// 设置重试历史
    pub fn with_attempts(mut self, attempts: Vec<TestStatus>) -> Self {
        self.attempts = attempts;
        self
    }

    /// A test that failed at least once but ultimately passed is flaky.
    pub fn outcome(&self) -> TestOutcome {
        match self.status {
            TestStatus::Flaky => TestOutcome::Flaky,
            TestStatus::Passed if self.attempts.iter().any(TestStatus::is_failure) => TestOutcome::Flaky,
            TestStatus::Passed => TestOutcome::Passed,
            TestStatus::Skipped => TestOutcome::Skipped,
            TestStatus::Failed | TestStatus::TimedOut | TestStatus::Interrupted => TestOutcome::Failed,
        }
    }
}

/// 测试套件节点
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteNode {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub suites: Vec<SuiteNode>,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

impl SuiteNode {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_suite(mut self, suite: SuiteNode) -> Self {
        self.suites.push(suite);
        self
    }

    pub fn with_test(mut self, test: TestCase) -> Self {
        self.tests.push(test);
        self
    }

    /// 深度优先遍历所有测试
    pub fn all_tests(&self) -> Vec<&TestCase> {
        let mut out = Vec::new();
        self.collect_tests(&mut out);
        out
    }

    fn collect_tests<'a>(&'a self, out: &mut Vec<&'a TestCase>) {
        out.extend(self.tests.iter());
        for suite in &self.suites {
            suite.collect_tests(out);
        }
    }

    /// 从 JSON 文件加载套件树
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read suite file {}", path.display()))?;
        let suite = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse suite file {}", path.display()))?;
        Ok(suite)
    }
}
