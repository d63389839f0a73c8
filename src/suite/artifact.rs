//! 报告文件读取 - 可选的逐测试明细
//!
//! 文件格式：`{"results": {"tests": [{"name": ..., "status": ..., "duration": ...}]}}`。
//! 文件缺失或损坏不致命：记录日志后按空明细继续。

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::TestOutcome;
use crate::error::NotifyError;

/// 默认报告路径（相对当前工作目录）
pub const DEFAULT_REPORT_PATH: &str = "ctrf/ctrf-report.json";

/// 单个测试的明细
#[derive(Debug, Clone, PartialEq)]
pub struct TestDetail {
    pub title: String,
    pub status: TestOutcome,
    pub duration_ms: u64,
}

impl TestDetail {
    pub fn new(title: impl Into<String>, status: TestOutcome, duration_ms: u64) -> Self {
        Self {
            title: title.into(),
            status,
            duration_ms,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReportFile {
    results: Option<ReportResults>,
}

#[derive(Debug, Deserialize)]
struct ReportResults {
    tests: Option<Vec<ReportTest>>,
}

#[derive(Debug, Deserialize)]
struct ReportTest {
    name: String,
    status: String,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    flaky: bool,
}

impl ReportTest {
    fn into_detail(self) -> TestDetail {
        let status = match self.status.as_str() {
            "passed" if self.flaky => TestOutcome::Flaky,
            "passed" => TestOutcome::Passed,
            "failed" | "timedOut" | "interrupted" => TestOutcome::Failed,
            "flaky" => TestOutcome::Flaky,
            // skipped / pending / other
            _ => TestOutcome::Skipped,
        };
        TestDetail {
            title: self.name,
            status,
            duration_ms: self.duration.max(0.0).round() as u64,
        }
    }
}

/// Reads the report artifact, surfacing every failure as `ArtifactRead`.
pub fn read_test_details(path: &Path) -> Result<Vec<TestDetail>, NotifyError> {
    let artifact_err = |reason: String| NotifyError::ArtifactRead {
        path: path.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| artifact_err(e.to_string()))?;
    let report: ReportFile = serde_json::from_str(&content).map_err(|e| artifact_err(e.to_string()))?;

    let tests = report
        .results
        .and_then(|r| r.tests)
        .ok_or_else(|| artifact_err("missing results.tests".to_string()))?;

    Ok(tests.into_iter().map(ReportTest::into_detail).collect())
}

/// 读取报告明细，任何失败都记录日志并返回空列表
pub fn load_test_details(path: &Path) -> Vec<TestDetail> {
    match read_test_details(path) {
        Ok(details) => {
            debug!(path = %path.display(), count = details.len(), "Loaded report artifact");
            details
        }
        Err(e) => {
            warn!(error = %e, "Report artifact unavailable, continuing without test details");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_report(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_report_statuses() {
        let file = write_report(
            r#"{"results": {"tests": [
                {"name": "login", "status": "passed", "duration": 1234.6},
                {"name": "retry", "status": "passed", "duration": 50, "flaky": true},
                {"name": "checkout", "status": "failed", "duration": 900},
                {"name": "later", "status": "pending", "duration": 0},
                {"name": "odd", "status": "other"}
            ]}}"#,
        );
        let details = read_test_details(file.path()).unwrap();
        assert_eq!(details.len(), 5);
        assert_eq!(details[0], TestDetail::new("login", TestOutcome::Passed, 1235));
        assert_eq!(details[1].status, TestOutcome::Flaky);
        assert_eq!(details[2].status, TestOutcome::Failed);
        assert_eq!(details[3].status, TestOutcome::Skipped);
        assert_eq!(details[4].status, TestOutcome::Skipped);
        assert_eq!(details[4].duration_ms, 0);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let details = load_test_details(Path::new("/nonexistent/ctrf-report.json"));
        assert!(details.is_empty());

        let err = read_test_details(Path::new("/nonexistent/ctrf-report.json")).unwrap_err();
        assert!(matches!(err, NotifyError::ArtifactRead { .. }));
    }

    #[test]
    fn test_malformed_json_is_empty() {
        let file = write_report("{not json");
        assert!(load_test_details(file.path()).is_empty());
        assert!(matches!(
            read_test_details(file.path()),
            Err(NotifyError::ArtifactRead { .. })
        ));
    }

    #[test]
    fn test_missing_results_tests_is_empty() {
        let file = write_report(r#"{"results": {"summary": {"tests": 3}}}"#);
        let err = read_test_details(file.path()).unwrap_err();
        assert!(err.to_string().contains("results.tests"));
        assert!(load_test_details(file.path()).is_empty());

        let file = write_report(r#"{}"#);
        assert!(load_test_details(file.path()).is_empty());
    }
}
