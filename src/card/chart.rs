//! 图表 URL - 卡片只嵌入外部渲染服务返回的图片地址

use reqwest::Url;
use tracing::warn;

use crate::suite::{RunSummary, TestOutcome};

/// Source of a rendered chart image for a run.
pub trait ChartUrlProvider: Send + Sync {
    /// 返回图片 URL；无法生成时返回 None，卡片跳过图表
    fn chart_url(&self, summary: &RunSummary) -> Option<String>;
}

pub const QUICKCHART_URL: &str = "https://quickchart.io/chart";
const CHART_WIDTH: &str = "500";
const CHART_HEIGHT: &str = "300";

/// QuickChart 渲染服务（图表配置编码在 URL 中，不发请求）
#[derive(Debug, Clone)]
pub struct QuickChartProvider {
    base_url: String,
}

impl QuickChartProvider {
    pub fn new() -> Self {
        Self {
            base_url: QUICKCHART_URL.to_string(),
        }
    }

    /// 自建 QuickChart 实例
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 每个测试只占一个扇区，扇区之和等于 total
    fn chart_config(summary: &RunSummary) -> serde_json::Value {
        let (labels, (data, colors)): (Vec<&str>, (Vec<usize>, Vec<&str>)) = TestOutcome::ORDER
            .iter()
            .filter(|o| summary.exclusive_count(**o) > 0)
            .map(|o| (o.label(), (summary.exclusive_count(*o), color_for(*o))))
            .unzip();

        serde_json::json!({
            "type": "doughnut",
            "data": {
                "labels": labels,
                "datasets": [{ "data": data, "backgroundColor": colors }]
            },
            "options": {
                "plugins": {
                    "doughnutlabel": {
                        "labels": [{ "text": summary.total.to_string() }, { "text": "tests" }]
                    }
                }
            }
        })
    }
}

impl Default for QuickChartProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn color_for(outcome: TestOutcome) -> &'static str {
    match outcome {
        TestOutcome::Passed => "#1f8b4c",
        TestOutcome::Failed => "#d13438",
        TestOutcome::Skipped => "#8a8886",
        TestOutcome::Flaky => "#ffaa44",
    }
}

impl ChartUrlProvider for QuickChartProvider {
    fn chart_url(&self, summary: &RunSummary) -> Option<String> {
        if summary.total == 0 {
            return None;
        }

        let config = Self::chart_config(summary).to_string();
        match Url::parse_with_params(
            &self.base_url,
            &[("c", config.as_str()), ("w", CHART_WIDTH), ("h", CHART_HEIGHT)],
        ) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                warn!(base_url = %self.base_url, error = %e, "Invalid chart service URL");
                None
            }
        }
    }
}
