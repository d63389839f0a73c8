//! Teams Test Notifier - 把测试运行结果以 Adaptive Card 推送到 Teams / Power Automate

pub mod card;
pub mod config;
pub mod error;
pub mod notification;
pub mod reporter;
pub mod suite;

pub use card::{CardBuilder, CardDocument, ChartUrlProvider, QuickChartProvider};
pub use config::NotifierOptions;
pub use error::NotifyError;
pub use notification::{
    DeliveryOutcome, LinkSource, ReqwestTransport, SkipReason, WebhookConfig, WebhookKind, WebhookTransport,
};
pub use reporter::{process_results, render_payload, ReportOutcome};
pub use suite::{aggregate, FlakyCounting, RunSummary, SuiteNode, TestCase, TestDetail, TestOutcome, TestStatus};
