//! 错误类型 - 通知流程中所有可区分的失败模式

use std::path::PathBuf;

use thiserror::Error;

use crate::notification::webhook::WebhookKind;

/// Notifier error taxonomy.
///
/// None of these escape `process_results` as a panic or `Err`: the reporter
/// logs them and hands them back inside `ReportOutcome::Failed`.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// 未配置 webhook URL
    #[error("no webhook URL provided")]
    MissingWebhookUrl,

    /// URL 与 webhook 类型不匹配
    #[error("invalid {kind} webhook URL: {url}")]
    InvalidWebhookUrl { kind: WebhookKind, url: String },

    /// 没有测试套件输入
    #[error("no test suite found")]
    MissingSuite,

    /// 报告文件缺失或格式错误（不致命）
    #[error("failed to read report artifact {path}: {reason}")]
    ArtifactRead { path: PathBuf, reason: String },

    /// 接收端返回非 2xx
    #[error("webhook responded with HTTP {status}: {body}")]
    Delivery { status: u16, body: String },

    /// 网络层失败
    #[error("webhook request failed: {0}")]
    Transport(String),

    /// 卡片无法序列化为 JSON
    #[error("failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NotifyError {
    /// Configuration-class errors abort before anything is built.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NotifyError::MissingWebhookUrl | NotifyError::InvalidWebhookUrl { .. }
        )
    }
}
