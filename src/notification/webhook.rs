//! Webhook 客户端
//!
//! 两种接收端：Teams Incoming Webhook 与 Power Automate 工作流触发器。
//! 每次运行最多一次 POST，不重试。

use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::payload::{apply_compatibility, render_message};
use crate::card::CardDocument;
use crate::config::NotifierOptions;
use crate::error::NotifyError;

/// 接收端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookKind {
    #[serde(rename = "msteams")]
    MsTeams,
    #[default]
    PowerAutomate,
}

impl WebhookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookKind::MsTeams => "msteams",
            WebhookKind::PowerAutomate => "powerautomate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "msteams" | "teams" => Some(WebhookKind::MsTeams),
            "powerautomate" | "power_automate" => Some(WebhookKind::PowerAutomate),
            _ => None,
        }
    }

    fn url_pattern(&self) -> &'static Regex {
        static MSTEAMS: OnceLock<Regex> = OnceLock::new();
        static POWER_AUTOMATE: OnceLock<Regex> = OnceLock::new();
        match self {
            WebhookKind::MsTeams => MSTEAMS.get_or_init(|| {
                Regex::new(
                    r"^https://[A-Za-z0-9-]+\.webhook\.office\.com/webhookb2/[A-Za-z0-9-]+@[A-Za-z0-9-]+/IncomingWebhook/[A-Za-z0-9]+/[A-Za-z0-9-]+(/[A-Za-z0-9_-]+)*$",
                )
                .unwrap()
            }),
            WebhookKind::PowerAutomate => POWER_AUTOMATE.get_or_init(|| {
                Regex::new(
                    r"^https://([A-Za-z0-9.-]+\.logic\.azure\.com(:443)?/workflows|[A-Za-z0-9.-]+\.environment\.api\.powerplatform\.com(:443)?/powerautomate/automations/direct/workflows)/[A-Za-z0-9]+/triggers/manual/paths/invoke\?.+$",
                )
                .unwrap()
            }),
        }
    }

    /// 按类型校验 URL 结构
    pub fn is_valid_url(&self, url: &str) -> bool {
        self.url_pattern().is_match(url.trim())
    }
}

impl fmt::Display for WebhookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Checks that a URL is present and matches the shape expected for `kind`.
pub fn validate_webhook_url(url: Option<&str>, kind: WebhookKind) -> Result<&str, NotifyError> {
    let url = url.map(str::trim).filter(|u| !u.is_empty()).ok_or(NotifyError::MissingWebhookUrl)?;
    if !kind.is_valid_url(url) {
        return Err(NotifyError::InvalidWebhookUrl {
            kind,
            url: url.to_string(),
        });
    }
    Ok(url)
}

/// HTTP 响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Single outbound JSON POST.
#[allow(async_fn_in_trait)]
pub trait WebhookTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse>;
}

/// Webhook 客户端配置
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// 超时时间 (秒)
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// 基于 reqwest 的发送端
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

impl WebhookTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status().as_u16();
        let body = response.text().await.context("Failed to read response body")?;
        Ok(HttpResponse { status, body })
    }
}

/// 发送成功的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub status: u16,
    /// 接收端返回的文本；Teams 用 `1` 表示确认，此时为 None
    pub response: Option<String>,
}

impl DeliveryOutcome {
    pub fn acknowledged(&self) -> bool {
        self.response.is_none()
    }
}

/// Validates the endpoint, applies the receiver shim, serializes the card and
/// POSTs it once. No retries.
pub async fn deliver<T: WebhookTransport>(
    mut document: CardDocument,
    options: &NotifierOptions,
    transport: &T,
) -> Result<DeliveryOutcome, NotifyError> {
    let url = validate_webhook_url(options.webhook_url.as_deref(), options.webhook_type)?;

    apply_compatibility(&mut document, options.webhook_type);
    let body = render_message(&document)?;

    if options.debug {
        info!(payload = %body, "Sending the following message");
    }

    let response = transport
        .post_json(url, body)
        .await
        .map_err(|e| NotifyError::Transport(format!("{:#}", e)))?;

    if !response.is_success() {
        return Err(NotifyError::Delivery {
            status: response.status,
            body: response.body,
        });
    }

    if !options.quiet {
        info!(status = response.status, kind = %options.webhook_type, "Message sent successfully");
    }

    let text = response.body.trim();
    let outcome = DeliveryOutcome {
        status: response.status,
        response: (text != "1").then(|| text.to_string()),
    };
    if let Some(text) = &outcome.response {
        if !options.quiet {
            info!(response = %text, "Webhook response");
        } else {
            debug!(response = %text, "Webhook response");
        }
    }

    Ok(outcome)
}
