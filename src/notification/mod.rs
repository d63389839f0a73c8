//! 通知层 - 发送策略、提及、链接与 webhook 投递
//!
//! # 使用示例
//! ```ignore
//! use teams_test_notifier::notification::{deliver, ReqwestTransport, WebhookConfig};
//!
//! let transport = ReqwestTransport::new(WebhookConfig::default())?;
//! let outcome = deliver(card, &options, &transport).await?;
//! ```

pub mod link;
pub mod mention;
pub mod payload;
pub mod policy;
pub mod webhook;

pub use link::LinkSource;
pub use mention::{mention_block, parse_mentions, Mention, MentionBlock, MentionList};
pub use payload::{apply_compatibility, render_message, ADAPTIVE_CARD_CONTENT_TYPE, POWER_AUTOMATE_CARD_VERSION};
pub use policy::{evaluate, should_notify, NotifyDecision, SkipReason, SuitePredicate};
pub use webhook::{
    deliver, validate_webhook_url, DeliveryOutcome, HttpResponse, ReqwestTransport, WebhookConfig, WebhookKind,
    WebhookTransport,
};
