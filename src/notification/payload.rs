//! 消息载荷 - 把卡片包进 webhook 接受的消息格式
//!
//! ```json
//! {
//!   "type": "message",
//!   "attachments": [{
//!     "contentType": "application/vnd.microsoft.card.adaptive",
//!     "contentUrl": null,
//!     "content": { "type": "AdaptiveCard", ... }
//!   }]
//! }
//! ```

use serde::Serialize;

use super::webhook::WebhookKind;
use crate::card::CardDocument;

pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Power Automate 只能渲染到这个版本
pub const POWER_AUTOMATE_CARD_VERSION: &str = "1.4";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Attachment<'a> {
    content_type: &'static str,
    content_url: Option<String>,
    content: &'a CardDocument,
}

#[derive(Debug, Serialize)]
struct MessageEnvelope<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    attachments: Vec<Attachment<'a>>,
}

/// Applies receiver-specific compatibility fixes to the card.
pub fn apply_compatibility(document: &mut CardDocument, kind: WebhookKind) {
    if kind == WebhookKind::PowerAutomate {
        document.version = POWER_AUTOMATE_CARD_VERSION.to_string();
    }
}

/// 序列化为消息 JSON 文本
pub fn render_message(document: &CardDocument) -> serde_json::Result<String> {
    let envelope = MessageEnvelope {
        kind: "message",
        attachments: vec![Attachment {
            content_type: ADAPTIVE_CARD_CONTENT_TYPE,
            content_url: None,
            content: document,
        }],
    };
    serde_json::to_string(&envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{template, TextBlock, DEFAULT_CARD_VERSION};

    #[test]
    fn test_render_message_envelope() {
        let mut card = template();
        card.body.push(TextBlock::new("hello").into());

        let text = render_message(&card).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["type"], "message");
        assert_eq!(value["attachments"].as_array().unwrap().len(), 1);
        let attachment = &value["attachments"][0];
        assert_eq!(attachment["contentType"], "application/vnd.microsoft.card.adaptive");
        assert!(attachment["contentUrl"].is_null());
        assert!(attachment.as_object().unwrap().contains_key("contentUrl"));
        assert_eq!(attachment["content"]["type"], "AdaptiveCard");
        assert_eq!(attachment["content"]["body"][0]["text"], "hello");
    }

    #[test]
    fn test_power_automate_downgrades_version() {
        let mut card = template();
        apply_compatibility(&mut card, WebhookKind::PowerAutomate);
        assert_eq!(card.version, "1.4");

        // 任何输入版本都会被覆盖
        let mut card = template();
        card.version = "2.0".to_string();
        apply_compatibility(&mut card, WebhookKind::PowerAutomate);
        assert_eq!(card.version, POWER_AUTOMATE_CARD_VERSION);
    }

    #[test]
    fn test_msteams_keeps_version() {
        let mut card = template();
        apply_compatibility(&mut card, WebhookKind::MsTeams);
        assert_eq!(card.version, DEFAULT_CARD_VERSION);
    }
}
