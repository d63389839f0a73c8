//! 失败时 @ 提及
//!
//! `mentionOnFailure` 可以是 `"Name <id>, Other <id2>"` 形式的字符串，
//! 也可以是 `[{"id": ..., "name": ...}]` 数组。

use serde::Deserialize;

use crate::card::{MentionEntity, Mentioned};

pub const MENTIONS_PLACEHOLDER: &str = "{mentions}";
pub const DEFAULT_MENTION_TEXT: &str = "{mentions} please validate the test results.";

/// 被提及的人
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Mention {
    #[serde(alias = "email")]
    pub id: String,
    pub name: String,
}

impl Mention {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    fn at_tag(&self) -> String {
        format!("<at>{}</at>", self.id)
    }

    pub fn to_entity(&self) -> MentionEntity {
        MentionEntity {
            text: self.at_tag(),
            mentioned: Mentioned {
                id: self.id.clone(),
                name: self.name.clone(),
            },
        }
    }
}

/// 配置中的提及列表
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MentionList {
    Text(String),
    List(Vec<Mention>),
}

impl MentionList {
    pub fn mentions(&self) -> Vec<Mention> {
        match self {
            MentionList::Text(text) => parse_mentions(text),
            MentionList::List(list) => list.clone(),
        }
    }
}

impl From<&str> for MentionList {
    fn from(text: &str) -> Self {
        MentionList::Text(text.to_string())
    }
}

/// 解析 `"Name <id>, id2"`；没有尖括号的条目同时作为 id 和名字
pub fn parse_mentions(text: &str) -> Vec<Mention> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match (entry.find('<'), entry.rfind('>')) {
            (Some(open), Some(close)) if open < close => {
                let id = entry[open + 1..close].trim();
                let name = entry[..open].trim();
                if id.is_empty() {
                    return None;
                }
                let name = if name.is_empty() { id } else { name };
                Some(Mention::new(id, name))
            }
            _ => Some(Mention::new(entry, entry)),
        })
        .collect()
}

/// 提及块：消息文本 + 被提及的人
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionBlock {
    pub message: String,
    pub mentions: Vec<Mention>,
}

/// Builds the mention block. Both a non-empty message and at least one mention
/// are required; partial data yields `None`.
pub fn mention_block(list: Option<&MentionList>, text: &str) -> Option<MentionBlock> {
    let mentions = list.map(MentionList::mentions).unwrap_or_default();
    if mentions.is_empty() {
        return None;
    }

    let tags = mentions.iter().map(Mention::at_tag).collect::<Vec<_>>().join(", ");
    let message = text.replace(MENTIONS_PLACEHOLDER, &tags).trim().to_string();
    if message.is_empty() {
        return None;
    }

    Some(MentionBlock { message, mentions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mentions() {
        let mentions = parse_mentions("Ann Lee <ann@example.com>, bob@example.com, <c@example.com>");
        assert_eq!(
            mentions,
            vec![
                Mention::new("ann@example.com", "Ann Lee"),
                Mention::new("bob@example.com", "bob@example.com"),
                Mention::new("c@example.com", "c@example.com"),
            ]
        );
    }

    #[test]
    fn test_parse_mentions_skips_blank_entries() {
        assert!(parse_mentions("").is_empty());
        assert!(parse_mentions(" , ,").is_empty());
        assert!(parse_mentions("Nobody <>").is_empty());
    }

    #[test]
    fn test_mention_block_default_text() {
        let list = MentionList::from("Ann <ann@example.com>, Bob <bob@example.com>");
        let block = mention_block(Some(&list), DEFAULT_MENTION_TEXT).unwrap();
        assert_eq!(
            block.message,
            "<at>ann@example.com</at>, <at>bob@example.com</at> please validate the test results."
        );
        assert_eq!(block.mentions.len(), 2);
    }

    #[test]
    fn test_mention_block_requires_both_parts() {
        // 有消息，没有提及
        assert!(mention_block(None, "ping").is_none());
        assert!(mention_block(Some(&MentionList::List(Vec::new())), "ping").is_none());

        // 有提及，消息为空
        let list = MentionList::from("Ann <ann@example.com>");
        assert!(mention_block(Some(&list), "").is_none());
        assert!(mention_block(Some(&list), "   ").is_none());

        // 都有
        assert!(mention_block(Some(&list), "ping").is_some());
    }

    #[test]
    fn test_mention_list_deserialize() {
        let text: MentionList = serde_json::from_str(r#""Ann <ann@example.com>""#).unwrap();
        assert_eq!(text.mentions(), vec![Mention::new("ann@example.com", "Ann")]);

        let list: MentionList =
            serde_json::from_str(r#"[{"email": "bob@example.com", "name": "Bob"}]"#).unwrap();
        assert_eq!(list.mentions(), vec![Mention::new("bob@example.com", "Bob")]);
    }

    #[test]
    fn test_to_entity() {
        let entity = Mention::new("ann@example.com", "Ann").to_entity();
        assert_eq!(entity.text, "<at>ann@example.com</at>");
        assert_eq!(entity.mentioned.name, "Ann");
    }
}
