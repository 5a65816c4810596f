//! Slack incoming webhook messages, in the Block Kit JSON format.
use serde::{Deserialize, Serialize};

/// Body Slack answers with when an incoming webhook message was accepted.
pub const SLACK_OK_RESPONSE: &str = "ok";

/// A message for a Slack incoming webhook.
///
/// `text` is the plain summary used in notifications and by clients that cannot render blocks.
#[derive(Debug, Default, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct SlackMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

impl SlackMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocks: Vec::new(),
        }
    }

    pub fn section(mut self, text: TextObject) -> Self {
        self.blocks.push(Block::Section { text });
        self
    }

    pub fn context(mut self, elements: Vec<TextObject>) -> Self {
        self.blocks.push(Block::Context { elements });
        self
    }

    pub fn divider(mut self) -> Self {
        self.blocks.push(Block::Divider);
        self
    }
}

/// A layout block, tagged by its `type` key.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { text: TextObject },
    Context { elements: Vec<TextObject> },
    Divider,
}

#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    Mrkdwn { text: String },
    PlainText { text: String },
}

impl TextObject {
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        TextObject::Mrkdwn { text: text.into() }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        TextObject::PlainText { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn serializes_block_kit_layout() {
        let message = SlackMessage::new("Inception added to Movies")
            .section(TextObject::mrkdwn("*Inception*"))
            .context(vec![
                TextObject::mrkdwn("added to Movies"),
                TextObject::plain("2010"),
            ])
            .divider();

        assert_json_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "text": "Inception added to Movies",
                "blocks": [
                    {"type": "section", "text": {"type": "mrkdwn", "text": "*Inception*"}},
                    {"type": "context", "elements": [
                        {"type": "mrkdwn", "text": "added to Movies"},
                        {"type": "plain_text", "text": "2010"}
                    ]},
                    {"type": "divider"}
                ]
            })
        );
    }

    #[test]
    fn text_only_message_omits_blocks() {
        let message = SlackMessage::new("hello");

        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"text":"hello"}"#
        );
        assert_eq!(
            serde_json::from_str::<SlackMessage>(r#"{"text":"hello"}"#).unwrap(),
            message
        );
    }
}
