//! Robot message shapes.
//!
//! Field names follow the platform's documented wire schema exactly
//! (`msgtype`, `actionCard`, `singleURL`, `atMobiles`, ...). Each message
//! carries exactly one body; the `at` mention annex is optional metadata.
//!
//! ```
//! use dingtalk_client::Message;
//!
//! let msg = Message::text("deploy finished").at_mobiles(["13800000000"]);
//! assert_eq!(
//!     serde_json::to_string(&msg).unwrap(),
//!     r#"{"msgtype":"text","text":{"content":"deploy finished"},"at":{"atMobiles":["13800000000"]}}"#
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{DingTalkError, DingTalkResult};

/// A robot message: one body plus an optional mention annex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(flatten)]
    pub body: MessageBody,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<At>,
}

/// Message body, tagged by `msgtype`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "msgtype")]
pub enum MessageBody {
    #[serde(rename = "text")]
    Text { text: Text },

    #[serde(rename = "link")]
    Link { link: Link },

    #[serde(rename = "markdown")]
    Markdown { markdown: Markdown },

    #[serde(rename = "actionCard")]
    ActionCard {
        #[serde(rename = "actionCard")]
        action_card: ActionCard,
    },

    #[serde(rename = "feedCard")]
    FeedCard {
        #[serde(rename = "feedCard")]
        feed_card: FeedCard,
    },
}

/// Message kind, mirroring the `msgtype` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Link,
    Markdown,
    ActionCard,
    FeedCard,
}

impl MessageKind {
    /// Wire value of `msgtype`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Link => "link",
            Self::Markdown => "markdown",
            Self::ActionCard => "actionCard",
            Self::FeedCard => "feedCard",
        }
    }

    /// Whether the platform honours `at` for this kind.
    pub fn supports_mention(&self) -> bool {
        matches!(self, Self::Text | Self::Link | Self::Markdown)
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub text: String,
    #[serde(rename = "messageUrl")]
    pub message_url: String,
    #[serde(rename = "picUrl", default, skip_serializing_if = "String::is_empty")]
    pub pic_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Markdown {
    pub title: String,
    pub text: String,
}

/// Action card button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub title: String,
    #[serde(rename = "actionURL")]
    pub action_url: String,
}

impl Button {
    pub fn new(title: impl Into<String>, action_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            action_url: action_url.into(),
        }
    }
}

/// Button layout for independent-jump action cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonOrientation {
    #[serde(rename = "0")]
    Vertical,
    #[serde(rename = "1")]
    Horizontal,
}

/// Action card: either a single jump (`singleTitle`/`singleURL`) or a set of
/// independent buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCard {
    pub title: String,
    pub text: String,
    #[serde(
        rename = "singleTitle",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub single_title: String,
    #[serde(rename = "singleURL", default, skip_serializing_if = "String::is_empty")]
    pub single_url: String,
    #[serde(rename = "btns", default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
    #[serde(
        rename = "btnOrientation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub button_orientation: Option<ButtonOrientation>,
}

/// Feed card entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedLink {
    pub title: String,
    #[serde(rename = "messageURL")]
    pub message_url: String,
    #[serde(rename = "picURL")]
    pub pic_url: String,
}

impl FeedLink {
    pub fn new(
        title: impl Into<String>,
        message_url: impl Into<String>,
        pic_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message_url: message_url.into(),
            pic_url: pic_url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedCard {
    pub links: Vec<FeedLink>,
}

/// Mention annex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct At {
    #[serde(rename = "atMobiles", default, skip_serializing_if = "Vec::is_empty")]
    pub at_mobiles: Vec<String>,
    #[serde(rename = "isAtAll", default, skip_serializing_if = "is_false")]
    pub is_at_all: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Message {
    fn from_body(body: MessageBody) -> Self {
        Self { body, at: None }
    }

    /// Plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self::from_body(MessageBody::Text {
            text: Text {
                content: content.into(),
            },
        })
    }

    /// Link message. Use [`Message::with_picture`] to attach a thumbnail.
    pub fn link(
        title: impl Into<String>,
        text: impl Into<String>,
        message_url: impl Into<String>,
    ) -> Self {
        Self::from_body(MessageBody::Link {
            link: Link {
                title: title.into(),
                text: text.into(),
                message_url: message_url.into(),
                pic_url: String::new(),
            },
        })
    }

    /// Markdown message.
    pub fn markdown(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::from_body(MessageBody::Markdown {
            markdown: Markdown {
                title: title.into(),
                text: text.into(),
            },
        })
    }

    /// Action card that jumps to one URL as a whole.
    pub fn action_card(
        title: impl Into<String>,
        text: impl Into<String>,
        single_title: impl Into<String>,
        single_url: impl Into<String>,
    ) -> Self {
        Self::from_body(MessageBody::ActionCard {
            action_card: ActionCard {
                title: title.into(),
                text: text.into(),
                single_title: single_title.into(),
                single_url: single_url.into(),
                buttons: Vec::new(),
                button_orientation: None,
            },
        })
    }

    /// Action card with independent buttons.
    pub fn custom_card(
        title: impl Into<String>,
        text: impl Into<String>,
        buttons: impl IntoIterator<Item = Button>,
    ) -> Self {
        Self::from_body(MessageBody::ActionCard {
            action_card: ActionCard {
                title: title.into(),
                text: text.into(),
                single_title: String::new(),
                single_url: String::new(),
                buttons: buttons.into_iter().collect(),
                button_orientation: None,
            },
        })
    }

    /// Feed card.
    pub fn feed_card(links: impl IntoIterator<Item = FeedLink>) -> Self {
        Self::from_body(MessageBody::FeedCard {
            feed_card: FeedCard {
                links: links.into_iter().collect(),
            },
        })
    }

    pub fn kind(&self) -> MessageKind {
        match &self.body {
            MessageBody::Text { .. } => MessageKind::Text,
            MessageBody::Link { .. } => MessageKind::Link,
            MessageBody::Markdown { .. } => MessageKind::Markdown,
            MessageBody::ActionCard { .. } => MessageKind::ActionCard,
            MessageBody::FeedCard { .. } => MessageKind::FeedCard,
        }
    }

    /// Set the link thumbnail. No-op for other kinds.
    pub fn with_picture(mut self, pic_url: impl Into<String>) -> Self {
        if let MessageBody::Link { link } = &mut self.body {
            link.pic_url = pic_url.into();
        }
        self
    }

    /// Append action card buttons. No-op for other kinds.
    pub fn add_buttons(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
        if let MessageBody::ActionCard { action_card } = &mut self.body {
            action_card.buttons.extend(buttons);
        }
        self
    }

    /// Stack action card buttons vertically. No-op for other kinds.
    pub fn vertical_buttons(self) -> Self {
        self.with_orientation(ButtonOrientation::Vertical)
    }

    /// Lay action card buttons out horizontally. No-op for other kinds.
    pub fn horizontal_buttons(self) -> Self {
        self.with_orientation(ButtonOrientation::Horizontal)
    }

    fn with_orientation(mut self, orientation: ButtonOrientation) -> Self {
        if let MessageBody::ActionCard { action_card } = &mut self.body {
            action_card.button_orientation = Some(orientation);
        }
        self
    }

    /// Append feed card links. No-op for other kinds.
    pub fn add_links(mut self, links: impl IntoIterator<Item = FeedLink>) -> Self {
        if let MessageBody::FeedCard { feed_card } = &mut self.body {
            feed_card.links.extend(links);
        }
        self
    }

    /// Mention specific members by mobile number. Replaces any earlier mention.
    pub fn at_mobiles<I, S>(mut self, mobiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.at = Some(At {
            at_mobiles: mobiles.into_iter().map(Into::into).collect(),
            is_at_all: false,
        });
        self
    }

    /// Mention everyone in the chat. Replaces any earlier mention.
    pub fn at_all(mut self) -> Self {
        self.at = Some(At {
            at_mobiles: Vec::new(),
            is_at_all: true,
        });
        self
    }

    /// Check the message against per-kind constraints before sending.
    pub fn validate(&self) -> DingTalkResult<()> {
        let kind = self.kind();

        if self.at.is_some() && !kind.supports_mention() {
            return Err(DingTalkError::InvalidMessage {
                reason: format!("{} messages do not support mentions", kind),
            });
        }

        match &self.body {
            MessageBody::ActionCard { action_card }
                if action_card.single_url.is_empty() && action_card.buttons.is_empty() =>
            {
                Err(DingTalkError::InvalidMessage {
                    reason: "actionCard needs a singleURL or at least one button".to_string(),
                })
            }
            MessageBody::FeedCard { feed_card } if feed_card.links.is_empty() => {
                Err(DingTalkError::InvalidMessage {
                    reason: "feedCard needs at least one link".to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Serialize to the JSON request body.
    pub fn to_body(&self) -> DingTalkResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| DingTalkError::InvalidMessage {
            reason: format!("failed to serialize message: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn to_value(msg: &Message) -> Value {
        serde_json::to_value(msg).unwrap()
    }

    #[test]
    fn test_text_body_is_exact() {
        let body = Message::text("hello").to_body().unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"{"msgtype":"text","text":{"content":"hello"}}"#
        );
    }

    #[test]
    fn test_text_omits_other_variants() {
        let value = to_value(&Message::text("hello"));
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        for key in ["link", "markdown", "actionCard", "feedCard", "at"] {
            assert!(!obj.contains_key(key), "unexpected key {key}");
        }
    }

    #[test]
    fn test_link_picture_optional() {
        let plain = to_value(&Message::link("t", "x", "https://example.com"));
        assert_eq!(
            plain,
            json!({
                "msgtype": "link",
                "link": {"title": "t", "text": "x", "messageUrl": "https://example.com"}
            })
        );

        let with_pic = to_value(
            &Message::link("t", "x", "https://example.com").with_picture("https://img/p.png"),
        );
        assert_eq!(with_pic["link"]["picUrl"], "https://img/p.png");
    }

    #[test]
    fn test_markdown_shape() {
        let value = to_value(&Message::markdown("Build", "# ok"));
        assert_eq!(
            value,
            json!({"msgtype": "markdown", "markdown": {"title": "Build", "text": "# ok"}})
        );
    }

    #[test]
    fn test_single_action_card() {
        let value = to_value(&Message::action_card(
            "Release",
            "v1.2 is out",
            "Read more",
            "https://example.com/r",
        ));
        assert_eq!(
            value,
            json!({
                "msgtype": "actionCard",
                "actionCard": {
                    "title": "Release",
                    "text": "v1.2 is out",
                    "singleTitle": "Read more",
                    "singleURL": "https://example.com/r"
                }
            })
        );
    }

    #[test]
    fn test_custom_card_buttons_and_orientation() {
        let msg = Message::custom_card("Vote", "Pick one", [Button::new("A", "https://a")])
            .add_buttons([Button::new("B", "https://b")])
            .horizontal_buttons();
        let value = to_value(&msg);

        assert_eq!(value["actionCard"]["btnOrientation"], "1");
        assert_eq!(
            value["actionCard"]["btns"],
            json!([
                {"title": "A", "actionURL": "https://a"},
                {"title": "B", "actionURL": "https://b"}
            ])
        );
        assert!(value["actionCard"].get("singleURL").is_none());

        let vertical = msg.vertical_buttons();
        assert_eq!(to_value(&vertical)["actionCard"]["btnOrientation"], "0");
    }

    #[test]
    fn test_feed_card_links() {
        let msg = Message::feed_card([FeedLink::new("one", "https://1", "https://1.png")])
            .add_links([FeedLink::new("two", "https://2", "https://2.png")]);
        let value = to_value(&msg);
        assert_eq!(value["msgtype"], "feedCard");
        assert_eq!(value["feedCard"]["links"][1]["messageURL"], "https://2");
        assert_eq!(value["feedCard"]["links"][1]["picURL"], "https://2.png");
    }

    #[test]
    fn test_kind_specific_builders_are_noops_elsewhere() {
        let msg = Message::text("hi")
            .with_picture("https://p")
            .add_buttons([Button::new("A", "https://a")])
            .horizontal_buttons()
            .add_links([FeedLink::new("x", "y", "z")]);
        assert_eq!(msg, Message::text("hi"));
    }

    #[test]
    fn test_at_all_shape() {
        let value = to_value(&Message::text("hi").at_all());
        assert_eq!(value["at"], json!({"isAtAll": true}));
    }

    #[test]
    fn test_at_mobiles_shape() {
        let value = to_value(&Message::text("hi").at_mobiles(["13800000000", "13900000000"]));
        assert_eq!(
            value["at"],
            json!({"atMobiles": ["13800000000", "13900000000"]})
        );
    }

    #[test]
    fn test_later_mention_replaces_earlier() {
        let msg = Message::text("hi").at_all().at_mobiles(["13800000000"]);
        let at = msg.at.unwrap();
        assert!(!at.is_at_all);
        assert_eq!(at.at_mobiles, vec!["13800000000".to_string()]);
    }

    #[test]
    fn test_validate_rejects_mention_on_cards() {
        let card = Message::action_card("t", "x", "go", "https://a").at_all();
        assert!(matches!(
            card.validate(),
            Err(DingTalkError::InvalidMessage { .. })
        ));

        let feed = Message::feed_card([FeedLink::new("a", "b", "c")]).at_mobiles(["1"]);
        assert!(feed.validate().is_err());

        assert!(Message::markdown("t", "x").at_all().validate().is_ok());
        assert!(Message::link("t", "x", "u").at_mobiles(["1"]).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_cards() {
        assert!(Message::feed_card([]).validate().is_err());
        assert!(Message::custom_card("t", "x", []).validate().is_err());
        assert!(Message::custom_card("t", "x", [Button::new("a", "b")])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_deserialize_wire_form() {
        let raw = r#"{"msgtype":"markdown","markdown":{"title":"t","text":"x"},"at":{"isAtAll":true}}"#;
        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg, Message::markdown("t", "x").at_all());
        assert_eq!(msg.kind().as_str(), "markdown");
    }
}
