//! Host integration surface.
//!
//! The chat host hands the plugin inbound messages and provides the outbound
//! channel back into the conversation. Everything the plugin needs from the
//! host fits behind [`ChatTransport`], which keeps message handling testable
//! without a live chat session.

use crate::error::PluginResult;

/// A message received from the chat host.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Platform identifier of the sender.
    pub sender_id: String,

    /// Conversation the message arrived in (direct chat or group).
    pub conversation_id: String,

    /// Raw text content.
    pub content: String,
}

impl InboundMessage {
    /// Create an inbound message.
    pub fn new(
        sender_id: impl Into<String>,
        conversation_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            conversation_id: conversation_id.into(),
            content: content.into(),
        }
    }
}

/// What the host should do with a message after the plugin has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The plugin consumed the message; the host stops here.
    Handled,
    /// The message is not ours; the host hands it to other handlers.
    PassThrough,
}

impl Disposition {
    /// Whether the host should keep propagating the message.
    pub fn should_propagate(self) -> bool {
        matches!(self, Self::PassThrough)
    }
}

/// Outbound channel into the chat session.
///
/// Implemented by the host; the plugin only sends, it never reads through
/// this trait.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Platform identifier of the account the plugin is running as.
    ///
    /// Embedded in rich cards so the client attributes them correctly.
    fn self_id(&self) -> &str;

    /// Send a plain text reply, mentioning the listed users.
    async fn send_text(
        &self,
        conversation: &str,
        text: &str,
        mentions: &[String],
    ) -> PluginResult<()>;

    /// Send a rich app message with the given XML payload and message type.
    async fn send_app_message(
        &self,
        conversation: &str,
        xml: &str,
        message_type: i32,
    ) -> PluginResult<()>;
}
