/// Shared types for the chat model
use serde::{Deserialize, Serialize};

/// The signed-in user, persisted across restarts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Auth provider tag ("google"), absent for email sign-in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    Direct,
    Group,
}

/// One entry in the conversation list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub name: String,
    pub kind: ConversationKind,
    /// Preview text of the last message
    pub last_message: String,
    /// RFC3339 timestamp of the last activity
    pub last_activity: String,
    pub unread_count: u32,
    pub online: bool,
    /// Member display names (groups only)
    #[serde(default)]
    pub members: Vec<String>,
    /// Human-readable last-seen text for offline direct chats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

impl Conversation {
    pub fn is_group(&self) -> bool {
        self.kind == ConversationKind::Group
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    Sent,
    Received,
    System,
}

/// Per-message delivery lifecycle, display only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sending,
    Delivered,
    Read,
}

/// Reference to the message being replied to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyRef {
    pub message_id: String,
    pub sender: String,
    /// Preview of the quoted body, truncated by the composer
    pub preview: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub body: String,
    pub sender: String,
    /// Display timestamp ("10:30 AM", "Yesterday, 3:15 PM")
    pub timestamp: String,
    pub direction: MessageDirection,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<ReplyRef>,
    /// Reaction emoji, deduplicated, insertion order
    #[serde(default)]
    pub reactions: Vec<String>,
}

/// Events emitted by the engine's simulated delivery pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message was appended to a conversation (synthetic replies included)
    MessageAppended {
        conversation_id: String,
        message: Message,
    },
    /// A message we sent moved through the delivery progression
    DeliveryUpdated {
        conversation_id: String,
        message_id: String,
        status: DeliveryStatus,
    },
    /// The other party started composing
    TypingStarted { conversation_id: String },
    TypingStopped { conversation_id: String },
}
