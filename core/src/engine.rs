/// Chat engine: authors outgoing messages and drives the simulated delivery
/// pipeline over a broadcast channel
///
/// All "asynchrony" here is a fixed-delay timer standing in for network
/// latency. The pipeline for one sent message is:
///   deliver_delay  -> DeliveryUpdated(Delivered)
///   typing_delay   -> TypingStarted
///   reply_delay    -> MessageAppended(reply) + TypingStopped
use crate::backend::ReplySource;
use crate::config::Config;
use crate::types::{
    ChatEvent, Conversation, DeliveryStatus, Message, MessageDirection, ReplyRef,
};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

const EVENT_CAPACITY: usize = 64;

/// Longest quoted-body preview carried on a reply reference
const REPLY_PREVIEW_LEN: usize = 40;

#[derive(Debug, Clone)]
pub struct ChatEngine {
    events: broadcast::Sender<ChatEvent>,
    deliver_delay: Duration,
    typing_delay: Duration,
    reply_delay: Duration,
    no_reply: bool,
}

impl ChatEngine {
    pub fn new(config: &Config) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            events,
            deliver_delay: config.deliver_delay,
            typing_delay: config.typing_delay,
            reply_delay: config.reply_delay,
            no_reply: config.no_reply,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    /// Author an outgoing message and start its delivery pipeline. Returns
    /// `None` for whitespace-only drafts. The returned message (status
    /// Sending) is appended by the caller; everything after that arrives as
    /// events.
    pub fn send(
        &self,
        conversation: &Conversation,
        body: &str,
        reply_to: Option<ReplyRef>,
        replies: &impl ReplySource,
    ) -> Option<Message> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }

        let message = Message {
            id: Uuid::new_v4().to_string(),
            body: body.to_string(),
            sender: "me".to_string(),
            timestamp: now_timestamp(),
            direction: MessageDirection::Sent,
            status: DeliveryStatus::Sending,
            reply_to,
            reactions: Vec::new(),
        };

        debug!(conversation = %conversation.id, message = %message.id, "message sent");
        self.spawn_pipeline(conversation, message.id.clone(), replies);
        Some(message)
    }

    fn spawn_pipeline(
        &self,
        conversation: &Conversation,
        message_id: String,
        replies: &impl ReplySource,
    ) {
        let events = self.events.clone();
        let conversation_id = conversation.id.clone();
        let sender_name = conversation.name.clone();
        let reply_body = replies.compose_reply(conversation);
        let (deliver, typing, reply) = (self.deliver_delay, self.typing_delay, self.reply_delay);
        let no_reply = self.no_reply;

        tokio::spawn(async move {
            tokio::time::sleep(deliver).await;
            let _ = events.send(ChatEvent::DeliveryUpdated {
                conversation_id: conversation_id.clone(),
                message_id,
                status: DeliveryStatus::Delivered,
            });

            if no_reply {
                return;
            }

            tokio::time::sleep(typing).await;
            let _ = events.send(ChatEvent::TypingStarted {
                conversation_id: conversation_id.clone(),
            });

            tokio::time::sleep(reply).await;
            let _ = events.send(ChatEvent::MessageAppended {
                conversation_id: conversation_id.clone(),
                message: Message {
                    id: Uuid::new_v4().to_string(),
                    body: reply_body,
                    sender: sender_name,
                    timestamp: now_timestamp(),
                    direction: MessageDirection::Received,
                    status: DeliveryStatus::Read,
                    reply_to: None,
                    reactions: Vec::new(),
                },
            });
            let _ = events.send(ChatEvent::TypingStopped { conversation_id });
        });
    }
}

/// Build the reply reference the composer attaches when replying
pub fn reply_ref(message: &Message) -> ReplyRef {
    let preview: String = message.body.chars().take(REPLY_PREVIEW_LEN).collect();
    ReplyRef {
        message_id: message.id.clone(),
        sender: message.sender.clone(),
        preview,
    }
}

/// Local wall-clock display timestamp ("10:30 AM")
pub fn now_timestamp() -> String {
    chrono::Local::now().format("%-I:%M %p").to_string()
}
