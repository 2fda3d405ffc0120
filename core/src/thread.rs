/// Message thread for the active conversation
///
/// Append-only, insertion order, no pagination. Switching conversations
/// replaces the whole sequence with that conversation's fixture, so local
/// edits are deliberately not retained across a switch.
use crate::types::{ChatEvent, Message, ReplyRef};

#[derive(Debug, Clone, Default)]
pub struct MessageThread {
    conversation_id: Option<String>,
    messages: Vec<Message>,
    typing: bool,
    replying_to: Option<ReplyRef>,
}

impl MessageThread {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sequence with the fixture for a newly selected conversation
    pub fn load(&mut self, conversation_id: impl Into<String>, messages: Vec<Message>) {
        self.conversation_id = Some(conversation_id.into());
        self.messages = messages;
        self.typing = false;
        self.replying_to = None;
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn replying_to(&self) -> Option<&ReplyRef> {
        self.replying_to.as_ref()
    }

    pub fn set_replying_to(&mut self, reply: Option<ReplyRef>) {
        self.replying_to = reply;
    }

    /// Take the pending reply reference for attachment to an outgoing message
    pub fn take_replying_to(&mut self) -> Option<ReplyRef> {
        self.replying_to.take()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Update one message's delivery status; unknown ids are ignored
    pub fn advance_status(
        &mut self,
        message_id: &str,
        status: crate::types::DeliveryStatus,
    ) -> bool {
        match self.messages.iter_mut().find(|m| m.id == message_id) {
            Some(m) => {
                m.status = status;
                true
            }
            None => false,
        }
    }

    /// Add a reaction emoji to a message, keeping the set deduplicated
    pub fn add_reaction(&mut self, message_id: &str, emoji: &str) -> bool {
        match self.messages.iter_mut().find(|m| m.id == message_id) {
            Some(m) => {
                if !m.reactions.iter().any(|r| r == emoji) {
                    m.reactions.push(emoji.to_string());
                }
                true
            }
            None => false,
        }
    }

    /// Apply an engine event. Events for any conversation other than the one
    /// in view are dropped, which is what keeps the thread consistent with
    /// the active selection while delayed replies are in flight.
    pub fn apply(&mut self, event: &ChatEvent) -> bool {
        let active = match self.conversation_id.as_deref() {
            Some(id) => id,
            None => return false,
        };
        match event {
            ChatEvent::MessageAppended {
                conversation_id,
                message,
            } if conversation_id == active => {
                self.append(message.clone());
                true
            }
            ChatEvent::DeliveryUpdated {
                conversation_id,
                message_id,
                status,
            } if conversation_id == active => self.advance_status(message_id, *status),
            ChatEvent::TypingStarted { conversation_id } if conversation_id == active => {
                self.typing = true;
                true
            }
            ChatEvent::TypingStopped { conversation_id } if conversation_id == active => {
                self.typing = false;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::fixture_messages;
    use crate::types::{DeliveryStatus, MessageDirection};

    fn sent(body: &str) -> Message {
        Message {
            id: format!("m-{}", body),
            body: body.to_string(),
            sender: "me".to_string(),
            timestamp: "10:00 AM".to_string(),
            direction: MessageDirection::Sent,
            status: DeliveryStatus::Sending,
            reply_to: None,
            reactions: Vec::new(),
        }
    }

    #[test]
    fn load_replaces_the_sequence() {
        let mut thread = MessageThread::new();
        thread.load("jane-smith", fixture_messages("jane-smith"));
        assert_eq!(thread.messages().len(), 4);

        thread.append(sent("hello"));
        thread.load("team-project", fixture_messages("team-project"));
        assert_eq!(thread.messages().len(), 7);
        assert!(thread.messages().iter().all(|m| m.body != "hello"));
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut thread = MessageThread::new();
        thread.load("jane-smith", Vec::new());
        thread.append(sent("one"));
        thread.append(sent("two"));
        let bodies: Vec<_> = thread.messages().iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["one", "two"]);
    }

    #[test]
    fn advance_status_ignores_unknown_ids() {
        let mut thread = MessageThread::new();
        thread.load("jane-smith", Vec::new());
        thread.append(sent("one"));
        assert!(thread.advance_status("m-one", DeliveryStatus::Delivered));
        assert_eq!(thread.messages()[0].status, DeliveryStatus::Delivered);
        assert!(!thread.advance_status("missing", DeliveryStatus::Read));
    }

    #[test]
    fn reactions_are_deduplicated() {
        let mut thread = MessageThread::new();
        thread.load("jane-smith", Vec::new());
        thread.append(sent("one"));
        assert!(thread.add_reaction("m-one", "👍"));
        assert!(thread.add_reaction("m-one", "👍"));
        assert!(thread.add_reaction("m-one", "❤️"));
        assert_eq!(thread.messages()[0].reactions, vec!["👍", "❤️"]);
    }

    #[test]
    fn events_for_other_conversations_are_dropped() {
        let mut thread = MessageThread::new();
        thread.load("jane-smith", Vec::new());

        let applied = thread.apply(&ChatEvent::MessageAppended {
            conversation_id: "team-project".to_string(),
            message: sent("stray"),
        });
        assert!(!applied);
        assert!(thread.messages().is_empty());

        let applied = thread.apply(&ChatEvent::TypingStarted {
            conversation_id: "jane-smith".to_string(),
        });
        assert!(applied);
        assert!(thread.is_typing());
    }

    #[test]
    fn delivery_event_updates_the_matching_message() {
        let mut thread = MessageThread::new();
        thread.load("jane-smith", Vec::new());
        thread.append(sent("one"));
        let applied = thread.apply(&ChatEvent::DeliveryUpdated {
            conversation_id: "jane-smith".to_string(),
            message_id: "m-one".to_string(),
            status: DeliveryStatus::Delivered,
        });
        assert!(applied);
        assert_eq!(thread.messages()[0].status, DeliveryStatus::Delivered);
    }
}
