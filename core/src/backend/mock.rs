/// Mock backend: fixture data plus fixed-delay "requests"
///
/// Every call sleeps for a fixed interval and resolves locally; there is no
/// transport. Sign-in accepts any well-formed credentials and fabricates a
/// user record.
use crate::backend::{AuthSource, ConversationSource, Credentials, ReplySource, SignUpForm};
use crate::error::{ChatError, Result};
use crate::types::{
    Conversation, ConversationKind, DeliveryStatus, Message, MessageDirection, User,
};
use crate::validate;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// The one code the mock verifier accepts
pub const VALID_OTP: &str = "123456";

const LOAD_DELAY: Duration = Duration::from_millis(200);
const SIGN_IN_DELAY: Duration = Duration::from_millis(800);
const SIGN_UP_DELAY: Duration = Duration::from_millis(1500);
const RESET_DELAY: Duration = Duration::from_millis(1500);
const VERIFY_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Scales every simulated delay; zero makes tests instantaneous
    delay_scale: u32,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self { delay_scale: 1 }
    }

    /// No simulated latency, for tests
    pub fn instant() -> Self {
        Self { delay_scale: 0 }
    }

    async fn simulate(&self, delay: Duration) {
        if self.delay_scale > 0 {
            tokio::time::sleep(delay * self.delay_scale).await;
        }
    }
}

impl ConversationSource for MockBackend {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        self.simulate(LOAD_DELAY).await;
        Ok(fixture_conversations())
    }

    async fn messages_for(&self, conversation_id: &str) -> Result<Vec<Message>> {
        self.simulate(LOAD_DELAY).await;
        Ok(fixture_messages(conversation_id))
    }
}

impl AuthSource for MockBackend {
    async fn sign_in(&self, credentials: Credentials) -> Result<User> {
        let errors = validate::validate_sign_in(&credentials.email, &credentials.password);
        if let Some(first) = errors.first() {
            return Err(ChatError::Validation(first.message.to_string()));
        }
        self.simulate(SIGN_IN_DELAY).await;
        info!(email = %credentials.email, "mock sign-in succeeded");
        Ok(User {
            id: Uuid::new_v4().to_string(),
            name: "John Doe".to_string(),
            email: credentials.email,
            provider: None,
        })
    }

    async fn sign_up(&self, form: SignUpForm) -> Result<User> {
        let errors = validate::validate_sign_up(
            &form.name,
            &form.email,
            &form.password,
            &form.confirm_password,
        );
        if let Some(first) = errors.first() {
            return Err(ChatError::Validation(first.message.to_string()));
        }
        self.simulate(SIGN_UP_DELAY).await;
        info!(email = %form.email, "mock account created");
        Ok(User {
            id: Uuid::new_v4().to_string(),
            name: form.name,
            email: form.email,
            provider: None,
        })
    }

    async fn request_password_reset(&self, email: &str) -> Result<()> {
        if !validate::is_valid_email(email) {
            return Err(ChatError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }
        self.simulate(RESET_DELAY).await;
        info!(email = %email, "mock reset link sent");
        Ok(())
    }

    async fn verify_code(&self, code: &str) -> Result<bool> {
        self.simulate(VERIFY_DELAY).await;
        Ok(code == VALID_OTP)
    }
}

impl ReplySource for MockBackend {
    fn compose_reply(&self, conversation: &Conversation) -> String {
        format!(
            "Thanks for your message! This is a simulated response from {}.",
            conversation.name
        )
    }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn conversation(
    id: &str,
    name: &str,
    kind: ConversationKind,
    last_message: &str,
    last_activity: &str,
    unread_count: u32,
    online: bool,
    members: &[&str],
    last_seen: Option<&str>,
) -> Conversation {
    Conversation {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        last_message: last_message.to_string(),
        last_activity: last_activity.to_string(),
        unread_count,
        online,
        members: members.iter().map(|m| m.to_string()).collect(),
        last_seen: last_seen.map(str::to_string),
    }
}

pub fn fixture_conversations() -> Vec<Conversation> {
    use ConversationKind::{Direct, Group};
    vec![
        conversation(
            "team-project",
            "Team Project",
            Group,
            "Great work everyone!",
            "2025-01-07T10:30:00Z",
            2,
            false,
            &["John Doe", "Jane Smith", "Mike Johnson"],
            None,
        ),
        conversation(
            "jane-smith",
            "Jane Smith",
            Direct,
            "See you tomorrow!",
            "2025-01-07T09:45:00Z",
            0,
            true,
            &[],
            None,
        ),
        conversation(
            "design-team",
            "Design Team",
            Group,
            "New mockups are ready",
            "2025-01-06T17:30:00Z",
            5,
            false,
            &["John Doe", "Sarah Wilson", "Tom Brown"],
            None,
        ),
        conversation(
            "marketing-sync",
            "Marketing Sync",
            Group,
            "Campaign results are in!",
            "2025-01-06T15:00:00Z",
            3,
            false,
            &["Alex Johnson", "Emma Davis", "Ryan Kim"],
            None,
        ),
        conversation(
            "michael-rodriguez",
            "Michael Rodriguez",
            Direct,
            "Let me check those numbers",
            "2025-01-05T14:10:00Z",
            0,
            false,
            &[],
            Some("2 hours ago"),
        ),
        conversation(
            "emma-watson",
            "Emma Watson",
            Direct,
            "The presentation looks great!",
            "2025-01-05T09:05:00Z",
            1,
            true,
            &[],
            None,
        ),
        conversation(
            "development-team",
            "Development Team",
            Group,
            "Sprint planning tomorrow",
            "2025-01-04T19:20:00Z",
            0,
            false,
            &["John Doe", "Mike Johnson", "Sophia Chen", "David Park"],
            None,
        ),
    ]
}

fn msg(
    body: &str,
    sender: &str,
    timestamp: &str,
    direction: MessageDirection,
    status: DeliveryStatus,
    reactions: &[&str],
) -> Message {
    Message {
        id: Uuid::new_v4().to_string(),
        body: body.to_string(),
        sender: sender.to_string(),
        timestamp: timestamp.to_string(),
        direction,
        status,
        reply_to: None,
        reactions: reactions.iter().map(|r| r.to_string()).collect(),
    }
}

/// Message fixture for one conversation; unmapped ids get the default thread
pub fn fixture_messages(conversation_id: &str) -> Vec<Message> {
    use DeliveryStatus::{Delivered, Read};
    use MessageDirection::{Received, Sent, System};

    match conversation_id {
        "team-project" => vec![
            msg(
                "Welcome to the Team Project channel!",
                "System",
                "9:00 AM",
                System,
                Read,
                &[],
            ),
            msg(
                "I've uploaded the latest requirements document to the shared folder.",
                "John Doe",
                "9:15 AM",
                Received,
                Read,
                &[],
            ),
            msg("Thanks John, I'll take a look.", "me", "9:20 AM", Sent, Delivered, &[]),
            msg(
                "We should schedule a review meeting this week.",
                "Mike Johnson",
                "9:45 AM",
                Received,
                Read,
                &[],
            ),
            msg("How about Thursday at 2pm?", "me", "10:00 AM", Sent, Delivered, &[]),
            msg("Works for me!", "John Doe", "10:15 AM", Received, Read, &[]),
            msg("Great work everyone!", "Jane Smith", "10:30 AM", Received, Read, &[]),
        ],
        "design-team" => vec![
            msg(
                "Hey team, I've finished the homepage redesign.",
                "Sarah Wilson",
                "Yesterday, 3:15 PM",
                Received,
                Read,
                &[],
            ),
            msg(
                "It looks amazing! Great work Sarah.",
                "John Doe",
                "Yesterday, 3:30 PM",
                Received,
                Read,
                &[],
            ),
            msg(
                "I agree, the new design is much cleaner.",
                "me",
                "Yesterday, 3:45 PM",
                Sent,
                Delivered,
                &[],
            ),
            msg(
                "Should we present it to the client tomorrow?",
                "Tom Brown",
                "Yesterday, 4:00 PM",
                Received,
                Read,
                &[],
            ),
            msg(
                "Yes, I think they'll love it.",
                "me",
                "Yesterday, 4:15 PM",
                Sent,
                Delivered,
                &[],
            ),
            msg(
                "New mockups are ready for the about page as well!",
                "Sarah Wilson",
                "Yesterday, 5:30 PM",
                Received,
                Read,
                &[],
            ),
        ],
        _ => vec![
            msg("Hey, how are you?", "Jane Smith", "10:30 AM", Received, Read, &[]),
            msg(
                "I'm good, thanks! How about you?",
                "me",
                "10:31 AM",
                Sent,
                Delivered,
                &["👍"],
            ),
            msg(
                "Working on the new design. It's coming along nicely!",
                "Jane Smith",
                "10:32 AM",
                Received,
                Read,
                &[],
            ),
            msg(
                "That's great to hear! Can't wait to see it.",
                "me",
                "10:33 AM",
                Sent,
                Delivered,
                &[],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_succeeds_for_well_formed_credentials() {
        let backend = MockBackend::instant();
        let user = backend
            .sign_in(Credentials {
                email: "alex@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.email, "alex@example.com");
        assert_eq!(user.name, "John Doe");
    }

    #[tokio::test]
    async fn sign_in_rejects_short_password() {
        let backend = MockBackend::instant();
        let err = backend
            .sign_in(Credentials {
                email: "alex@example.com".to_string(),
                password: "abc".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
    }

    #[tokio::test]
    async fn only_the_fixed_code_verifies() {
        let backend = MockBackend::instant();
        assert!(backend.verify_code("123456").await.unwrap());
        assert!(!backend.verify_code("123457").await.unwrap());
        assert!(!backend.verify_code("").await.unwrap());
    }

    #[tokio::test]
    async fn mapped_and_default_fixtures() {
        let backend = MockBackend::instant();
        let team = backend.messages_for("team-project").await.unwrap();
        assert_eq!(team.len(), 7);
        assert_eq!(team[0].direction, MessageDirection::System);

        let unmapped = backend.messages_for("no-such-id").await.unwrap();
        let default = backend.messages_for("jane-smith").await.unwrap();
        assert_eq!(unmapped.len(), 4);
        assert_eq!(
            unmapped.iter().map(|m| &m.body).collect::<Vec<_>>(),
            default.iter().map(|m| &m.body).collect::<Vec<_>>()
        );
    }

    #[test]
    fn reply_names_the_conversation() {
        let backend = MockBackend::new();
        let conversations = fixture_conversations();
        let reply = backend.compose_reply(&conversations[1]);
        assert_eq!(
            reply,
            "Thanks for your message! This is a simulated response from Jane Smith."
        );
    }
}
