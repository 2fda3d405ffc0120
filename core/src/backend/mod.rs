/// Capability interfaces of the backing service
///
/// The mock implements these, and a real transport would slot in behind the
/// same signatures.
use crate::error::Result;
use crate::types::{Conversation, Message, User};

pub mod mock;

pub use mock::MockBackend;

/// Sign-in credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form fields
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Supplies the conversation set and per-conversation message history
#[allow(async_fn_in_trait)]
pub trait ConversationSource {
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// Message fixture for one conversation; unmapped ids get a default thread
    async fn messages_for(&self, conversation_id: &str) -> Result<Vec<Message>>;
}

/// Mock authentication: every call resolves after a fixed delay
#[allow(async_fn_in_trait)]
pub trait AuthSource {
    async fn sign_in(&self, credentials: Credentials) -> Result<User>;

    async fn sign_up(&self, form: SignUpForm) -> Result<User>;

    async fn request_password_reset(&self, email: &str) -> Result<()>;

    /// Local comparison against the one valid code
    async fn verify_code(&self, code: &str) -> Result<bool>;
}

/// Produces the synthetic reply that follows each sent message
pub trait ReplySource {
    fn compose_reply(&self, conversation: &Conversation) -> String;
}
