use super::message::{ChatMessage, ChatMode};
use async_trait::async_trait;
use std::fmt;

/// Errors surfaced by a [`ChatBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The provider could not be reached.
    Transport(String),
    /// The provider answered with a failure status.
    Provider { status: u16, message: String },
    /// The provider answered without any usable text.
    EmptyReply,
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Transport(msg) => write!(f, "Could not reach the chat service: {msg}"),
            ChatError::Provider { status, message } => {
                write!(f, "Chat service error ({status}): {message}")
            }
            ChatError::EmptyReply => write!(f, "The chat service returned an empty reply"),
        }
    }
}

impl std::error::Error for ChatError {}

/// Produces the assistant's next turn for a conversation.
///
/// Implementations own prompt construction and the provider round trip.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn reply(&self, history: &[ChatMessage], mode: ChatMode) -> Result<String, ChatError>;
}
