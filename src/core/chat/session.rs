use super::backend::{ChatBackend, ChatError};
use super::message::{ChatMessage, ChatMode};
use crate::core::toast::{ToastContent, ToastStore, ToastVariant};
use tracing::{debug, warn};

pub const GREETING: &str =
    "Hello, friend! I'm your holiday assistant. How can I help you celebrate properly?";
const NORMAL_MODE_NOTICE: &str =
    "Back to normal mode! From now on you get responsible advice for the holidays.";
const PRANKSTER_MODE_NOTICE: &str = "Prankster mode on! Expect nothing but terrible advice \
from here. Don't take any of it seriously.";

/// Conversation state of the chat widget.
///
/// Sending is split in two halves so a caller can run the backend request on
/// another task: [`ChatSession::begin_send`] records the user turn and returns
/// the history to send, [`ChatSession::finish_send`] records the outcome.
pub struct ChatSession<B> {
    backend: B,
    toasts: ToastStore,
    messages: Vec<ChatMessage>,
    mode: ChatMode,
    loading: bool,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(backend: B, toasts: ToastStore) -> Self {
        Self {
            backend,
            toasts,
            messages: vec![ChatMessage::assistant(GREETING)],
            mode: ChatMode::Normal,
            loading: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Records the user's turn. Returns the history to send, or `None` for
    /// blank input or while a request is already in flight.
    pub fn begin_send(&mut self, input: &str) -> Option<Vec<ChatMessage>> {
        if input.trim().is_empty() || self.loading {
            return None;
        }
        self.messages.push(ChatMessage::user(input));
        self.loading = true;
        Some(self.messages.clone())
    }

    /// Records the backend outcome. Failures become an assistant turn carrying
    /// the error text plus a destructive toast.
    pub fn finish_send(&mut self, outcome: Result<String, ChatError>) {
        self.loading = false;
        match outcome {
            Ok(reply) => {
                debug!(chars = reply.len(), "assistant reply received");
                self.messages.push(ChatMessage::assistant(reply));
            }
            Err(err) => {
                warn!(error = %err, "chat request failed");
                let text = err.to_string();
                self.toasts.notify(
                    ToastContent::new()
                        .title("Message not sent")
                        .description(text.clone())
                        .variant(ToastVariant::Destructive),
                );
                self.messages.push(ChatMessage::assistant(text));
            }
        }
    }

    /// Sends `input` and waits for the reply. Returns `false` when nothing was sent.
    pub async fn send(&mut self, input: &str) -> bool {
        let Some(history) = self.begin_send(input) else {
            return false;
        };
        let outcome = self.backend.reply(&history, self.mode).await;
        self.finish_send(outcome);
        true
    }

    /// Switches persona. Announces the change only when the mode differs.
    pub fn set_mode(&mut self, mode: ChatMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        let notice = match mode {
            ChatMode::Normal => NORMAL_MODE_NOTICE,
            ChatMode::Prankster => PRANKSTER_MODE_NOTICE,
        };
        self.messages.push(ChatMessage::assistant(notice));
        true
    }

    /// Restores the greeting-only transcript in normal mode.
    pub fn reset(&mut self) {
        self.messages = vec![ChatMessage::assistant(GREETING)];
        self.mode = ChatMode::Normal;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat::message::Role;
    use crate::core::toast::{ManualScheduler, ToastSettings};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct ScriptedBackend {
        replies: Mutex<Vec<Result<String, ChatError>>>,
        seen: Mutex<Vec<(usize, ChatMode)>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String, ChatError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn reply(
            &self,
            history: &[ChatMessage],
            mode: ChatMode,
        ) -> Result<String, ChatError> {
            self.seen.lock().unwrap().push((history.len(), mode));
            self.replies.lock().unwrap().remove(0)
        }
    }

    type Replies = Vec<Result<String, ChatError>>;

    fn session(replies: Replies) -> (ChatSession<ScriptedBackend>, ToastStore) {
        let toasts = ToastStore::new(Arc::new(ManualScheduler::new()), ToastSettings::default());
        (
            ChatSession::new(ScriptedBackend::new(replies), toasts.clone()),
            toasts,
        )
    }

    #[tokio::test]
    async fn send_appends_user_and_assistant_turns() {
        let (mut chat, toasts) = session(vec![Ok("Have some empanadas!".to_string())]);

        assert!(chat.send("What should I eat?").await);

        let roles: Vec<Role> = chat.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(chat.messages()[2].content, "Have some empanadas!");
        assert!(!chat.is_loading());
        assert!(toasts.current().is_empty());
        assert_eq!(*chat.backend.seen.lock().unwrap(), vec![(2, ChatMode::Normal)]);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let (mut chat, _toasts) = session(Vec::new());
        assert!(!chat.send("   ").await);
        assert_eq!(chat.messages().len(), 1);
    }

    #[tokio::test]
    async fn failure_raises_destructive_toast() {
        let (mut chat, toasts) = session(vec![Err(ChatError::Provider {
            status: 500,
            message: "boom".to_string(),
        })]);

        assert!(chat.send("hello").await);

        let last = chat.messages().last().expect("assistant turn");
        assert_eq!(last.content, "Chat service error (500): boom");

        let state = toasts.current();
        assert_eq!(state.len(), 1);
        assert_eq!(state.toasts[0].variant, ToastVariant::Destructive);
        assert_eq!(
            state.toasts[0].description.as_deref(),
            Some("Chat service error (500): boom")
        );
    }

    #[test]
    fn begin_send_refuses_while_loading() {
        let (mut chat, _toasts) = session(Vec::new());
        assert!(chat.begin_send("first").is_some());
        assert!(chat.is_loading());
        assert!(chat.begin_send("second").is_none());

        chat.finish_send(Ok("done".to_string()));
        assert!(!chat.is_loading());
        assert_eq!(chat.messages().len(), 3);
    }

    #[test]
    fn set_mode_announces_only_changes() {
        let (mut chat, _toasts) = session(Vec::new());
        assert!(!chat.set_mode(ChatMode::Normal));
        assert!(chat.set_mode(ChatMode::Prankster));
        assert!(!chat.set_mode(ChatMode::Prankster));

        assert_eq!(chat.mode(), ChatMode::Prankster);
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[1].content, PRANKSTER_MODE_NOTICE);
    }

    #[test]
    fn reset_restores_greeting_and_mode() {
        let (mut chat, _toasts) = session(Vec::new());
        chat.set_mode(ChatMode::Prankster);
        chat.begin_send("hi");

        chat.reset();

        assert_eq!(chat.messages(), &[ChatMessage::assistant(GREETING)]);
        assert_eq!(chat.mode(), ChatMode::Normal);
        assert!(!chat.is_loading());
    }
}
