//! Chat widget collaborators.
//!
//! The transcript and persona toggle live in [`session::ChatSession`]; the
//! provider round trip is abstracted behind [`backend::ChatBackend`] so hosts
//! bring their own HTTP client. Request failures surface through the shared
//! toast store.

pub mod backend;
pub mod message;
pub mod session;

pub use backend::{ChatBackend, ChatError};
pub use message::{ChatMessage, ChatMode, Role};
pub use session::ChatSession;
