//! Fonda keeps a short list of transient notifications ("toasts") and tells
//! interested views whenever it changes.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the toast store, its configuration, and the chat widget
//!   collaborators that report failures through toasts.
//! - [`cli`] parses arguments, edits configuration, and runs the interactive
//!   toast console.
//! - [`utils`] holds diagnostic logging setup.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod cli;
pub mod core;
pub mod utils;
