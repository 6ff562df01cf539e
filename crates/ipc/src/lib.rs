//! IPC message protocol for Courier
//!
//! Defines the named process messages exchanged between the browser process
//! and the renderer, and the console tokenizer that produces them.

pub mod error;
pub mod input;
pub mod messages;

pub use error::IpcError;
pub use input::{next_message_name, read_message};
pub use messages::{MessageName, ProcessRole, ReceivedMessage};
