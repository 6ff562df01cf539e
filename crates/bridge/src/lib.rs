//! Bridge core abstractions for Courier
//!
//! Defines the seams between the host program and the embedded browser
//! engine: a [`MessageSink`] that delivers named messages to the renderer, a
//! [`CommandLineSink`] that receives startup switches, and the [`Runtime`]
//! trait that the bootstrap sequence drives. Everything in this crate runs
//! without the CEF library, which lives behind these traits in
//! `courier-frontend-cef`.

pub mod bootstrap;
pub mod console;
pub mod error;
pub mod receiver;
pub mod slot;
pub mod switches;

#[cfg(test)]
pub(crate) mod testing;

pub use bootstrap::{run, InitStage, Runtime, BRIDGE_JOIN_GRACE};
pub use console::{spawn_bridge, BridgeExit, BridgeHandle, ConsoleBridge, StdoutWriter};
pub use error::{BootstrapError, BridgeError};
pub use receiver::{MessageReceiver, ReceivedLog};
pub use slot::BrowserSlot;
pub use switches::{customize_command_line, StartupSwitches};

use courier_ipc::MessageName;

/// Destination for messages bound to the renderer process
///
/// Delivery is fire-and-forget: `Ok` only means the message was handed to
/// the transport, not that the renderer saw it.
pub trait MessageSink {
    /// Send a message addressed to the renderer of the main frame
    fn send_to_renderer(&self, name: &MessageName) -> Result<(), BridgeError>;
}

/// A command line that is still being assembled
pub trait CommandLineSink {
    /// Append `--name` to the command line
    fn append_switch(&mut self, name: &str);
}

impl CommandLineSink for Vec<String> {
    fn append_switch(&mut self, name: &str) {
        self.push(name.to_string());
    }
}
