//! Recording fakes shared by the unit tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use courier_ipc::MessageName;

use crate::{BridgeError, CommandLineSink, MessageSink};

/// Sink that records every message name it is given
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub sent: Arc<Mutex<Vec<String>>>,
    /// Names that are rejected with `BridgeError::Send`
    pub reject: Vec<String>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl MessageSink for RecordingSink {
    fn send_to_renderer(&self, name: &MessageName) -> Result<(), BridgeError> {
        if self.reject.iter().any(|r| r == name.as_str()) {
            return Err(BridgeError::Send(format!("rejected {}", name)));
        }
        self.sent.lock().unwrap().push(name.to_string());
        Ok(())
    }
}

/// Command line that records switches in order
#[derive(Debug, Default)]
pub struct RecordingCommandLine {
    pub switches: Vec<String>,
}

impl CommandLineSink for RecordingCommandLine {
    fn append_switch(&mut self, name: &str) {
        self.switches.push(name.to_string());
    }
}

/// Clonable in-memory writer standing in for stdout
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
