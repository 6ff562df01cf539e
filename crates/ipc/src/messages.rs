//! Named process messages and the process roles that exchange them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a process message.
///
/// Messages carry no structured payload; the name is the whole message.
/// Any string is accepted, including the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageName(String);

impl MessageName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for MessageName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Role of a CEF process, derived from its `--type` switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessRole {
    /// The host process (no `--type` switch)
    Browser,
    /// A renderer subprocess, or the renderer role in single-process mode
    Renderer,
    /// GPU, utility, zygote and other helper processes
    Other(String),
}

impl ProcessRole {
    /// Classify a process-type marker. An empty marker is the browser process.
    pub fn from_process_type(process_type: &str) -> Self {
        match process_type {
            "" => Self::Browser,
            "renderer" => Self::Renderer,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_browser(&self) -> bool {
        matches!(self, Self::Browser)
    }
}

impl fmt::Display for ProcessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Browser => f.write_str("browser"),
            Self::Renderer => f.write_str("renderer"),
            Self::Other(kind) => f.write_str(kind),
        }
    }
}

/// A message handled by the renderer-side receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedMessage {
    pub name: MessageName,
    pub source: ProcessRole,
}
