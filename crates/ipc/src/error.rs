//! Error types for IPC operations.

/// Errors that can occur while reading or echoing console messages.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Failed to read console input: {0}")]
    Input(#[source] std::io::Error),

    #[error("Failed to write console output: {0}")]
    Output(#[source] std::io::Error),
}
