//! Error types for the bridge and the bootstrap sequence.

/// Errors raised while wiring the console bridge to the browser
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The bridge was started before the browser handle was published
    #[error("Browser handle has not been published")]
    BrowserNotPublished,

    /// A second browser handle was published
    #[error("Browser handle was already published")]
    AlreadyPublished,

    /// The bridge thread could not be spawned
    #[error("Failed to spawn bridge thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// A message could not be handed to the transport
    #[error("Failed to send message: {0}")]
    Send(String),
}

/// Errors that end the bootstrap sequence
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Failed to load the CEF library")]
    LibraryLoad,

    #[error("Failed to initialize CEF: {0}")]
    Initialize(String),

    #[error("Failed to create browser: {0}")]
    CreateBrowser(String),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl BootstrapError {
    /// Process exit code reported for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}
