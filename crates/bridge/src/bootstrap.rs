//! Process bootstrap sequence
//!
//! The order of steps is dictated by CEF:
//! 1. Load the framework library (fatal on failure)
//! 2. Select the framework API version and parse process arguments
//! 3. Run the subprocess entry point (returns early for helper processes)
//! 4. Initialize in two stages, generic first, then with the application
//! 5. Create the single browser instance and publish its handle
//! 6. Start the console bridge
//! 7. Run the blocking message loop
//! 8. Join the bridge and shut the framework down
//!
//! [`Runtime`] abstracts the framework so the sequence can be driven by a
//! fake in tests.

use std::io::{BufRead, Write};
use std::time::Duration;

use courier_config::CourierConfig;

use crate::console::spawn_bridge;
use crate::error::BootstrapError;
use crate::slot::BrowserSlot;
use crate::MessageSink;

/// How long teardown waits for the bridge before detaching it
pub const BRIDGE_JOIN_GRACE: Duration = Duration::from_millis(250);

/// Initialization stages, run in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    /// Framework-wide setup that does not need the application object
    Generic,
    /// The real initialization with the browser-side application
    Browser,
}

/// Embedding framework driven by [`run`]
pub trait Runtime {
    /// Handle to a created browser; also the bridge's message target
    type Browser: MessageSink + Clone + Send + 'static;

    /// Load the framework library. `false` aborts startup.
    fn load_library(&mut self) -> bool;

    /// Select the framework API version and capture the process arguments
    ///
    /// Runs before any framework entry point that receives an application
    /// object, `execute_process` included.
    fn parse_args(&mut self);

    /// Run the subprocess entry point
    ///
    /// Returns the exit code if this process was a framework subprocess and
    /// has finished, `None` for the browser process.
    fn execute_process(&mut self) -> Option<i32>;

    fn initialize(&mut self, stage: InitStage, config: &CourierConfig) -> Result<(), BootstrapError>;

    /// Synchronously create the browser instance
    fn create_browser(&mut self, startup_url: &str) -> Result<Self::Browser, BootstrapError>;

    /// Block until the message loop is quit
    fn run_message_loop(&mut self);

    fn shutdown(&mut self);
}

/// Run the full bootstrap sequence and return the process exit code
///
/// `slot` receives the browser handle; the application object built by the
/// runtime may hold a clone of it. The bridge reads `input` and echoes to
/// `output`.
pub fn run<Rt, R, W>(
    runtime: &mut Rt,
    config: &CourierConfig,
    slot: &BrowserSlot<Rt::Browser>,
    input: R,
    mut output: W,
) -> Result<i32, BootstrapError>
where
    Rt: Runtime,
    R: BufRead + Send + 'static,
    W: Write + Clone + Send + 'static,
{
    if !runtime.load_library() {
        tracing::error!("Failed to load the CEF library");
        return Err(BootstrapError::LibraryLoad);
    }

    runtime.parse_args();

    if let Some(code) = runtime.execute_process() {
        tracing::debug!("Subprocess finished with exit code {}", code);
        return Ok(code);
    }

    runtime.initialize(InitStage::Generic, config)?;
    runtime.initialize(InitStage::Browser, config)?;

    let browser = match runtime.create_browser(&config.startup_url) {
        Ok(browser) => browser,
        Err(e) => {
            runtime.shutdown();
            return Err(e);
        }
    };

    if let Err(e) = slot.publish(browser) {
        runtime.shutdown();
        return Err(e.into());
    }

    let bridge = match spawn_bridge(slot, input, output.clone()) {
        Ok(bridge) => bridge,
        Err(e) => {
            runtime.shutdown();
            return Err(e.into());
        }
    };

    if let Err(e) = writeln!(output, "Running CEF Message Loop") {
        tracing::warn!("Failed to write to console: {}", e);
    }
    tracing::info!("Running CEF message loop");
    runtime.run_message_loop();
    tracing::info!("CEF message loop exited");

    bridge.join_or_detach(BRIDGE_JOIN_GRACE);

    runtime.shutdown();
    tracing::info!("CEF shut down");
    Ok(0)
}
