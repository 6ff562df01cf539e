//! Console-to-renderer bridge
//!
//! Reads one line at a time from the console and forwards its first token to
//! the renderer as a named process message. Nothing is validated, acknowledged
//! or retried: a failed delivery is logged and the loop moves on. The loop ends
//! when the input closes; it never observes framework shutdown.

use std::io::{self, BufRead, Write};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use courier_ipc::{read_message, IpcError};

use crate::error::BridgeError;
use crate::slot::BrowserSlot;
use crate::MessageSink;

/// Prompt printed before every read
pub const PROMPT: &str = "Enter message: ";

/// Name of the bridge thread
pub const THREAD_NAME: &str = "courier-bridge";

/// How the bridge loop ended
#[derive(Debug, Default)]
pub struct BridgeExit {
    /// Messages handed to the transport
    pub sent: usize,
    /// Messages the sink refused
    pub failed: usize,
    /// Console error that stopped the loop, `None` on a clean end of input
    pub error: Option<IpcError>,
}

/// The read-tokenize-send loop, bound to one message sink
pub struct ConsoleBridge<S> {
    sink: S,
}

impl<S: MessageSink> ConsoleBridge<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Run until `input` is closed or the console fails
    pub fn run<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> BridgeExit {
        let mut exit = BridgeExit::default();

        loop {
            if let Err(e) = writeln!(output, "{}", PROMPT).and_then(|_| output.flush()) {
                exit.error = Some(IpcError::Output(e));
                break;
            }

            let name = match read_message(input) {
                Ok(Some(name)) => name,
                Ok(None) => {
                    tracing::debug!("Console input closed");
                    break;
                }
                Err(e) => {
                    tracing::warn!("Stopping bridge: {}", e);
                    exit.error = Some(e);
                    break;
                }
            };

            if let Err(e) = writeln!(output, "Sending message: '{}'", name) {
                exit.error = Some(IpcError::Output(e));
                break;
            }

            match self.sink.send_to_renderer(&name) {
                Ok(()) => {
                    exit.sent += 1;
                    tracing::trace!("Forwarded message '{}' to renderer", name);
                }
                Err(e) => {
                    exit.failed += 1;
                    tracing::warn!("Dropped message '{}': {}", name, e);
                }
            }
        }

        exit
    }
}

/// Clonable handle to the process stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutWriter;

impl Write for StdoutWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().lock().flush()
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(buf)
    }
}

/// Owned join handle of a running bridge thread
#[derive(Debug)]
pub struct BridgeHandle {
    handle: JoinHandle<BridgeExit>,
}

impl BridgeHandle {
    /// Block until the bridge ends. Returns `None` if the thread panicked.
    pub fn join(self) -> Option<BridgeExit> {
        match self.handle.join() {
            Ok(exit) => Some(exit),
            Err(_) => {
                tracing::error!("Bridge thread panicked");
                None
            }
        }
    }

    /// Join the bridge if it ends within `grace`, otherwise detach it
    ///
    /// A bridge blocked in a console read cannot be cancelled; a detached
    /// thread is torn down with the process.
    pub fn join_or_detach(self, grace: Duration) -> Option<BridgeExit> {
        let deadline = Instant::now() + grace;
        while !self.handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        if self.handle.is_finished() {
            let exit = self.join()?;
            tracing::info!(
                "Bridge stopped after {} sent, {} dropped",
                exit.sent,
                exit.failed
            );
            Some(exit)
        } else {
            tracing::info!("Bridge still waiting on console input; detaching");
            None
        }
    }
}

/// Start the bridge thread against the published browser
///
/// Fails with [`BridgeError::BrowserNotPublished`] if no browser handle has
/// been published yet, so the bridge never runs without a target.
pub fn spawn_bridge<T, R, W>(
    slot: &BrowserSlot<T>,
    mut input: R,
    mut output: W,
) -> Result<BridgeHandle, BridgeError>
where
    T: MessageSink + Clone + Send + 'static,
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    let browser = slot.get().cloned().ok_or(BridgeError::BrowserNotPublished)?;
    let bridge = ConsoleBridge::new(browser);

    let handle = thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || bridge.run(&mut input, &mut output))
        .map_err(BridgeError::Spawn)?;

    tracing::debug!("Bridge thread started");
    Ok(BridgeHandle { handle })
}
