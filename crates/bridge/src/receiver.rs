//! Renderer-side message receiver.

use std::io::Write;

use courier_ipc::{MessageName, ProcessRole, ReceivedMessage};
use tokio::sync::mpsc;

/// Logs every process message that reaches the renderer
///
/// Messages are never dispatched by name and their payload is never parsed.
/// An optional observer channel gets a copy of each received message.
#[derive(Debug, Clone, Default)]
pub struct MessageReceiver {
    observer: Option<mpsc::UnboundedSender<ReceivedMessage>>,
}

impl MessageReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a copy of each received message to `observer`
    pub fn with_observer(observer: mpsc::UnboundedSender<ReceivedMessage>) -> Self {
        Self {
            observer: Some(observer),
        }
    }

    /// Receiver paired with a log of every message it handles
    pub fn with_log() -> (Self, ReceivedLog) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::with_observer(tx), ReceivedLog { rx })
    }

    /// Record one received message and report it as handled
    ///
    /// Writes exactly one line to `out`. Always returns `true`.
    pub fn receive<W: Write>(&self, name: MessageName, source: ProcessRole, out: &mut W) -> bool {
        if let Err(e) = writeln!(out, "Renderer -> Message Received: {}", name) {
            tracing::warn!("Failed to log received message: {}", e);
        }
        tracing::debug!("Renderer received '{}' from {} process", name, source);

        if let Some(observer) = &self.observer {
            // A dropped observer just stops getting copies
            let _ = observer.send(ReceivedMessage { name, source });
        }

        true
    }
}

/// Messages handled by a [`MessageReceiver`] in this process
///
/// Only the renderer role running in this process reports here, which in
/// single-process mode is every renderer message.
#[derive(Debug)]
pub struct ReceivedLog {
    rx: mpsc::UnboundedReceiver<ReceivedMessage>,
}

impl ReceivedLog {
    /// Take every message recorded so far without blocking
    pub fn drain(&mut self) -> Vec<ReceivedMessage> {
        let mut drained = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            drained.push(message);
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_one_line_and_handles() {
        let receiver = MessageReceiver::new();
        let mut out = Vec::new();

        assert!(receiver.receive("ping".into(), ProcessRole::Browser, &mut out));

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Renderer -> Message Received: ping\n");
    }

    #[test]
    fn test_empty_name_is_handled() {
        let receiver = MessageReceiver::new();
        let mut out = Vec::new();

        assert!(receiver.receive("".into(), ProcessRole::Browser, &mut out));
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_one_line_per_message() {
        let receiver = MessageReceiver::new();
        let mut out = Vec::new();

        for name in ["a", "b", "c"] {
            assert!(receiver.receive(name.into(), ProcessRole::Browser, &mut out));
        }

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Renderer -> Message Received: a",
                "Renderer -> Message Received: b",
                "Renderer -> Message Received: c",
            ]
        );
    }

    #[test]
    fn test_observer_gets_a_copy() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let receiver = MessageReceiver::with_observer(tx);
        let mut out = Vec::new();

        receiver.receive("hello".into(), ProcessRole::Browser, &mut out);

        let received = rx.try_recv().unwrap();
        assert_eq!(received.name.as_str(), "hello");
        assert_eq!(received.source, ProcessRole::Browser);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_log_drains_in_arrival_order() {
        let (receiver, mut log) = MessageReceiver::with_log();
        let mut out = Vec::new();

        assert!(log.drain().is_empty());

        let copy = receiver.clone();
        receiver.receive("first".into(), ProcessRole::Browser, &mut out);
        copy.receive("".into(), ProcessRole::Renderer, &mut out);

        let names: Vec<_> = log.drain().into_iter().map(|m| m.name.into_string()).collect();
        assert_eq!(names, vec!["first", ""]);
        assert!(log.drain().is_empty());
    }

    #[test]
    fn test_closed_observer_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let receiver = MessageReceiver::with_observer(tx);
        let mut out = Vec::new();

        assert!(receiver.receive("late".into(), ProcessRole::Browser, &mut out));
    }
}
