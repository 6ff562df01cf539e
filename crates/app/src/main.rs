//! Courier - console-to-renderer messaging over CEF
//!
//! Every line typed on stdin is sent to the renderer process as a named
//! process message. Only the first whitespace-delimited token of a line is
//! used. Logs go to stderr; stdout carries prompts and message echoes.

use std::io::BufReader;

use courier_bridge::{BrowserSlot, MessageReceiver, StdoutWriter};
use courier_config::CourierConfig;
use courier_frontend_cef::CefRuntime;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset or invalid
const DEFAULT_LOG_FILTER: &str = "info";

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();
}

fn main() {
    init_logging();

    let config = CourierConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {}", e);
        CourierConfig::default()
    });
    tracing::debug!("Starting Courier with {:?}", config);

    let browser = BrowserSlot::new();
    let (receiver, mut received) = MessageReceiver::with_log();
    let mut runtime = CefRuntime::new(&config, browser.clone(), receiver);

    let exit_code = match courier_bridge::run(
        &mut runtime,
        &config,
        &browser,
        BufReader::new(std::io::stdin()),
        StdoutWriter,
    ) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            e.exit_code()
        }
    };

    let handled = received.drain();
    tracing::info!("Renderer handled {} messages in this process", handled.len());
    if let Some(last) = handled.last() {
        tracing::debug!("Last message: '{}' from {} process", last.name, last.source);
    }

    std::process::exit(exit_code);
}
