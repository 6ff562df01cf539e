//! CEF subprocess helper binary
//!
//! CEF spawns render, GPU and utility processes. When single-process mode is
//! disabled it launches this executable instead of the main one, so the
//! host's bootstrap never runs in a subprocess. Render processes started here
//! carry the same renderer app as the host and log every process message.

use courier_bridge::{MessageReceiver, StartupSwitches};
use courier_config::CourierConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = CourierConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {}", e);
        CourierConfig::default()
    });

    let exit_code = courier_frontend_cef::execute_subprocess(StartupSwitches::from(&config), MessageReceiver::new());
    std::process::exit(exit_code);
}
