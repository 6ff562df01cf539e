//! CEF (Chromium Embedded Framework) runtime for Courier
//!
//! This crate plugs libcef into the [`courier_bridge::Runtime`] seam.
//!
//! # Setup
//!
//! The `cef` crate downloads the CEF binary distribution at build time. Set
//! `CEF_PATH` to reuse an existing distribution.
//!
//! # Architecture
//!
//! CEF uses a multi-process architecture:
//! - Browser process (main app) owns the single browser instance
//! - Render process receives the process messages sent by the console bridge
//! - GPU and utility processes are left entirely to CEF
//!
//! By default the browser process appends `--single-process`, so the render
//! process handler runs inside the host. With single-process mode disabled,
//! subprocesses run `courier-cef-helper`, which carries the same renderer app.
//!
//! # References
//!
//! - CEF general usage: https://bitbucket.org/chromiumembedded/cef/wiki/GeneralUsage
//! - Process messages: https://bitbucket.org/chromiumembedded/cef/wiki/GeneralUsage#markdown-header-inter-process-communication-ipc

pub mod app;
pub mod browser;
pub mod runtime;

pub use app::CourierApp;
pub use browser::{create_browser, find_helper_binary, RendererTarget, HELPER_BINARY_NAME};
pub use runtime::CefRuntime;

use cef::args::Args;
use courier_bridge::{MessageReceiver, StartupSwitches};

/// Entry point for CEF subprocesses
///
/// Runs the renderer app for whatever process type CEF launched and returns
/// the exit code to report. A negative code from CEF means the binary was
/// started as a browser process, which the helper does not support.
pub fn execute_subprocess(switches: StartupSwitches, receiver: MessageReceiver) -> i32 {
    #[cfg(target_os = "macos")]
    let _loader = {
        let Ok(exe_path) = std::env::current_exe() else {
            return 1;
        };
        let loader = cef::library_loader::LibraryLoader::new(&exe_path, true);
        if !loader.load() {
            return 1;
        }
        loader
    };

    runtime::select_api_version();
    let args = Args::new();
    let mut app = app::AppBuilder::build(CourierApp::renderer(switches, receiver));

    let exit_code = cef::execute_process(Some(args.as_main_args()), Some(&mut app), std::ptr::null_mut());
    if exit_code < 0 {
        tracing::error!("courier-cef-helper was started without a CEF process type");
        return 1;
    }
    exit_code
}
