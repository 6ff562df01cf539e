//! CEF browser creation and browser-side handlers
//!
//! This module handles:
//! - The client handlers attached to the single browser instance
//! - Helper binary discovery for the subprocess architecture
//! - Synchronous browser creation
//! - Sending process messages to the renderer of the main frame

use std::path::{Path, PathBuf};

use cef::rc::Rc as _;
use cef::{
    wrap_client, wrap_display_handler, wrap_life_span_handler, Browser, BrowserSettings, CefString,
    CefStringUtf16, Client, DisplayHandler, ImplBrowser, ImplClient, ImplDisplayHandler, ImplFrame,
    ImplLifeSpanHandler, LifeSpanHandler, ProcessId, WindowInfo, WrapClient, WrapDisplayHandler,
    WrapLifeSpanHandler,
};
use courier_bridge::{BootstrapError, BridgeError, MessageSink};
use courier_ipc::MessageName;

/// File name of the subprocess helper binary
pub const HELPER_BINARY_NAME: &str = "courier-cef-helper";

/// Display handler for the browser window
///
/// Courier has no UI of its own; title changes are only traced.
#[derive(Clone)]
pub(crate) struct CourierDisplayHandler;

// Macro generates DisplayHandlerBuilder which wraps CourierDisplayHandler
wrap_display_handler! {
    pub(crate) struct DisplayHandlerBuilder {
        handler: CourierDisplayHandler,
    }

    impl DisplayHandler {
        fn on_title_change(&self, _browser: Option<&mut Browser>, title: Option<&CefString>) {
            if let Some(title) = title {
                tracing::debug!("Browser title changed: {}", title);
            }
        }
    }
}

impl DisplayHandlerBuilder {
    pub fn build(handler: CourierDisplayHandler) -> DisplayHandler {
        Self::new(handler)
    }
}

/// Life span handler that ends the message loop when the browser closes
#[derive(Clone)]
pub(crate) struct CourierLifeSpanHandler;

wrap_life_span_handler! {
    pub(crate) struct LifeSpanHandlerBuilder {
        handler: CourierLifeSpanHandler,
    }

    impl LifeSpanHandler {
        fn on_after_created(&self, _browser: Option<&mut Browser>) {
            tracing::debug!("Browser created");
        }

        fn on_before_close(&self, _browser: Option<&mut Browser>) {
            // Only one browser exists, so its closing ends the application
            tracing::info!("Browser closing, quitting message loop");
            cef::quit_message_loop();
        }
    }
}

impl LifeSpanHandlerBuilder {
    pub fn build(handler: CourierLifeSpanHandler) -> LifeSpanHandler {
        Self::new(handler)
    }
}

// Macro generates ClientBuilder which wraps DisplayHandler and LifeSpanHandler
wrap_client! {
    pub(crate) struct ClientBuilder {
        display_handler: DisplayHandler,
        life_span_handler: LifeSpanHandler,
    }

    impl Client {
        fn display_handler(&self) -> Option<cef::DisplayHandler> {
            Some(self.display_handler.clone())
        }

        fn life_span_handler(&self) -> Option<cef::LifeSpanHandler> {
            Some(self.life_span_handler.clone())
        }
    }
}

impl ClientBuilder {
    pub fn build() -> Client {
        let display_handler = DisplayHandlerBuilder::build(CourierDisplayHandler);
        let life_span_handler = LifeSpanHandlerBuilder::build(CourierLifeSpanHandler);
        Self::new(display_handler, life_span_handler)
    }
}

/// The created browser, addressed as the bridge's message target
///
/// Frames may be asked to send process messages from any browser-process
/// thread; CEF posts the send to its UI thread.
#[derive(Clone)]
pub struct RendererTarget {
    browser: Browser,
}

// SAFETY: CEF objects are reference counted with atomic counts, and
// `CefFrame::SendProcessMessage` may be called from any thread in the
// browser process. The bridge thread only sends messages through the handle.
#[allow(unsafe_code)]
unsafe impl Send for RendererTarget {}
#[allow(unsafe_code)]
unsafe impl Sync for RendererTarget {}

impl RendererTarget {
    pub fn new(browser: Browser) -> Self {
        Self { browser }
    }
}

impl MessageSink for RendererTarget {
    fn send_to_renderer(&self, name: &MessageName) -> Result<(), BridgeError> {
        let frame = self
            .browser
            .main_frame()
            .ok_or_else(|| BridgeError::Send("browser has no main frame".into()))?;

        let cef_name: CefString = name.as_str().into();
        let mut message = cef::process_message_create(Some(&cef_name))
            .ok_or_else(|| BridgeError::Send("failed to create process message".into()))?;

        frame.send_process_message(ProcessId::RENDERER, Some(&mut message));
        Ok(())
    }
}

/// Find the CEF helper binary path
///
/// An explicit `configured` path wins when it exists. Otherwise the helper is
/// looked up next to the main executable.
pub fn find_helper_binary(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!("Configured CEF helper not found: {}", path.display());
    }

    let exe_path = std::env::current_exe().ok()?;
    let helper_path = exe_path.parent()?.join(HELPER_BINARY_NAME);
    if helper_path.exists() {
        return Some(helper_path);
    }
    tracing::debug!("Helper not found at: {:?}", helper_path);

    None
}

/// Create the browser instance synchronously
///
/// Must be called on the CEF UI thread after initialization.
pub fn create_browser(startup_url: &str) -> Result<Browser, BootstrapError> {
    let mut client = ClientBuilder::build();

    // Default window info opens a native top-level window
    let mut window_info = WindowInfo::default();
    let mut browser_settings = BrowserSettings::default();
    let mut url: CefStringUtf16 = startup_url.into();

    tracing::info!("Creating CEF browser at {}", startup_url);

    let browser = cef::browser_host_create_browser_sync(
        Some(&mut window_info),
        Some(&mut client),
        Some(&mut url),
        Some(&mut browser_settings),
        None, // extra_info
        None, // request_context
    );

    match browser {
        Some(browser) => {
            tracing::info!("CEF browser created successfully");
            Ok(browser)
        }
        None => {
            tracing::error!("Failed to create CEF browser");
            Err(BootstrapError::CreateBrowser(format!(
                "CEF returned no browser for {}",
                startup_url
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configured_helper_falls_back() {
        let found = find_helper_binary(Some(Path::new("/nonexistent/courier-cef-helper")));
        // Test binaries never sit next to a built helper
        assert!(found.is_none());
    }

    #[test]
    fn test_existing_configured_helper_is_used() {
        let exe = std::env::current_exe().unwrap();
        let found = find_helper_binary(Some(&exe));
        assert_eq!(found, Some(exe));
    }
}
