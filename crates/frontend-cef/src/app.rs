//! CEF application objects
//!
//! The same `App` wrapper serves two roles:
//! - renderer only, handed to `execute_process` and to the subprocess helper
//! - browser, handed to `initialize`; it additionally carries the browser
//!   process handler that holds the published browser handle
//!
//! Both roles customize the browser command line and receive process
//! messages, so in single-process mode the renderer half runs inside the
//! host process.

use std::io::Write;

use cef::rc::Rc as _;
use cef::{
    wrap_app, wrap_browser_process_handler, wrap_render_process_handler, App, Browser,
    BrowserProcessHandler, CefString, CommandLine, Frame, ImplApp, ImplBrowserProcessHandler,
    ImplCommandLine, ImplProcessMessage, ImplRenderProcessHandler, ProcessId, ProcessMessage,
    RenderProcessHandler, WrapApp, WrapBrowserProcessHandler, WrapRenderProcessHandler,
};
use courier_bridge::{customize_command_line, BrowserSlot, CommandLineSink, MessageReceiver, StartupSwitches};
use courier_ipc::{MessageName, ProcessRole};

use crate::browser::RendererTarget;

/// Command line handed to `on_before_command_line_processing`
struct CefCommandLine<'a> {
    inner: &'a mut CommandLine,
}

impl CommandLineSink for CefCommandLine<'_> {
    fn append_switch(&mut self, name: &str) {
        let switch: CefString = name.into();
        self.inner.append_switch(Some(&switch));
    }
}

fn source_role(source: ProcessId) -> ProcessRole {
    if source == ProcessId::BROWSER {
        ProcessRole::Browser
    } else {
        ProcessRole::Renderer
    }
}

/// Renderer half: logs every process message it receives
#[derive(Clone)]
pub(crate) struct CourierRenderProcessHandler {
    receiver: MessageReceiver,
}

wrap_render_process_handler! {
    pub(crate) struct RenderProcessHandlerBuilder {
        handler: CourierRenderProcessHandler,
    }

    impl RenderProcessHandler {
        fn on_process_message_received(
            &self,
            _browser: Option<&mut Browser>,
            _frame: Option<&mut Frame>,
            source_process: ProcessId,
            message: Option<&mut ProcessMessage>,
        ) -> ::std::os::raw::c_int {
            let name = message
                .map(|message| CefString::from(&message.name()).to_string())
                .unwrap_or_default();

            let mut stdout = std::io::stdout().lock();
            let handled = self.handler.receiver.receive(
                MessageName::from(name),
                source_role(source_process),
                &mut stdout,
            );
            let _ = stdout.flush();

            handled as ::std::os::raw::c_int
        }
    }
}

impl RenderProcessHandlerBuilder {
    pub fn build(handler: CourierRenderProcessHandler) -> RenderProcessHandler {
        Self::new(handler)
    }
}

/// Browser half: keeps the published browser reachable for the bridge
#[derive(Clone)]
pub(crate) struct CourierBrowserProcessHandler {
    browser: BrowserSlot<RendererTarget>,
}

wrap_browser_process_handler! {
    pub(crate) struct BrowserProcessHandlerBuilder {
        handler: CourierBrowserProcessHandler,
    }

    impl BrowserProcessHandler {
        fn on_context_initialized(&self) {
            tracing::info!(
                "CEF context initialized (browser published: {})",
                self.handler.browser.is_published()
            );
        }
    }
}

impl BrowserProcessHandlerBuilder {
    pub fn build(handler: CourierBrowserProcessHandler) -> BrowserProcessHandler {
        Self::new(handler)
    }
}

/// Application state shared by both roles
#[derive(Clone)]
pub struct CourierApp {
    switches: StartupSwitches,
    render_handler: RenderProcessHandler,
    browser_handler: Option<BrowserProcessHandler>,
}

impl CourierApp {
    /// Application for renderer and helper processes
    pub fn renderer(switches: StartupSwitches, receiver: MessageReceiver) -> Self {
        Self {
            switches,
            render_handler: RenderProcessHandlerBuilder::build(CourierRenderProcessHandler { receiver }),
            browser_handler: None,
        }
    }

    /// Application for the browser process, holding the browser slot
    pub fn browser(
        switches: StartupSwitches,
        receiver: MessageReceiver,
        browser: BrowserSlot<RendererTarget>,
    ) -> Self {
        let mut app = Self::renderer(switches, receiver);
        app.browser_handler = Some(BrowserProcessHandlerBuilder::build(
            CourierBrowserProcessHandler { browser },
        ));
        app
    }
}

wrap_app! {
    pub(crate) struct AppBuilder {
        app: CourierApp,
    }

    impl App {
        fn on_before_command_line_processing(
            &self,
            process_type: Option<&CefString>,
            command_line: Option<&mut CommandLine>,
        ) {
            let Some(command_line) = command_line else { return };
            let process_type = process_type.map(|t| t.to_string()).unwrap_or_default();

            customize_command_line(
                &process_type,
                self.app.switches,
                &mut CefCommandLine { inner: command_line },
            );
        }

        fn browser_process_handler(&self) -> Option<cef::BrowserProcessHandler> {
            self.app.browser_handler.clone()
        }

        fn render_process_handler(&self) -> Option<cef::RenderProcessHandler> {
            Some(self.app.render_handler.clone())
        }
    }
}

impl AppBuilder {
    pub fn build(app: CourierApp) -> App {
        Self::new(app)
    }
}
