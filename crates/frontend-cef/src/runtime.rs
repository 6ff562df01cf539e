//! [`Runtime`] implementation backed by libcef.

use cef::args::Args;
use cef::{api_hash, sys, App, CefString, ImplCommandLine, Settings};
use courier_bridge::{BootstrapError, BrowserSlot, InitStage, MessageReceiver, Runtime, StartupSwitches};
use courier_config::CourierConfig;
use courier_ipc::ProcessRole;

use crate::app::{AppBuilder, CourierApp};
use crate::browser::{self, RendererTarget};

/// Select the CEF API version
///
/// Must run before `execute_process` or any other libcef entry point that
/// hands CEF a versioned object.
pub fn select_api_version() {
    let _ = api_hash(sys::CEF_API_VERSION_LAST, 0);
}

/// Drives the real CEF library through the bootstrap sequence
pub struct CefRuntime {
    args: Option<Args>,
    /// Passed to `execute_process`
    renderer_app: App,
    /// Passed to `initialize`
    browser_app: App,
    #[cfg(target_os = "macos")]
    loader: Option<cef::library_loader::LibraryLoader>,
}

impl CefRuntime {
    pub fn new(config: &CourierConfig, browser: BrowserSlot<RendererTarget>, receiver: MessageReceiver) -> Self {
        let switches = StartupSwitches::from(config);
        Self {
            args: None,
            renderer_app: AppBuilder::build(CourierApp::renderer(switches, receiver.clone())),
            browser_app: AppBuilder::build(CourierApp::browser(switches, receiver, browser)),
            #[cfg(target_os = "macos")]
            loader: None,
        }
    }

    fn process_role(&self) -> ProcessRole {
        let type_switch: CefString = "type".into();
        let Some(command_line) = self.args.as_ref().and_then(|args| args.as_cmd_line()) else {
            return ProcessRole::Browser;
        };
        if command_line.has_switch(Some(&type_switch)) != 1 {
            return ProcessRole::Browser;
        }
        let value = CefString::from(&command_line.switch_value(Some(&type_switch)));
        ProcessRole::from_process_type(&value.to_string())
    }

    fn settings(config: &CourierConfig) -> Settings {
        let mut settings = Settings::default();
        settings.no_sandbox = config.no_sandbox.into();

        // Without a helper CEF relaunches the main executable for subprocesses
        if !config.single_process {
            match browser::find_helper_binary(config.helper_path.as_deref()) {
                Some(path) => {
                    tracing::info!("Using CEF helper binary: {}", path.display());
                    let path = path.to_string_lossy();
                    settings.browser_subprocess_path = path.as_ref().into();
                }
                None => {
                    tracing::warn!(
                        "CEF helper binary not found; subprocesses will relaunch {}",
                        std::env::current_exe()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|_| "the main executable".into())
                    );
                }
            }
        }

        settings
    }
}

impl Runtime for CefRuntime {
    type Browser = RendererTarget;

    #[cfg(target_os = "macos")]
    fn load_library(&mut self) -> bool {
        // The framework is loaded at runtime as required by the macOS sandbox
        let exe_path = match std::env::current_exe() {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Cannot locate the current executable: {}", e);
                return false;
            }
        };
        let loader = cef::library_loader::LibraryLoader::new(&exe_path, false);
        if !loader.load() {
            return false;
        }
        self.loader = Some(loader);
        true
    }

    #[cfg(not(target_os = "macos"))]
    fn load_library(&mut self) -> bool {
        // libcef is linked at build time on this platform
        true
    }

    fn parse_args(&mut self) {
        select_api_version();
        self.args = Some(Args::new());
    }

    fn execute_process(&mut self) -> Option<i32> {
        if self.args.is_none() {
            self.parse_args();
        }
        let args = self.args.get_or_insert_with(Args::new);

        // Returns -1 for the browser process; subprocesses run to completion
        let exit_code = cef::execute_process(
            Some(args.as_main_args()),
            Some(&mut self.renderer_app),
            std::ptr::null_mut(),
        );
        tracing::debug!("execute_process returned: {}", exit_code);

        (exit_code >= 0).then_some(exit_code)
    }

    fn initialize(&mut self, stage: InitStage, config: &CourierConfig) -> Result<(), BootstrapError> {
        match stage {
            InitStage::Generic => {
                tracing::info!("Initializing CEF for the {} process", self.process_role());
                Ok(())
            }
            InitStage::Browser => {
                let settings = Self::settings(config);
                let args = self.args.get_or_insert_with(Args::new);

                let result = cef::initialize(
                    Some(args.as_main_args()),
                    Some(&settings),
                    Some(&mut self.browser_app),
                    std::ptr::null_mut(),
                );

                if result != 1 {
                    tracing::error!("Failed to initialize CEF");
                    return Err(BootstrapError::Initialize(format!(
                        "cef::initialize returned {}",
                        result
                    )));
                }

                tracing::info!("CEF initialized successfully");
                Ok(())
            }
        }
    }

    fn create_browser(&mut self, startup_url: &str) -> Result<RendererTarget, BootstrapError> {
        browser::create_browser(startup_url).map(RendererTarget::new)
    }

    fn run_message_loop(&mut self) {
        // Blocks until cef::quit_message_loop() is called
        cef::run_message_loop();
    }

    fn shutdown(&mut self) {
        cef::shutdown();
    }
}
