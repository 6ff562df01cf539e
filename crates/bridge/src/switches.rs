//! Startup command-line customization for the browser process.

use courier_config::CourierConfig;
use courier_ipc::ProcessRole;

use crate::CommandLineSink;

/// Stops macOS from prompting for keychain access. Cookies are not encrypted.
pub const MOCK_KEYCHAIN_SWITCH: &str = "use-mock-keychain";

/// Runs the renderer inside the browser process
pub const SINGLE_PROCESS_SWITCH: &str = "single-process";

/// Switches appended to the browser process command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupSwitches {
    pub disable_credential_prompt: bool,
    pub single_process: bool,
}

impl Default for StartupSwitches {
    fn default() -> Self {
        Self {
            disable_credential_prompt: true,
            single_process: true,
        }
    }
}

impl From<&CourierConfig> for StartupSwitches {
    fn from(config: &CourierConfig) -> Self {
        Self {
            disable_credential_prompt: config.disable_credential_prompt,
            single_process: config.single_process,
        }
    }
}

/// Append the startup switches when `process_type` is the browser process
///
/// `process_type` is empty for the browser process; any other process is left
/// untouched. Returns the number of switches appended.
pub fn customize_command_line<C>(process_type: &str, switches: StartupSwitches, command_line: &mut C) -> usize
where
    C: CommandLineSink + ?Sized,
{
    let role = ProcessRole::from_process_type(process_type);
    if !role.is_browser() {
        tracing::trace!("Leaving {} process command line unchanged", role);
        return 0;
    }

    let mut appended = 0;
    if switches.disable_credential_prompt {
        command_line.append_switch(MOCK_KEYCHAIN_SWITCH);
        appended += 1;
    }
    if switches.single_process {
        command_line.append_switch(SINGLE_PROCESS_SWITCH);
        appended += 1;
    }

    tracing::debug!("Appended {} switches to browser command line", appended);
    appended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingCommandLine;

    #[test]
    fn test_browser_process_gets_both_switches() {
        let mut command_line = RecordingCommandLine::default();

        let appended = customize_command_line("", StartupSwitches::default(), &mut command_line);

        assert_eq!(appended, 2);
        assert_eq!(
            command_line.switches,
            vec![MOCK_KEYCHAIN_SWITCH, SINGLE_PROCESS_SWITCH]
        );
    }

    #[test]
    fn test_other_processes_are_untouched() {
        for process_type in ["renderer", "gpu-process", "utility", "zygote", " "] {
            let mut command_line = RecordingCommandLine::default();
            let appended =
                customize_command_line(process_type, StartupSwitches::default(), &mut command_line);
            assert_eq!(appended, 0, "process type {:?}", process_type);
            assert!(command_line.switches.is_empty());
        }
    }

    #[test]
    fn test_switches_follow_config() {
        let config = CourierConfig {
            single_process: false,
            ..Default::default()
        };
        let mut command_line: Vec<String> = Vec::new();

        let appended = customize_command_line("", StartupSwitches::from(&config), &mut command_line);

        assert_eq!(appended, 1);
        assert_eq!(command_line, vec![MOCK_KEYCHAIN_SWITCH.to_string()]);
    }
}
