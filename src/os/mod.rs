//! Administrative OS commands.
//!
//! Every command is a fixed argument template around a configurable executable:
//!
//! | Purpose         | Default executable | Arguments                      |
//! |-----------------|--------------------|--------------------------------|
//! | Restart machine | `shutdown`         | `-r -t 0`                      |
//! | Restart device  | `pnputil`          | `-restart-device "<deviceId>"` |
//! | Set power plan  | `powercfg`         | `-setactive <guid>`            |
//! | GPU diagnostics | `nvidia-smi`       | `-q -x`                        |

mod control;
pub mod process;

pub use control::HostControl;
pub use process::{CommandLine, CommandRunner, SystemRunner};

use serde::{Deserialize, Serialize};

use crate::error::{HostError, Result};

/// Executables used for each administrative command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPaths {
    #[serde(default = "default_shutdown")]
    pub shutdown: String,

    #[serde(default = "default_pnputil")]
    pub pnputil: String,

    #[serde(default = "default_powercfg")]
    pub powercfg: String,

    #[serde(default = "default_nvidia_smi")]
    pub nvidia_smi: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            shutdown: default_shutdown(),
            pnputil: default_pnputil(),
            powercfg: default_powercfg(),
            nvidia_smi: default_nvidia_smi(),
        }
    }
}

fn default_shutdown() -> String {
    "shutdown".to_string()
}

fn default_pnputil() -> String {
    "pnputil".to_string()
}

fn default_powercfg() -> String {
    "powercfg".to_string()
}

fn default_nvidia_smi() -> String {
    "nvidia-smi".to_string()
}

impl ToolPaths {
    /// Immediate restart, no delay and no prompt.
    pub fn restart_machine_command(&self) -> CommandLine {
        CommandLine::new(&self.shutdown, "-r -t 0")
    }

    pub fn restart_device_command(&self, device_id: &str) -> Result<CommandLine> {
        validate_device_id(device_id)?;
        Ok(CommandLine::new(
            &self.pnputil,
            format!("-restart-device \"{device_id}\""),
        ))
    }

    pub fn set_power_plan_command(&self, guid: &str) -> Result<CommandLine> {
        validate_power_plan(guid)?;
        Ok(CommandLine::new(&self.powercfg, format!("-setactive {guid}")))
    }

    /// XML report of every GPU the driver sees.
    pub fn nvidia_smi_command(&self) -> CommandLine {
        CommandLine::new(&self.nvidia_smi, "-q -x")
    }
}

/// Device instance ids are embedded inside double quotes, so anything that could close the
/// quote or be expanded by a shell is refused.
pub fn validate_device_id(device_id: &str) -> Result<()> {
    let reject = |reason| {
        Err(HostError::InvalidArgument {
            name: "device id",
            value: device_id.to_string(),
            reason,
        })
    };

    if device_id.trim().is_empty() {
        return reject("must not be empty");
    }
    if device_id.chars().any(char::is_control) {
        return reject("must not contain control characters");
    }
    if device_id.contains(['"', '`', '$']) {
        return reject("must not contain quotes, backticks or '$'");
    }
    // A trailing backslash would escape the closing quote.
    if device_id.ends_with('\\') {
        return reject("must not end with a backslash");
    }

    Ok(())
}

/// Power plans are selected by GUID (`381b4222-f694-41f0-9685-ff5bb260df2e`) or by a
/// `powercfg` alias such as `SCHEME_MIN`. The value is not quoted on the command line.
pub fn validate_power_plan(guid: &str) -> Result<()> {
    let reject = |reason| {
        Err(HostError::InvalidArgument {
            name: "power plan",
            value: guid.to_string(),
            reason,
        })
    };

    if guid.is_empty() {
        return reject("must not be empty");
    }
    if !guid
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '{' | '}'))
    {
        return reject("only letters, digits, '-', '_' and braces are allowed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restart_machine_uses_immediate_restart_flags() {
        let command = ToolPaths::default().restart_machine_command();
        assert_eq!(command.program, "shutdown");
        assert_eq!(command.arguments, "-r -t 0");
    }

    #[test]
    fn restart_device_quotes_id_verbatim() {
        let command = ToolPaths::default()
            .restart_device_command("ACPI\\VEN_123")
            .expect("valid device id");
        assert_eq!(command.program, "pnputil");
        assert_eq!(command.arguments, "-restart-device \"ACPI\\VEN_123\"");
    }

    #[test]
    fn restart_device_accepts_pci_instance_ids() {
        let id = "PCI\\VEN_10DE&DEV_2520&SUBSYS_3A5817AA&REV_A1\\4&2D78AB8F&0&0008";
        let command = ToolPaths::default()
            .restart_device_command(id)
            .expect("valid device id");
        assert_eq!(command.arguments, format!("-restart-device \"{id}\""));
    }

    #[test]
    fn set_power_plan_embeds_guid() {
        let command = ToolPaths::default()
            .set_power_plan_command("381b4222-f694-41f0-9685-ff5bb260df2e")
            .expect("valid guid");
        assert_eq!(command.program, "powercfg");
        assert_eq!(
            command.arguments,
            "-setactive 381b4222-f694-41f0-9685-ff5bb260df2e"
        );
    }

    #[test]
    fn nvidia_smi_requests_xml_report() {
        let command = ToolPaths::default().nvidia_smi_command();
        assert_eq!(command.to_string(), "nvidia-smi -q -x");
    }

    #[test]
    fn configured_executables_are_used() {
        let tools = ToolPaths {
            nvidia_smi: "C:\\Program Files\\NVIDIA Corporation\\NVSMI\\nvidia-smi.exe".to_string(),
            ..ToolPaths::default()
        };
        assert_eq!(
            tools.nvidia_smi_command().program,
            "C:\\Program Files\\NVIDIA Corporation\\NVSMI\\nvidia-smi.exe"
        );
    }

    #[test]
    fn device_id_injection_is_rejected() {
        for bad in [
            "",
            "   ",
            "ACPI\\VEN\" & shutdown -s",
            "ACPI\\VEN\n",
            "ACPI\\$(reboot)",
            "ACPI\\`reboot`",
            "ACPI\\VEN_123\\",
        ] {
            let err = ToolPaths::default().restart_device_command(bad).unwrap_err();
            assert!(
                matches!(err, HostError::InvalidArgument { name: "device id", .. }),
                "expected rejection for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn power_plan_accepts_guid_and_alias_forms() {
        assert!(validate_power_plan("SCHEME_MIN").is_ok());
        assert!(validate_power_plan("{8c5e7fda-e8bf-4a96-9a85-a6e23a8c635c}").is_ok());
    }

    #[test]
    fn power_plan_injection_is_rejected() {
        for bad in ["", "guid & shutdown -r", "a b", "guid;reboot", "\"quoted\""] {
            assert!(
                validate_power_plan(bad).is_err(),
                "expected rejection for {bad:?}"
            );
        }
    }
}
