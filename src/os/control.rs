//! Host control façade.

use tracing::{debug, info};

use super::process::{CommandRunner, SystemRunner};
use super::ToolPaths;
use crate::error::Result;
use crate::hardware::{self, NvidiaInformation, VideoCardInformation};

/// Issues administrative commands and GPU queries through a [`CommandRunner`].
///
/// Holds no state between calls besides the runner and the configured executables.
#[derive(Debug, Clone, Default)]
pub struct HostControl<R = SystemRunner> {
    runner: R,
    tools: ToolPaths,
}

impl HostControl<SystemRunner> {
    pub fn new(tools: ToolPaths) -> Self {
        Self::with_runner(SystemRunner, tools)
    }
}

impl<R: CommandRunner> HostControl<R> {
    pub fn with_runner(runner: R, tools: ToolPaths) -> Self {
        Self { runner, tools }
    }

    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    /// Request an immediate restart. Returns once `shutdown` has exited, not once the
    /// machine has restarted.
    pub fn restart_machine(&self) -> Result<()> {
        let command = self.tools.restart_machine_command();
        info!(command = %command, "requesting machine restart");
        self.runner.launch_detached(&command)
    }

    /// Restart a single device by its platform device instance id.
    pub fn restart_device(&self, device_id: &str) -> Result<()> {
        let command = self.tools.restart_device_command(device_id)?;
        info!(command = %command, "requesting device restart");
        self.runner.launch_detached(&command)
    }

    /// Switch the active power plan.
    pub fn set_active_power_plan(&self, guid: &str) -> Result<()> {
        let command = self.tools.set_power_plan_command(guid)?;
        info!(command = %command, "switching power plan");
        self.runner.launch_detached(&command)
    }

    /// Query display and process state of the NVIDIA GPU via `nvidia-smi`.
    pub fn nvidia_information(&self) -> Result<NvidiaInformation> {
        let command = self.tools.nvidia_smi_command();
        let output = self.runner.launch_capturing(&command)?;
        hardware::parse_nvidia_smi_xml(&output)
    }

    /// Restart the first NVIDIA video controller found in the platform inventory.
    ///
    /// Returns the restarted card, or `None` when no NVIDIA controller is installed.
    pub fn restart_nvidia_gpu(&self) -> Result<Option<VideoCardInformation>> {
        let cards = hardware::video_controllers()?;
        self.restart_first_nvidia(&cards)
    }

    fn restart_first_nvidia(
        &self,
        cards: &[VideoCardInformation],
    ) -> Result<Option<VideoCardInformation>> {
        let Some(card) = cards.iter().find(|card| card.is_nvidia()) else {
            debug!(controllers = cards.len(), "no NVIDIA video controller found");
            return Ok(None);
        };

        self.restart_device(&card.device_id)?;
        Ok(Some(card.clone()))
    }
}
