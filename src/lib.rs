//! Host information and control.
//!
//! Queries machine identity, video controllers and NVIDIA GPU session state, and issues a
//! few administrative commands (machine restart, device restart, power plan switch).
//! Every operation is synchronous and blocks until the underlying process or platform
//! query has finished.

pub mod config;
pub mod error;
pub mod hardware;
pub mod os;

pub use error::{HostError, Result};
pub use hardware::{
    machine_information, parse_nvidia_smi_xml, video_controllers, MachineInformation,
    NvidiaInformation, VideoCardInformation,
};
pub use os::{CommandLine, CommandRunner, HostControl, SystemRunner, ToolPaths};
