//! Hardware inventory and GPU state.
//!
//! Machine identity and video controllers come from the platform management store
//! (WMI on Windows, sysfs on Linux). NVIDIA session state comes from `nvidia-smi`.

mod machine;
pub mod nvidia;
mod platform;
mod video;

pub use machine::{machine_information, MachineInformation};
pub use nvidia::{parse_nvidia_smi_xml, NvidiaInformation};
pub use video::{video_controllers, VideoCardInformation};
