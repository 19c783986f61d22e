//! Platform management store access.
//!
//! Each backend returns fully materialized results; no query session outlives a call.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
pub(super) use linux::{machine_information, video_controllers};
#[cfg(target_os = "windows")]
pub(super) use windows::{machine_information, video_controllers};

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
use super::{MachineInformation, VideoCardInformation};
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
use crate::error::Result;

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
pub(super) fn machine_information() -> Result<MachineInformation> {
    tracing::debug!("no platform inventory backend, returning empty machine record");
    Ok(MachineInformation::default())
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
pub(super) fn video_controllers() -> Result<Vec<VideoCardInformation>> {
    tracing::debug!("no platform inventory backend, returning no video controllers");
    Ok(Vec::new())
}
