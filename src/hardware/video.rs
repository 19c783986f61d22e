use serde::{Deserialize, Serialize};

use super::platform;
use crate::error::Result;

/// One installed video controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCardInformation {
    /// Adapter compatibility / manufacturer string (e.g., "NVIDIA", "Intel Corporation")
    pub manufacturer: String,
    /// Platform device identifier, usable with device restarts
    pub device_id: String,
}

impl VideoCardInformation {
    pub fn is_nvidia(&self) -> bool {
        self.manufacturer.to_lowercase().contains("nvidia")
    }
}

/// List installed video controllers in platform enumeration order.
///
/// The order is whatever the platform reports and may differ across reboots.
pub fn video_controllers() -> Result<Vec<VideoCardInformation>> {
    platform::video_controllers()
}
