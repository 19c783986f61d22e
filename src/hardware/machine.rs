use serde::{Deserialize, Serialize};

use super::platform;
use crate::error::Result;

/// Vendor and model of the machine.
///
/// Both fields are empty when the platform has no inventory record for the machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInformation {
    /// Manufacturer (e.g., "LENOVO")
    pub vendor: String,
    /// Marketing model/version string (e.g., "Legion 5 15ACH6H")
    pub model: String,
}

impl MachineInformation {
    pub fn is_empty(&self) -> bool {
        self.vendor.is_empty() && self.model.is_empty()
    }
}

/// Query the machine's vendor and model.
///
/// A missing inventory record is not an error: the empty record is returned instead.
pub fn machine_information() -> Result<MachineInformation> {
    platform::machine_information()
}
