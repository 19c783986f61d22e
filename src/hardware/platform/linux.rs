//! sysfs backend: DMI for machine identity, DRM for video controllers.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{HostError, Result};
use crate::hardware::{MachineInformation, VideoCardInformation};

const DMI_ROOT: &str = "/sys/class/dmi/id";
const DRM_ROOT: &str = "/sys/class/drm";

pub(in crate::hardware) fn machine_information() -> Result<MachineInformation> {
    machine_information_from(Path::new(DMI_ROOT))
}

pub(in crate::hardware) fn video_controllers() -> Result<Vec<VideoCardInformation>> {
    video_controllers_from(Path::new(DRM_ROOT))
}

/// `product_version` carries the marketing model on most vendors (the same value WMI
/// reports as `Win32_ComputerSystemProduct.Version`).
fn machine_information_from(dmi_root: &Path) -> Result<MachineInformation> {
    let info = MachineInformation {
        vendor: read_attribute(&dmi_root.join("sys_vendor"))?.unwrap_or_default(),
        model: read_attribute(&dmi_root.join("product_version"))?.unwrap_or_default(),
    };

    if info.is_empty() {
        debug!(root = %dmi_root.display(), "no DMI product record");
    }
    Ok(info)
}

fn video_controllers_from(drm_root: &Path) -> Result<Vec<VideoCardInformation>> {
    let entries = match fs::read_dir(drm_root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(root = %drm_root.display(), "no DRM class directory");
            return Ok(Vec::new());
        }
        Err(err) => return Err(query_error(drm_root, err)),
    };

    // Connector entries look like card0-HDMI-A-1; only the cards themselves are controllers.
    let mut cards = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| query_error(drm_root, err))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_card_entry(&name) {
            cards.push(name);
        }
    }
    cards.sort_by_key(|name| card_index(name));

    let mut controllers = Vec::with_capacity(cards.len());
    for card in cards {
        let device = drm_root.join(&card).join("device");
        let Some(vendor_id) = read_attribute(&device.join("vendor"))? else {
            continue;
        };

        let device_id = read_attribute(&device.join("uevent"))?
            .as_deref()
            .and_then(pci_slot_name)
            .unwrap_or_else(|| card.clone());

        controllers.push(VideoCardInformation {
            manufacturer: vendor_name(&vendor_id),
            device_id,
        });
    }

    debug!(controllers = controllers.len(), "enumerated DRM cards");
    Ok(controllers)
}

fn is_card_entry(name: &str) -> bool {
    name.strip_prefix("card")
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

fn card_index(name: &str) -> u32 {
    name.trim_start_matches("card").parse().unwrap_or(u32::MAX)
}

fn pci_slot_name(uevent: &str) -> Option<String> {
    uevent
        .lines()
        .find_map(|line| line.strip_prefix("PCI_SLOT_NAME="))
        .map(|slot| slot.trim().to_string())
        .filter(|slot| !slot.is_empty())
}

/// Manufacturer strings as WMI reports them in `AdapterCompatibility`.
fn vendor_name(vendor_id: &str) -> String {
    match vendor_id.to_ascii_lowercase().as_str() {
        "0x10de" => "NVIDIA".to_string(),
        "0x1002" => "Advanced Micro Devices, Inc.".to_string(),
        "0x8086" => "Intel Corporation".to_string(),
        other => other.to_string(),
    }
}

/// Trimmed attribute contents, or `None` when the attribute does not exist.
fn read_attribute(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(query_error(path, err)),
    }
}

fn query_error(path: &Path, err: io::Error) -> HostError {
    HostError::Query(format!("{}: {}", path.display(), err))
}
